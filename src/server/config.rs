use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// The OAuth callback redirects here with `?user_id=`.
    pub frontend_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8787,
            metrics_port: 9091,
            frontend_base_url: "http://localhost:3002".to_string(),
        }
    }
}
