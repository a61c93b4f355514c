mod artist_routes;
pub mod config;
pub mod error;
mod genre_routes;
mod http_layers;
pub mod metrics;
pub mod server;
mod session;
mod spotify_routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session::HEADER_USER_ID_KEY;
pub use spotify_routes::AUTH_STATE_COOKIE;
pub use state::{ServerState, Services};
