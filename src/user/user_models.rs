/// OAuth tokens issued by Spotify for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// A Spotify account that completed the OAuth flow. `id` is the Spotify user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserUpsert {
    Inserted,
    TokensUpdated,
}
