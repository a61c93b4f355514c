use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `/me` profile of the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// An artist search hit. Fields the server does not read are kept in
/// `extra` so proxy routes can pass the full object through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpotifyTrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SpotifyTrackArtist>,
    pub album: SpotifyAlbum,
}

/// Error envelope of the Web API: `{"error": {"status", "message"}}`.
#[derive(Deserialize)]
pub(crate) struct SpotifyErrorBody {
    pub error: SpotifyErrorDetail,
}

#[derive(Deserialize)]
pub(crate) struct SpotifyErrorDetail {
    pub message: String,
}
