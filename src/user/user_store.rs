use super::user_models::{SpotifyTokens, SpotifyUser, UserUpsert};
use anyhow::Result;

pub trait UserStore: Send + Sync {
    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: &str) -> Result<Option<SpotifyUser>>;

    /// Inserts the user with its profile and tokens, or, if the id is already
    /// known, replaces only the stored tokens.
    fn upsert_user(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        email: Option<&str>,
        tokens: &SpotifyTokens,
    ) -> Result<UserUpsert>;
}
