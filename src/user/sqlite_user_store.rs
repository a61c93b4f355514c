use super::user_models::{SpotifyTokens, SpotifyUser, UserUpsert};
use super::user_store::UserStore;
use crate::taxonomy::SqliteTaxonomyStore;
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

// Users live in the same database file as the taxonomy.
impl UserStore for SqliteTaxonomyStore {
    fn get_user(&self, user_id: &str) -> Result<Option<SpotifyUser>> {
        let conn = self.read_conn.lock().unwrap();
        let user = conn
            .prepare_cached(
                "SELECT id, display_name, email, access_token, refresh_token
                 FROM users WHERE id = ?1",
            )?
            .query_row(params![user_id], |row| {
                Ok(SpotifyUser {
                    id: row.get(0)?,
                    display_name: row.get(1)?,
                    email: row.get(2)?,
                    access_token: row.get(3)?,
                    refresh_token: row.get(4)?,
                })
            })
            .optional()?;
        Ok(user)
    }

    fn upsert_user(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        email: Option<&str>,
        tokens: &SpotifyTokens,
    ) -> Result<UserUpsert> {
        let conn = self.write_conn.lock().unwrap();
        let updated = conn
            .execute(
                "UPDATE users SET access_token = ?1, refresh_token = ?2 WHERE id = ?3",
                params![tokens.access_token, tokens.refresh_token, user_id],
            )
            .with_context(|| format!("Failed to update tokens for user {}", user_id))?;
        if updated > 0 {
            debug!("Refreshed stored tokens for user {}", user_id);
            return Ok(UserUpsert::TokensUpdated);
        }

        conn.execute(
            "INSERT INTO users (id, display_name, email, access_token, refresh_token)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                display_name,
                email,
                tokens.access_token,
                tokens.refresh_token
            ],
        )
        .with_context(|| format!("Failed to insert user {}", user_id))?;
        debug!("Inserted user {}", user_id);
        Ok(UserUpsert::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SqliteTaxonomyStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteTaxonomyStore::new(tmp.path().join("taxonomy.db")).unwrap();
        (store, tmp)
    }

    fn tokens(access: &str) -> SpotifyTokens {
        SpotifyTokens {
            access_token: access.to_string(),
            refresh_token: Some(format!("refresh-{}", access)),
        }
    }

    #[test]
    fn unknown_user_is_none() {
        let (store, _tmp) = create_test_store();
        assert!(store.get_user("nobody").unwrap().is_none());
    }

    #[test]
    fn inserts_then_updates_only_tokens() {
        let (store, _tmp) = create_test_store();

        let first = store
            .upsert_user("spotify-user", Some("Alice"), Some("a@x.io"), &tokens("t1"))
            .unwrap();
        assert_eq!(first, UserUpsert::Inserted);

        let second = store
            .upsert_user("spotify-user", Some("Renamed"), None, &tokens("t2"))
            .unwrap();
        assert_eq!(second, UserUpsert::TokensUpdated);

        let user = store.get_user("spotify-user").unwrap().unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert_eq!(user.email.as_deref(), Some("a@x.io"));
        assert_eq!(user.access_token.as_deref(), Some("t2"));
        assert_eq!(user.refresh_token.as_deref(), Some("refresh-t2"));
    }
}
