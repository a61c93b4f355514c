use std::collections::HashMap;
use tokio::sync::RwLock;

/// Seconds a pending authorization stays valid.
pub const AUTH_STATE_TTL_SECS: i64 = 300;

/// State kept between `/spotify/auth` and `/spotify/callback`.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub state: String,
    pub code_verifier: String,
    /// Unix seconds.
    pub created_at: i64,
}

impl PendingAuth {
    pub fn new(state: String, code_verifier: String) -> Self {
        Self {
            state,
            code_verifier,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    fn is_expired(&self, now: i64) -> bool {
        now - self.created_at >= AUTH_STATE_TTL_SECS
    }
}

/// In-memory pending authorizations keyed by `state`.
pub struct AuthStateStore {
    states: RwLock<HashMap<String, PendingAuth>>,
}

impl AuthStateStore {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    pub async fn store(&self, pending: PendingAuth) {
        let mut states = self.states.write().await;
        states.insert(pending.state.clone(), pending);
    }

    /// Removes and returns the entry for `state`. Expired entries are
    /// removed too but never returned.
    pub async fn take(&self, state: &str) -> Option<PendingAuth> {
        let mut states = self.states.write().await;
        let pending = states.remove(state)?;
        if pending.is_expired(chrono::Utc::now().timestamp()) {
            return None;
        }
        Some(pending)
    }

    pub async fn cleanup_expired(&self) {
        let now = chrono::Utc::now().timestamp();
        let mut states = self.states.write().await;
        states.retain(|_, pending| !pending.is_expired(now));
    }

    pub async fn pending_count(&self) -> usize {
        self.states.read().await.len()
    }
}

impl Default for AuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}
