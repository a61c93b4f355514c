//! Shared constants for end-to-end tests
//!
//! When seeded test data changes, update only this file.

// ============================================================================
// Seeded Spotify user
// ============================================================================

/// Spotify user id of the listener seeded into every test database
pub const TEST_USER_ID: &str = "test-listener";

/// Access token stored for the seeded listener
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Display name of the seeded listener
pub const TEST_USER_NAME: &str = "Test Listener";

/// Email of the seeded listener
pub const TEST_USER_EMAIL: &str = "listener@example.com";

// ============================================================================
// OAuth
// ============================================================================

/// Frontend the OAuth callback redirects to
pub const FRONTEND_BASE_URL: &str = "http://frontend.test";

/// Spotify account returned by the fake profile endpoint
pub const OAUTH_USER_ID: &str = "oauth-user";

/// Access token issued by the fake token endpoint
pub const OAUTH_ACCESS_TOKEN: &str = "oauth-access-token";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
