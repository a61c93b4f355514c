//! Toronto Artists Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod categorizer;
pub mod config;
pub mod enrichment;
pub mod server;
pub mod spotify;
pub mod sqlite_persistence;
pub mod taxonomy;
pub mod upstream;
pub mod user;
pub mod wikipedia;

// Re-export commonly used types for convenience
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState, Services};
pub use taxonomy::{SqliteTaxonomyStore, TaxonomyStore};
pub use user::UserStore;
