mod sqlite_user_store;
pub mod user_models;
mod user_store;

pub use user_models::{SpotifyTokens, SpotifyUser, UserUpsert};
pub use user_store::UserStore;
