pub mod chats;
pub mod connection;
pub mod defaults;
pub mod library;
pub mod models;
pub mod profile;

pub use connection::{get_connection, StorePool};

/// Result of a guarded write against a collection. Default-flagged
/// (built-in) entries reject updates and deletes; the collection is
/// left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    Protected,
    NotFound,
}
