//! Application state shared by all handlers.

use crate::db::{DbPool, SqliteStore};
use crate::sessions::ReviewSessions;

#[derive(Clone)]
pub struct AppState {
    /// Connection for deck and card CRUD
    pub db: DbPool,

    /// Card store handed to review sessions
    pub store: SqliteStore,

    pub sessions: ReviewSessions,
}

impl AppState {
    pub fn new(db: DbPool, store: SqliteStore) -> Self {
        Self {
            db,
            store,
            sessions: ReviewSessions::new(),
        }
    }
}
