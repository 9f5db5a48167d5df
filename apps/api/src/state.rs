use pethub_db::Database;

/// Shared application state, cloned into every handler.
///
/// `Database` wraps a pooled handle, so cloning is cheap and every clone
/// talks to the same pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
