//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use generation::Orchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Generation orchestrator.
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, orchestrator: Arc<Orchestrator>) -> Self {
        Self { db, orchestrator }
    }
}
