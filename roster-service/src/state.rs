//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Config;
use crate::repository::StudentStore;
use crate::students::StudentsController;

/// Application state shared across handlers
///
/// Generic over the student store so the same router serves the in-memory
/// store and the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct AppState<S> {
    config: Arc<Config>,
    students: StudentsController<S>,
}

impl<S: StudentStore> AppState<S> {
    /// Build state from configuration and a store; the page size comes from
    /// the `roster` section
    pub fn new(config: Config, store: S) -> Self {
        let students = StudentsController::new(store, config.roster.page_size);
        Self {
            config: Arc::new(config),
            students,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Student actions
    pub fn students(&self) -> &StudentsController<S> {
        &self.students
    }
}
