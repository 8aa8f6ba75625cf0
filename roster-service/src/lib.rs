//! # roster-service
//!
//! Student roster web service: a searchable, sortable, paginated student list
//! plus details, create, edit, and two-phase delete.
//!
//! ## Features
//!
//! - **Pagination**: [`PaginatedList`](pagination::PaginatedList) over any
//!   [`PageSource`](pagination::PageSource), built from one count and one windowed fetch
//! - **Overposting protection**: create and edit only accept
//!   [`StudentFields`](students::StudentFields), which has no identity
//! - **Recoverable saves**: rejected commits re-render the form or the delete
//!   confirmation with a retry prompt
//! - **Storage**: in-memory store by default, PostgreSQL with the `database` feature
//! - **Middleware stack**: request IDs, tracing, compression, timeouts, body limits,
//!   panic recovery
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use roster_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), InMemoryStudentStore::with_sample_roster());
//!
//!     Server::new(config).serve(app(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod server;
pub mod state;
pub mod students;
pub mod web;

#[cfg(feature = "database")]
pub mod database;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, MiddlewareConfig, RosterConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::health::{health, readiness};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{PageSource, PageWindow, PaginatedList};
    pub use crate::repository::{
        ChangeSet, InMemoryStudentStore, RepositoryError, RepositoryErrorKind, StudentQuery,
        StudentStore,
    };
    #[cfg(feature = "database")]
    pub use crate::repository::PgStudentStore;
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::students::{Student, StudentFields, StudentId, StudentsController};
    pub use crate::web::{app, router};

    pub use axum::Router;
}
