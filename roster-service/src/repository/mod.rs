//! Persistence for the student roster
//!
//! This module defines the storage seam the handlers are written against and
//! the stores that implement it.
//!
//! # Features
//!
//! - **Store contract**: [`StudentStore`] for lookups and atomic saves, with listing
//!   through the [`PageSource`](crate::pagination::PageSource) supertrait
//! - **Queries**: [`StudentQuery`] carries the search predicate and ordering
//! - **Unit of work**: [`ChangeSet`] stages adds, updates, and removals for one commit
//! - **In-memory store**: [`InMemoryStudentStore`], used when no database is configured
//! - **PostgreSQL store**: `PgStudentStore`, behind the `database` feature
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_service::repository::{ChangeSet, InMemoryStudentStore, StudentStore};
//!
//! let store = InMemoryStudentStore::with_sample_roster();
//! let mut changes = ChangeSet::new();
//! changes.remove(StudentId::new(3));
//! store.save(changes).await?;
//! ```

mod error;
mod memory;
#[cfg(feature = "database")]
mod postgres;
mod query;
mod traits;
mod unit_of_work;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryStudentStore;
#[cfg(feature = "database")]
pub use postgres::PgStudentStore;
pub use query::{OrderDirection, StudentOrder, StudentQuery, StudentSortField};
pub use traits::{RepositoryResult, StudentStore};
pub use unit_of_work::{ChangeSet, SaveSummary, StagedChange};
