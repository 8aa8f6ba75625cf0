//! Persistence contract for the student roster
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) for async methods, so
//! stores are used through generics rather than trait objects.

use std::future::Future;

use super::error::RepositoryError;
use super::query::StudentQuery;
use super::unit_of_work::{ChangeSet, SaveSummary};
use crate::pagination::PageSource;
use crate::students::{Student, StudentId};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Queryable, transactional access to students
///
/// Listing goes through the [`PageSource`] supertrait (`count` + `fetch` over a
/// [`StudentQuery`]). Mutations are staged in a [`ChangeSet`] and committed by
/// [`save`](StudentStore::save), which either applies every change or none.
pub trait StudentStore: PageSource<StudentQuery, Item = Student> + Send + Sync {
    /// Find a student by identity without its enrollments
    fn find(
        &self,
        id: StudentId,
    ) -> impl Future<Output = RepositoryResult<Option<Student>>> + Send;

    /// Find a student with its enrollments and each enrollment's course expanded
    fn find_with_enrollments(
        &self,
        id: StudentId,
    ) -> impl Future<Output = RepositoryResult<Option<Student>>> + Send;

    /// Commit every staged change atomically.
    ///
    /// # Errors
    ///
    /// Fails with [`UpdateConflict`](super::RepositoryErrorKind::UpdateConflict)
    /// when an update or removal targets a missing row, and with
    /// [`ConstraintViolation`](super::RepositoryErrorKind::ConstraintViolation)
    /// when the store rejects a value. Nothing is applied on failure.
    fn save(&self, changes: ChangeSet) -> impl Future<Output = RepositoryResult<SaveSummary>> + Send;
}
