//! Staged changes committed atomically by [`StudentStore::save`](super::StudentStore::save)

use crate::students::{StudentFields, StudentId};

/// One staged mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    /// Insert a new student; the store assigns its identity
    Add(StudentFields),
    /// Overwrite the whitelisted fields of an existing student
    Update { id: StudentId, fields: StudentFields },
    /// Delete a student and its enrollments
    Remove(StudentId),
}

/// Ordered set of changes applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<StagedChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fields: StudentFields) -> &mut Self {
        self.changes.push(StagedChange::Add(fields));
        self
    }

    pub fn update(&mut self, id: StudentId, fields: StudentFields) -> &mut Self {
        self.changes.push(StagedChange::Update { id, fields });
        self
    }

    pub fn remove(&mut self, id: StudentId) -> &mut Self {
        self.changes.push(StagedChange::Remove(id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl IntoIterator for ChangeSet {
    type Item = StagedChange;
    type IntoIter = std::vec::IntoIter<StagedChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// What a successful save did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Identities assigned to added students, in staging order
    pub added: Vec<StudentId>,
    pub updated: usize,
    pub removed: usize,
}
