//! In-memory student store
//!
//! Backs the service when no database is configured and drives the tests.
//! Saves are applied to a working copy of the state and swapped in only when
//! every staged change succeeds.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::query::StudentQuery;
use super::traits::{RepositoryResult, StudentStore};
use super::unit_of_work::{ChangeSet, SaveSummary, StagedChange};
use crate::pagination::{PageSource, PageWindow};
use crate::students::{
    seed, Course, Enrollment, Grade, Student, StudentFields, StudentId, NAME_MAX_LEN,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    students: BTreeMap<StudentId, Student>,
    courses: BTreeMap<i32, Course>,
    enrollments: Vec<Enrollment>,
    last_student_id: i32,
    last_enrollment_id: i32,
}

impl MemoryState {
    fn apply(&mut self, changes: ChangeSet) -> RepositoryResult<SaveSummary> {
        let mut summary = SaveSummary::default();

        for change in changes {
            match change {
                StagedChange::Add(fields) => {
                    check_column_lengths(&fields)?;
                    self.last_student_id += 1;
                    let id = StudentId::new(self.last_student_id);
                    self.students.insert(id, Student::from_fields(id, fields));
                    summary.added.push(id);
                }
                StagedChange::Update { id, fields } => {
                    check_column_lengths(&fields)?;
                    let student = self
                        .students
                        .get_mut(&id)
                        .ok_or_else(|| RepositoryError::update_conflict("Student", id.to_string()))?;
                    student.apply(fields);
                    summary.updated += 1;
                }
                StagedChange::Remove(id) => {
                    self.students
                        .remove(&id)
                        .ok_or_else(|| RepositoryError::update_conflict("Student", id.to_string()))?;
                    self.enrollments.retain(|e| e.student_id != id);
                    summary.removed += 1;
                }
            }
        }

        Ok(summary)
    }

    fn add_course(&mut self, course: Course) {
        self.courses.insert(course.course_id, course);
    }

    fn enroll(&mut self, student_id: StudentId, course_id: i32, grade: Option<Grade>) {
        self.last_enrollment_id += 1;
        self.enrollments.push(Enrollment {
            enrollment_id: self.last_enrollment_id,
            course_id,
            student_id,
            grade,
            course: None,
        });
    }
}

/// Mirrors the `VARCHAR(50)` name columns of the relational schema
fn check_column_lengths(fields: &StudentFields) -> RepositoryResult<()> {
    for (column, value) in [
        ("last_name", &fields.last_name),
        ("first_mid_name", &fields.first_mid_name),
    ] {
        if value.chars().count() > NAME_MAX_LEN {
            return Err(RepositoryError::constraint_violation(
                RepositoryOperation::Save,
                format!("value too long for column {column}"),
            ));
        }
    }
    Ok(())
}

/// Student store held entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStudentStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStudentStore {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the sample roster: students, courses, and enrollments
    #[must_use]
    pub fn with_sample_roster() -> Self {
        let mut state = MemoryState::default();

        let mut changes = ChangeSet::new();
        for fields in seed::sample_students() {
            changes.add(fields);
        }
        // Sample names are all within column limits
        if let Ok(summary) = state.apply(changes) {
            for course in seed::sample_courses() {
                state.add_course(course);
            }
            for (student_index, course_id, grade) in seed::sample_enrollments() {
                if let Some(&student_id) = summary.added.get(student_index) {
                    state.enroll(student_id, course_id, grade);
                }
            }
        }

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl PageSource<StudentQuery> for InMemoryStudentStore {
    type Item = Student;

    async fn count(&self, query: &StudentQuery) -> RepositoryResult<u64> {
        let state = self.state.read().await;
        Ok(state.students.values().filter(|s| query.matches(s)).count() as u64)
    }

    async fn fetch(
        &self,
        query: &StudentQuery,
        window: PageWindow,
    ) -> RepositoryResult<Vec<Student>> {
        let state = self.state.read().await;
        let mut rows: Vec<&Student> = state.students.values().filter(|s| query.matches(s)).collect();
        let order = query.order();
        rows.sort_by(|a, b| order.compare(a, b));

        let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(window.take).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(skip).take(take).cloned().collect())
    }
}

impl StudentStore for InMemoryStudentStore {
    async fn find(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        Ok(self.state.read().await.students.get(&id).cloned())
    }

    async fn find_with_enrollments(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        let state = self.state.read().await;
        let Some(student) = state.students.get(&id) else {
            return Ok(None);
        };

        let mut student = student.clone();
        student.enrollments = state
            .enrollments
            .iter()
            .filter(|e| e.student_id == id)
            .map(|e| Enrollment {
                course: state.courses.get(&e.course_id).cloned(),
                ..e.clone()
            })
            .collect();
        Ok(Some(student))
    }

    async fn save(&self, changes: ChangeSet) -> RepositoryResult<SaveSummary> {
        if changes.is_empty() {
            return Ok(SaveSummary::default());
        }

        let mut state = self.state.write().await;
        let mut working = state.clone();
        let summary = working.apply(changes)?;
        *state = working;

        tracing::debug!(
            added = summary.added.len(),
            updated = summary.updated,
            removed = summary.removed,
            "Saved changes"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{OrderDirection, RepositoryErrorKind, StudentOrder, StudentSortField};
    use chrono::NaiveDate;

    fn fields(last: &str, first: &str, year: i32) -> StudentFields {
        StudentFields::new(last, first, NaiveDate::from_ymd_opt(year, 9, 1).unwrap())
    }

    fn last_names(students: &[Student]) -> Vec<&str> {
        students.iter().map(|s| s.last_name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_sample_roster_is_loaded() {
        let store = InMemoryStudentStore::with_sample_roster();
        assert_eq!(store.count(&StudentQuery::new()).await.unwrap(), 8);

        let carson = store
            .find_with_enrollments(StudentId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(carson.last_name, "Alexander");
        assert_eq!(carson.enrollments.len(), 3);
        assert!(carson.enrollments.iter().all(|e| e.course.is_some()));
    }

    #[tokio::test]
    async fn test_find_does_not_expand_enrollments() {
        let store = InMemoryStudentStore::with_sample_roster();
        let carson = store.find(StudentId::new(1)).await.unwrap().unwrap();
        assert!(carson.enrollments.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_filters_orders_and_windows() {
        let store = InMemoryStudentStore::with_sample_roster();
        let query = StudentQuery::new().with_search("a");

        let all = store
            .fetch(&query, PageWindow { skip: 0, take: 100 })
            .await
            .unwrap();
        assert_eq!(all.len() as u64, store.count(&query).await.unwrap());
        assert!(all.windows(2).all(|w| w[0].last_name <= w[1].last_name));

        let second = store.fetch(&query, PageWindow { skip: 3, take: 3 }).await.unwrap();
        assert_eq!(last_names(&second), last_names(&all[3..6]));
    }

    #[tokio::test]
    async fn test_fetch_by_date_descending() {
        let store = InMemoryStudentStore::with_sample_roster();
        let query = StudentQuery::new().ordered_by(StudentOrder::new(
            StudentSortField::EnrollmentDate,
            OrderDirection::Descending,
        ));
        let rows = store.fetch(&query, PageWindow { skip: 0, take: 8 }).await.unwrap();
        assert!(rows.windows(2).all(|w| w[0].enrollment_date >= w[1].enrollment_date));
    }

    #[tokio::test]
    async fn test_last_name_order_ignores_case() {
        let store = InMemoryStudentStore::new();
        let mut changes = ChangeSet::new();
        changes
            .add(fields("Zeller", "Ada", 2004))
            .add(fields("de Vries", "Anna", 2004))
            .add(fields("Alexander", "Carson", 2005));
        store.save(changes).await.unwrap();

        let rows = store
            .fetch(&StudentQuery::new(), PageWindow { skip: 0, take: 10 })
            .await
            .unwrap();
        assert_eq!(last_names(&rows), ["Alexander", "de Vries", "Zeller"]);
    }

    #[tokio::test]
    async fn test_empty_change_set_is_a_no_op() {
        let store = InMemoryStudentStore::with_sample_roster();
        let summary = store.save(ChangeSet::new()).await.unwrap();
        assert_eq!(summary, SaveSummary::default());
        assert_eq!(store.count(&StudentQuery::new()).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids_never_reused() {
        let store = InMemoryStudentStore::new();

        let mut changes = ChangeSet::new();
        changes.add(fields("Li", "Yan", 2002));
        let first = store.save(changes).await.unwrap().added[0];

        let mut changes = ChangeSet::new();
        changes.remove(first);
        store.save(changes).await.unwrap();

        let mut changes = ChangeSet::new();
        changes.add(fields("Norman", "Laura", 2003));
        let second = store.save(changes).await.unwrap().added[0];

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_update_of_missing_row_conflicts() {
        let store = InMemoryStudentStore::new();
        let mut changes = ChangeSet::new();
        changes.update(StudentId::new(77), fields("Olivetto", "Nino", 2005));

        let err = store.save(changes).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::UpdateConflict);
        assert!(err.is_save_failure());
    }

    #[tokio::test]
    async fn test_failed_save_applies_nothing() {
        let store = InMemoryStudentStore::with_sample_roster();
        let mut changes = ChangeSet::new();
        changes
            .add(fields("Barzdukas", "Gytis", 2002))
            .remove(StudentId::new(500));

        assert!(store.save(changes).await.is_err());
        assert_eq!(store.count(&StudentQuery::new()).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_overlong_name_violates_constraint() {
        let store = InMemoryStudentStore::new();
        let mut changes = ChangeSet::new();
        changes.add(fields(&"x".repeat(NAME_MAX_LEN + 1), "Arturo", 2003));

        let err = store.save(changes).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
    }

    #[tokio::test]
    async fn test_remove_cascades_enrollments() {
        let store = InMemoryStudentStore::with_sample_roster();
        let mut changes = ChangeSet::new();
        changes.remove(StudentId::new(1));
        store.save(changes).await.unwrap();

        let state = store.state.read().await;
        assert!(state.enrollments.iter().all(|e| e.student_id != StudentId::new(1)));
    }
}
