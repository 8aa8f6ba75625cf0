//! Student actions
//!
//! Each action performs at most a lookup and a save against the store and
//! returns an [`ActionResult`]: a view model, a redirect, or not-found. Save
//! failures never escape an action; they become a message on the re-rendered
//! form or a redirect back to the delete confirmation. Any other repository
//! error propagates to the HTTP layer as an internal error.

use std::num::NonZeroU32;

use crate::error::Result;
use crate::pagination::PaginatedList;
use crate::repository::{ChangeSet, RepositoryError, StudentStore};

use super::form::{FormErrors, StudentForm};
use super::listing::{self, ListParams};
use super::model::{Student, StudentId};

/// Shown on the create and edit forms when the store rejects a save
pub const SAVE_FAILED_MESSAGE: &str =
    "Unable to save changes. Try again, and if the problem persists, see your system administrator.";

/// Shown on the delete confirmation after a failed delete
pub const DELETE_FAILED_MESSAGE: &str =
    "Delete failed. Try again, and if the problem persists see your system administrator.";

/// Outcome of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult<V> {
    View(V),
    Redirect(RedirectTarget),
    NotFound,
}

/// Where an action sends the browser next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Index,
    DeleteConfirmation {
        id: StudentId,
        save_changes_error: bool,
    },
}

impl RedirectTarget {
    #[must_use]
    pub fn location(&self) -> String {
        match *self {
            Self::Index => "/students".to_string(),
            Self::DeleteConfirmation {
                id,
                save_changes_error: true,
            } => format!("/students/delete/{id}?saveChangesError=true"),
            Self::DeleteConfirmation { id, .. } => format!("/students/delete/{id}"),
        }
    }
}

/// View model of the student index
#[derive(Debug, Clone)]
pub struct IndexView {
    pub page: PaginatedList<Student>,
    /// Sort value as requested, before falling back to the default order
    pub sort_order: String,
    pub filter: Option<String>,
}

impl IndexView {
    pub fn current_sort(&self) -> &str {
        &self.sort_order
    }

    pub fn name_sort(&self) -> &'static str {
        listing::name_toggle(&self.sort_order)
    }

    pub fn date_sort(&self) -> &'static str {
        listing::date_toggle(&self.sort_order)
    }

    pub fn current_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or_default()
    }
}

/// View model of the create and edit forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFormView {
    /// Set when editing an existing student
    pub id: Option<StudentId>,
    pub form: StudentForm,
    pub errors: FormErrors,
}

/// View model of the delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteView {
    pub student: Student,
    pub error_message: Option<&'static str>,
}

/// Student actions over a store
#[derive(Debug, Clone)]
pub struct StudentsController<S> {
    store: S,
    page_size: NonZeroU32,
}

impl<S: StudentStore> StudentsController<S> {
    #[must_use]
    pub fn new(store: S, page_size: NonZeroU32) -> Self {
        Self { store, page_size }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// List, search, sort, and page students
    pub async fn index(&self, params: ListParams) -> Result<IndexView> {
        let request = params.resolve();
        let query = request.query();
        let page = PaginatedList::create(&self.store, &query, request.page, self.page_size).await?;

        Ok(IndexView {
            page,
            sort_order: request.sort_order,
            filter: request.filter,
        })
    }

    /// One student with enrollments and their courses
    pub async fn details(&self, id: Option<StudentId>) -> Result<ActionResult<Student>> {
        let Some(id) = id else {
            return Ok(ActionResult::NotFound);
        };
        Ok(self
            .store
            .find_with_enrollments(id)
            .await?
            .map_or(ActionResult::NotFound, ActionResult::View))
    }

    pub fn create_form(&self) -> StudentFormView {
        StudentFormView::default()
    }

    /// Validate and add a student
    pub async fn create(&self, form: StudentForm) -> Result<ActionResult<StudentFormView>> {
        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                return Ok(ActionResult::View(StudentFormView {
                    id: None,
                    form,
                    errors,
                }))
            }
        };

        let mut changes = ChangeSet::new();
        changes.add(fields);
        match self.store.save(changes).await {
            Ok(summary) => {
                tracing::info!(student_ids = ?summary.added, "Student created");
                Ok(ActionResult::Redirect(RedirectTarget::Index))
            }
            Err(err) => Ok(ActionResult::View(save_failed(None, form, err)?)),
        }
    }

    /// The edit form pre-filled from the stored student
    pub async fn edit_form(&self, id: Option<StudentId>) -> Result<ActionResult<StudentFormView>> {
        let Some(id) = id else {
            return Ok(ActionResult::NotFound);
        };
        Ok(match self.store.find(id).await? {
            Some(student) => ActionResult::View(StudentFormView {
                id: Some(student.id),
                form: StudentForm::from_student(&student),
                errors: FormErrors::default(),
            }),
            None => ActionResult::NotFound,
        })
    }

    /// Overwrite the whitelisted fields of a student.
    ///
    /// The identity comes only from the route; the form cannot carry one.
    pub async fn edit(
        &self,
        id: Option<StudentId>,
        form: StudentForm,
    ) -> Result<ActionResult<StudentFormView>> {
        let Some(id) = id else {
            return Ok(ActionResult::NotFound);
        };
        let Some(student) = self.store.find(id).await? else {
            return Ok(ActionResult::NotFound);
        };

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                return Ok(ActionResult::View(StudentFormView {
                    id: Some(student.id),
                    form,
                    errors,
                }))
            }
        };

        let mut changes = ChangeSet::new();
        changes.update(student.id, fields);
        match self.store.save(changes).await {
            Ok(_) => {
                tracing::info!(student_id = %student.id, "Student updated");
                Ok(ActionResult::Redirect(RedirectTarget::Index))
            }
            Err(err) => Ok(ActionResult::View(save_failed(Some(student.id), form, err)?)),
        }
    }

    /// Read-only confirmation page, optionally reporting a failed delete
    pub async fn delete_confirmation(
        &self,
        id: Option<StudentId>,
        save_changes_error: bool,
    ) -> Result<ActionResult<DeleteView>> {
        let Some(id) = id else {
            return Ok(ActionResult::NotFound);
        };
        Ok(match self.store.find(id).await? {
            Some(student) => ActionResult::View(DeleteView {
                student,
                error_message: save_changes_error.then_some(DELETE_FAILED_MESSAGE),
            }),
            None => ActionResult::NotFound,
        })
    }

    /// Delete a student. A student that is already gone counts as deleted.
    pub async fn delete_confirmed(&self, id: StudentId) -> Result<RedirectTarget> {
        let Some(student) = self.store.find(id).await? else {
            tracing::debug!(student_id = %id, "Student already deleted");
            return Ok(RedirectTarget::Index);
        };

        let mut changes = ChangeSet::new();
        changes.remove(student.id);
        match self.store.save(changes).await {
            Ok(_) => {
                tracing::info!(student_id = %id, "Student deleted");
                Ok(RedirectTarget::Index)
            }
            Err(err) if err.is_save_failure() => {
                tracing::warn!(student_id = %id, error = %err, "Delete failed");
                Ok(RedirectTarget::DeleteConfirmation {
                    id,
                    save_changes_error: true,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Turn a rejected save into a re-rendered form; other errors propagate
fn save_failed(
    id: Option<StudentId>,
    form: StudentForm,
    err: RepositoryError,
) -> Result<StudentFormView> {
    if !err.is_save_failure() {
        return Err(err.into());
    }
    tracing::warn!(student_id = ?id.map(StudentId::get), error = %err, "Unable to save student");

    let mut errors = FormErrors::default();
    errors.add_model_error(SAVE_FAILED_MESSAGE);
    Ok(StudentFormView { id, form, errors })
}
