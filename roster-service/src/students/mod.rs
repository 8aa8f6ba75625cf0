//! The student roster: records, forms, listing rules, and actions

mod controller;
mod form;
mod listing;
mod model;
pub mod seed;

pub use controller::{
    ActionResult, DeleteView, IndexView, RedirectTarget, StudentFormView, StudentsController,
    DELETE_FAILED_MESSAGE, SAVE_FAILED_MESSAGE,
};
pub use form::{FormErrors, StudentForm, DATE_FORMAT};
pub use listing::{ListParams, ListRequest, StudentSort};
pub use model::{Course, Enrollment, Grade, Student, StudentFields, StudentId, NAME_MAX_LEN};
