//! Page templates

use askama::Template;

use crate::students::{DeleteView, IndexView, Student, StudentFormView, StudentId};

#[derive(Template)]
#[template(path = "students/index.html")]
pub struct IndexPage<'a> {
    pub view: &'a IndexView,
}

#[derive(Template)]
#[template(path = "students/details.html")]
pub struct DetailsPage<'a> {
    pub student: &'a Student,
}

#[derive(Template)]
#[template(path = "students/create.html")]
pub struct CreatePage<'a> {
    pub view: &'a StudentFormView,
}

#[derive(Template)]
#[template(path = "students/edit.html")]
pub struct EditPage<'a> {
    pub id: StudentId,
    pub view: &'a StudentFormView,
}

#[derive(Template)]
#[template(path = "students/delete.html")]
pub struct DeletePage<'a> {
    pub view: &'a DeleteView,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage;
