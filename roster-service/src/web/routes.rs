//! HTTP routes for the student roster
//!
//! Handlers extract request values, call the matching controller action, and
//! map its [`ActionResult`] onto a page, a `303 See Other` redirect, or a 404.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use super::render::HtmlTemplate;
use super::views::{CreatePage, DeletePage, DetailsPage, EditPage, IndexPage, NotFoundPage};
use crate::error::Result;
use crate::health::{health, readiness};
use crate::repository::StudentStore;
use crate::state::AppState;
use crate::students::{ActionResult, ListParams, RedirectTarget, StudentForm, StudentId};

/// Build the application router
pub fn router<S>() -> Router<AppState<S>>
where
    S: StudentStore + Clone + 'static,
{
    Router::new()
        .route("/", get(|| async { Redirect::to(&RedirectTarget::Index.location()) }))
        .route("/students", get(index::<S>))
        .route("/students/details", get(details::<S>))
        .route("/students/details/{id}", get(details::<S>))
        .route("/students/create", get(create_form::<S>).post(create::<S>))
        .route("/students/edit", get(edit_form::<S>).post(edit::<S>))
        .route("/students/edit/{id}", get(edit_form::<S>).post(edit::<S>))
        .route("/students/delete", get(delete_confirmation::<S>))
        .route(
            "/students/delete/{id}",
            get(delete_confirmation::<S>).post(delete_confirmed::<S>),
        )
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>))
}

/// Query string of the delete confirmation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteParams {
    save_changes_error: Option<String>,
}

impl DeleteParams {
    fn save_changes_error(&self) -> bool {
        self.save_changes_error
            .as_deref()
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"))
    }
}

/// A missing or non-numeric id segment is treated as absent
fn student_id(raw: Option<Path<String>>) -> Option<StudentId> {
    raw.and_then(|Path(id)| id.trim().parse::<i32>().ok())
        .map(StudentId::new)
}

fn redirect(target: RedirectTarget) -> Response {
    Redirect::to(&target.location()).into_response()
}

fn not_found() -> Response {
    HtmlTemplate::new(NotFoundPage)
        .with_status(StatusCode::NOT_FOUND)
        .into_response()
}

fn respond<V>(result: ActionResult<V>, render: impl FnOnce(&V) -> Response) -> Response {
    match result {
        ActionResult::View(view) => render(&view),
        ActionResult::Redirect(target) => redirect(target),
        ActionResult::NotFound => not_found(),
    }
}

async fn index<S>(
    State(state): State<AppState<S>>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let Query(params) = params?;
    let view = state.students().index(params).await?;
    Ok(HtmlTemplate::new(IndexPage { view: &view }).into_response())
}

async fn details<S>(
    State(state): State<AppState<S>>,
    id: Option<Path<String>>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let result = state.students().details(student_id(id)).await?;
    Ok(respond(result, |student| {
        HtmlTemplate::new(DetailsPage { student }).into_response()
    }))
}

async fn create_form<S>(State(state): State<AppState<S>>) -> Response
where
    S: StudentStore + Clone + 'static,
{
    let view = state.students().create_form();
    HtmlTemplate::new(CreatePage { view: &view }).into_response()
}

async fn create<S>(
    State(state): State<AppState<S>>,
    form: std::result::Result<Form<StudentForm>, FormRejection>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let Form(form) = form?;
    let result = state.students().create(form).await?;
    Ok(respond(result, |view| {
        HtmlTemplate::new(CreatePage { view }).into_response()
    }))
}

async fn edit_form<S>(
    State(state): State<AppState<S>>,
    id: Option<Path<String>>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let result = state.students().edit_form(student_id(id)).await?;
    Ok(respond(result, render_edit))
}

async fn edit<S>(
    State(state): State<AppState<S>>,
    id: Option<Path<String>>,
    form: std::result::Result<Form<StudentForm>, FormRejection>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let Form(form) = form?;
    let result = state.students().edit(student_id(id), form).await?;
    Ok(respond(result, render_edit))
}

fn render_edit(view: &crate::students::StudentFormView) -> Response {
    match view.id {
        Some(id) => HtmlTemplate::new(EditPage { id, view }).into_response(),
        None => not_found(),
    }
}

async fn delete_confirmation<S>(
    State(state): State<AppState<S>>,
    id: Option<Path<String>>,
    params: std::result::Result<Query<DeleteParams>, QueryRejection>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let Query(params) = params?;
    let result = state
        .students()
        .delete_confirmation(student_id(id), params.save_changes_error())
        .await?;
    Ok(respond(result, |view| {
        HtmlTemplate::new(DeletePage { view }).into_response()
    }))
}

async fn delete_confirmed<S>(
    State(state): State<AppState<S>>,
    id: Option<Path<String>>,
) -> Result<Response>
where
    S: StudentStore + Clone + 'static,
{
    let Some(id) = student_id(id) else {
        return Ok(not_found());
    };
    let target = state.students().delete_confirmed(id).await?;
    Ok(redirect(target))
}
