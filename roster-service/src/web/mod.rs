//! HTML front end: routes, page templates, and template rendering

mod render;
mod routes;
mod views;

use axum::Router;

use crate::repository::StudentStore;
use crate::state::AppState;

pub use render::HtmlTemplate;
pub use routes::router;

/// The application router with its state attached, without middleware
pub fn app<S>(state: AppState<S>) -> Router
where
    S: StudentStore + Clone + 'static,
{
    router::<S>().with_state(state)
}
