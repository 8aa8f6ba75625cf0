//! Template responses

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::Error;

/// Wrapper for rendering templates as HTML responses.
///
/// # Example
///
/// ```rust,ignore
/// async fn missing() -> impl IntoResponse {
///     HtmlTemplate::new(NotFoundPage).with_status(StatusCode::NOT_FOUND)
/// }
/// ```
pub struct HtmlTemplate<T: Template> {
    template: T,
    status: StatusCode,
}

impl<T: Template> HtmlTemplate<T> {
    /// Create a new HTML template response.
    #[must_use]
    pub fn new(template: T) -> Self {
        Self {
            template,
            status: StatusCode::OK,
        }
    }

    /// Set the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(err) => Error::from(err).into_response(),
        }
    }
}
