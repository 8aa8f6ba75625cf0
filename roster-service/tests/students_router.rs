//! End-to-end tests of the student routes against the in-memory store

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt; // for `oneshot`

use roster_service::pagination::{PageSource, PageWindow};
use roster_service::prelude::*;
use roster_service::repository::{RepositoryOperation, RepositoryResult, SaveSummary};
use roster_service::students::{DELETE_FAILED_MESSAGE, SAVE_FAILED_MESSAGE};

/// Reads like the in-memory store but rejects every save with `kind`
#[derive(Clone)]
struct RejectingStore {
    inner: InMemoryStudentStore,
    kind: RepositoryErrorKind,
}

impl RejectingStore {
    fn new(kind: RepositoryErrorKind) -> Self {
        Self {
            inner: InMemoryStudentStore::with_sample_roster(),
            kind,
        }
    }
}

impl PageSource<StudentQuery> for RejectingStore {
    type Item = Student;

    async fn count(&self, query: &StudentQuery) -> RepositoryResult<u64> {
        self.inner.count(query).await
    }

    async fn fetch(&self, query: &StudentQuery, window: PageWindow) -> RepositoryResult<Vec<Student>> {
        self.inner.fetch(query, window).await
    }
}

impl StudentStore for RejectingStore {
    async fn find(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        self.inner.find(id).await
    }

    async fn find_with_enrollments(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        self.inner.find_with_enrollments(id).await
    }

    async fn save(&self, _changes: ChangeSet) -> RepositoryResult<SaveSummary> {
        Err(RepositoryError::new(
            RepositoryOperation::Save,
            self.kind,
            "rejected by test store",
        ))
    }
}

fn roster_app() -> Router {
    app(AppState::new(
        Config::default(),
        InMemoryStudentStore::with_sample_roster(),
    ))
}

fn rejecting_app(kind: RepositoryErrorKind) -> Router {
    app(AppState::new(Config::default(), RejectingStore::new(kind)))
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_index() {
    let response = get(&roster_app(), "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/students");
}

#[tokio::test]
async fn test_index_first_page_by_last_name() {
    let response = get(&roster_app(), "/students").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Alexander"));
    assert!(body.contains("Alonso"));
    assert!(body.contains("Anand"));
    assert!(!body.contains("Barzdukas"));
    assert!(body.contains("sortOrder=name_desc"));
}

#[tokio::test]
async fn test_index_sorted_by_last_name_descending() {
    let body = body_text(get(&roster_app(), "/students?sortOrder=name_desc").await).await;
    assert!(body.contains(">Olivetto</td>"));
    assert!(body.contains(">Norman</td>"));
    assert!(body.contains(">Li</td>"));
    assert!(!body.contains("Alexander"));
}

#[tokio::test]
async fn test_unrecognised_sort_falls_back_without_name_desc_toggle() {
    let body = body_text(get(&roster_app(), "/students?sortOrder=bogus").await).await;
    assert!(body.contains(">Alexander</td>"));
    assert!(!body.contains("sortOrder=name_desc"));
    assert!(body.contains("sortOrder=Date&amp;"));
    assert!(body.contains("sortOrder=bogus&amp;page=2"));
}

#[tokio::test]
async fn test_pager_caption() {
    let body = body_text(get(&roster_app(), "/students?page=2").await).await;
    assert!(body.contains("Page 2 of 3"));
}

#[tokio::test]
async fn test_create_without_form_body_is_bad_request() {
    let response = roster_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/students/create")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_new_search_resets_page() {
    // "an" matches Alexander, Anand, Li (Yan), and Norman
    let body = body_text(get(&roster_app(), "/students?searchString=an&page=3").await).await;
    assert!(body.contains("Alexander"));
    assert!(!body.contains("Norman"));
    assert!(body.contains("currentFilter=an"));
}

#[tokio::test]
async fn test_current_filter_is_reused_with_page() {
    let body = body_text(get(&roster_app(), "/students?currentFilter=an&page=2").await).await;
    assert!(body.contains("Norman"));
    assert!(!body.contains("Alexander"));
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let response = get(&roster_app(), "/students?page=40").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("/students/details/"));
    assert!(body.contains("page=39"));
}

#[tokio::test]
async fn test_details_lists_enrollments() {
    let response = get(&roster_app(), "/students/details/1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Carson"));
    assert!(body.contains("Chemistry"));
    assert!(body.contains("Microeconomics"));
}

#[tokio::test]
async fn test_details_not_found() {
    let app = roster_app();
    assert_eq!(get(&app, "/students/details").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/students/details/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/students/details/abc").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_then_list() {
    let app = roster_app();
    let response = post_form(
        &app,
        "/students/create",
        "LastName=Zeller&FirstMidName=Ada&EnrollmentDate=2020-01-15",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/students");

    let body = body_text(get(&app, "/students?searchString=Zeller").await).await;
    assert!(body.contains("Ada"));
}

#[tokio::test]
async fn test_invalid_create_rerenders_form() {
    let response = post_form(
        &roster_app(),
        "/students/create",
        "LastName=&FirstMidName=Ada&EnrollmentDate=2020-01-15",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("The Last Name field is required."));
    assert!(body.contains("value=\"Ada\""));
}

#[tokio::test]
async fn test_edit_ignores_forged_id() {
    let app = roster_app();
    let response = post_form(
        &app,
        "/students/edit/3",
        "ID=99&LastName=Anand&FirstMidName=Arturo%20Jr&EnrollmentDate=2003-09-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_text(get(&app, "/students/details/3").await).await;
    assert!(body.contains("Arturo Jr"));
    assert_eq!(get(&app, "/students/details/99").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_form_prefills_values() {
    let body = body_text(get(&roster_app(), "/students/edit/5").await).await;
    assert!(body.contains("value=\"Li\""));
    assert!(body.contains("value=\"2002-09-01\""));
    assert!(body.contains("action=\"/students/edit/5\""));
}

#[tokio::test]
async fn test_edit_missing_student_is_not_found() {
    let app = roster_app();
    assert_eq!(get(&app, "/students/edit/404").await.status(), StatusCode::NOT_FOUND);
    let response = post_form(
        &app,
        "/students/edit/404",
        "LastName=Li&FirstMidName=Yan&EnrollmentDate=2002-09-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_flow() {
    let app = roster_app();

    let confirm = get(&app, "/students/delete/8").await;
    assert_eq!(confirm.status(), StatusCode::OK);
    let body = body_text(confirm).await;
    assert!(body.contains("Olivetto"));
    assert!(!body.contains(DELETE_FAILED_MESSAGE));

    let response = post_form(&app, "/students/delete/8", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/students");

    assert_eq!(get(&app, "/students/delete/8").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_of_missing_student_redirects_to_index() {
    let response = post_form(&roster_app(), "/students/delete/999", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/students");
}

#[tokio::test]
async fn test_rejected_create_shows_retry_message() {
    let app = rejecting_app(RepositoryErrorKind::ConstraintViolation);
    let response = post_form(
        &app,
        "/students/create",
        "LastName=Zeller&FirstMidName=Ada&EnrollmentDate=2020-01-15",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(SAVE_FAILED_MESSAGE));
    assert!(body.contains("value=\"Zeller\""));
}

#[tokio::test]
async fn test_rejected_edit_shows_retry_message() {
    let app = rejecting_app(RepositoryErrorKind::UpdateConflict);
    let response = post_form(
        &app,
        "/students/edit/2",
        "LastName=Alonso&FirstMidName=Meredith&EnrollmentDate=2002-09-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(SAVE_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_rejected_delete_returns_to_confirmation() {
    let app = rejecting_app(RepositoryErrorKind::UpdateConflict);
    let response = post_form(&app, "/students/delete/2", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/students/delete/2?saveChangesError=true");

    let body = body_text(get(&app, "/students/delete/2?saveChangesError=true").await).await;
    assert!(body.contains(DELETE_FAILED_MESSAGE));
    assert!(body.contains("Alonso"));
}

#[tokio::test]
async fn test_infrastructure_failure_is_not_recovered() {
    let app = rejecting_app(RepositoryErrorKind::ConnectionFailed);
    let response = post_form(
        &app,
        "/students/create",
        "LastName=Zeller&FirstMidName=Ada&EnrollmentDate=2020-01-15",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["code"], "REPOSITORY_CONNECTION_FAILED");
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = roster_app();

    let health = get(&app, "/health").await;
    assert_eq!(health.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(health).await).unwrap();
    assert_eq!(body["status"], "healthy");

    let ready = get(&app, "/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(ready).await).unwrap();
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_middleware_sets_request_id() {
    let server = Server::new(Config::default());
    let app = server.apply_layers(roster_app());

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
