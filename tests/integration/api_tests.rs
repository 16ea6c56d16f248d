//! API integration tests

use serde_json::json;
use std::sync::Arc;

use lending_client::{
    api::{HttpClient, Transport},
    app::REGISTER_SUCCESS,
    config::{ApiConfig, AppConfig},
    models::{Availability, BookFilter, LoanAction, Notice, RegisterRequest},
    services::{
        session::LOGIN_ERROR,
        storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage},
    },
    App, ClientError, Page,
};

use crate::stub::{self, VALID_TOKEN};

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(&ApiConfig::with_base_url(base_url)).expect("Failed to build client")
}

fn app(base_url: &str, storage: Arc<dyn TokenStorage>) -> App {
    let mut config = AppConfig::default();
    config.api = ApiConfig::with_base_url(base_url);
    config.ui.register_redirect_ms = 0;
    App::new(config, Arc::new(client(base_url)), storage)
}

#[tokio::test]
async fn test_get_non_2xx_is_an_error() {
    let (base_url, _) = stub::spawn().await;

    let err = client(&base_url).get("/broken/", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Status(500)));

    let err = client(&base_url).get("/books/?", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Status(401)));
}

#[tokio::test]
async fn test_post_400_returns_body() {
    let (base_url, _) = stub::spawn().await;

    let body = client(&base_url)
        .post("/register/", &json!({"username": "ada", "email": "a@b.c", "password": "x"}), None)
        .await
        .expect("400 should not be an error");

    assert_eq!(body["username"][0], "A user with that username already exists.");
}

#[tokio::test]
async fn test_post_other_failure_is_an_error() {
    let (base_url, _) = stub::spawn().await;

    let err = client(&base_url)
        .post("/broken/", &json!({}), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status(500)));
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let (base_url, _) = stub::spawn().await;

    let err = client(&base_url).get("/maintenance/", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Nothing listens on port 9 locally
    let err = client("http://127.0.0.1:9/api").get("/books/?", None).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_headers_are_attached() {
    let (base_url, state) = stub::spawn().await;

    client(&base_url)
        .get("/my-borrowed-books/", Some(VALID_TOKEN.to_string()))
        .await
        .expect("Failed to fetch borrowed books");

    let guard = state.lock().unwrap();
    let (path, auth, content_type) = guard.requests.last().unwrap();
    assert_eq!(path, "/my-borrowed-books/");
    assert_eq!(auth.as_deref(), Some("Bearer tok-ada"));
    assert_eq!(content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_login_survives_reload() {
    let (base_url, _) = stub::spawn().await;
    let dir = tempfile::tempdir().unwrap();

    let mut first = app(&base_url, Arc::new(FileTokenStorage::new(dir.path())));
    assert!(first.login("ada", "pw").await.is_success());

    let reloaded = app(&base_url, Arc::new(FileTokenStorage::new(dir.path())));
    assert!(reloaded.authenticated());
    assert_eq!(reloaded.services().session.token().as_deref(), Some(VALID_TOKEN));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let (base_url, _) = stub::spawn().await;
    let storage = MemoryTokenStorage::new();
    let mut app = app(&base_url, Arc::new(storage.clone()));

    // 401 is not a soft failure, so the server detail is not shown
    let outcome = app.login("ada", "wrong").await;
    assert_eq!(outcome.message(), Some(LOGIN_ERROR));

    // 400 is, and this body has no detail
    let outcome = app.login("ada", "").await;
    assert_eq!(outcome.message(), Some("Login failed."));

    assert!(!app.authenticated());
    assert_eq!(storage.load().unwrap(), None);
}

#[tokio::test]
async fn test_register_then_login_page() {
    let (base_url, _) = stub::spawn().await;
    let mut app = app(&base_url, Arc::new(MemoryTokenStorage::new()));
    app.switch_auth_page(lending_client::AuthPage::Register);

    let outcome = app
        .register(&RegisterRequest::new("grace", "grace@example.org", "pw"))
        .await;
    assert!(outcome.is_success());
    assert_eq!(app.auth_message(), Some(&Notice::info(REGISTER_SUCCESS)));
    app.finish_registration().await;
    assert_eq!(app.auth_page(), lending_client::AuthPage::Login);
    assert_eq!(app.auth_message(), None);

    let outcome = app
        .register(&RegisterRequest::new("ada", "ada@example.org", "pw"))
        .await;
    assert_eq!(
        outcome.message(),
        Some(r#"{"username":["A user with that username already exists."]}"#)
    );
}

#[tokio::test]
async fn test_catalog_filters_reach_server() {
    let (base_url, state) = stub::spawn().await;
    let mut app = app(&base_url, Arc::new(MemoryTokenStorage::with_token(VALID_TOKEN)));

    app.start(Page::Books).await;
    assert_eq!(app.services().catalog.snapshot().data.len(), 3);

    app.set_filter(
        BookFilter::default()
            .with_genre("Poetry")
            .with_availability(Availability::Available),
    )
    .await;

    let catalog = app.services().catalog.snapshot();
    assert_eq!(catalog.data.len(), 1);
    assert_eq!(catalog.data[0].title, "Leaves of Grass");

    let query = state.lock().unwrap().last_books_query.clone();
    assert_eq!(query.get("genre__name").map(String::as_str), Some("Poetry"));
    assert_eq!(query.get("is_available").map(String::as_str), Some("true"));
    assert!(!query.contains_key("author__name"));
}

#[tokio::test]
async fn test_borrow_and_return_cycle() {
    let (base_url, _) = stub::spawn().await;
    let mut app = app(&base_url, Arc::new(MemoryTokenStorage::new()));
    assert!(app.login("ada", "pw").await.is_success());
    app.show(Page::MyBooks).await;

    let notice = app.perform(LoanAction::Borrow, 2).await;
    assert_eq!(notice, Notice::info("Book borrowed successfully."));
    assert!(app.borrowed_index().is_borrowed(2));

    // Second borrow is rejected with a 400 carrying the reason
    let notice = app.perform(LoanAction::Borrow, 2).await;
    assert_eq!(notice, Notice::error("Book is not available."));
    assert_eq!(app.notice(), Some(notice));
    app.dismiss_notice();
    assert_eq!(app.notice(), None);

    // 404 is a hard failure
    let notice = app.perform(LoanAction::Borrow, 99).await;
    assert_eq!(notice, Notice::error("An error occurred during the borrow action."));

    let notice = app.perform(LoanAction::Return, 2).await;
    assert_eq!(notice, Notice::info("Book returned successfully."));
    assert!(!app.borrowed_index().is_borrowed(2));
}

#[tokio::test]
async fn test_logout_stops_recommendations() {
    let (base_url, state) = stub::spawn().await;
    let mut app = app(&base_url, Arc::new(MemoryTokenStorage::with_token(VALID_TOKEN)));

    app.start(Page::Recommendations).await;
    assert_eq!(app.services().recommendations.snapshot().data.len(), 1);

    app.logout().await;
    let seen = state.lock().unwrap().requests.len();

    app.show(Page::Recommendations).await;
    app.services().recommendations.refresh().await;

    assert_eq!(state.lock().unwrap().requests.len(), seen);
    assert!(app.services().recommendations.snapshot().data.is_empty());
}
