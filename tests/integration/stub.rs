//! Minimal stand-in for the lending API, served by axum on a random port

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

pub const VALID_TOKEN: &str = "tok-ada";

/// What the stub saw and what it holds
#[derive(Debug, Default)]
pub struct StubState {
    pub borrowed: BTreeSet<i64>,
    /// (path, authorization header, content-type header)
    pub requests: Vec<(String, Option<String>, Option<String>)>,
    pub last_books_query: HashMap<String, String>,
}

pub type Shared = Arc<Mutex<StubState>>;

fn record(state: &Shared, path: &str, headers: &HeaderMap) {
    let value_of = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.lock().unwrap().requests.push((
        path.to_string(),
        value_of(header::AUTHORIZATION),
        value_of(header::CONTENT_TYPE),
    ));
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", VALID_TOKEN))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
}

fn book(id: i64, borrowed: &BTreeSet<i64>) -> Value {
    let (title, author, genre) = match id {
        1 => ("The Left Hand of Darkness", "Ursula K. Le Guin", "Sci-Fi"),
        2 => ("Middlemarch", "George Eliot", "Classic"),
        _ => ("Leaves of Grass", "Walt Whitman", "Poetry"),
    };
    json!({
        "id": id,
        "title": title,
        "author": author,
        "genre": genre,
        "is_available": !borrowed.contains(&id),
        "read_count": id * 10
    })
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"password": ["This field may not be blank."]})),
        );
    }
    if username == "ada" && password == "pw" {
        return (
            StatusCode::OK,
            Json(json!({"access": VALID_TOKEN, "refresh": "refresh-ada"})),
        );
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "No active account found with the given credentials"})),
    )
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "ada" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"username": body["username"], "email": body["email"]})),
    )
}

async fn books(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    record(&state, "/books/", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.lock().unwrap();
    guard.last_books_query = query.clone();
    let results: Vec<Value> = (1..=3)
        .map(|id| book(id, &guard.borrowed))
        .filter(|b| {
            query
                .get("genre__name")
                .map_or(true, |g| b["genre"] == g.as_str())
        })
        .collect();
    (
        StatusCode::OK,
        Json(json!({"count": results.len(), "next": null, "previous": null, "results": results})),
    )
}

async fn my_borrowed(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record(&state, "/my-borrowed-books/", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }

    let guard = state.lock().unwrap();
    let records: Vec<Value> = guard
        .borrowed
        .iter()
        .map(|id| {
            json!({
                "book": book(*id, &guard.borrowed),
                "borrowed_at": "2025-04-02T09:30:00Z"
            })
        })
        .collect();
    (StatusCode::OK, Json(Value::Array(records)))
}

async fn recommendations(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record(&state, "/recommendations/", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    let guard = state.lock().unwrap();
    (StatusCode::OK, Json(json!([book(3, &guard.borrowed)])))
}

async fn borrow(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    record(&state, "/borrow/", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    if id > 3 {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Book not found."})));
    }

    let mut guard = state.lock().unwrap();
    if !guard.borrowed.insert(id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Book is not available."})),
        );
    }
    (StatusCode::OK, Json(json!({"message": "Book borrowed successfully."})))
}

async fn return_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    record(&state, "/return/", &headers);
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.lock().unwrap();
    if !guard.borrowed.remove(&id) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Borrowed record not found."})),
        );
    }
    (StatusCode::OK, Json(json!({"message": "Book returned successfully."})))
}

async fn server_error() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn not_json() -> impl IntoResponse {
    (StatusCode::OK, "<html>maintenance</html>")
}

/// Serve the stub; returns its base URL (`http://127.0.0.1:<port>/api`)
pub async fn spawn() -> (String, Shared) {
    let state: Shared = Arc::default();

    let api = Router::new()
        .route("/login/", post(login))
        .route("/register/", post(register))
        .route("/books/", get(books))
        .route("/books/:id/borrow/", post(borrow))
        .route("/books/:id/return/", post(return_book))
        .route("/my-borrowed-books/", get(my_borrowed))
        .route("/recommendations/", get(recommendations))
        .route("/broken/", get(server_error).post(server_error))
        .route("/maintenance/", get(not_json))
        .with_state(state.clone());

    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), state)
}
