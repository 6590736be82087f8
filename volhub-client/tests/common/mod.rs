//! Shared test fixtures: an in-process mock of the backend API
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Per-endpoint request counters
#[derive(Default)]
pub struct Hits {
    verify: AtomicUsize,
    me: AtomicUsize,
    me_with_init_data: AtomicUsize,
    complete: AtomicUsize,
    delete_profile: AtomicUsize,
}

impl Hits {
    pub fn verify_count(&self) -> usize {
        self.verify.load(Ordering::SeqCst)
    }

    pub fn me_count(&self) -> usize {
        self.me.load(Ordering::SeqCst)
    }

    /// Profile requests carrying a non-empty init-data header
    pub fn me_with_init_data_count(&self) -> usize {
        self.me_with_init_data.load(Ordering::SeqCst)
    }

    pub fn complete_count(&self) -> usize {
        self.complete.load(Ordering::SeqCst)
    }

    pub fn delete_profile_count(&self) -> usize {
        self.delete_profile.load(Ordering::SeqCst)
    }
}

/// Knobs for shaping backend behavior per test
#[derive(Clone, Default)]
pub struct MockOptions {
    /// Verification reports a first-time user
    pub is_new_user: bool,
    /// Verification returns a user with no contact info
    pub incomplete_user: bool,
    /// Registration completion fails with 400
    pub fail_complete: bool,
}

struct ServerState {
    hits: Arc<Hits>,
    options: MockOptions,
}

pub struct MockBackend {
    pub base_url: String,
    pub hits: Arc<Hits>,
}

/// A fully registered volunteer, as the backend would return it
pub fn verified_user() -> Value {
    json!({
        "id": 42,
        "telegram_user_id": 777,
        "first_name": "Ivan",
        "last_name": "Petrov",
        "username": "ivanp",
        "email": "ivan@example.com",
        "phone": "+79990001122",
        "completion_percentage": 85,
        "role": "volunteer"
    })
}

/// A known but never-registered user
pub fn incomplete_user() -> Value {
    json!({
        "id": 42,
        "telegram_user_id": 777,
        "first_name": "Ivan",
        "completion_percentage": 10,
        "role": "volunteer"
    })
}

fn completed_user() -> Value {
    let mut user = verified_user();
    user["completion_percentage"] = json!(100);
    user
}

fn sample_event() -> Value {
    json!({
        "id": 1,
        "creator_id": 2,
        "title": "Park cleanup",
        "category": "environmental",
        "start_date": "2026-09-01T10:00:00Z",
        "end_date": "2026-09-01T14:00:00Z",
        "min_volunteers": 2,
        "max_volunteers": 10,
        "current_volunteers_count": 4,
        "status": "published"
    })
}

async fn verify(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.hits.verify.fetch_add(1, Ordering::SeqCst);
    let user = if state.options.incomplete_user {
        incomplete_user()
    } else {
        verified_user()
    };
    Json(json!({
        "success": true,
        "user": user,
        "is_new_user": state.options.is_new_user,
        "requires_registration": state.options.incomplete_user,
    }))
}

async fn me(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Json<Value> {
    state.hits.me.fetch_add(1, Ordering::SeqCst);
    let authorized = headers
        .get("X-Telegram-Init-Data")
        .is_some_and(|v| !v.is_empty());
    if authorized {
        state.hits.me_with_init_data.fetch_add(1, Ordering::SeqCst);
    }
    Json(completed_user())
}

async fn complete_registration(State(state): State<Arc<ServerState>>) -> Response {
    state.hits.complete.fetch_add(1, Ordering::SeqCst);
    if state.options.fail_complete {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Registration is closed" })),
        )
            .into_response()
    } else {
        Json(completed_user()).into_response()
    }
}

async fn delete_profile(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.hits.delete_profile.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true }))
}

async fn list_events() -> Json<Value> {
    Json(json!([sample_event()]))
}

async fn get_event(Path(id): Path<i64>) -> Response {
    if id == 1 {
        Json(sample_event()).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Event not found" })),
        )
            .into_response()
    }
}

/// Start the mock backend on an ephemeral port
pub async fn spawn(options: MockOptions) -> MockBackend {
    let hits = Arc::new(Hits::default());
    let state = Arc::new(ServerState {
        hits: hits.clone(),
        options,
    });

    let app = Router::new()
        .route("/api/auth/verify", post(verify))
        .route("/api/auth/me", get(me))
        .route("/api/auth/complete-registration", post(complete_registration))
        .route("/api/auth/delete-profile", delete(delete_profile))
        .route("/api/events", get(list_events))
        .route("/api/events/{id}", get(get_event))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{addr}/api"),
        hits,
    }
}

/// A url-encoded init payload asserting user 777
pub const INIT_DATA: &str = "query_id=AAE1&user=%7B%22id%22%3A777%2C%22first_name%22%3A%22Ivan%22%2C%22last_name%22%3A%22Petrov%22%2C%22username%22%3A%22ivanp%22%7D&auth_date=1699999999&hash=deadbeef";

/// A base URL nothing listens on; requests fail at connect time
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9/api";
