#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use api_types::auth::Credentials;
use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use spedilo_client::config::AppConfig;
use tempfile::TempDir;

pub const EMAIL: &str = "asha@example.com";
pub const PASSWORD: &str = "secret";

/// In-memory stand-in for the remote API.
#[derive(Default)]
pub struct MockApi {
    expenses: Mutex<Vec<Value>>,
    tokens: Mutex<Vec<String>>,
    requests: AtomicUsize,
    next_id: AtomicUsize,
    fail_logout: AtomicBool,
    fail_writes: Mutex<Option<(StatusCode, String)>>,
}

impl MockApi {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Invalidates every issued token, as if the session expired server side.
    pub fn revoke_tokens(&self) {
        self.tokens.lock().unwrap().clear();
    }

    pub fn fail_logout(&self) {
        self.fail_logout.store(true, Ordering::SeqCst);
    }

    /// Makes the next create/update/delete fail with `status` and `msg`.
    pub fn fail_next_write(&self, status: StatusCode, msg: &str) {
        *self.fail_writes.lock().unwrap() = Some((status, msg.to_string()));
    }

    pub fn seed(&self, category: &str, amount: f64, date: &str) -> String {
        let id = self.new_id();
        self.expenses.lock().unwrap().push(json!({
            "_id": id,
            "category": category,
            "amount": amount,
            "date": date,
        }));
        id
    }

    pub fn stored(&self) -> Vec<Value> {
        self.expenses.lock().unwrap().clone()
    }

    fn new_id(&self) -> String {
        format!("e{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(token) = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };
        self.tokens.lock().unwrap().iter().any(|t| t == token)
    }

    fn take_write_failure(&self) -> Option<Response> {
        self.fail_writes
            .lock()
            .unwrap()
            .take()
            .map(|(status, msg)| (status, Json(json!({ "msg": msg }))).into_response())
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "msg": "Not authorized" })),
    )
        .into_response()
}

fn user() -> Value {
    json!({ "name": "Asha", "email": EMAIL })
}

async fn count(State(api): State<Arc<MockApi>>, request: Request, next: Next) -> Response {
    api.requests.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

async fn login(State(api): State<Arc<MockApi>>, Json(body): Json<Value>) -> Response {
    if body["email"] != EMAIL || body["password"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "msg": "Invalid credentials" })),
        )
            .into_response();
    }
    let token = format!("tok-{}", api.next_id.fetch_add(1, Ordering::SeqCst));
    api.tokens.lock().unwrap().push(token.clone());
    Json(json!({ "token": token, "user": user() })).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if !email.contains('@') {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "Email is invalid" })),
        )
            .into_response();
    }
    if password.chars().count() < 6 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "msg": "Password must be at least 6 characters" })),
        )
            .into_response();
    }
    if email == EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "msg": "User already exists" })),
        )
            .into_response();
    }
    StatusCode::CREATED.into_response()
}

async fn me(State(api): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    if !api.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "user": user() })).into_response()
}

async fn logout(State(api): State<Arc<MockApi>>) -> Response {
    if api.fail_logout.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    StatusCode::OK.into_response()
}

async fn list(State(api): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    if !api.authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(api.stored())).into_response()
}

async fn create(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !api.authorized(&headers) {
        return unauthorized();
    }
    if let Some(failure) = api.take_write_failure() {
        return failure;
    }
    if body["amount"].as_f64().unwrap_or(0.0) <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "msg": "Amount must be positive" })),
        )
            .into_response();
    }
    body["_id"] = Value::String(api.new_id());
    api.expenses.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(api): State<Arc<MockApi>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !api.authorized(&headers) {
        return unauthorized();
    }
    if let Some(failure) = api.take_write_failure() {
        return failure;
    }
    let mut expenses = api.expenses.lock().unwrap();
    let Some(slot) = expenses.iter_mut().find(|e| e["_id"] == id.as_str()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "msg": "Expense not found" })),
        )
            .into_response();
    };
    // Partial update: fields absent from the body keep their stored value.
    if let Value::Object(fields) = body {
        for (key, value) in fields {
            slot[key] = value;
        }
    }
    Json(slot.clone()).into_response()
}

async fn delete(
    State(api): State<Arc<MockApi>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !api.authorized(&headers) {
        return unauthorized();
    }
    if let Some(failure) = api.take_write_failure() {
        return failure;
    }
    let mut expenses = api.expenses.lock().unwrap();
    let before = expenses.len();
    expenses.retain(|e| e["_id"] != id.as_str());
    if expenses.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "msg": "Expense deleted" })).into_response()
}

/// Starts the mock API on an ephemeral port and returns its base URL.
pub async fn spawn() -> (String, Arc<MockApi>) {
    let api = Arc::new(MockApi::default());
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route("/expenses", get(list).post(create))
        .route("/expenses/{id}", put(update).delete(delete))
        .layer(middleware::from_fn_with_state(api.clone(), count))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), api)
}

pub fn config(base_url: &str, dir: &TempDir) -> AppConfig {
    AppConfig {
        base_url: base_url.to_string(),
        timezone: "UTC".to_string(),
        state_path: dir.path().join("state.json").display().to_string(),
        ..AppConfig::default()
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        email: EMAIL.to_string(),
        password: PASSWORD.to_string(),
    }
}
