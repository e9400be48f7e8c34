//! In-process stand-in for the hive user endpoints, used by end-to-end tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const PATH_GET_USER: &str = "/v1/user/{id}";
pub const PATH_SEARCH_USERS: &str = "/v1/user/search";

/// Users with ids in `1..=DEFAULT_MAX_USER_ID` exist.
pub const DEFAULT_MAX_USER_ID: i64 = 1_000_000;

#[derive(Debug, Clone, Default)]
pub struct TestServerStats {
    get_user_total: Arc<AtomicU64>,
    get_user_not_found: Arc<AtomicU64>,
    search_total: Arc<AtomicU64>,
}

impl TestServerStats {
    pub fn get_user_total(&self) -> u64 {
        self.get_user_total.load(Ordering::Relaxed)
    }

    pub fn get_user_not_found(&self) -> u64 {
        self.get_user_not_found.load(Ordering::Relaxed)
    }

    pub fn search_total(&self) -> u64 {
        self.search_total.load(Ordering::Relaxed)
    }

    pub fn requests_total(&self) -> u64 {
        self.get_user_total() + self.search_total()
    }
}

#[derive(Debug, Clone)]
struct AppState {
    stats: TestServerStats,
    max_user_id: i64,
}

#[derive(Debug, Serialize)]
struct User {
    id: i64,
    email: String,
    city_id: i16,
    first_name: String,
    last_name: String,
    birthdate: &'static str,
    gender: &'static str,
    interests: &'static str,
}

impl User {
    fn synthetic(id: i64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            email: format!("user{id}@hive.test"),
            city_id: (id % 100) as i16 + 1,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birthdate: "1990-01-01",
            gender: "male",
            interests: "load testing",
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchUsersResponse {
    items: Vec<User>,
    has_next: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

async fn handle_get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    state.stats.get_user_total.fetch_add(1, Ordering::Relaxed);

    let id: i64 = raw_id
        .parse()
        .map_err(|_| error(StatusCode::BAD_REQUEST, "failed to parse user ID"))?;

    if !(1..=state.max_user_id).contains(&id) {
        state.stats.get_user_not_found.fetch_add(1, Ordering::Relaxed);
        return Err(error(StatusCode::NOT_FOUND, "user not found"));
    }

    Ok(Json(User::synthetic(id, "Олег", "Шокин")))
}

async fn handle_search_users(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<SearchUsersResponse>, (StatusCode, Json<ErrorResponse>)> {
    state.stats.search_total.fetch_add(1, Ordering::Relaxed);

    let (Some(first_name), Some(last_name)) = (query.get("first_name"), query.get("last_name"))
    else {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "first_name and last_name are required",
        ));
    };

    let limit: usize = query
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10)
        .clamp(1, 100);

    let items = (1..=limit as i64)
        .map(|id| User::synthetic(id, first_name, last_name))
        .collect();

    Ok(Json(SearchUsersResponse {
        items,
        has_next: true,
    }))
}

pub fn router(stats: TestServerStats, max_user_id: i64) -> Router {
    Router::new()
        .route(PATH_SEARCH_USERS, get(handle_search_users))
        .route(PATH_GET_USER, get(handle_get_user))
        .with_state(AppState { stats, max_user_id })
}

pub struct TestServer {
    addr: SocketAddr,
    base_url: String,
    stats: TestServerStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_max_user_id(DEFAULT_MAX_USER_ID).await
    }

    pub async fn start_with_max_user_id(max_user_id: i64) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = TestServerStats::default();
        let app = router(stats.clone(), max_user_id);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        Ok(Self {
            addr,
            base_url: format!("http://{addr}"),
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> &TestServerStats {
        &self.stats
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}
