//! API server: axum router over a TCP listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info};

use studentdir_config::AppConfig;

use super::types::*;
use crate::ShutdownSignal;
use crate::facets::Facets;
use crate::model::StudentRecord;
use crate::query::{self, QueryParams};
use crate::roster::Roster;

/// Shared state accessible to all route handlers.
pub struct ApiState {
    pub roster: Arc<Roster>,
    pub facets: Facets,
    pub config: AppConfig,
}

impl ApiState {
    pub fn new(roster: Arc<Roster>, config: AppConfig) -> Self {
        let facets = Facets::from_roster(roster.students());
        Self {
            roster,
            facets,
            config,
        }
    }

    /// Page size for a request: 0 means the configured default, and
    /// anything larger than the configured maximum is capped.
    fn effective_page_size(&self, requested: usize) -> usize {
        let dir = &self.config.directory;
        match requested {
            0 => dir.default_page_size,
            n => n.min(dir.max_page_size),
        }
    }
}

/// Build the axum router with all API routes.
pub fn router(state: Arc<ApiState>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(handle_health))
        .route("/directory/query", post(handle_query))
        .route("/students/{id}", get(handle_student))
        .route("/facets", get(handle_facets))
        .with_state(state)
}

/// Serve the API on `addr` until the shutdown signal is received.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<ApiState>,
    mut shutdown_rx: broadcast::Receiver<ShutdownSignal>,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        students = state.roster.len(),
        "API server listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("API server shutting down");
        })
        .await
}

// ── Route handlers ──────────────────────────────────────────────────────

async fn handle_health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        students: state.roster.len(),
    })
}

async fn handle_query(
    State(state): State<Arc<ApiState>>,
    Json(mut params): Json<QueryParams>,
) -> Json<QueryResponse> {
    params.page_size = state.effective_page_size(params.page_size);
    let outcome = query::run(
        state.roster.students(),
        &params,
        state.config.directory.sibling_count,
    );
    Json(QueryResponse::from_outcome(outcome, params.page_size))
}

async fn handle_student(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<StudentRecord>, (StatusCode, Json<ErrorResponse>)> {
    match state.roster.get(&id) {
        Some(student) => Ok(Json(student.clone())),
        None => {
            debug!(id = %id, "student not found");
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("no student with id {id:?}"),
                }),
            ))
        }
    }
}

async fn handle_facets(State(state): State<Arc<ApiState>>) -> Json<Facets> {
    Json(state.facets.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use crate::query::PageItem;

    fn test_state() -> Arc<ApiState> {
        let students: Vec<StudentRecord> = (0..30)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": format!("s{i:02}"),
                    "name": format!("Student {i:02}"),
                    "class_year": if i < 10 { 2026 } else { 2027 },
                    "major": "History",
                }))
                .unwrap()
            })
            .collect();
        let roster = Roster::new(students).unwrap();
        Arc::new(ApiState::new(Arc::new(roster), AppConfig::default()))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn query_request(body: serde_json::Value) -> Request<Body> {
        Request::post("/directory/query")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(test_state());
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let health: HealthResponse = body_json(resp).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.students, 30);
    }

    #[tokio::test]
    async fn test_query_endpoint_defaults() {
        let app = router(test_state());
        let resp = app.oneshot(query_request(serde_json::json!({}))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let page: QueryResponse = body_json(resp).await;
        assert_eq!(page.total_matches, 30);
        assert_eq!(page.page_size, 24);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 24);
        assert_eq!(page.window, vec![PageItem::Page(1), PageItem::Page(2)]);
    }

    #[tokio::test]
    async fn test_query_endpoint_filters_and_pages() {
        let app = router(test_state());
        let req = query_request(serde_json::json!({
            "class_years": [2027],
            "sort": "first_za",
            "page": 2,
            "page_size": 5,
        }));
        let page: QueryResponse = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(page.total_matches, 20);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.page, 2);
        assert_eq!(page.items[0].name, "Student 24");
    }

    #[tokio::test]
    async fn test_query_endpoint_page_size_bounds() {
        let state = test_state();
        let req = query_request(serde_json::json!({ "page_size": 0 }));
        let response = router(state.clone()).oneshot(req).await.unwrap();
        let page: QueryResponse = body_json(response).await;
        assert_eq!(page.page_size, 24);

        let req = query_request(serde_json::json!({ "page_size": 5000 }));
        let response = router(state).oneshot(req).await.unwrap();
        let page: QueryResponse = body_json(response).await;
        assert_eq!(page.page_size, 100);
        assert_eq!(page.items.len(), 30);
    }

    #[tokio::test]
    async fn test_query_endpoint_rejects_bad_body() {
        let app = router(test_state());
        let req = query_request(serde_json::json!({ "sort": "newest" }));
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_student_endpoint() {
        let state = test_state();
        let req = Request::get("/students/s03").body(Body::empty()).unwrap();
        let resp = router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let student: StudentRecord = body_json(resp).await;
        assert_eq!(student.name, "Student 03");

        let req = Request::get("/students/nobody").body(Body::empty()).unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = body_json(resp).await;
        assert!(err.error.contains("nobody"));
    }

    #[tokio::test]
    async fn test_facets_endpoint() {
        let app = router(test_state());
        let req = Request::get("/facets").body(Body::empty()).unwrap();
        let facets: Facets = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(facets.class_years, vec![2027, 2026]);
        assert_eq!(facets.majors, vec!["History"]);
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let handle = tokio::spawn(serve(addr, test_state(), shutdown_rx));
        shutdown_tx.send(ShutdownSignal).unwrap();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
