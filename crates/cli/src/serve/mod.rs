//! `partflow serve` -- HTTP JSON API server for the warranty tracker.
//!
//! Exposes the storage backend as an async HTTP service using `axum` +
//! `tokio`. The server is the sole arbiter of state: reference numbers,
//! status flips, and the reconciliation join all happen here, never in the
//! client.
//!
//! Conventions:
//! - Every request is scoped by the `branch-id` header (absent = branch "1").
//! - When a bearer token is configured, every mutating (POST) request must
//!   carry `Authorization: Bearer <token>`; GET routes and /health are open.
//! - CORS headers on all responses (permissive for local dev).
//!
//! Endpoints:
//! - GET  /health                         - Server status (auth-exempt)
//! - GET  /api/outward-no                 - Next outward reference (preview)
//! - GET  /api/job-no                     - Next job reference (preview)
//! - GET  /api/pending-supplier-outwards  - Pending outward selection list
//! - GET  /api/pending-jobcards           - Pending job card selection list
//! - POST /api/save-outward               - Create a supplier outward
//! - POST /api/save-service-job           - Open a customer job card
//! - POST /api/save-supplier-inward       - Record a supplier resolution
//! - POST /api/save-cust-outward          - Close a job card (delivery)
//! - GET  /api/warranty-master            - Joined supplier reconciliation
//! - GET  /api/service-master             - Joined service reconciliation
//! - GET  /api/suppliers|parts|customers-list - Master lists
//! - POST /api/add-supplier|add-part|add-customer - Master quick-add
//!
//! All responses use Content-Type: application/json.

mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};

use partflow_storage::MemoryStorage;

use self::handlers::{
    handle_add_master, handle_close_job, handle_create_job_card, handle_create_outward,
    handle_health, handle_list_masters, handle_next_job_no, handle_next_outward_no,
    handle_not_found, handle_pending_job_cards, handle_pending_outwards, handle_resolve_outward,
    handle_service_master, handle_warranty_master,
};
use self::middleware::auth_middleware;
use self::state::AppState;

/// Maximum request body size: 1 MB. The largest legitimate payload is a
/// single intake form.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Start the HTTP server on the given port.
///
/// `api_token` enables bearer auth on mutating requests; `None` runs an open
/// server (local single-shop setups).
pub(crate) async fn start_server(
    port: u16,
    api_token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_token = api_token.filter(|t| !t.is_empty());
    if api_token.is_some() {
        tracing::info!("bearer token authentication enabled for mutating requests");
    }

    let state = Arc::new(AppState {
        storage: Arc::new(MemoryStorage::new()),
        api_token,
    });

    // Permissive CORS for local dev.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/outward-no", get(handle_next_outward_no))
        .route("/api/job-no", get(handle_next_job_no))
        .route("/api/pending-supplier-outwards", get(handle_pending_outwards))
        .route("/api/pending-jobcards", get(handle_pending_job_cards))
        .route("/api/save-outward", post(handle_create_outward))
        .route("/api/save-service-job", post(handle_create_job_card))
        .route("/api/save-supplier-inward", post(handle_resolve_outward))
        .route("/api/save-cust-outward", post(handle_close_job))
        .route("/api/warranty-master", get(handle_warranty_master))
        .route("/api/service-master", get(handle_service_master))
        .route("/api/suppliers", get(handle_list_masters))
        .route("/api/parts", get(handle_list_masters))
        .route("/api/customers-list", get(handle_list_masters))
        .route("/api/add-supplier", post(handle_add_master))
        .route("/api/add-part", post(handle_add_master))
        .route("/api/add-customer", post(handle_add_master))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("partflow listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("could not install Ctrl+C handler; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
