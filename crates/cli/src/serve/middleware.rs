//! HTTP middleware: bearer token authentication.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::state::AppState;

/// Bearer token authentication on mutating requests.
///
/// When the server is started with a token, every non-GET request must carry
/// `Authorization: Bearer <token>`. Read-only routes and /health stay open;
/// a client that can only read cannot corrupt the lifecycle state.
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let expected = match &state.api_token {
        Some(t) => t,
        None => return next.run(request).await,
    };

    if matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match bearer {
        Some(token) if token == expected => next.run(request).await,
        Some(_) => super::json_error(StatusCode::FORBIDDEN, "invalid token").into_response(),
        None => {
            super::json_error(StatusCode::UNAUTHORIZED, "authentication required").into_response()
        }
    }
}
