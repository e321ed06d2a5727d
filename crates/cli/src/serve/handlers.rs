//! HTTP route handlers: intake, resolution, reconciliation, masters.
//!
//! Every handler resolves its branch scope from the `branch-id` header,
//! delegates to the storage backend, and maps [`StorageError`] onto the HTTP
//! error taxonomy: 400 validation, 404 unknown reference, 409 already
//! resolved, 500 backend.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use partflow_core::{JobCardDraft, OutwardDraft, ResolutionDraft, SequenceKind};
use partflow_storage::{MasterKind, StorageError};

use super::json_error;
use super::state::{branch_from_headers, AppState};

/// Map a storage failure onto the wire error shape.
fn storage_error(err: StorageError) -> Response {
    let status = match err {
        StorageError::Validation(_) => StatusCode::BAD_REQUEST,
        StorageError::ReferenceNotFound { .. } => StatusCode::NOT_FOUND,
        StorageError::AlreadyResolved { .. } => StatusCode::CONFLICT,
        StorageError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "storage failure");
    }
    json_error(status, &err.to_string()).into_response()
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /api/outward-no -- preview only; the save assigns the real number.
pub(crate) async fn handle_next_outward_no(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state
        .storage
        .peek_next_reference(&branch, SequenceKind::Outward)
        .await
    {
        Ok(reference) => Json(serde_json::json!({ "outward_no": reference })).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/job-no
pub(crate) async fn handle_next_job_no(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state
        .storage
        .peek_next_reference(&branch, SequenceKind::JobCard)
        .await
    {
        Ok(reference) => Json(serde_json::json!({ "job_no": reference })).into_response(),
        Err(e) => storage_error(e),
    }
}

/// POST /api/save-outward
pub(crate) async fn handle_create_outward(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<OutwardDraft>,
) -> Response {
    let branch = branch_from_headers(&headers);
    let new = match draft.validate() {
        Ok(new) => new,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };
    match state.storage.create_outward(&branch, new).await {
        Ok(record) => {
            tracing::info!(branch = %branch, outward_no = %record.outward_no, "outward created");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => storage_error(e),
    }
}

/// POST /api/save-service-job
pub(crate) async fn handle_create_job_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<JobCardDraft>,
) -> Response {
    let branch = branch_from_headers(&headers);
    let new = match draft.validate() {
        Ok(new) => new,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };
    match state.storage.create_job_card(&branch, new).await {
        Ok(record) => {
            tracing::info!(branch = %branch, job_no = %record.job_no, "job card opened");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => storage_error(e),
    }
}

/// GET /api/pending-supplier-outwards
pub(crate) async fn handle_pending_outwards(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state.storage.list_pending_outwards(&branch).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/pending-jobcards
pub(crate) async fn handle_pending_job_cards(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state.storage.list_pending_job_cards(&branch).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => storage_error(e),
    }
}

/// POST /api/save-supplier-inward -- records the supplier's response and
/// atomically flips the outward PENDING -> DONE.
pub(crate) async fn handle_resolve_outward(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<ResolutionDraft>,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state.storage.resolve_outward(&branch, draft).await {
        Ok(record) => {
            tracing::info!(
                branch = %branch,
                reference_no = %record.reference_no,
                result = %record.result_type,
                "outward resolved"
            );
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => storage_error(e),
    }
}

/// POST /api/save-cust-outward -- closes a job card on customer delivery.
pub(crate) async fn handle_close_job(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<ResolutionDraft>,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state.storage.close_job_card(&branch, draft).await {
        Ok(record) => {
            tracing::info!(
                branch = %branch,
                reference_no = %record.reference_no,
                result = %record.result_type,
                "job card closed"
            );
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => storage_error(e),
    }
}

/// GET /api/warranty-master -- joined over one storage snapshot, so the
/// derived status can never be stale relative to the row it annotates.
pub(crate) async fn handle_warranty_master(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state.storage.warranty_master(&branch).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/service-master
pub(crate) async fn handle_service_master(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let branch = branch_from_headers(&headers);
    match state.storage.service_master(&branch).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => storage_error(e),
    }
}

/// Which master a masters route addresses, recovered from the path.
fn master_kind_for(path: &str) -> Option<MasterKind> {
    match path {
        "/api/suppliers" | "/api/add-supplier" => Some(MasterKind::Supplier),
        "/api/parts" | "/api/add-part" => Some(MasterKind::Part),
        "/api/customers-list" | "/api/add-customer" => Some(MasterKind::Customer),
        _ => None,
    }
}

#[derive(serde::Deserialize)]
pub(crate) struct AddMasterBody {
    #[serde(default)]
    name: String,
}

/// POST /api/add-supplier | /api/add-part | /api/add-customer
pub(crate) async fn handle_add_master(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    Json(body): Json<AddMasterBody>,
) -> Response {
    let branch = branch_from_headers(&headers);
    let Some(kind) = master_kind_for(uri.path()) else {
        return json_error(StatusCode::NOT_FOUND, "not found").into_response();
    };
    match state.storage.add_master(&branch, kind, &body.name).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/suppliers | /api/parts | /api/customers-list
pub(crate) async fn handle_list_masters(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let branch = branch_from_headers(&headers);
    let Some(kind) = master_kind_for(uri.path()) else {
        return json_error(StatusCode::NOT_FOUND, "not found").into_response();
    };
    match state.storage.list_masters(&branch, kind).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => storage_error(e),
    }
}
