//! Application state shared across request handlers.

use std::sync::Arc;

use axum::http::HeaderMap;

use partflow_core::BranchId;
use partflow_storage::PartflowStorage;

pub(crate) struct AppState {
    /// Storage backend; the sole arbiter of sequences and status flips.
    pub(crate) storage: Arc<dyn PartflowStorage>,
    /// Optional bearer token required on mutating requests. None = open server.
    pub(crate) api_token: Option<String>,
}

/// Resolve the branch scope for a request from the `branch-id` header.
/// Absent or unreadable means the default branch.
pub(crate) fn branch_from_headers(headers: &HeaderMap) -> BranchId {
    headers
        .get("branch-id")
        .and_then(|v| v.to_str().ok())
        .map(BranchId::new)
        .unwrap_or_default()
}
