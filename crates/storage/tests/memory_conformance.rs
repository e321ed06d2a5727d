//! Runs the backend-agnostic conformance suite against the in-memory backend.

use partflow_storage::conformance::run_conformance_suite;
use partflow_storage::MemoryStorage;

#[tokio::test]
async fn memory_backend_passes_conformance() {
    let report = run_conformance_suite(|| async { MemoryStorage::new() }).await;
    assert_eq!(report.failed, 0, "{report}");
}
