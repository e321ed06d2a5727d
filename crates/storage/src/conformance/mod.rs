//! Conformance test suite for `PartflowStorage` implementations.
//!
//! Backend-agnostic checks any storage backend can run to verify the
//! invariants the client model depends on:
//!
//! - **Sequences**: per-branch, per-category, monotonic; peek never consumes
//! - **Pending lists**: new intakes appear PENDING, branch-scoped, resolved
//!   references drop out
//! - **Resolution**: one resolution per record, REPLACE serial rules enforced
//!   server-side, unknown/foreign references rejected
//! - **Reconciliation**: derived DONE rows carry the resolution details
//! - **Masters**: uppercase normalization, idempotent quick-add
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory that creates
//! a fresh, empty storage instance per test:
//!
//! ```ignore
//! use partflow_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn sqlite_conformance() {
//!     let report = run_conformance_suite(|| async { fresh_sqlite().await }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod masters;
mod pending;
mod reconciliation;
mod resolution;
mod sequence;

use std::fmt;
use std::future::Future;

use crate::PartflowStorage;
use partflow_core::{
    BranchId, NewJobCard, NewOutward, ResolutionDraft, ResultType, WarrantyFlag,
};

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "sequence", "resolution").
    pub category: String,
    /// Test name.
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        let (passed, message) = match result {
            Ok(()) => (true, None),
            Err(msg) => (false, Some(msg)),
        };
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed,
            message,
        }
    }
}

/// Aggregate outcome of a full suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "conformance: {} passed, {} failed", self.passed, self.failed)?;
        for r in self.results.iter().filter(|r| !r.passed) {
            writeln!(
                f,
                "  FAIL {}/{}: {}",
                r.category,
                r.name,
                r.message.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

/// Run the full suite. The factory must return a fresh, empty storage
/// instance on every call.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();
    results.extend(sequence::run_sequence_tests(&factory).await);
    results.extend(pending::run_pending_tests(&factory).await);
    results.extend(resolution::run_resolution_tests(&factory).await);
    results.extend(reconciliation::run_reconciliation_tests(&factory).await);
    results.extend(masters::run_master_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;
    ConformanceReport {
        results,
        passed,
        failed,
    }
}

// ── Shared fixtures ───────────────────────────────────────────────────────

pub(crate) fn branch(id: &str) -> BranchId {
    BranchId::new(id)
}

pub(crate) fn outward(supplier: &str, part: &str, serial: Option<&str>) -> NewOutward {
    NewOutward {
        date: "2026-08-01".to_string(),
        supplier_name: supplier.to_string(),
        warranty: WarrantyFlag::Yes,
        purchase_date: None,
        purchase_invoice: None,
        part_name: part.to_string(),
        part_serial: serial.map(str::to_string),
        fault: Some("NOT WORKING".to_string()),
        job_card_ref: None,
    }
}

pub(crate) fn job_card(customer: &str, part: &str, serial: Option<&str>) -> NewJobCard {
    NewJobCard {
        date: "2026-08-01".to_string(),
        customer_name: customer.to_string(),
        mobile: None,
        model_name: None,
        warranty: WarrantyFlag::No,
        purchase_date: None,
        purchase_invoice: None,
        part_name: part.to_string(),
        part_serial: serial.map(str::to_string),
        fault: None,
    }
}

pub(crate) fn resolution(
    reference: &str,
    result_type: ResultType,
    new_serial: Option<&str>,
) -> ResolutionDraft {
    ResolutionDraft {
        date: Some("2026-08-10".to_string()),
        reference_no: reference.to_string(),
        result_type,
        new_serial: new_serial.map(str::to_string),
        charges: None,
    }
}
