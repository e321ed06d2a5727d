use std::future::Future;

use super::{branch, job_card, outward, resolution, TestResult};
use crate::PartflowStorage;
use partflow_core::{ResultType, TrackingStatus};

pub(super) async fn run_reconciliation_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "reconciliation",
        "replace_resolution_shows_done_with_new_serial",
        replace_resolution_shows_done_with_new_serial(factory).await,
    ));
    results.push(TestResult::from_result(
        "reconciliation",
        "unresolved_rows_stay_pending",
        unresolved_rows_stay_pending(factory).await,
    ));
    results.push(TestResult::from_result(
        "reconciliation",
        "reports_are_branch_scoped",
        reports_are_branch_scoped(factory).await,
    ));

    results
}

/// The JOB-100 scenario: open for RAM / MOTOR, resolve with REPLACE MX-99,
/// then the service report must show DONE / REPLACE / MX-99.
async fn replace_resolution_shows_done_with_new_serial<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let created = store
        .create_job_card(&b, job_card("RAM", "MOTOR", Some("SN-1")))
        .await
        .map_err(|e| e.to_string())?;
    store
        .close_job_card(
            &b,
            resolution(&created.job_no, ResultType::Replace, Some("MX-99")),
        )
        .await
        .map_err(|e| e.to_string())?;

    let report = store.service_master(&b).await.map_err(|e| e.to_string())?;
    let row = report
        .iter()
        .find(|r| r.reference_no == created.job_no)
        .ok_or("resolved job missing from the report")?;

    if row.status != TrackingStatus::Done {
        return Err(format!("expected DONE, got {}", row.status));
    }
    if row.result_type != Some(ResultType::Replace) {
        return Err(format!("expected REPLACE, got {:?}", row.result_type));
    }
    if row.new_serial.as_deref() != Some("MX-99") {
        return Err(format!("expected MX-99, got {:?}", row.new_serial));
    }
    if row.old_serial != "SN-1" {
        return Err(format!("expected old serial SN-1, got {}", row.old_serial));
    }
    Ok(())
}

async fn unresolved_rows_stay_pending<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let created = store
        .create_outward(&b, outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;

    let report = store.warranty_master(&b).await.map_err(|e| e.to_string())?;
    let row = report
        .iter()
        .find(|r| r.reference_no == created.outward_no)
        .ok_or("fresh outward missing from the report")?;

    if row.status != TrackingStatus::Pending {
        return Err(format!("expected PENDING, got {}", row.status));
    }
    if row.result_type.is_some() || row.new_serial.is_some() {
        return Err("pending row carries resolution details".to_string());
    }
    Ok(())
}

async fn reports_are_branch_scoped<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    store
        .create_outward(&branch("1"), outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;

    let other = store
        .warranty_master(&branch("2"))
        .await
        .map_err(|e| e.to_string())?;
    if !other.is_empty() {
        return Err(format!("branch 2 report has {} foreign row(s)", other.len()));
    }
    Ok(())
}
