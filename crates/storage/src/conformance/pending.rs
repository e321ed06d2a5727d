use std::future::Future;

use super::{branch, job_card, outward, resolution, TestResult};
use crate::PartflowStorage;
use partflow_core::{ResultType, TrackingStatus};

pub(super) async fn run_pending_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "pending",
        "new_intake_is_pending_and_listed",
        new_intake_is_pending_and_listed(factory).await,
    ));
    results.push(TestResult::from_result(
        "pending",
        "pending_lists_are_branch_scoped",
        pending_lists_are_branch_scoped(factory).await,
    ));
    results.push(TestResult::from_result(
        "pending",
        "resolved_reference_leaves_the_pending_list",
        resolved_reference_leaves_the_pending_list(factory).await,
    ));

    results
}

async fn new_intake_is_pending_and_listed<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let created = store
        .create_outward(&b, outward("BAJAJ", "MOTOR", Some("SN-1")))
        .await
        .map_err(|e| e.to_string())?;
    if created.status != TrackingStatus::Pending {
        return Err(format!("fresh intake should be PENDING, got {}", created.status));
    }

    let pending = store
        .list_pending_outwards(&b)
        .await
        .map_err(|e| e.to_string())?;
    if !pending.iter().any(|r| r.outward_no == created.outward_no) {
        return Err(format!("{} missing from pending list", created.outward_no));
    }

    let job = store
        .create_job_card(&b, job_card("RAM", "SERVICE", None))
        .await
        .map_err(|e| e.to_string())?;
    let pending_jobs = store
        .list_pending_job_cards(&b)
        .await
        .map_err(|e| e.to_string())?;
    if !pending_jobs.iter().any(|r| r.job_no == job.job_no) {
        return Err(format!("{} missing from pending job list", job.job_no));
    }
    Ok(())
}

async fn pending_lists_are_branch_scoped<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    store
        .create_outward(&branch("2"), outward("TVS", "CLUTCH", None))
        .await
        .map_err(|e| e.to_string())?;

    let other = store
        .list_pending_outwards(&branch("1"))
        .await
        .map_err(|e| e.to_string())?;
    if !other.is_empty() {
        return Err(format!(
            "branch 1 sees {} record(s) belonging to branch 2",
            other.len()
        ));
    }
    Ok(())
}

async fn resolved_reference_leaves_the_pending_list<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let created = store
        .create_outward(&b, outward("BAJAJ", "MOTOR", Some("SN-1")))
        .await
        .map_err(|e| e.to_string())?;
    store
        .resolve_outward(&b, resolution(&created.outward_no, ResultType::Repair, None))
        .await
        .map_err(|e| e.to_string())?;

    let pending = store
        .list_pending_outwards(&b)
        .await
        .map_err(|e| e.to_string())?;
    if pending.iter().any(|r| r.outward_no == created.outward_no) {
        return Err(format!(
            "{} still offered for selection after resolution",
            created.outward_no
        ));
    }
    Ok(())
}
