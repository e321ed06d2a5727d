use std::future::Future;

use super::{branch, outward, TestResult};
use crate::PartflowStorage;
use partflow_core::SequenceKind;

pub(super) async fn run_sequence_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "sequence",
        "references_start_at_one_and_increase",
        references_start_at_one_and_increase(factory).await,
    ));
    results.push(TestResult::from_result(
        "sequence",
        "peek_never_consumes",
        peek_never_consumes(factory).await,
    ));
    results.push(TestResult::from_result(
        "sequence",
        "sequences_are_per_branch",
        sequences_are_per_branch(factory).await,
    ));
    results.push(TestResult::from_result(
        "sequence",
        "categories_are_independent",
        categories_are_independent(factory).await,
    ));

    results
}

async fn references_start_at_one_and_increase<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let first = store
        .create_outward(&b, outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;
    let second = store
        .create_outward(&b, outward("TVS", "CLUTCH", None))
        .await
        .map_err(|e| e.to_string())?;

    if first.outward_no != "OUT-1" {
        return Err(format!("expected OUT-1, got {}", first.outward_no));
    }
    if second.outward_no != "OUT-2" {
        return Err(format!("expected OUT-2, got {}", second.outward_no));
    }
    Ok(())
}

async fn peek_never_consumes<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let peek1 = store
        .peek_next_reference(&b, SequenceKind::Outward)
        .await
        .map_err(|e| e.to_string())?;
    let peek2 = store
        .peek_next_reference(&b, SequenceKind::Outward)
        .await
        .map_err(|e| e.to_string())?;
    if peek1 != peek2 {
        return Err(format!("peek consumed the sequence: {peek1} then {peek2}"));
    }

    let created = store
        .create_outward(&b, outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;
    if created.outward_no != peek1.as_str() {
        return Err(format!(
            "create assigned {}, peek promised {}",
            created.outward_no, peek1
        ));
    }
    Ok(())
}

async fn sequences_are_per_branch<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    let one = store
        .create_outward(&branch("1"), outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;
    let two = store
        .create_outward(&branch("2"), outward("TVS", "CLUTCH", None))
        .await
        .map_err(|e| e.to_string())?;

    // Each branch issues its own OUT-1; the numbers may collide across
    // branches because they are only unique within one.
    if one.outward_no != "OUT-1" || two.outward_no != "OUT-1" {
        return Err(format!(
            "expected OUT-1 in both branches, got {} and {}",
            one.outward_no, two.outward_no
        ));
    }
    Ok(())
}

async fn categories_are_independent<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    store
        .create_outward(&b, outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;
    let job = store
        .create_job_card(&b, super::job_card("RAM", "SERVICE", None))
        .await
        .map_err(|e| e.to_string())?;

    if job.job_no != "JOB-1" {
        return Err(format!(
            "job sequence should not share the outward counter, got {}",
            job.job_no
        ));
    }
    Ok(())
}
