use std::future::Future;

use super::{branch, job_card, outward, resolution, TestResult};
use crate::{PartflowStorage, StorageError};
use partflow_core::{ResultType, TrackingStatus, NO_SERIAL_MARKER};
use rust_decimal::Decimal;

pub(super) async fn run_resolution_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "resolution",
        "second_resolution_is_rejected",
        second_resolution_is_rejected(factory).await,
    ));
    results.push(TestResult::from_result(
        "resolution",
        "replace_with_blank_serial_is_rejected_server_side",
        replace_with_blank_serial_is_rejected_server_side(factory).await,
    ));
    results.push(TestResult::from_result(
        "resolution",
        "repair_carries_the_original_serial",
        repair_carries_the_original_serial(factory).await,
    ));
    results.push(TestResult::from_result(
        "resolution",
        "reject_without_original_serial_records_marker",
        reject_without_original_serial_records_marker(factory).await,
    ));
    results.push(TestResult::from_result(
        "resolution",
        "unknown_reference_is_not_found",
        unknown_reference_is_not_found(factory).await,
    ));
    results.push(TestResult::from_result(
        "resolution",
        "foreign_branch_reference_is_not_found",
        foreign_branch_reference_is_not_found(factory).await,
    ));
    results.push(TestResult::from_result(
        "resolution",
        "job_close_records_charges",
        job_close_records_charges(factory).await,
    ));

    results
}

async fn second_resolution_is_rejected<S, F, Fut>(factory: &F) -> Result<(), String>
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

    match store
        .resolve_outward(&b, resolution(&created.outward_no, ResultType::Reject, None))
        .await
    {
        Err(StorageError::AlreadyResolved { reference_no }) if reference_no == created.outward_no => {
            Ok(())
        }
        Err(other) => Err(format!("expected AlreadyResolved, got: {other}")),
        Ok(_) => Err("second resolution was accepted".to_string()),
    }
}

async fn replace_with_blank_serial_is_rejected_server_side<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
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

    match store
        .resolve_outward(
            &b,
            resolution(&created.outward_no, ResultType::Replace, None),
        )
        .await
    {
        Err(StorageError::Validation(_)) => {}
        Err(other) => return Err(format!("expected a validation error, got: {other}")),
        Ok(_) => return Err("REPLACE with no serial was accepted".to_string()),
    }

    // The failed attempt must not have mutated the record.
    let pending = store
        .list_pending_outwards(&b)
        .await
        .map_err(|e| e.to_string())?;
    let record = pending
        .iter()
        .find(|r| r.outward_no == created.outward_no)
        .ok_or("record left the pending list after a rejected resolution")?;
    if record.status != TrackingStatus::Pending {
        return Err(format!("status changed to {}", record.status));
    }
    Ok(())
}

async fn repair_carries_the_original_serial<S, F, Fut>(factory: &F) -> Result<(), String>
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

    // A typed new-serial value must be ignored for non-REPLACE results.
    let resolved = store
        .resolve_outward(
            &b,
            resolution(&created.outward_no, ResultType::Repair, Some("TYPED-IN")),
        )
        .await
        .map_err(|e| e.to_string())?;

    if resolved.final_serial != "SN-1" {
        return Err(format!(
            "expected original serial SN-1, got {}",
            resolved.final_serial
        ));
    }
    Ok(())
}

async fn reject_without_original_serial_records_marker<S, F, Fut>(factory: &F) -> Result<(), String>
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
    let resolved = store
        .resolve_outward(&b, resolution(&created.outward_no, ResultType::Reject, None))
        .await
        .map_err(|e| e.to_string())?;

    if resolved.final_serial != NO_SERIAL_MARKER {
        return Err(format!(
            "expected {NO_SERIAL_MARKER}, got {}",
            resolved.final_serial
        ));
    }
    Ok(())
}

async fn unknown_reference_is_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    match store
        .resolve_outward(&branch("1"), resolution("OUT-999", ResultType::Repair, None))
        .await
    {
        Err(StorageError::ReferenceNotFound { reference_no }) if reference_no == "OUT-999" => Ok(()),
        Err(other) => Err(format!("expected ReferenceNotFound, got: {other}")),
        Ok(_) => Err("resolution against a missing reference succeeded".to_string()),
    }
}

async fn foreign_branch_reference_is_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    let created = store
        .create_outward(&branch("1"), outward("BAJAJ", "MOTOR", None))
        .await
        .map_err(|e| e.to_string())?;

    match store
        .resolve_outward(
            &branch("2"),
            resolution(&created.outward_no, ResultType::Repair, None),
        )
        .await
    {
        Err(StorageError::ReferenceNotFound { .. }) => Ok(()),
        Err(other) => Err(format!("expected ReferenceNotFound, got: {other}")),
        Ok(_) => Err("branch 2 resolved branch 1's record".to_string()),
    }
}

async fn job_close_records_charges<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let created = store
        .create_job_card(&b, job_card("RAM", "MOTOR", Some("SN-7")))
        .await
        .map_err(|e| e.to_string())?;

    let mut draft = resolution(&created.job_no, ResultType::Repair, None);
    draft.charges = Some(Decimal::new(45000, 2)); // 450.00

    let resolved = store
        .close_job_card(&b, draft)
        .await
        .map_err(|e| e.to_string())?;
    if resolved.charges != Some(Decimal::new(45000, 2)) {
        return Err(format!("charges not recorded: {:?}", resolved.charges));
    }
    if resolved.final_serial != "SN-7" {
        return Err(format!(
            "expected carried serial SN-7, got {}",
            resolved.final_serial
        ));
    }
    Ok(())
}
