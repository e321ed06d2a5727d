use std::future::Future;

use super::{branch, TestResult};
use crate::{MasterKind, PartflowStorage, StorageError};

pub(super) async fn run_master_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "masters",
        "quick_add_normalizes_and_is_idempotent",
        quick_add_normalizes_and_is_idempotent(factory).await,
    ));
    results.push(TestResult::from_result(
        "masters",
        "blank_name_is_rejected",
        blank_name_is_rejected(factory).await,
    ));
    results.push(TestResult::from_result(
        "masters",
        "lists_are_branch_scoped_and_kind_scoped",
        lists_are_branch_scoped_and_kind_scoped(factory).await,
    ));

    results
}

async fn quick_add_normalizes_and_is_idempotent<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let b = branch("1");

    let first = store
        .add_master(&b, MasterKind::Supplier, " bajaj auto ")
        .await
        .map_err(|e| e.to_string())?;
    if first.name != "BAJAJ AUTO" {
        return Err(format!("expected BAJAJ AUTO, got {}", first.name));
    }

    let again = store
        .add_master(&b, MasterKind::Supplier, "Bajaj Auto")
        .await
        .map_err(|e| e.to_string())?;
    if again.id != first.id {
        return Err("duplicate quick-add created a second record".to_string());
    }

    let list = store
        .list_masters(&b, MasterKind::Supplier)
        .await
        .map_err(|e| e.to_string())?;
    if list.len() != 1 {
        return Err(format!("expected one supplier, got {}", list.len()));
    }
    Ok(())
}

async fn blank_name_is_rejected<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    match store.add_master(&branch("1"), MasterKind::Part, "   ").await {
        Err(StorageError::Validation(_)) => Ok(()),
        Err(other) => Err(format!("expected a validation error, got: {other}")),
        Ok(_) => Err("blank master name was accepted".to_string()),
    }
}

async fn lists_are_branch_scoped_and_kind_scoped<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: PartflowStorage,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    store
        .add_master(&branch("1"), MasterKind::Supplier, "BAJAJ")
        .await
        .map_err(|e| e.to_string())?;

    let parts = store
        .list_masters(&branch("1"), MasterKind::Part)
        .await
        .map_err(|e| e.to_string())?;
    if !parts.is_empty() {
        return Err("supplier entry leaked into the parts list".to_string());
    }

    let other_branch = store
        .list_masters(&branch("2"), MasterKind::Supplier)
        .await
        .map_err(|e| e.to_string())?;
    if !other_branch.is_empty() {
        return Err("branch 2 sees branch 1's suppliers".to_string());
    }
    Ok(())
}
