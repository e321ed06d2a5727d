//! In-memory backend.
//!
//! One mutex over the whole store: every operation, including the
//! reconciliation joins, runs against a single consistent snapshot, which is
//! exactly the arbiter role the client-side model delegates to storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{JobCardRecord, MasterKind, MasterRecord, OutwardRecord, ResolutionRecord};
use crate::traits::PartflowStorage;
use partflow_core::{
    normalize, reconcile, BranchId, NewJobCard, NewOutward, ReconciliationRow, ReferenceNo,
    ResolutionDraft, SequenceKind, TrackingStatus,
};

#[derive(Default)]
struct BranchState {
    /// Last issued sequence value per category.
    sequences: HashMap<SequenceKind, u64>,
    outwards: Vec<OutwardRecord>,
    job_cards: Vec<JobCardRecord>,
    /// Supplier-side resolutions, keyed by outward reference.
    outward_resolutions: Vec<ResolutionRecord>,
    /// Service-side resolutions, keyed by job reference.
    job_resolutions: Vec<ResolutionRecord>,
    masters: HashMap<MasterKind, Vec<MasterRecord>>,
}

#[derive(Default)]
struct State {
    branches: HashMap<String, BranchState>,
    next_id: u64,
}

impl State {
    fn branch(&mut self, branch: &BranchId) -> &mut BranchState {
        self.branches.entry(branch.as_str().to_string()).or_default()
    }

    fn issue_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_reference(&mut self, branch: &BranchId, kind: SequenceKind) -> ReferenceNo {
        let seq = self.branch(branch).sequences.entry(kind).or_insert(0);
        *seq += 1;
        ReferenceNo::new(kind, *seq)
    }
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Backend("poisoned lock".to_string()))
    }
}

/// Shared resolve path for both lifecycles. `original_serial` and the status
/// flip are read and written under the same lock, so the check-then-append is
/// atomic.
fn resolve_record(
    status: &mut TrackingStatus,
    original_serial: Option<&str>,
    reference_no: &str,
    branch: &BranchId,
    id: u64,
    draft: &ResolutionDraft,
) -> Result<ResolutionRecord, StorageError> {
    if *status == TrackingStatus::Done {
        return Err(StorageError::AlreadyResolved {
            reference_no: reference_no.to_string(),
        });
    }
    let new = draft.finalize(original_serial)?;
    *status = TrackingStatus::Done;
    Ok(ResolutionRecord {
        id,
        branch_id: branch.as_str().to_string(),
        reference_no: reference_no.to_string(),
        received_date: new.date,
        result_type: new.result_type,
        final_serial: new.final_serial,
        charges: new.charges,
    })
}

#[async_trait]
impl PartflowStorage for MemoryStorage {
    async fn peek_next_reference(
        &self,
        branch: &BranchId,
        kind: SequenceKind,
    ) -> Result<ReferenceNo, StorageError> {
        let mut state = self.lock()?;
        let last = state
            .branch(branch)
            .sequences
            .get(&kind)
            .copied()
            .unwrap_or(0);
        Ok(ReferenceNo::new(kind, last + 1))
    }

    async fn create_outward(
        &self,
        branch: &BranchId,
        new: NewOutward,
    ) -> Result<OutwardRecord, StorageError> {
        let mut state = self.lock()?;
        let id = state.issue_id();
        let outward_no = state.issue_reference(branch, SequenceKind::Outward);
        let record = OutwardRecord {
            id,
            branch_id: branch.as_str().to_string(),
            outward_no: outward_no.as_str().to_string(),
            outward_date: new.date,
            supplier_name: new.supplier_name,
            part_name: new.part_name,
            part_serial: new.part_serial,
            fault: new.fault,
            warranty: new.warranty,
            purchase_date: new.purchase_date,
            purchase_invoice: new.purchase_invoice,
            job_card_ref: new.job_card_ref,
            status: TrackingStatus::Pending,
        };
        state.branch(branch).outwards.push(record.clone());
        Ok(record)
    }

    async fn create_job_card(
        &self,
        branch: &BranchId,
        new: NewJobCard,
    ) -> Result<JobCardRecord, StorageError> {
        let mut state = self.lock()?;
        let id = state.issue_id();
        let job_no = state.issue_reference(branch, SequenceKind::JobCard);
        let record = JobCardRecord {
            id,
            branch_id: branch.as_str().to_string(),
            job_no: job_no.as_str().to_string(),
            job_date: new.date,
            customer_name: new.customer_name,
            mobile: new.mobile,
            model_name: new.model_name,
            part_name: new.part_name,
            part_serial: new.part_serial,
            fault: new.fault,
            warranty: new.warranty,
            purchase_date: new.purchase_date,
            purchase_invoice: new.purchase_invoice,
            status: TrackingStatus::Pending,
        };
        state.branch(branch).job_cards.push(record.clone());
        Ok(record)
    }

    async fn list_pending_outwards(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<OutwardRecord>, StorageError> {
        let mut state = self.lock()?;
        Ok(state
            .branch(branch)
            .outwards
            .iter()
            .filter(|r| r.status.is_pending())
            .cloned()
            .collect())
    }

    async fn list_pending_job_cards(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<JobCardRecord>, StorageError> {
        let mut state = self.lock()?;
        Ok(state
            .branch(branch)
            .job_cards
            .iter()
            .filter(|r| r.status.is_pending())
            .cloned()
            .collect())
    }

    async fn resolve_outward(
        &self,
        branch: &BranchId,
        draft: ResolutionDraft,
    ) -> Result<ResolutionRecord, StorageError> {
        let mut state = self.lock()?;
        let id = state.issue_id();
        let reference = normalize::upper(&draft.reference_no);
        let branch_state = state.branch(branch);
        let record = branch_state
            .outwards
            .iter_mut()
            .find(|r| r.outward_no == reference)
            .ok_or_else(|| StorageError::ReferenceNotFound {
                reference_no: reference.clone(),
            })?;
        let resolution = resolve_record(
            &mut record.status,
            record.part_serial.as_deref(),
            &reference,
            branch,
            id,
            &draft,
        )?;
        branch_state.outward_resolutions.push(resolution.clone());
        Ok(resolution)
    }

    async fn close_job_card(
        &self,
        branch: &BranchId,
        draft: ResolutionDraft,
    ) -> Result<ResolutionRecord, StorageError> {
        let mut state = self.lock()?;
        let id = state.issue_id();
        let reference = normalize::upper(&draft.reference_no);
        let branch_state = state.branch(branch);
        let record = branch_state
            .job_cards
            .iter_mut()
            .find(|r| r.job_no == reference)
            .ok_or_else(|| StorageError::ReferenceNotFound {
                reference_no: reference.clone(),
            })?;
        let resolution = resolve_record(
            &mut record.status,
            record.part_serial.as_deref(),
            &reference,
            branch,
            id,
            &draft,
        )?;
        branch_state.job_resolutions.push(resolution.clone());
        Ok(resolution)
    }

    async fn warranty_master(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<ReconciliationRow>, StorageError> {
        let mut state = self.lock()?;
        let branch_state = state.branch(branch);
        let intakes: Vec<_> = branch_state.outwards.iter().map(|r| r.summary()).collect();
        let resolutions: Vec<_> = branch_state
            .outward_resolutions
            .iter()
            .map(|r| r.summary())
            .collect();
        Ok(reconcile::join(&intakes, &resolutions))
    }

    async fn service_master(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<ReconciliationRow>, StorageError> {
        let mut state = self.lock()?;
        let branch_state = state.branch(branch);
        let intakes: Vec<_> = branch_state.job_cards.iter().map(|r| r.summary()).collect();
        let resolutions: Vec<_> = branch_state
            .job_resolutions
            .iter()
            .map(|r| r.summary())
            .collect();
        Ok(reconcile::join(&intakes, &resolutions))
    }

    async fn add_master(
        &self,
        branch: &BranchId,
        kind: MasterKind,
        name: &str,
    ) -> Result<MasterRecord, StorageError> {
        if normalize::is_blank(name) {
            return Err(partflow_core::ValidationError::MissingField { field: "name" }.into());
        }
        let upper = normalize::upper(name);
        let mut state = self.lock()?;
        let id = state.issue_id();
        let entries = state.branch(branch).masters.entry(kind).or_default();
        if let Some(existing) = entries.iter().find(|m| m.name == upper) {
            return Ok(existing.clone());
        }
        let record = MasterRecord { id, name: upper };
        entries.push(record.clone());
        Ok(record)
    }

    async fn list_masters(
        &self,
        branch: &BranchId,
        kind: MasterKind,
    ) -> Result<Vec<MasterRecord>, StorageError> {
        let mut state = self.lock()?;
        Ok(state
            .branch(branch)
            .masters
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn peek_does_not_consume_the_sequence() {
        let store = MemoryStorage::new();
        let branch = BranchId::default();

        let first = store
            .peek_next_reference(&branch, SequenceKind::Outward)
            .await
            .unwrap();
        let second = store
            .peek_next_reference(&branch, SequenceKind::Outward)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "OUT-1");
    }
}
