use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{JobCardRecord, MasterKind, MasterRecord, OutwardRecord, ResolutionRecord};
use partflow_core::{
    BranchId, NewJobCard, NewOutward, ReconciliationRow, ReferenceNo, ResolutionDraft, SequenceKind,
};

/// The storage trait for warranty round-trip backends.
///
/// Everything is branch-scoped: sequences, pending lists, and reports for one
/// branch never see another branch's records.
///
/// ## Atomicity
///
/// `resolve_outward` / `close_job_card` must be atomic: check that the
/// referenced record exists in the branch and is PENDING, flip it to DONE,
/// and append the resolution as one indivisible step. Two staff members
/// resolving the same reference concurrently must produce exactly one
/// resolution; the loser gets [`StorageError::AlreadyResolved`]. There is no
/// transition out of DONE.
///
/// ## Reference numbers
///
/// `peek_next_reference` is display-only (the form shows the number before
/// save). The authoritative number is assigned inside `create_*`, so two
/// clients previewing the same value still end up with distinct records.
///
/// ## Reconciliation
///
/// `warranty_master` / `service_master` compute the intake-to-resolution join
/// over a single consistent snapshot, so the derived PENDING/DONE status can
/// never be stale relative to the row it annotates.
#[async_trait]
pub trait PartflowStorage: Send + Sync + 'static {
    // ── Sequences ─────────────────────────────────────────────────────────

    /// Next reference number for the branch/category, without consuming it.
    async fn peek_next_reference(
        &self,
        branch: &BranchId,
        kind: SequenceKind,
    ) -> Result<ReferenceNo, StorageError>;

    // ── Intake ────────────────────────────────────────────────────────────

    /// Persist a supplier outward; assigns `outward_no`, status PENDING.
    async fn create_outward(
        &self,
        branch: &BranchId,
        new: NewOutward,
    ) -> Result<OutwardRecord, StorageError>;

    /// Persist a customer job card; assigns `job_no`, status PENDING.
    async fn create_job_card(
        &self,
        branch: &BranchId,
        new: NewJobCard,
    ) -> Result<JobCardRecord, StorageError>;

    // ── Pending selection lists ───────────────────────────────────────────

    async fn list_pending_outwards(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<OutwardRecord>, StorageError>;

    async fn list_pending_job_cards(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<JobCardRecord>, StorageError>;

    // ── Resolution ────────────────────────────────────────────────────────

    /// Resolve a pending supplier outward. Re-runs draft finalization against
    /// the stored record's serial, then atomically flips PENDING -> DONE.
    async fn resolve_outward(
        &self,
        branch: &BranchId,
        draft: ResolutionDraft,
    ) -> Result<ResolutionRecord, StorageError>;

    /// Close a pending job card (customer delivery), same semantics as
    /// `resolve_outward` plus optional charges.
    async fn close_job_card(
        &self,
        branch: &BranchId,
        draft: ResolutionDraft,
    ) -> Result<ResolutionRecord, StorageError>;

    // ── Reconciliation reports ────────────────────────────────────────────

    /// Supplier side: all outwards joined to their resolutions.
    async fn warranty_master(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<ReconciliationRow>, StorageError>;

    /// Service side: all job cards joined to their resolutions.
    async fn service_master(
        &self,
        branch: &BranchId,
    ) -> Result<Vec<ReconciliationRow>, StorageError>;

    // ── Master lists ──────────────────────────────────────────────────────

    /// Quick-add a master entry. Names are normalized uppercase; adding an
    /// existing name returns the existing record (idempotent).
    async fn add_master(
        &self,
        branch: &BranchId,
        kind: MasterKind,
        name: &str,
    ) -> Result<MasterRecord, StorageError>;

    async fn list_masters(
        &self,
        branch: &BranchId,
        kind: MasterKind,
    ) -> Result<Vec<MasterRecord>, StorageError>;
}
