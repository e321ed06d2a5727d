//! Dispatch hand-off: selecting a pending record to send onward.
//!
//! Selecting a record copies its details into the outward draft *by value*.
//! The copy is a snapshot: later edits to the source job card do not
//! retroactively change the dispatch record. Parts going to a supplier out of
//! a customer job are presumed warranty claims, so selection also flips the
//! warranty toggle to YES (the user can still flip it back).

use crate::intake::{IntakeSummary, OutwardDraft};
use crate::types::WarrantyFlag;

/// Whether the dispatch form may be submitted at all.
///
/// With no pending records there is nothing to select, so the submit action
/// is disabled outright rather than caught by validation afterwards.
pub fn can_submit(pending: &[IntakeSummary]) -> bool {
    !pending.is_empty()
}

/// Find the pending record for a selection value, if any.
pub fn select<'a>(pending: &'a [IntakeSummary], reference_no: &str) -> Option<&'a IntakeSummary> {
    pending.iter().find(|p| p.reference_no == reference_no)
}

/// Snapshot-copy a selected job card into the outward draft.
pub fn autofill(draft: &mut OutwardDraft, source: &IntakeSummary) {
    draft.job_card_ref = Some(source.reference_no.clone());
    draft.part_name = source.part_name.clone();
    draft.part_serial = source.part_serial.clone();
    draft.fault = source.fault.clone();
    draft.warranty = WarrantyFlag::Yes;
}

/// Deselecting clears whatever a previous selection filled in.
pub fn clear_autofill(draft: &mut OutwardDraft) {
    draft.job_card_ref = None;
    draft.part_name.clear();
    draft.part_serial = None;
    draft.fault = None;
}
