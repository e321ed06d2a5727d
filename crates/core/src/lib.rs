//! partflow-core: domain model for the warranty round-trip tracker.
//!
//! Models the lifecycle of a trackable unit (customer job card, supplier
//! outward part, service job) in a multi-branch workshop:
//!
//! ```text
//! [CREATED] --(intake)--> PENDING --(resolution recorded)--> DONE
//! ```
//!
//! PENDING and DONE are the only states. A pending record can have at most
//! one resolution, and nothing transitions out of DONE.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`BranchId`], [`SessionContext`] -- branch scoping and session identity
//! - [`TrackingStatus`], [`WarrantyFlag`], [`ResultType`] -- lifecycle enums
//! - [`ReferenceNo`], [`SequenceKind`] -- per-branch reference numbers
//! - [`OutwardDraft`], [`JobCardDraft`] -- intake form state + validation
//! - [`ResolutionDraft`] -- resolution form state + serial finalization
//! - [`reconcile::join`] / [`reconcile::filter`] -- the reconciliation view
//! - [`ValidationError`] -- local validation failures (never sent to a server)

pub mod dispatch;
pub mod error;
pub mod intake;
pub mod normalize;
pub mod reconcile;
pub mod refno;
pub mod resolution;
pub mod session;
pub mod types;

pub use error::ValidationError;
pub use intake::{IntakeSummary, JobCardDraft, NewJobCard, NewOutward, OutwardDraft};
pub use reconcile::{ReconciliationRow, ResolutionSummary, StatusTab};
pub use refno::{ReferenceNo, SequenceKind};
pub use resolution::{NewResolution, ResolutionDraft, NO_SERIAL_MARKER};
pub use session::{BranchId, SessionContext};
pub use types::{ResultType, TrackingStatus, WarrantyFlag};

/// Today's date as an ISO 8601 calendar date string (`YYYY-MM-DD`).
///
/// Entry forms default their date field to this when the user leaves it blank.
pub fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}
