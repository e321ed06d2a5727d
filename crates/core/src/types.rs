//! Lifecycle enums shared across intake, resolution, and reporting.
//!
//! Wire names are the uppercase strings the backend has always stored
//! (`"PENDING"`, `"YES"`, `"REPLACE"`, ...), so records round-trip against
//! existing data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a trackable unit.
///
/// There are exactly two states. A record is created `Pending` and flips to
/// `Done` when its resolution is recorded; there is no transition out of
/// `Done`. The model has no CANCELLED/VOID state -- a customer who never
/// returns or a written-off supplier item stays `Pending` forever. Known gap,
/// kept rather than inventing a transition the data never had.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "DONE")]
    Done,
}

impl TrackingStatus {
    pub fn is_pending(self) -> bool {
        self == TrackingStatus::Pending
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::Pending => write!(f, "PENDING"),
            TrackingStatus::Done => write!(f, "DONE"),
        }
    }
}

/// Whether an intake is a warranty claim.
///
/// Stored as `"YES"`/`"NO"` rather than a boolean because the purchase
/// metadata fields (purchase date, invoice no) are only meaningful when this
/// is `Yes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarrantyFlag {
    #[serde(rename = "YES")]
    Yes,
    #[default]
    #[serde(rename = "NO")]
    No,
}

impl fmt::Display for WarrantyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarrantyFlag::Yes => write!(f, "YES"),
            WarrantyFlag::No => write!(f, "NO"),
        }
    }
}

/// Outcome recorded when an item comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    /// The original item was repaired; the serial number is unchanged.
    #[serde(rename = "REPAIR")]
    Repair,
    /// A new item was issued; a new serial number is required.
    #[serde(rename = "REPLACE")]
    Replace,
    /// The claim was rejected and the original item returned as-is.
    #[serde(rename = "REJECT")]
    Reject,
}

impl ResultType {
    /// Parse the uppercase wire/CLI form.
    pub fn parse(s: &str) -> Option<ResultType> {
        match s.trim().to_uppercase().as_str() {
            "REPAIR" => Some(ResultType::Repair),
            "REPLACE" => Some(ResultType::Replace),
            "REJECT" | "RETURN" => Some(ResultType::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Repair => write!(f, "REPAIR"),
            ResultType::Replace => write!(f, "REPLACE"),
            ResultType::Reject => write!(f, "REJECT"),
        }
    }
}
