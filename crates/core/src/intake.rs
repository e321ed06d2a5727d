//! Intake registration: the forms that bring a part or vehicle into the shop.
//!
//! A draft mirrors the form state as typed. [`OutwardDraft::validate`] and
//! [`JobCardDraft::validate`] run the required-field checks locally -- a
//! failing draft never produces a network request -- and emit the normalized
//! payload the storage layer accepts. The reference number is *not* part of
//! the payload: the backend assigns it inside the create call.

use crate::error::ValidationError;
use crate::normalize::{is_blank, upper, upper_opt};
use crate::types::{TrackingStatus, WarrantyFlag};
use serde::{Deserialize, Serialize};

/// Supplier-outward form state: a part being sent to a supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutwardDraft {
    /// Entry date (`YYYY-MM-DD`); blank means "today" at submission.
    #[serde(default)]
    pub date: Option<String>,
    /// Missing on the wire deserializes as blank and fails validation with
    /// a field-level message rather than a deserialization error.
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub warranty: WarrantyFlag,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub purchase_invoice: Option<String>,
    #[serde(default)]
    pub part_name: String,
    #[serde(default)]
    pub part_serial: Option<String>,
    #[serde(default)]
    pub fault: Option<String>,
    /// Back-reference to the customer job card this part came out of.
    /// Lookup only; the outward record does not own the job card.
    #[serde(default)]
    pub job_card_ref: Option<String>,
}

impl OutwardDraft {
    /// Require supplier and part name; normalize everything else.
    pub fn validate(&self) -> Result<NewOutward, ValidationError> {
        if is_blank(&self.supplier_name) {
            return Err(ValidationError::MissingField {
                field: "supplier_name",
            });
        }
        if is_blank(&self.part_name) {
            return Err(ValidationError::MissingField { field: "part_name" });
        }
        Ok(NewOutward {
            date: self
                .date
                .as_deref()
                .filter(|d| !is_blank(d))
                .map(str::to_string)
                .unwrap_or_else(crate::today),
            supplier_name: upper(&self.supplier_name),
            warranty: self.warranty,
            purchase_date: self.purchase_date.clone().filter(|d| !is_blank(d)),
            purchase_invoice: upper_opt(&self.purchase_invoice),
            part_name: upper(&self.part_name),
            part_serial: upper_opt(&self.part_serial),
            fault: upper_opt(&self.fault),
            job_card_ref: upper_opt(&self.job_card_ref),
        })
    }
}

/// Validated supplier-outward payload. Created `PENDING`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOutward {
    pub date: String,
    pub supplier_name: String,
    pub warranty: WarrantyFlag,
    pub purchase_date: Option<String>,
    pub purchase_invoice: Option<String>,
    pub part_name: String,
    pub part_serial: Option<String>,
    pub fault: Option<String>,
    pub job_card_ref: Option<String>,
}

/// Customer job-card form state: a vehicle or part received for service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCardDraft {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub warranty: WarrantyFlag,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub purchase_invoice: Option<String>,
    #[serde(default)]
    pub part_name: String,
    #[serde(default)]
    pub part_serial: Option<String>,
    #[serde(default)]
    pub fault: Option<String>,
}

impl JobCardDraft {
    /// Require customer and part/service name; normalize everything else.
    pub fn validate(&self) -> Result<NewJobCard, ValidationError> {
        if is_blank(&self.customer_name) {
            return Err(ValidationError::MissingField {
                field: "customer_name",
            });
        }
        if is_blank(&self.part_name) {
            return Err(ValidationError::MissingField { field: "part_name" });
        }
        Ok(NewJobCard {
            date: self
                .date
                .as_deref()
                .filter(|d| !is_blank(d))
                .map(str::to_string)
                .unwrap_or_else(crate::today),
            customer_name: upper(&self.customer_name),
            mobile: upper_opt(&self.mobile),
            model_name: upper_opt(&self.model_name),
            warranty: self.warranty,
            purchase_date: self.purchase_date.clone().filter(|d| !is_blank(d)),
            purchase_invoice: upper_opt(&self.purchase_invoice),
            part_name: upper(&self.part_name),
            part_serial: upper_opt(&self.part_serial),
            fault: upper_opt(&self.fault),
        })
    }
}

/// Validated job-card payload. Created `PENDING`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJobCard {
    pub date: String,
    pub customer_name: String,
    pub mobile: Option<String>,
    pub model_name: Option<String>,
    pub warranty: WarrantyFlag,
    pub purchase_date: Option<String>,
    pub purchase_invoice: Option<String>,
    pub part_name: String,
    pub part_serial: Option<String>,
    pub fault: Option<String>,
}

/// What the dispatch and reconciliation stages need to know about an intake
/// record, regardless of which lifecycle it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSummary {
    pub reference_no: String,
    pub date: String,
    /// Supplier name for outwards, customer name for job cards.
    pub party_name: String,
    pub part_name: String,
    pub part_serial: Option<String>,
    pub fault: Option<String>,
    pub warranty: WarrantyFlag,
    pub status: TrackingStatus,
}
