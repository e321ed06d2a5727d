//! Resolution recording: closing the loop when an item comes back.
//!
//! The one rule with teeth: `REPLACE` requires a new serial number, and any
//! other result carries the *original* serial forward regardless of what was
//! typed into the new-serial field. The server re-runs [`ResolutionDraft::
//! finalize`] against the stored record, so a client that skipped validation
//! gains nothing.

use crate::error::ValidationError;
use crate::normalize::{is_blank, upper};
use crate::types::ResultType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marker recorded as the final serial when the original record had none.
pub const NO_SERIAL_MARKER: &str = "N/A";

/// Resolution form state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionDraft {
    /// Receive date (`YYYY-MM-DD`); blank means "today" at submission.
    #[serde(default)]
    pub date: Option<String>,
    /// Reference number of the pending record being resolved.
    pub reference_no: String,
    pub result_type: ResultType,
    #[serde(default)]
    pub new_serial: Option<String>,
    /// Service charges collected at delivery (job-card side only).
    #[serde(default)]
    pub charges: Option<Decimal>,
}

impl ResolutionDraft {
    /// Validate the draft and compute the final serial number.
    ///
    /// `original_serial` is the serial stored on the record being resolved.
    /// Runs locally before any network call, and again server-side against
    /// the stored record.
    pub fn finalize(&self, original_serial: Option<&str>) -> Result<NewResolution, ValidationError> {
        if is_blank(&self.reference_no) {
            return Err(ValidationError::MissingField {
                field: "reference_no",
            });
        }

        let final_serial = match self.result_type {
            ResultType::Replace => match self.new_serial.as_deref().filter(|s| !is_blank(s)) {
                Some(serial) => upper(serial),
                None => return Err(ValidationError::NewSerialRequired),
            },
            // REPAIR / REJECT: the typed new-serial value is ignored.
            ResultType::Repair | ResultType::Reject => original_serial
                .filter(|s| !is_blank(s))
                .map(upper)
                .unwrap_or_else(|| NO_SERIAL_MARKER.to_string()),
        };

        Ok(NewResolution {
            date: self
                .date
                .as_deref()
                .filter(|d| !is_blank(d))
                .map(str::to_string)
                .unwrap_or_else(crate::today),
            reference_no: upper(&self.reference_no),
            result_type: self.result_type,
            final_serial,
            charges: self.charges,
        })
    }
}

/// Validated resolution payload. Recording one flips the referenced record
/// PENDING -> DONE exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResolution {
    pub date: String,
    pub reference_no: String,
    pub result_type: ResultType,
    pub final_serial: String,
    pub charges: Option<Decimal>,
}
