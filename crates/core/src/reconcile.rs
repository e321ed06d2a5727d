//! Reconciliation view: sent vs received, joined and filtered.
//!
//! [`join`] left-joins intake records to their resolutions by reference
//! number and derives the status: DONE iff a resolution exists. It performs
//! no writes. The storage backend runs the join over one locked snapshot so
//! the two sides can never be mutually stale.

use crate::intake::IntakeSummary;
use crate::types::{ResultType, TrackingStatus, WarrantyFlag};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the join needs to know about a recorded resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub reference_no: String,
    pub date: String,
    pub result_type: ResultType,
    pub final_serial: String,
    pub charges: Option<Decimal>,
}

/// One row of the reconciliation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    pub reference_no: String,
    pub sent_date: String,
    /// Supplier name on the outward side, customer name on the service side.
    pub party_name: String,
    pub part_name: String,
    /// Serial the item left with, or `"N/A"`.
    pub old_serial: String,
    pub warranty: WarrantyFlag,
    pub status: TrackingStatus,
    pub result_type: Option<ResultType>,
    pub new_serial: Option<String>,
    pub received_date: Option<String>,
    pub charges: Option<Decimal>,
}

/// Status tab selection on the report screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTab {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusTab {
    pub fn parse(s: &str) -> Option<StatusTab> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Some(StatusTab::All),
            "PENDING" => Some(StatusTab::Pending),
            "DONE" => Some(StatusTab::Done),
            _ => None,
        }
    }

    fn matches(self, status: TrackingStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Pending => status == TrackingStatus::Pending,
            StatusTab::Done => status == TrackingStatus::Done,
        }
    }
}

/// Left-join intakes to resolutions; derive PENDING/DONE per row.
pub fn join(intakes: &[IntakeSummary], resolutions: &[ResolutionSummary]) -> Vec<ReconciliationRow> {
    let by_reference: HashMap<&str, &ResolutionSummary> = resolutions
        .iter()
        .map(|r| (r.reference_no.as_str(), r))
        .collect();

    intakes
        .iter()
        .map(|intake| {
            let resolution = by_reference.get(intake.reference_no.as_str());
            ReconciliationRow {
                reference_no: intake.reference_no.clone(),
                sent_date: intake.date.clone(),
                party_name: intake.party_name.clone(),
                part_name: intake.part_name.clone(),
                old_serial: intake
                    .part_serial
                    .clone()
                    .unwrap_or_else(|| crate::resolution::NO_SERIAL_MARKER.to_string()),
                warranty: intake.warranty,
                status: if resolution.is_some() {
                    TrackingStatus::Done
                } else {
                    TrackingStatus::Pending
                },
                result_type: resolution.map(|r| r.result_type),
                new_serial: resolution.map(|r| r.final_serial.clone()),
                received_date: resolution.map(|r| r.date.clone()),
                charges: resolution.and_then(|r| r.charges),
            }
        })
        .collect()
}

/// Case-insensitive substring filter over identifier/name fields, combined
/// with the status tab. An empty query matches every row.
pub fn filter(rows: &[ReconciliationRow], tab: StatusTab, query: &str) -> Vec<ReconciliationRow> {
    let q = query.trim().to_lowercase();
    rows.iter()
        .filter(|row| tab.matches(row.status))
        .filter(|row| {
            if q.is_empty() {
                return true;
            }
            let hay = [
                row.reference_no.as_str(),
                row.party_name.as_str(),
                row.part_name.as_str(),
                row.old_serial.as_str(),
                row.new_serial.as_deref().unwrap_or(""),
            ];
            hay.iter().any(|field| field.to_lowercase().contains(&q))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(reference: &str, party: &str, serial: Option<&str>) -> IntakeSummary {
        IntakeSummary {
            reference_no: reference.to_string(),
            date: "2026-08-01".to_string(),
            party_name: party.to_string(),
            part_name: "MOTOR".to_string(),
            part_serial: serial.map(str::to_string),
            fault: None,
            warranty: WarrantyFlag::Yes,
            status: TrackingStatus::Pending,
        }
    }

    fn resolution(reference: &str, serial: &str) -> ResolutionSummary {
        ResolutionSummary {
            reference_no: reference.to_string(),
            date: "2026-08-10".to_string(),
            result_type: ResultType::Replace,
            final_serial: serial.to_string(),
            charges: None,
        }
    }

    #[test]
    fn unresolved_rows_derive_pending() {
        let rows = join(&[intake("OUT-1", "BAJAJ", Some("SN-1"))], &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, TrackingStatus::Pending);
        assert_eq!(rows[0].result_type, None);
        assert_eq!(rows[0].new_serial, None);
    }

    #[test]
    fn resolved_rows_derive_done_with_resolution_details() {
        let rows = join(
            &[intake("OUT-1", "BAJAJ", Some("SN-1"))],
            &[resolution("OUT-1", "MX-99")],
        );
        assert_eq!(rows[0].status, TrackingStatus::Done);
        assert_eq!(rows[0].result_type, Some(ResultType::Replace));
        assert_eq!(rows[0].new_serial.as_deref(), Some("MX-99"));
        assert_eq!(rows[0].old_serial, "SN-1");
    }

    #[test]
    fn missing_serial_renders_the_marker() {
        let rows = join(&[intake("OUT-2", "TVS", None)], &[]);
        assert_eq!(rows[0].old_serial, "N/A");
    }

    #[test]
    fn empty_query_matches_everything() {
        let rows = join(
            &[
                intake("OUT-1", "BAJAJ", None),
                intake("OUT-2", "TVS", None),
            ],
            &[],
        );
        assert_eq!(filter(&rows, StatusTab::All, "").len(), 2);
        assert_eq!(filter(&rows, StatusTab::All, "   ").len(), 2);
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let rows = join(
            &[
                intake("OUT-1", "BAJAJ AUTO", None),
                intake("OUT-2", "TVS", None),
            ],
            &[],
        );
        assert_eq!(filter(&rows, StatusTab::All, "bajaj").len(), 1);
        assert_eq!(filter(&rows, StatusTab::All, "ut-2").len(), 1);
        assert_eq!(filter(&rows, StatusTab::All, "honda").len(), 0);
    }

    #[test]
    fn query_matches_the_substituted_serial() {
        let rows = join(
            &[intake("OUT-1", "BAJAJ", Some("SN-1"))],
            &[resolution("OUT-1", "MX-99")],
        );
        assert_eq!(filter(&rows, StatusTab::All, "mx-99").len(), 1);
    }

    #[test]
    fn status_tab_partitions_rows() {
        let rows = join(
            &[
                intake("OUT-1", "BAJAJ", None),
                intake("OUT-2", "TVS", None),
            ],
            &[resolution("OUT-1", "MX-99")],
        );
        assert_eq!(filter(&rows, StatusTab::Pending, "").len(), 1);
        assert_eq!(filter(&rows, StatusTab::Done, "").len(), 1);
        assert_eq!(filter(&rows, StatusTab::All, "").len(), 2);
    }
}
