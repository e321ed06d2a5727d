//! `partflow report` -- the reconciliation views.
//!
//! The server materializes the join; the status tab and search query are
//! presentation concerns and run here, on top of the fetched rows.

use super::emit;
use crate::client::ApiClient;
use crate::OutputFormat;
use partflow_core::reconcile::{self, ReconciliationRow, StatusTab};

#[derive(Debug, Clone, Copy)]
pub(crate) enum ReportSide {
    Warranty,
    Service,
}

impl ReportSide {
    fn path(self) -> &'static str {
        match self {
            ReportSide::Warranty => "/api/warranty-master",
            ReportSide::Service => "/api/service-master",
        }
    }
}

pub(crate) fn cmd_report(
    api: &ApiClient,
    side: ReportSide,
    status: &str,
    query: &str,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let tab = StatusTab::parse(status)
        .ok_or_else(|| format!("error: invalid status '{status}' (all/pending/done)"))?;

    let body = api.get(side.path())?;
    let rows: Vec<ReconciliationRow> =
        serde_json::from_value(body).map_err(|e| format!("error: unexpected response: {e}"))?;

    let rows = reconcile::filter(&rows, tab, query);
    let json = serde_json::to_value(&rows).map_err(|e| format!("error: {e}"))?;

    emit(
        || {
            if rows.is_empty() {
                return "no matching rows".to_string();
            }
            rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
        },
        &json,
        output,
        quiet,
    );
    Ok(())
}

fn render_row(row: &ReconciliationRow) -> String {
    let mut line = format!(
        "{}  {}  {}  {}  SN: {}  {}",
        row.reference_no, row.sent_date, row.party_name, row.part_name, row.old_serial, row.status,
    );
    if let Some(result) = row.result_type {
        line.push_str(&format!("  {result}"));
    }
    if let Some(serial) = &row.new_serial {
        line.push_str(&format!("  new SN: {serial}"));
    }
    if let Some(charges) = row.charges {
        line.push_str(&format!("  charges: {charges}"));
    }
    line
}
