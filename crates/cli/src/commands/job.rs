//! `partflow job` -- the customer job-card screens.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::{emit, field};
use crate::client::ApiClient;
use crate::OutputFormat;
use partflow_core::{JobCardDraft, ReferenceNo, ResolutionDraft, ResultType, WarrantyFlag};

pub(crate) struct OpenJobArgs {
    pub customer: String,
    pub part: String,
    pub mobile: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub fault: Option<String>,
    pub warranty: bool,
    pub purchase_date: Option<String>,
    pub invoice: Option<String>,
    pub date: Option<String>,
}

pub(crate) fn cmd_open(
    api: &ApiClient,
    args: OpenJobArgs,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let draft = JobCardDraft {
        date: args.date,
        customer_name: args.customer,
        mobile: args.mobile,
        model_name: args.model,
        warranty: if args.warranty {
            WarrantyFlag::Yes
        } else {
            WarrantyFlag::No
        },
        purchase_date: args.purchase_date,
        purchase_invoice: args.invoice,
        part_name: args.part,
        part_serial: args.serial,
        fault: args.fault,
    };

    draft.validate().map_err(|e| format!("error: {e}"))?;

    let body = serde_json::to_value(&draft).map_err(|e| format!("error: {e}"))?;
    let record = api.post("/api/save-service-job", &body)?;

    emit(
        || {
            format!(
                "{} opened (PENDING): {} / {}",
                field(&record, "job_no"),
                field(&record, "customer_name"),
                field(&record, "part_name"),
            )
        },
        &record,
        output,
        quiet,
    );
    Ok(())
}

pub(crate) fn cmd_pending(api: &ApiClient, output: OutputFormat, quiet: bool) -> Result<(), String> {
    let list = api.get("/api/pending-jobcards")?;
    let rows = list.as_array().cloned().unwrap_or_default();

    emit(
        || {
            if rows.is_empty() {
                return "no open job cards".to_string();
            }
            rows.iter()
                .map(|r| {
                    format!(
                        "{}  {}  {}  SN: {}",
                        field(r, "job_no"),
                        field(r, "customer_name"),
                        field(r, "part_name"),
                        field(r, "part_serial"),
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        },
        &list,
        output,
        quiet,
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_close(
    api: &ApiClient,
    reference: &str,
    result: &str,
    new_serial: Option<String>,
    charges: Option<String>,
    date: Option<String>,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let reference = ReferenceNo::parse(reference).map_err(|e| format!("error: {e}"))?;
    let result_type = ResultType::parse(result)
        .ok_or_else(|| format!("error: invalid result type '{result}' (repair/replace/reject)"))?;

    let charges = match charges.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(raw) => Some(
            Decimal::from_str(raw).map_err(|_| format!("error: invalid charges amount '{raw}'"))?,
        ),
        None => None,
    };

    let draft = ResolutionDraft {
        date,
        reference_no: reference.as_str().to_string(),
        result_type,
        new_serial,
        charges,
    };

    draft.finalize(None).map_err(|e| format!("error: {e}"))?;

    let body = serde_json::to_value(&draft).map_err(|e| format!("error: {e}"))?;
    let record = api.post("/api/save-cust-outward", &body)?;

    emit(
        || {
            let charges = record
                .get("charges")
                .and_then(|v| v.as_str())
                .unwrap_or("0");
            format!(
                "{} closed: {} (charges {})",
                field(&record, "reference_no"),
                field(&record, "result_type"),
                charges,
            )
        },
        &record,
        output,
        quiet,
    );
    Ok(())
}
