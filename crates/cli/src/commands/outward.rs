//! `partflow outward` -- the supplier outward/inward screens.

use super::{emit, field};
use crate::client::ApiClient;
use crate::OutputFormat;
use partflow_core::{
    dispatch, OutwardDraft, ReferenceNo, ResolutionDraft, ResultType, WarrantyFlag,
};
use partflow_storage::JobCardRecord;

pub(crate) struct NewOutwardArgs {
    pub supplier: String,
    pub part: Option<String>,
    pub serial: Option<String>,
    pub fault: Option<String>,
    pub warranty: bool,
    pub purchase_date: Option<String>,
    pub invoice: Option<String>,
    pub job_ref: Option<String>,
    pub from_job: Option<String>,
    pub date: Option<String>,
}

pub(crate) fn cmd_new(
    api: &ApiClient,
    args: NewOutwardArgs,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let mut draft = OutwardDraft {
        date: args.date,
        supplier_name: args.supplier,
        purchase_date: args.purchase_date,
        purchase_invoice: args.invoice,
        job_card_ref: args.job_ref,
        ..Default::default()
    };

    // Dispatch hand-off: copy the selected pending job card into the draft.
    // The copy is a snapshot; explicit flags below still win.
    if let Some(from_job) = &args.from_job {
        let wanted = ReferenceNo::parse(from_job).map_err(|e| format!("error: {e}"))?;
        let list = api.get("/api/pending-jobcards")?;
        let records: Vec<JobCardRecord> =
            serde_json::from_value(list).map_err(|e| format!("error: unexpected response: {e}"))?;
        let pending: Vec<_> = records.iter().map(|r| r.summary()).collect();
        let source = dispatch::select(&pending, wanted.as_str())
            .ok_or_else(|| format!("error: no pending job card {wanted}"))?;
        dispatch::autofill(&mut draft, source);
    }

    if let Some(part) = args.part {
        draft.part_name = part;
    }
    if let Some(serial) = args.serial {
        draft.part_serial = Some(serial);
    }
    if let Some(fault) = args.fault {
        draft.fault = Some(fault);
    }
    if args.warranty {
        draft.warranty = WarrantyFlag::Yes;
    }

    // Local validation: a bad draft never reaches the network.
    draft.validate().map_err(|e| format!("error: {e}"))?;

    let body = serde_json::to_value(&draft).map_err(|e| format!("error: {e}"))?;
    let record = api.post("/api/save-outward", &body)?;

    emit(
        || {
            format!(
                "{} saved (PENDING): {} / {}",
                field(&record, "outward_no"),
                field(&record, "supplier_name"),
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
    let list = api.get("/api/pending-supplier-outwards")?;
    let rows = list.as_array().cloned().unwrap_or_default();

    emit(
        || {
            if rows.is_empty() {
                return "no pending outwards".to_string();
            }
            rows.iter()
                .map(|r| {
                    format!(
                        "{}  {}  {}  SN: {}",
                        field(r, "outward_no"),
                        field(r, "supplier_name"),
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

pub(crate) fn cmd_resolve(
    api: &ApiClient,
    reference: &str,
    result: &str,
    new_serial: Option<String>,
    date: Option<String>,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let reference = ReferenceNo::parse(reference).map_err(|e| format!("error: {e}"))?;
    let result_type = ResultType::parse(result)
        .ok_or_else(|| format!("error: invalid result type '{result}' (repair/replace/reject)"))?;

    let draft = ResolutionDraft {
        date,
        reference_no: reference.as_str().to_string(),
        result_type,
        new_serial,
        charges: None,
    };

    // Local validation only; the server recomputes the final serial against
    // the stored record.
    draft.finalize(None).map_err(|e| format!("error: {e}"))?;

    let body = serde_json::to_value(&draft).map_err(|e| format!("error: {e}"))?;
    let record = api.post("/api/save-supplier-inward", &body)?;

    emit(
        || {
            format!(
                "{} resolved: {} (final serial {})",
                field(&record, "reference_no"),
                field(&record, "result_type"),
                field(&record, "final_serial"),
            )
        },
        &record,
        output,
        quiet,
    );
    Ok(())
}
