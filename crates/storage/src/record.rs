use partflow_core::{IntakeSummary, ResolutionSummary, ResultType, TrackingStatus, WarrantyFlag};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A part sent to a supplier, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutwardRecord {
    pub id: u64,
    pub branch_id: String,
    pub outward_no: String,
    pub outward_date: String,
    pub supplier_name: String,
    pub part_name: String,
    pub part_serial: Option<String>,
    pub fault: Option<String>,
    pub warranty: WarrantyFlag,
    pub purchase_date: Option<String>,
    pub purchase_invoice: Option<String>,
    /// Weak back-reference to the customer job card this part came out of.
    pub job_card_ref: Option<String>,
    pub status: TrackingStatus,
}

impl OutwardRecord {
    pub fn summary(&self) -> IntakeSummary {
        IntakeSummary {
            reference_no: self.outward_no.clone(),
            date: self.outward_date.clone(),
            party_name: self.supplier_name.clone(),
            part_name: self.part_name.clone(),
            part_serial: self.part_serial.clone(),
            fault: self.fault.clone(),
            warranty: self.warranty,
            status: self.status,
        }
    }
}

/// A customer service job card, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCardRecord {
    pub id: u64,
    pub branch_id: String,
    pub job_no: String,
    pub job_date: String,
    pub customer_name: String,
    pub mobile: Option<String>,
    pub model_name: Option<String>,
    pub part_name: String,
    pub part_serial: Option<String>,
    pub fault: Option<String>,
    pub warranty: WarrantyFlag,
    pub purchase_date: Option<String>,
    pub purchase_invoice: Option<String>,
    pub status: TrackingStatus,
}

impl JobCardRecord {
    pub fn summary(&self) -> IntakeSummary {
        IntakeSummary {
            reference_no: self.job_no.clone(),
            date: self.job_date.clone(),
            party_name: self.customer_name.clone(),
            part_name: self.part_name.clone(),
            part_serial: self.part_serial.clone(),
            fault: self.fault.clone(),
            warranty: self.warranty,
            status: self.status,
        }
    }
}

/// The recorded outcome for one outward or job card. References the intake
/// record by number; it does not own it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub id: u64,
    pub branch_id: String,
    pub reference_no: String,
    pub received_date: String,
    pub result_type: ResultType,
    pub final_serial: String,
    pub charges: Option<Decimal>,
}

impl ResolutionRecord {
    pub fn summary(&self) -> ResolutionSummary {
        ResolutionSummary {
            reference_no: self.reference_no.clone(),
            date: self.received_date.clone(),
            result_type: self.result_type,
            final_serial: self.final_serial.clone(),
            charges: self.charges,
        }
    }
}

/// Which master list a quick-add targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasterKind {
    #[serde(rename = "SUPPLIER")]
    Supplier,
    #[serde(rename = "PART")]
    Part,
    #[serde(rename = "CUSTOMER")]
    Customer,
}

/// One entry in a master list (supplier / part / customer dropdown source).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterRecord {
    pub id: u64,
    pub name: String,
}
