use serde::Deserialize;
use std::collections::HashMap;

/// Flat placeholder name -> formatted display string mapping, ready for
/// direct substitution into the trip order template. Absence of a key
/// means "not applicable", never an error.
pub type FieldMapping = HashMap<String, String>;

/// Placeholder names recognized by the business-trip order template.
pub mod placeholder {
    pub const EXPENSE_ID: &str = "expense_id";
    pub const FROM_DATE: &str = "from_date";
    pub const TO_DATE: &str = "to_date";
    pub const DESTINATION: &str = "destination";
    pub const EXPENSE_CREATED_DATE: &str = "expense_created_date";
    pub const EMPLOYEE_NAME: &str = "employee_name";
    pub const EMPLOYEE_TEAM: &str = "employee_team";
    pub const EMPLOYEE_PARENT_TEAM: &str = "employee_parent_team";
    pub const APPROVER_NAME: &str = "approver_name";
    pub const TRIP_REASON: &str = "trip_reason";
    pub const TRANSPORT_TYPE: &str = "transport_type";
    pub const WORK_TITLE: &str = "work_title";
    pub const TRIP_TOTAL_AMOUNT: &str = "trip_total_amount";
}

/// Expense type tag that triggers document generation.
pub const PER_DIEM_TYPE: &str = "perDiem";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub created_at: String,
    pub created_by: EmployeeRef,
    #[serde(default)]
    pub per_diem: Option<PerDiem>,
    pub reconciliation: Reconciliation,
    #[serde(default)]
    pub document: Option<DocumentInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerDiem {
    #[serde(default)]
    pub stops: Vec<Stop>,
}

/// One leg of the trip. The first stop is the origin.
#[derive(Debug, Clone, Deserialize)]
pub struct Stop {
    pub date: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub total_amount: f64,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: String,
    #[serde(default)]
    pub selected_values: Vec<SelectedValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedValue {
    pub label: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentInfo {
    #[serde(default)]
    pub files: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    #[serde(default)]
    pub approved_by: Option<EmployeeRef>,
}
