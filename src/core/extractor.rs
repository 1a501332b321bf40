use crate::config::{CustomFieldIds, FieldCategory};
use crate::core::dates;
use crate::domain::model::{placeholder, ExpenseRecord, FieldMapping, Stop, WorkflowRecord};
use crate::domain::ports::EmployeeDirectory;
use crate::utils::error::{DocGenError, Result};

/// Value written to `approver_name` when the workflow has no approver yet.
pub const NOT_APPROVED: &str = "not approved yet";

/// Turns a per-diem expense record and its approval workflow into the flat
/// placeholder mapping the trip order template is filled from.
///
/// Deterministic for a given input and resolver outcome; the only effect
/// is the injected name resolution (at most two lookups per call).
pub struct FieldExtractor {
    custom_fields: CustomFieldIds,
}

impl FieldExtractor {
    pub fn new(custom_fields: CustomFieldIds) -> Self {
        Self { custom_fields }
    }

    pub async fn extract<D>(
        &self,
        expense: &ExpenseRecord,
        workflow: &WorkflowRecord,
        directory: &D,
    ) -> Result<FieldMapping>
    where
        D: EmployeeDirectory + ?Sized,
    {
        let stops = expense
            .per_diem
            .as_ref()
            .map(|p| p.stops.as_slice())
            .unwrap_or(&[]);
        if stops.is_empty() {
            return Err(DocGenError::MalformedInput {
                message: format!("expense {} has no per-diem stops", expense.id),
            });
        }

        let mut mapping = FieldMapping::new();

        mapping.insert(
            placeholder::EXPENSE_ID.to_string(),
            format!("{:07}", expense.id),
        );

        let first_stop = &stops[0];
        let last_stop = &stops[stops.len() - 1];
        mapping.insert(
            placeholder::FROM_DATE.to_string(),
            dates::format_short(dates::parse_date(&first_stop.date)?),
        );
        mapping.insert(
            placeholder::TO_DATE.to_string(),
            dates::format_short(dates::parse_date(&last_stop.date)?),
        );

        mapping.insert(
            placeholder::EXPENSE_CREATED_DATE.to_string(),
            dates::format_long(dates::parse_date(&expense.created_at)?),
        );

        mapping.insert(
            placeholder::EMPLOYEE_NAME.to_string(),
            directory.display_name(&expense.created_by.id).await?,
        );

        mapping.insert(
            placeholder::TRIP_TOTAL_AMOUNT.to_string(),
            format!("{:.2}", expense.reconciliation.total_amount),
        );

        let approver_name = match &workflow.approved_by {
            Some(approver) => directory.display_name(&approver.id).await?,
            None => NOT_APPROVED.to_string(),
        };
        mapping.insert(placeholder::APPROVER_NAME.to_string(), approver_name);

        mapping.insert(placeholder::DESTINATION.to_string(), destination(stops));

        for field in &expense.reconciliation.custom_fields {
            let Some(first_value) = field.selected_values.first() else {
                continue;
            };
            match self.custom_fields.category(&field.id) {
                Some(FieldCategory::Team) => {
                    mapping.insert(
                        placeholder::EMPLOYEE_TEAM.to_string(),
                        first_value.label.clone(),
                    );
                    // The team field may carry the parent team as a second
                    // label; the key is omitted when it does not.
                    if let Some(parent) = field.selected_values.get(1) {
                        mapping.insert(
                            placeholder::EMPLOYEE_PARENT_TEAM.to_string(),
                            parent.label.clone(),
                        );
                    }
                }
                Some(FieldCategory::Title) => {
                    mapping.insert(
                        placeholder::WORK_TITLE.to_string(),
                        first_value.label.clone(),
                    );
                }
                Some(FieldCategory::Reason) => {
                    mapping.insert(
                        placeholder::TRIP_REASON.to_string(),
                        first_value.label.clone(),
                    );
                }
                Some(FieldCategory::Transport) => {
                    mapping.insert(
                        placeholder::TRANSPORT_TYPE.to_string(),
                        first_value.label.clone(),
                    );
                }
                None => {}
            }
        }

        Ok(mapping)
    }
}

/// Exactly two stops: the second stop's address verbatim. More stops: a
/// 1-indexed numbered list of every stop after the origin, one per line.
fn destination(stops: &[Stop]) -> String {
    if stops.len() == 2 {
        return stops[1].address.clone();
    }
    let mut out = String::new();
    for (index, stop) in stops.iter().enumerate().skip(1) {
        out.push_str(&format!("{}. {}\n", index, stop.address));
    }
    out
}
