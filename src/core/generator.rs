use crate::core::extractor::FieldExtractor;
use crate::core::template;
use crate::domain::model::PER_DIEM_TYPE;
use crate::domain::ports::{EmployeeDirectory, ExpenseApi, TemplateStore};
use crate::utils::error::Result;

/// Normal results of a generation run. Skips are ordinary outcomes, not
/// errors; every failure path goes through `DocGenError` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated { file_name: String },
    NotApplicable,
    AlreadyGenerated,
}

impl GenerationOutcome {
    pub fn status_message(&self) -> &'static str {
        match self {
            GenerationOutcome::Generated { .. } => "Success",
            GenerationOutcome::NotApplicable => "Expense is not a per-diem.",
            GenerationOutcome::AlreadyGenerated => {
                "Custom per-diem form already generated for this expense."
            }
        }
    }
}

/// End-to-end per-diem document generation: fetch the expense, extract the
/// placeholder mapping, fill a copy of the template, export it as PDF and
/// attach it back to the expense.
pub struct DocumentGenerator<E, S> {
    expenses: E,
    store: S,
    extractor: FieldExtractor,
    regenerate_if_exists: bool,
}

impl<E, S> DocumentGenerator<E, S>
where
    E: ExpenseApi + EmployeeDirectory,
    S: TemplateStore,
{
    pub fn new(expenses: E, store: S, extractor: FieldExtractor, regenerate_if_exists: bool) -> Self {
        Self {
            expenses,
            store,
            extractor,
            regenerate_if_exists,
        }
    }

    pub async fn generate(&self, expense_id: u64) -> Result<GenerationOutcome> {
        let expense = self.expenses.get_expense(expense_id).await?;

        if expense.expense_type != PER_DIEM_TYPE {
            tracing::info!(
                "Expense {} has type {:?}, skipping",
                expense_id,
                expense.expense_type
            );
            return Ok(GenerationOutcome::NotApplicable);
        }

        // A reviewed per-diem always carries its receipt file; a second
        // file means a generated form is already attached.
        let attached_files = expense
            .document
            .as_ref()
            .map(|d| d.files.len())
            .unwrap_or(0);
        if !self.regenerate_if_exists && attached_files > 1 {
            tracing::info!("Expense {} already has a generated form, skipping", expense_id);
            return Ok(GenerationOutcome::AlreadyGenerated);
        }

        let workflow = self.expenses.get_workflow(expense_id).await?;

        tracing::info!("Extracting placeholder fields for expense {}", expense_id);
        let mapping = self
            .extractor
            .extract(&expense, &workflow, &self.expenses)
            .await?;

        let file_name = format!("Per_Diem_For_Expense_{}.docx", expense_id);

        tracing::info!("Copying template as {:?}", file_name);
        let file_id = self.store.copy_template(&file_name).await?;

        let content = self.store.fetch_content(&file_id).await?;
        let filled = template::fill_placeholders(&content, &mapping)?;
        self.store.put_content(&file_id, filled).await?;

        tracing::info!("Exporting {:?} as PDF", file_name);
        let pdf = self.store.export_pdf(&file_id).await?;

        let pdf_name = format!("Per_Diem_For_Expense_{}.pdf", expense_id);
        tracing::info!("Attaching {:?} to expense {}", pdf_name, expense_id);
        self.expenses
            .upload_document(expense_id, &pdf_name, pdf)
            .await?;

        Ok(GenerationOutcome::Generated {
            file_name: pdf_name,
        })
    }
}
