use crate::domain::model::{ExpenseRecord, WorkflowRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Name resolution capability injected into the field extractor so it has
/// no network dependency of its own.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn display_name(&self, employee_id: &str) -> Result<String>;
}

/// Expense-management API boundary.
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    async fn get_expense(&self, expense_id: u64) -> Result<ExpenseRecord>;
    async fn get_workflow(&self, expense_id: u64) -> Result<WorkflowRecord>;
    async fn upload_document(&self, expense_id: u64, file_name: &str, pdf: Vec<u8>) -> Result<()>;
}

/// Cloud file store holding the trip order template.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Copies the configured template into the target folder under the
    /// given name and returns the new file's id.
    async fn copy_template(&self, new_name: &str) -> Result<String>;
    async fn fetch_content(&self, file_id: &str) -> Result<Vec<u8>>;
    async fn put_content(&self, file_id: &str, content: Vec<u8>) -> Result<()>;
    async fn export_pdf(&self, file_id: &str) -> Result<Vec<u8>>;
}
