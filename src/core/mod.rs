pub mod dates;
pub mod extractor;
pub mod generator;
pub mod template;

pub use crate::domain::model::{ExpenseRecord, FieldMapping, WorkflowRecord};
pub use crate::domain::ports::{EmployeeDirectory, ExpenseApi, TemplateStore};
pub use crate::utils::error::Result;
