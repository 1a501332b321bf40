use crate::core::generator::DocumentGenerator;
use crate::domain::ports::{EmployeeDirectory, ExpenseApi, TemplateStore};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Webhook delivery body; only `payload.expenseId` is consumed.
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub payload: Option<WebhookPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default)]
    pub expense_id: Option<u64>,
}

pub fn router<E, S>(generator: Arc<DocumentGenerator<E, S>>) -> Router
where
    E: ExpenseApi + EmployeeDirectory + 'static,
    S: TemplateStore + 'static,
{
    Router::new()
        .route("/payhawk-webhook", post(handle_webhook::<E, S>))
        .with_state(generator)
}

async fn handle_webhook<E, S>(
    State(generator): State<Arc<DocumentGenerator<E, S>>>,
    Json(body): Json<WebhookBody>,
) -> (StatusCode, String)
where
    E: ExpenseApi + EmployeeDirectory + 'static,
    S: TemplateStore + 'static,
{
    let Some(expense_id) = body.payload.as_ref().and_then(|p| p.expense_id) else {
        return (
            StatusCode::BAD_REQUEST,
            "No expense id found in webhook payload".to_string(),
        );
    };

    tracing::info!("Webhook received for expense {}", expense_id);

    match generator.generate(expense_id).await {
        Ok(outcome) => {
            tracing::info!("Expense {}: {}", expense_id, outcome.status_message());
            (StatusCode::OK, outcome.status_message().to_string())
        }
        Err(e) => {
            tracing::error!("Generation failed for expense {}: {}", expense_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Exception: {}", e))
        }
    }
}
