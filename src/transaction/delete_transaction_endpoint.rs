use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    auth::Session,
    transaction::{
        TransactionId, TransactionKind, editor::delete_transaction,
        transactions_page::TransactionsState,
    },
};

async fn delete_transaction_endpoint(
    state: TransactionsState,
    session: Session,
    kind: TransactionKind,
    id: TransactionId,
) -> Response {
    match delete_transaction(state.api.as_ref(), &session, kind, &id).await {
        // The status code has to be 200 OK or htmx will not remove the table row.
        Ok(()) => Alert::Success {
            message: format!("Deleted {}", kind.display_name().to_lowercase()),
            details: String::new(),
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// A route handler for deleting income.
///
/// On success the table row is replaced with nothing and a success alert is shown.
pub async fn delete_income_endpoint(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    delete_transaction_endpoint(state, session, TransactionKind::Income, transaction_id).await
}

/// A route handler for deleting an expense.
///
/// On success the table row is replaced with nothing and a success alert is shown.
pub async fn delete_expense_endpoint(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    delete_transaction_endpoint(state, session, TransactionKind::Expense, transaction_id).await
}
