//! CSV downloads of the user's income and expenses.

use axum::{
    Extension,
    extract::{Query, State},
    response::Response,
};

use crate::{
    Error,
    api::TransactionFilter,
    auth::Session,
    csv_export::{csv_attachment, to_csv},
    transaction::{
        TransactionKind,
        transactions_page::{TransactionsState, fetch_sorted},
    },
};

/// Fetch, sort by recency and export the records of `kind`.
async fn download_transactions(
    state: TransactionsState,
    session: Session,
    kind: TransactionKind,
    filter: TransactionFilter,
) -> Result<Response, Error> {
    let transactions = fetch_sorted(state.api.as_ref(), &session, kind, &filter).await?;
    let csv = to_csv(&transactions)?;

    tracing::debug!(
        "exporting {} {kind} records for {}",
        transactions.len(),
        session.user.id
    );

    Ok(csv_attachment(kind.download_filename(), csv))
}

/// Download the user's income as a CSV file, newest first.
///
/// The rows are sorted by recency here, before export. [to_csv] itself keeps
/// whatever order it is given.
///
/// The optional `from` and `to` query parameters restrict the dates exported.
pub async fn download_income(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    download_transactions(state, session, TransactionKind::Income, filter).await
}

/// Download the user's expenses as a CSV file, newest first.
///
/// The rows are sorted by recency here, before export. [to_csv] itself keeps
/// whatever order it is given.
///
/// The optional `from` and `to` query parameters restrict the dates exported.
pub async fn download_expenses(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    download_transactions(state, session, TransactionKind::Expense, filter).await
}
