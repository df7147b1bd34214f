//! Creating and deleting records.
//!
//! Records are never edited in place. A change is sent to the backend and the
//! pages fetch the records again afterwards, so nothing derived is cached.

use crate::{
    Error,
    api::ApiClient,
    auth::Session,
    transaction::{Transaction, TransactionForm, TransactionId, TransactionKind},
};

/// Validate the submitted `form` and store the record with the backend.
///
/// # Errors
///
/// Returns [Error::Validation] if a field is invalid, in which case the
/// backend is not contacted. Otherwise returns whatever error the backend
/// call produced.
pub async fn create_transaction(
    api: &dyn ApiClient,
    session: &Session,
    kind: TransactionKind,
    form: &TransactionForm,
) -> Result<Transaction, Error> {
    let new_transaction = form.validate(kind).inspect_err(|error| {
        tracing::debug!("rejected {kind} form: {error}");
    })?;

    api.create_transaction(session, &new_transaction)
        .await
        .inspect_err(|error| tracing::error!("could not create {kind} record: {error}"))
}

/// Delete the record with `id` from the backend.
///
/// # Errors
///
/// Returns [Error::NotFound] if the backend has no such record, or the error
/// the backend call produced.
pub async fn delete_transaction(
    api: &dyn ApiClient,
    session: &Session,
    kind: TransactionKind,
    id: &TransactionId,
) -> Result<(), Error> {
    api.delete_transaction(session, kind, id)
        .await
        .inspect_err(|error| tracing::error!("could not delete {kind} record {id}: {error}"))
}

/// Remove the record with `id` from `transactions` and return it.
///
/// # Errors
///
/// Returns [Error::NotFound] if no record has the ID. `transactions` is left
/// unchanged in that case.
pub fn remove_transaction(
    transactions: &mut Vec<Transaction>,
    id: &TransactionId,
) -> Result<Transaction, Error> {
    let index = transactions
        .iter()
        .position(|transaction| transaction.id == *id)
        .ok_or(Error::NotFound)?;

    Ok(transactions.remove(index))
}
