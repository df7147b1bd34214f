//! Income and expense records.
//!
//! This module contains:
//! - The [Transaction] model and the validation of the add forms
//! - The record editor for creating and deleting records through the backend
//! - The income and expense pages with their create, delete and download endpoints

mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod download_endpoint;
mod editor;
mod form;
mod transactions_page;
mod view;

pub use core::{OTHERS_LABEL, Transaction, TransactionId, TransactionKind};
pub use create_transaction_endpoint::{create_expense_endpoint, create_income_endpoint};
pub use delete_transaction_endpoint::{delete_expense_endpoint, delete_income_endpoint};
pub use download_endpoint::{download_expenses, download_income};
pub use editor::{create_transaction, delete_transaction, remove_transaction};
pub use form::{NewTransaction, TransactionForm, ValidationError};
pub use transactions_page::{TransactionsState, get_expenses_page, get_income_page};

pub(crate) use form::parse_date;

#[cfg(test)]
pub(crate) use core::test_utils;
