//! The client for the REST backend that stores users and records.
//!
//! Handlers talk to the backend through the [ApiClient] trait so that tests
//! and the demo mode can swap in [InMemoryApiClient] for [HttpApiClient].

mod http;
mod memory;
mod wire;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::Session,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionKind},
};

pub use http::HttpApiClient;
pub use memory::InMemoryApiClient;

/// The email and password entered on the log-in page.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInCredentials {
    /// The email the user registered with.
    pub email: String,
    /// The plain text password, only ever forwarded to the backend.
    pub password: String,
}

/// The details entered on the sign-up page.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    /// The user's display name.
    pub name: String,
    /// The email the user will log in with.
    pub email: String,
    /// The plain text password, only ever forwarded to the backend.
    pub password: String,
}

/// Restricts a fetch to records dated within an inclusive range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionFilter {
    /// The earliest date to include.
    #[serde(default)]
    pub from: Option<Date>,
    /// The latest date to include.
    #[serde(default)]
    pub to: Option<Date>,
}

impl TransactionFilter {
    /// Whether `date` lies within the filter's bounds.
    pub fn contains(&self, date: Date) -> bool {
        self.from.is_none_or(|from| from <= date) && self.to.is_none_or(|to| date <= to)
    }

    /// The filter as URL query parameters, omitting unset bounds.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }

        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }

        pairs
    }
}

/// The operations the app needs from the backend.
///
/// Every call that needs an authenticated user takes the [Session] explicitly.
/// Errors follow the crate's [Error] taxonomy: [Error::Unauthorized] when the
/// backend rejects the token, [Error::NotFound] when a record does not exist
/// and [Error::Transport] for everything else that went wrong on the way.
#[async_trait]
pub trait ApiClient: Debug + Send + Sync {
    /// Exchange an email and password for a session.
    async fn log_in(&self, credentials: &LogInCredentials) -> Result<Session, Error>;

    /// Create an account and return a session for it.
    async fn sign_up(&self, registration: &Registration) -> Result<Session, Error>;

    /// Tell the backend to forget the session's token.
    async fn log_out(&self, session: &Session) -> Result<(), Error>;

    /// Get the user's records of one kind.
    ///
    /// Records that do not satisfy the crate's invariants, such as negative
    /// amounts, are dropped and logged rather than failing the whole fetch.
    async fn fetch_transactions(
        &self,
        session: &Session,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error>;

    /// Store a new record and return it as the backend saved it.
    async fn create_transaction(
        &self,
        session: &Session,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Delete one record.
    async fn delete_transaction(
        &self,
        session: &Session,
        kind: TransactionKind,
        id: &TransactionId,
    ) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::TransactionFilter;

    #[test]
    fn filter_bounds_are_inclusive() {
        let filter = TransactionFilter {
            from: Some(date!(2025 - 01 - 10)),
            to: Some(date!(2025 - 01 - 20)),
        };

        assert!(filter.contains(date!(2025 - 01 - 10)));
        assert!(filter.contains(date!(2025 - 01 - 20)));
        assert!(!filter.contains(date!(2025 - 01 - 09)));
        assert!(!filter.contains(date!(2025 - 01 - 21)));
    }

    #[test]
    fn default_filter_contains_everything() {
        assert!(TransactionFilter::default().contains(date!(1970 - 01 - 01)));
        assert!(TransactionFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn query_pairs_use_iso_dates() {
        let filter = TransactionFilter {
            from: Some(date!(2025 - 01 - 02)),
            to: None,
        };

        assert_eq!(filter.query_pairs(), vec![("from", "2025-01-02".to_owned())]);
    }
}
