//! An [ApiClient] that keeps everything in memory.
//!
//! Used as the backend for the `--demo` mode and as the fake backend in
//! handler tests. Passwords are compared as plain text, so this must never
//! stand in for a real backend.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::{Date, Duration, OffsetDateTime, macros::time};

use crate::{
    Error,
    api::{ApiClient, LogInCredentials, Registration, TransactionFilter},
    auth::{Session, User},
    dashboard::recency_order,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionKind, remove_transaction},
};

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<Account>,
    /// Maps session tokens to the index of the account in `accounts`.
    sessions: HashMap<String, usize>,
    next_id: u64,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn account_index(&self, session: &Session) -> Result<usize, Error> {
        self.sessions
            .get(&session.token)
            .copied()
            .ok_or(Error::Unauthorized)
    }

    fn open_session(&mut self, index: usize) -> Session {
        let token = format!("memory-token-{}", self.next_id());
        self.sessions.insert(token.clone(), index);

        Session {
            user: self.accounts[index].user.clone(),
            token,
        }
    }

    fn add_account(&mut self, name: &str, email: &str, password: &str) -> Result<usize, Error> {
        if self.accounts.iter().any(|account| account.user.email == email) {
            return Err(Error::Transport(format!(
                "An account with the email {email} already exists."
            )));
        }

        let id = self.next_id();
        self.accounts.push(Account {
            user: User {
                id: id.to_string(),
                name: name.to_owned(),
                email: email.to_owned(),
            },
            password: password.to_owned(),
            transactions: Vec::new(),
        });

        Ok(self.accounts.len() - 1)
    }
}

/// A backend that lives in the server's memory and is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryApiClient {
    state: Mutex<MemoryState>,
}

impl InMemoryApiClient {
    /// Create a backend with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account that can log in with `email` and `password`.
    ///
    /// Accounts with a duplicate email are ignored.
    pub fn with_user(self, name: &str, email: &str, password: &str) -> Self {
        if let Ok(mut state) = self.state.lock()
            && let Err(error) = state.add_account(name, email, password)
        {
            tracing::warn!("Could not add account: {error}");
        }

        self
    }

    /// Give the account with `email` the `transactions`.
    pub fn with_transactions(self, email: &str, transactions: Vec<Transaction>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            match state
                .accounts
                .iter_mut()
                .find(|account| account.user.email == email)
            {
                Some(account) => account.transactions.extend(transactions),
                None => tracing::warn!("No account with the email {email}"),
            }
        }

        self
    }

    /// A backend with one account, `demo@example.com` (password `demo`),
    /// that has a few weeks of sample records ending on `today`.
    pub fn demo(today: Date) -> Self {
        const EMAIL: &str = "demo@example.com";

        let samples: [(TransactionKind, &str, f64, i64, Option<&str>); 14] = [
            (TransactionKind::Income, "Salary", 4200.0, 2, Some("💼")),
            (TransactionKind::Income, "Affiliate Marketing", 310.5, 9, Some("📈")),
            (TransactionKind::Income, "Interest from Savings", 42.17, 20, Some("💰")),
            (TransactionKind::Income, "Salary", 4200.0, 33, Some("💼")),
            (TransactionKind::Income, "E-commerce Sales", 880.0, 51, Some("🛒")),
            (TransactionKind::Expense, "Rent", 1500.0, 1, None),
            (TransactionKind::Expense, "Food & Dining", 64.3, 3, None),
            (TransactionKind::Expense, "Transportation", 35.0, 4, None),
            (TransactionKind::Expense, "Food & Dining", 22.8, 7, None),
            (TransactionKind::Expense, "Bills & Utilities", 120.0, 12, None),
            (TransactionKind::Expense, "Entertainment", 45.0, 16, None),
            (TransactionKind::Expense, "Shopping", 210.99, 25, None),
            (TransactionKind::Expense, "Healthcare", 80.0, 40, None),
            (TransactionKind::Expense, "Rent", 1500.0, 31, None),
        ];

        let transactions = samples
            .into_iter()
            .enumerate()
            .map(|(index, (kind, label, amount, days_ago, icon))| {
                let date = today - Duration::days(days_ago);

                Transaction {
                    id: TransactionId::new(format!("demo-{}", index + 1)),
                    kind,
                    label: Some(label.to_owned()),
                    amount,
                    date,
                    created_at: OffsetDateTime::new_utc(date, time!(9:00)),
                    icon: icon.map(str::to_owned),
                }
            })
            .collect();

        Self::new()
            .with_user("Demo User", EMAIL, "demo")
            .with_transactions(EMAIL, transactions)
    }

    /// Start a session for the account with `email` without checking the
    /// password.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCredentials] if there is no such account.
    pub fn open_session(&self, email: &str) -> Result<Session, Error> {
        let mut state = self.lock()?;
        let index = state
            .accounts
            .iter()
            .position(|account| account.user.email == email)
            .ok_or(Error::InvalidCredentials)?;

        Ok(state.open_session(index))
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire in-memory backend lock: {error}"))
            .map_err(|_| Error::Transport("The server is unavailable.".to_owned()))
    }
}

#[async_trait]
impl ApiClient for InMemoryApiClient {
    async fn log_in(&self, credentials: &LogInCredentials) -> Result<Session, Error> {
        let mut state = self.lock()?;
        let index = state
            .accounts
            .iter()
            .position(|account| {
                account.user.email == credentials.email && account.password == credentials.password
            })
            .ok_or(Error::InvalidCredentials)?;

        Ok(state.open_session(index))
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Session, Error> {
        let mut state = self.lock()?;
        let index = state.add_account(
            &registration.name,
            &registration.email,
            &registration.password,
        )?;

        Ok(state.open_session(index))
    }

    async fn log_out(&self, session: &Session) -> Result<(), Error> {
        let mut state = self.lock()?;

        match state.sessions.remove(&session.token) {
            Some(_) => Ok(()),
            None => Err(Error::Unauthorized),
        }
    }

    async fn fetch_transactions(
        &self,
        session: &Session,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let state = self.lock()?;
        let index = state.account_index(session)?;

        let mut transactions: Vec<Transaction> = state.accounts[index]
            .transactions
            .iter()
            .filter(|transaction| transaction.kind == kind && filter.contains(transaction.date))
            .cloned()
            .collect();
        transactions.sort_by(recency_order);

        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        session: &Session,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        let mut state = self.lock()?;
        let index = state.account_index(session)?;
        let id = state.next_id();
        let created_at = OffsetDateTime::now_utc();

        let created = Transaction {
            id: TransactionId::new(id.to_string()),
            kind: transaction.kind(),
            label: Some(transaction.label().to_owned()),
            amount: transaction.amount(),
            date: transaction.date().unwrap_or(created_at.date()),
            created_at,
            icon: transaction.icon().map(str::to_owned),
        };
        state.accounts[index].transactions.push(created.clone());

        Ok(created)
    }

    async fn delete_transaction(
        &self,
        session: &Session,
        kind: TransactionKind,
        id: &TransactionId,
    ) -> Result<(), Error> {
        let mut state = self.lock()?;
        let index = state.account_index(session)?;
        let transactions = &mut state.accounts[index].transactions;

        if !transactions
            .iter()
            .any(|transaction| transaction.id == *id && transaction.kind == kind)
        {
            return Err(Error::NotFound);
        }

        remove_transaction(transactions, id).map(|_| ())
    }
}
