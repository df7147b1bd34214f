//! Pure aggregation of income and expense records for the dashboard.
//!
//! Every function here takes the records by reference and the current time as
//! an argument, and returns freshly allocated results. Nothing is cached.

use std::{cmp::Ordering, collections::HashMap};

use time::{Date, Duration, OffsetDateTime};

use crate::transaction::{Transaction, TransactionKind};

/// The number of days of expenses shown on the dashboard.
pub const EXPENSE_WINDOW_DAYS: i64 = 30;

/// The number of days of income shown on the dashboard.
pub const INCOME_WINDOW_DAYS: i64 = 60;

/// How many records of both kinds the "recent transactions" list shows.
pub(crate) const RECENT_TRANSACTIONS_COUNT: usize = 5;

/// How many records the dashboard lists for the expense window.
pub(crate) const RECENT_EXPENSES_COUNT: usize = 4;

/// How many records the dashboard lists for the income window.
pub(crate) const RECENT_INCOME_COUNT: usize = 5;

/// The summed amount for one category or source.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledAmount {
    /// The category or source, [crate::OTHERS_LABEL] for unlabelled records.
    pub label: String,
    /// The sum of the amounts with this label.
    pub amount: f64,
}

/// The records of one kind dated within a trailing window of days.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedTransactions {
    /// Which kind of record the window holds.
    pub kind: TransactionKind,
    /// The length of the window in days.
    pub days: i64,
    /// The records in the window, most recent first.
    pub transactions: Vec<Transaction>,
    /// The sums per label, in the order the labels first appear in the input.
    pub groups: Vec<LabelledAmount>,
    /// The sum of all amounts in the window.
    pub total: f64,
}

/// The numbers and series the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub total_balance: f64,
    /// The most recent records of either kind.
    pub recent: Vec<Transaction>,
    /// Expenses from the last [EXPENSE_WINDOW_DAYS] days.
    pub expenses: WindowedTransactions,
    /// Income from the last [INCOME_WINDOW_DAYS] days.
    pub income: WindowedTransactions,
}

/// Compute the dashboard summary for `transactions` as of `now`.
///
/// An empty slice gives zero totals and empty series.
pub fn summarize(transactions: &[Transaction], now: OffsetDateTime) -> DerivedSummary {
    let total_income = total(transactions, TransactionKind::Income);
    let total_expenses = total(transactions, TransactionKind::Expense);

    DerivedSummary {
        total_income,
        total_expenses,
        total_balance: total_income - total_expenses,
        recent: recent(transactions, None, RECENT_TRANSACTIONS_COUNT),
        expenses: windowed(
            transactions,
            TransactionKind::Expense,
            EXPENSE_WINDOW_DAYS,
            now,
        ),
        income: windowed(transactions, TransactionKind::Income, INCOME_WINDOW_DAYS, now),
    }
}

fn total(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Whether `date` lies within the `days` calendar days up to and including
/// `today`.
pub(crate) fn in_window(date: Date, today: Date, days: i64) -> bool {
    let start = today
        .checked_sub(Duration::days(days))
        .unwrap_or(Date::MIN);

    start <= date && date <= today
}

/// Get the records of `kind` dated from `days` days before `now` up to and
/// including `now`, ignoring the time of day.
pub fn windowed(
    transactions: &[Transaction],
    kind: TransactionKind,
    days: i64,
    now: OffsetDateTime,
) -> WindowedTransactions {
    let today = now.date();
    let in_range: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.kind == kind && in_window(transaction.date, today, days))
        .collect();

    let groups = group_by_label(in_range.iter().copied());
    let total = in_range.iter().map(|transaction| transaction.amount).sum();

    let mut transactions: Vec<Transaction> = in_range.into_iter().cloned().collect();
    transactions.sort_by(recency_order);

    WindowedTransactions {
        kind,
        days,
        transactions,
        groups,
        total,
    }
}

/// Sum the amounts per label in a single pass.
///
/// Labels appear in the order they are first seen, and records without a
/// label are summed under [crate::OTHERS_LABEL].
pub fn group_by_label<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<LabelledAmount> {
    let mut groups: Vec<LabelledAmount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        let label = transaction.label_or_default();

        match positions.get(label) {
            Some(&position) => groups[position].amount += transaction.amount,
            None => {
                positions.insert(label, groups.len());
                groups.push(LabelledAmount {
                    label: label.to_owned(),
                    amount: transaction.amount,
                });
            }
        }
    }

    groups
}

/// Orders records by date, newest first, then by creation time, newest
/// first, then by ID.
pub fn recency_order(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Get up to `count` of the most recent records, of one kind or of both when
/// `kind` is `None`.
pub fn recent(
    transactions: &[Transaction],
    kind: Option<TransactionKind>,
    count: usize,
) -> Vec<Transaction> {
    let mut matching: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| kind.is_none_or(|kind| transaction.kind == kind))
        .cloned()
        .collect();

    matching.sort_by(recency_order);
    matching.truncate(count);
    matching
}
