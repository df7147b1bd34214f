//! Defines the core data models for income and expense records.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{endpoints, icons};

/// The label used for records without a category or source.
pub const OTHERS_LABEL: &str = "Others";

/// Whether a record is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, labelled by its source.
    Income,
    /// Money spent, labelled by its category.
    Expense,
}

impl TransactionKind {
    /// The name of the field that holds the label on the wire and in CSV
    /// exports.
    pub fn label_field(self) -> &'static str {
        match self {
            TransactionKind::Income => "source",
            TransactionKind::Expense => "category",
        }
    }

    /// The path segment the backend uses for this kind, e.g. `/expense/get`.
    pub fn api_path(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// A human readable name, e.g. for page titles.
    pub fn display_name(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expenses",
        }
    }

    pub(crate) fn view_endpoint(self) -> &'static str {
        match self {
            TransactionKind::Income => endpoints::INCOME_VIEW,
            TransactionKind::Expense => endpoints::EXPENSES_VIEW,
        }
    }

    pub(crate) fn create_endpoint(self) -> &'static str {
        match self {
            TransactionKind::Income => endpoints::INCOME_API,
            TransactionKind::Expense => endpoints::EXPENSES_API,
        }
    }

    pub(crate) fn delete_endpoint(self) -> &'static str {
        match self {
            TransactionKind::Income => endpoints::DELETE_INCOME,
            TransactionKind::Expense => endpoints::DELETE_EXPENSE,
        }
    }

    pub(crate) fn download_endpoint(self) -> &'static str {
        match self {
            TransactionKind::Income => endpoints::INCOME_DOWNLOAD,
            TransactionKind::Expense => endpoints::EXPENSES_DOWNLOAD,
        }
    }

    pub(crate) fn download_filename(self) -> &'static str {
        match self {
            TransactionKind::Income => "income_details.csv",
            TransactionKind::Expense => "expense_details.csv",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_path())
    }
}

/// The opaque identifier the backend assigns to a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap a backend identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent to and from the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single income or expense record as received from the backend.
///
/// Records are read-only in this crate: they are never edited in place, only
/// created and deleted through the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID the backend assigned to the record.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The category (expenses) or source (income), if any.
    pub label: Option<String>,
    /// The amount of money, always finite and non-negative.
    pub amount: f64,
    /// The day the record is attributed to.
    pub date: Date,
    /// When the record was stored by the backend.
    pub created_at: OffsetDateTime,
    /// The glyph the user picked for the record, if any.
    pub icon: Option<String>,
}

impl Transaction {
    /// The label, or [OTHERS_LABEL] when the record has none.
    pub fn label_or_default(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => OTHERS_LABEL,
        }
    }

    /// The amount with the sign used for display: expenses are negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The user's chosen icon, falling back to the icon for the label.
    pub fn display_icon(&self) -> &str {
        match self.icon.as_deref() {
            Some(icon) if !icon.is_empty() => icon,
            _ => icons::icon_for(self.label_or_default()),
        }
    }
}


#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{OTHERS_LABEL, TransactionKind, test_utils::transaction};

    #[test]
    fn missing_label_falls_back_to_others() {
        let record = transaction("1", TransactionKind::Expense, None, 5.0, date!(2025 - 01 - 01));

        assert_eq!(record.label_or_default(), OTHERS_LABEL);
    }

    #[test]
    fn blank_label_falls_back_to_others() {
        let record = transaction(
            "1",
            TransactionKind::Expense,
            Some("   "),
            5.0,
            date!(2025 - 01 - 01),
        );

        assert_eq!(record.label_or_default(), OTHERS_LABEL);
    }

    #[test]
    fn expenses_are_negative_for_display() {
        let expense = transaction(
            "1",
            TransactionKind::Expense,
            Some("Rent"),
            500.0,
            date!(2025 - 01 - 01),
        );
        let income = transaction(
            "2",
            TransactionKind::Income,
            Some("Salary"),
            900.0,
            date!(2025 - 01 - 01),
        );

        assert_eq!(expense.signed_amount(), -500.0);
        assert_eq!(income.signed_amount(), 900.0);
    }

    #[test]
    fn chosen_icon_takes_precedence() {
        let mut record = transaction(
            "1",
            TransactionKind::Income,
            Some("Salary"),
            1.0,
            date!(2025 - 01 - 01),
        );
        assert_eq!(record.display_icon(), "💼");

        record.icon = Some("🎁".to_owned());
        assert_eq!(record.display_icon(), "🎁");
    }

    #[test]
    fn unknown_label_uses_fallback_icon() {
        let record = transaction(
            "1",
            TransactionKind::Expense,
            Some("Gadgets"),
            1.0,
            date!(2025 - 01 - 01),
        );

        assert_eq!(record.display_icon(), "📝");
    }
}
