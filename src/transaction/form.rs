//! Validation of the add-income and add-expense forms.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::transaction::TransactionKind;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Why a form field was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The amount is not a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The amount is a number below zero.
    #[error("the amount cannot be negative, got {0}")]
    NegativeAmount(f64),

    /// The date is not a calendar date in the form YYYY-MM-DD.
    #[error("\"{0}\" is not a valid date, use the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The category or source is empty. Holds the name of the field.
    #[error("the {0} cannot be empty")]
    EmptyLabel(&'static str),
}

impl ValidationError {
    /// The name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidAmount(_) | ValidationError::NegativeAmount(_) => "amount",
            ValidationError::InvalidDate(_) => "date",
            ValidationError::EmptyLabel(field) => field,
        }
    }
}

/// The raw fields submitted by the add-income or add-expense form.
///
/// The label is submitted as `source` for income and `category` for
/// expenses. Fields are kept as strings so that bad input can be echoed back
/// with an error message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The category or source.
    #[serde(alias = "source", alias = "category", default)]
    pub label: String,
    /// The amount as typed by the user.
    #[serde(default)]
    pub amount: String,
    /// An optional date in the form YYYY-MM-DD.
    #[serde(default)]
    pub date: String,
    /// An optional glyph from the icon picker.
    #[serde(default)]
    pub icon: String,
}

impl TransactionForm {
    /// Check every field and build the payload for the backend.
    ///
    /// # Errors
    ///
    /// Returns the first [ValidationError] found, checking the label, then
    /// the amount, then the date.
    pub fn validate(&self, kind: TransactionKind) -> Result<NewTransaction, ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::EmptyLabel(kind.label_field()));
        }

        let amount = parse_amount(&self.amount)?;
        let new_transaction = NewTransaction::new(kind, &self.label, amount)?;

        let date = match self.date.trim() {
            "" => None,
            date => Some(parse_date(date)?),
        };

        let icon = match self.icon.trim() {
            "" => None,
            icon => Some(icon.to_owned()),
        };

        Ok(new_transaction.with_date(date).with_icon(icon))
    }
}

fn parse_amount(text: &str) -> Result<f64, ValidationError> {
    let text = text.trim();

    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ValidationError::InvalidAmount(text.to_owned())),
    }
}

/// Parse a date in the form YYYY-MM-DD.
pub(crate) fn parse_date(text: &str) -> Result<Date, ValidationError> {
    Date::parse(text, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// A validated record ready to be sent to the backend.
///
/// The backend fills in the ID and creation time, and uses today's date if
/// `date` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    kind: TransactionKind,
    label: String,
    amount: f64,
    date: Option<Date>,
    icon: Option<String>,
}

impl NewTransaction {
    /// Create a record with a trimmed, non-empty `label` and a finite,
    /// non-negative `amount`.
    ///
    /// # Errors
    ///
    /// Returns [ValidationError::EmptyLabel] for a blank label,
    /// [ValidationError::InvalidAmount] for NaN or infinite amounts and
    /// [ValidationError::NegativeAmount] for amounts below zero.
    pub fn new(kind: TransactionKind, label: &str, amount: f64) -> Result<Self, ValidationError> {
        let label = label.trim();

        if label.is_empty() {
            return Err(ValidationError::EmptyLabel(kind.label_field()));
        }

        if !amount.is_finite() {
            return Err(ValidationError::InvalidAmount(amount.to_string()));
        }

        if amount < 0.0 {
            return Err(ValidationError::NegativeAmount(amount));
        }

        Ok(Self {
            kind,
            label: label.to_owned(),
            // "-0" parses to -0.0, which passes the sign check but prints as "-0".
            amount: amount + 0.0,
            date: None,
            icon: None,
        })
    }

    /// Set the date the record is attributed to.
    pub fn with_date(mut self, date: Option<Date>) -> Self {
        self.date = date;
        self
    }

    /// Set the glyph shown next to the record.
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    /// Whether this is income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The trimmed category or source.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The non-negative amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The date, if one was given.
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// The icon, if one was chosen.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}
