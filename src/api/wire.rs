//! Conversion between the backend's JSON and the crate's types.
//!
//! The backend is loose about its response shapes: lists may be bare arrays
//! or wrapped in an object, records use `_id`, and dates may be plain dates
//! or full RFC 3339 timestamps. Everything is normalised here so that the
//! rest of the crate only sees valid [Transaction]s.

use serde::Deserialize;
use serde_json::{Map, Value};
use time::{OffsetDateTime, Time, format_description::well_known::Rfc3339};

use crate::{
    Error,
    auth::{Session, User},
    transaction::{
        NewTransaction, Transaction, TransactionId, TransactionKind, ValidationError, parse_date,
    },
};

/// The keys a list of records or a single record may be nested under.
const ENVELOPE_KEYS: [&str; 6] = ["data", "incomes", "expenses", "income", "expense", "transactions"];

/// A record exactly as the backend sends it.
///
/// Mongo-backed APIs send `_id`, and often a virtual `id` as well, so both
/// keys are read separately and `id` wins when they are both present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWireTransaction {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    source: Option<String>,
    amount: f64,
    date: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

/// A record from the backend with its ID resolved.
#[derive(Debug, Deserialize)]
#[serde(try_from = "RawWireTransaction")]
pub(super) struct WireTransaction {
    id: String,
    category: Option<String>,
    source: Option<String>,
    amount: f64,
    date: String,
    created_at: Option<String>,
    icon: Option<String>,
}

impl TryFrom<RawWireTransaction> for WireTransaction {
    type Error = String;

    fn try_from(raw: RawWireTransaction) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.mongo_id)
            .ok_or_else(|| "the record has neither an `id` nor an `_id`".to_owned())?;

        Ok(Self {
            id,
            category: raw.category,
            source: raw.source,
            amount: raw.amount,
            date: raw.date,
            created_at: raw.created_at,
            icon: raw.icon,
        })
    }
}

impl WireTransaction {
    /// Check the record against the crate's invariants.
    ///
    /// # Errors
    ///
    /// Returns a [ValidationError] for negative or non-finite amounts and
    /// for dates that are neither RFC 3339 timestamps nor YYYY-MM-DD.
    pub(super) fn into_transaction(
        self,
        kind: TransactionKind,
    ) -> Result<Transaction, ValidationError> {
        if !self.amount.is_finite() {
            return Err(ValidationError::InvalidAmount(self.amount.to_string()));
        }

        if self.amount < 0.0 {
            return Err(ValidationError::NegativeAmount(self.amount));
        }

        let date = match OffsetDateTime::parse(&self.date, &Rfc3339) {
            Ok(timestamp) => timestamp.to_offset(time::UtcOffset::UTC).date(),
            Err(_) => parse_date(&self.date)?,
        };

        let created_at = self
            .created_at
            .as_deref()
            .and_then(|created_at| OffsetDateTime::parse(created_at, &Rfc3339).ok())
            .unwrap_or_else(|| OffsetDateTime::new_utc(date, Time::MIDNIGHT));

        // The dashboard endpoint of some backends labels income by category.
        let label = match kind {
            TransactionKind::Income => self.source.or(self.category),
            TransactionKind::Expense => self.category.or(self.source),
        }
        .filter(|label| !label.trim().is_empty());

        Ok(Transaction {
            id: TransactionId::new(self.id),
            kind,
            label,
            amount: self.amount + 0.0,
            date,
            created_at,
            icon: self.icon.filter(|icon| !icon.is_empty()),
        })
    }
}

/// Parse the body of a list request, dropping records that are malformed or
/// break the crate's invariants.
///
/// # Errors
///
/// Returns [Error::Transport] if the body does not contain a list at all.
pub(super) fn parse_transaction_list(
    body: Value,
    kind: TransactionKind,
) -> Result<Vec<Transaction>, Error> {
    let records = record_array(body).ok_or_else(|| {
        tracing::error!("the backend's {kind} list response did not contain an array");
        Error::Transport("The server sent a response that could not be read.".to_owned())
    })?;

    let transactions = records
        .into_iter()
        .filter_map(|record| parse_record(record, kind))
        .collect();

    Ok(transactions)
}

fn parse_record(record: Value, kind: TransactionKind) -> Option<Transaction> {
    let wire: WireTransaction = match serde_json::from_value(record) {
        Ok(wire) => wire,
        Err(error) => {
            tracing::warn!("Dropping malformed {kind} record: {error}");
            return None;
        }
    };

    let id = wire.id.clone();

    match wire.into_transaction(kind) {
        Ok(transaction) => Some(transaction),
        Err(error) => {
            tracing::warn!("Dropping invalid {kind} record {id}: {error}");
            None
        }
    }
}

fn record_array(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(records) => Some(records),
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| map.remove(*key))
            .and_then(record_array),
        _ => None,
    }
}

/// Parse the body of a create request, which is either the new record or
/// the record wrapped in an envelope.
///
/// # Errors
///
/// Returns [Error::Transport] if no valid record can be found.
pub(super) fn parse_created_transaction(
    body: Value,
    kind: TransactionKind,
) -> Result<Transaction, Error> {
    record_object(body)
        .and_then(|record| parse_record(Value::Object(record), kind))
        .ok_or_else(|| {
            tracing::error!("the backend's response to creating a {kind} record was not a record");
            Error::Transport("The server sent a response that could not be read.".to_owned())
        })
}

fn record_object(body: Value) -> Option<Map<String, Value>> {
    match body {
        Value::Object(map) if map.contains_key("_id") || map.contains_key("id") => Some(map),
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| map.remove(*key))
            .and_then(record_object),
        _ => None,
    }
}

/// The JSON body for creating a record. Unset optional fields are omitted so
/// the backend applies its own defaults.
pub(super) fn new_transaction_payload(transaction: &NewTransaction) -> Value {
    let mut payload = Map::new();

    payload.insert(
        transaction.kind().label_field().to_owned(),
        Value::from(transaction.label()),
    );
    payload.insert("amount".to_owned(), Value::from(transaction.amount()));

    if let Some(date) = transaction.date() {
        payload.insert("date".to_owned(), Value::from(date.to_string()));
    }

    if let Some(icon) = transaction.icon() {
        payload.insert("icon".to_owned(), Value::from(icon));
    }

    Value::Object(payload)
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "fullName", default)]
    full_name: Option<String>,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    #[serde(default)]
    token: String,
    #[serde(default)]
    user: Option<WireUser>,
}

/// Parse the body of a log-in or sign-up response.
///
/// `email` fills in the user's email if the backend does not echo it back.
///
/// # Errors
///
/// Returns [Error::InvalidSession] if the body has no token.
pub(super) fn parse_session(body: Value, email: &str) -> Result<Session, Error> {
    let wire: WireSession = serde_json::from_value(body).map_err(|error| {
        tracing::error!("could not parse session from the backend: {error}");
        Error::InvalidSession(error.to_string())
    })?;

    if wire.token.is_empty() {
        tracing::error!("the backend did not send a token");
        return Err(Error::InvalidSession("missing token".to_owned()));
    }

    let user = match wire.user {
        Some(user) => User {
            id: user.id.or(user.mongo_id).unwrap_or_default(),
            name: user.name.or(user.full_name).unwrap_or_default(),
            email: if user.email.is_empty() {
                email.to_owned()
            } else {
                user.email
            },
        },
        None => User {
            id: String::new(),
            name: String::new(),
            email: email.to_owned(),
        },
    };

    Ok(Session {
        user,
        token: wire.token,
    })
}

/// Get the human readable `message` from an error body, if there is one.
pub(super) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        transaction::{NewTransaction, TransactionId, TransactionKind, ValidationError},
    };

    use super::{
        WireTransaction, error_message, new_transaction_payload, parse_created_transaction,
        parse_session, parse_transaction_list,
    };

    #[test]
    fn parses_mongo_style_record() {
        let body = json!({
            "_id": "65a1",
            "category": "Rent",
            "amount": 1200,
            "date": "2025-01-05T00:00:00.000Z",
            "createdAt": "2025-01-06T10:30:00.000Z",
        });
        let wire: WireTransaction = serde_json::from_value(body).unwrap();

        let got = wire.into_transaction(TransactionKind::Expense).unwrap();

        assert_eq!(got.id, TransactionId::new("65a1"));
        assert_eq!(got.label.as_deref(), Some("Rent"));
        assert_eq!(got.amount, 1200.0);
        assert_eq!(got.date, date!(2025 - 01 - 05));
        assert_eq!(got.created_at, datetime!(2025-01-06 10:30:00 UTC));
    }

    #[test]
    fn plain_date_and_missing_created_at() {
        let body = json!({ "id": "1", "source": "Salary", "amount": 10.5, "date": "2025-02-01" });
        let wire: WireTransaction = serde_json::from_value(body).unwrap();

        let got = wire.into_transaction(TransactionKind::Income).unwrap();

        assert_eq!(got.date, date!(2025 - 02 - 01));
        assert_eq!(got.created_at, datetime!(2025-02-01 00:00:00 UTC));
    }

    #[test]
    fn income_falls_back_to_category_label() {
        let body = json!({ "_id": "1", "category": "Salary", "amount": 1, "date": "2025-02-01" });
        let wire: WireTransaction = serde_json::from_value(body).unwrap();

        let got = wire.into_transaction(TransactionKind::Income).unwrap();

        assert_eq!(got.label.as_deref(), Some("Salary"));
    }

    #[test]
    fn rejects_negative_amount() {
        let body = json!({ "_id": "1", "category": "Rent", "amount": -3, "date": "2025-02-01" });
        let wire: WireTransaction = serde_json::from_value(body).unwrap();

        let got = wire.into_transaction(TransactionKind::Expense);

        assert_eq!(got, Err(ValidationError::NegativeAmount(-3.0)));
    }

    #[test]
    fn list_accepts_bare_and_wrapped_arrays() {
        let record = json!({ "_id": "1", "source": "Salary", "amount": 1, "date": "2025-02-01" });
        let bodies = [
            json!([record.clone()]),
            json!({ "data": [record.clone()] }),
            json!({ "incomes": [record.clone()] }),
            json!({ "data": { "incomes": [record.clone()] } }),
        ];

        for body in bodies {
            let got = parse_transaction_list(body.clone(), TransactionKind::Income).unwrap();

            assert_eq!(got.len(), 1, "could not parse {body}");
        }
    }

    #[test]
    fn list_drops_invalid_records() {
        let body = json!([
            { "_id": "1", "category": "Rent", "amount": 5, "date": "2025-02-01" },
            { "_id": "2", "category": "Rent", "amount": -5, "date": "2025-02-01" },
            { "_id": "3", "category": "Rent", "date": "2025-02-01" },
            { "_id": "4", "category": "Rent", "amount": 5, "date": "not a date" },
        ]);

        let got = parse_transaction_list(body, TransactionKind::Expense).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, TransactionId::new("1"));
    }

    #[test]
    fn record_with_both_id_keys_is_kept() {
        let body = json!([
            { "_id": "65a1", "id": "65a1", "category": "Rent", "amount": 5, "date": "2025-02-01" },
        ]);

        let got = parse_transaction_list(body, TransactionKind::Expense).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, TransactionId::new("65a1"));
    }

    #[test]
    fn plain_id_is_preferred_over_mongo_id() {
        let body = json!({
            "_id": "mongo",
            "id": "plain",
            "category": "Rent",
            "amount": 5,
            "date": "2025-02-01",
        });
        let wire: WireTransaction = serde_json::from_value(body).unwrap();

        let got = wire.into_transaction(TransactionKind::Expense).unwrap();

        assert_eq!(got.id, TransactionId::new("plain"));
    }

    #[test]
    fn negative_zero_amount_is_normalised() {
        let body = json!({ "_id": "1", "category": "Rent", "amount": -0.0, "date": "2025-02-01" });
        let wire: WireTransaction = serde_json::from_value(body).unwrap();

        let got = wire.into_transaction(TransactionKind::Expense).unwrap();

        assert!(got.amount.is_sign_positive());
    }

    #[test]
    fn record_without_any_id_is_dropped() {
        let body = json!([
            { "category": "Rent", "amount": 5, "date": "2025-02-01" },
            { "id": "2", "category": "Food", "amount": 3, "date": "2025-02-01" },
        ]);

        let got = parse_transaction_list(body, TransactionKind::Expense).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, TransactionId::new("2"));
    }

    #[test]
    fn session_user_may_carry_duplicate_keys() {
        let body = json!({
            "token": "abc",
            "user": { "_id": "1", "id": "1", "name": "Ada", "fullName": "Ada Lovelace" },
        });

        let got = parse_session(body, "ada@example.com").unwrap();

        assert_eq!(got.user.id, "1");
        assert_eq!(got.user.name, "Ada");
    }

    #[test]
    fn list_without_array_is_transport_error() {
        let got = parse_transaction_list(json!({ "message": "ok" }), TransactionKind::Expense);

        assert!(matches!(got, Err(Error::Transport(_))));
    }

    #[test]
    fn created_record_may_be_wrapped() {
        let body = json!({
            "message": "Income added",
            "income": { "_id": "9", "source": "Gift", "amount": 20, "date": "2025-03-01" },
        });

        let got = parse_created_transaction(body, TransactionKind::Income).unwrap();

        assert_eq!(got.id, TransactionId::new("9"));
    }

    #[test]
    fn payload_uses_kind_specific_label_field() {
        let expense = NewTransaction::new(TransactionKind::Expense, "Rent", 5.0)
            .unwrap()
            .with_date(Some(date!(2025 - 03 - 01)));
        let income = NewTransaction::new(TransactionKind::Income, "Salary", 10.0)
            .unwrap()
            .with_icon(Some("💼".to_owned()));

        assert_eq!(
            new_transaction_payload(&expense),
            json!({ "category": "Rent", "amount": 5.0, "date": "2025-03-01" })
        );
        assert_eq!(
            new_transaction_payload(&income),
            json!({ "source": "Salary", "amount": 10.0, "icon": "💼" })
        );
    }

    #[test]
    fn session_requires_token() {
        let got = parse_session(json!({ "user": { "_id": "1" } }), "a@example.com");

        assert!(matches!(got, Err(Error::InvalidSession(_))));
    }

    #[test]
    fn session_fills_in_missing_email() {
        let body = json!({ "token": "abc", "user": { "_id": "1", "fullName": "Ada" } });

        let got = parse_session(body, "ada@example.com").unwrap();

        assert_eq!(got.token, "abc");
        assert_eq!(got.user.name, "Ada");
        assert_eq!(got.user.email, "ada@example.com");
    }

    #[test]
    fn reads_error_message() {
        assert_eq!(
            error_message(r#"{"message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_owned())
        );
        assert_eq!(error_message("<html>"), None);
    }
}
