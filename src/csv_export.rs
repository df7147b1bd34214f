//! Exporting records as CSV files for download.

use axum::{
    http::{
        HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use time::format_description::well_known::Rfc3339;

use crate::{Error, transaction::Transaction};

/// The field names and values of a record, in the order they are exported.
///
/// Optional fields are only present when the record has a value for them.
fn export_fields(transaction: &Transaction) -> Vec<(&'static str, String)> {
    let mut fields = vec![("id", transaction.id.to_string())];

    if let Some(label) = &transaction.label {
        fields.push((transaction.kind.label_field(), label.clone()));
    }

    fields.push(("amount", transaction.amount.to_string()));
    fields.push(("date", transaction.date.to_string()));

    if let Some(icon) = &transaction.icon {
        fields.push(("icon", icon.clone()));
    }

    let created_at = transaction
        .created_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| transaction.created_at.to_string());
    fields.push(("created_at", created_at));

    fields
}

/// Serialise `transactions` as CSV.
///
/// The header row holds the field names of the first record. Every row has a
/// value for each header column, left empty when the record lacks that field.
/// Rows are written in the order given.
///
/// # Errors
///
/// Returns [Error::EmptyExport] if `transactions` is empty, or
/// [Error::CsvError] if the CSV writer fails.
pub fn to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let Some(first) = transactions.first() else {
        return Err(Error::EmptyExport);
    };

    let header: Vec<&'static str> = export_fields(first)
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;

    for transaction in transactions {
        let fields = export_fields(transaction);
        let row = header.iter().map(|column| {
            fields
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.as_str())
                .unwrap_or_default()
        });

        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// Wrap `csv` in a response that the browser saves as `filename`.
pub(crate) fn csv_attachment(filename: &str, csv: String) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response()
}
