//! Expense Tracker is a web app for keeping track of your income and expenses.
//!
//! This library serves HTML pages directly and stores its data through an
//! external REST backend. Everything the pages show (totals, trailing windows,
//! per-category groupings, recent activity and CSV exports) is derived in this
//! crate from the raw income and expense records.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod auth;
mod csv_export;
mod dashboard;
mod endpoints;
mod html;
mod icons;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use api::{ApiClient, HttpApiClient, InMemoryApiClient, TransactionFilter};
pub use app_state::AppState;
pub use auth::{Session, User};
pub use csv_export::to_csv;
pub use dashboard::{
    DerivedSummary, EXPENSE_WINDOW_DAYS, INCOME_WINDOW_DAYS, LabelledAmount, WindowedTransactions,
    group_by_label, recent, summarize, windowed,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    NewTransaction, OTHERS_LABEL, Transaction, TransactionForm, TransactionId, TransactionKind,
    ValidationError, remove_transaction,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user submitted a form with an invalid field.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// For deletes this means the record was already gone, so the client
    /// should refresh its view rather than retry.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The backend could not be reached or answered with an unexpected
    /// status. The string is the message to show the user.
    #[error("could not reach the backend: {0}")]
    Transport(String),

    /// The backend rejected the session token, or there is no session.
    #[error("the session is missing or has expired")]
    Unauthorized,

    /// The backend rejected the email and password at log-in.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A CSV export was requested for an empty collection.
    #[error("there are no records to export")]
    EmptyExport,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The CSV writer failed.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// The session cookie or backend session payload could not be decoded.
    #[error("invalid session: {0}")]
    InvalidSession(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        tracing::error!("request to the backend failed: {error}");

        let message = if error.is_timeout() {
            "The server took too long to respond.".to_owned()
        } else if error.is_connect() {
            "Could not connect to the server.".to_owned()
        } else if error.is_decode() {
            "The server sent a response that could not be read.".to_owned()
        } else {
            "The request to the server failed.".to_owned()
        };

        Error::Transport(message)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        tracing::error!("CSV error: {error}");
        Error::CsvError(error.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Unauthorized => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::Transport(message) => InternalServerError {
                description: "Could not load your data",
                fix: &format!("{message} Try again in a moment."),
            }
            .into_response(),
            Error::EmptyExport => InternalServerError {
                description: "Nothing to export",
                fix: "Add some records first, then try downloading again.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Validation(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid input".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::Transport(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not reach the server".to_owned(),
                    details: format!("{message} Check your connection and try again."),
                },
            ),
            Error::Unauthorized => {
                return (
                    HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                    StatusCode::OK,
                )
                    .into_response();
            }
            Error::EmptyExport => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Nothing to export".to_owned(),
                    details: "There are no records to download yet.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use axum_htmx::HX_REDIRECT;

    use crate::{Error, ValidationError, endpoints};

    #[test]
    fn unauthorized_page_redirects_to_log_in() {
        let response = Error::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_IN_VIEW
        );
    }

    #[test]
    fn unauthorized_alert_uses_hx_redirect() {
        let response = Error::Unauthorized.into_alert_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::LOG_IN_VIEW
        );
    }

    #[test]
    fn alert_status_codes() {
        let cases = [
            (
                Error::Validation(ValidationError::InvalidAmount("abc".to_owned())),
                StatusCode::BAD_REQUEST,
            ),
            (Error::NotFound, StatusCode::NOT_FOUND),
            (
                Error::Transport("Could not connect to the server.".to_owned()),
                StatusCode::BAD_GATEWAY,
            ),
            (Error::EmptyExport, StatusCode::BAD_REQUEST),
            (
                Error::CsvError("boom".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, want_status) in cases {
            let description = error.to_string();
            let response = error.into_alert_response();

            assert_eq!(
                response.status(),
                want_status,
                "unexpected status for error \"{description}\""
            );
        }
    }

    #[test]
    fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
