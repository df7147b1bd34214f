//! Defines the endpoints for adding income and expenses.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    auth::Session,
    transaction::{
        TransactionForm, TransactionKind,
        editor::create_transaction,
        transactions_page::TransactionsState,
        view::{FormError, transaction_form},
    },
};

async fn create_transaction_endpoint(
    state: TransactionsState,
    session: Session,
    kind: TransactionKind,
    form: TransactionForm,
) -> Response {
    match create_transaction(state.api.as_ref(), &session, kind, &form).await {
        Ok(_) => (
            HxRedirect(kind.view_endpoint().to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::Validation(error)) => {
            transaction_form(kind, &form, Some(&FormError::from(&error))).into_response()
        }
        Err(Error::Transport(message)) => {
            transaction_form(kind, &form, Some(&FormError::form(message))).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

/// A route handler for adding income, redirects to the income page on success.
///
/// Invalid input is answered with the form and an error message.
pub async fn create_income_endpoint(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionForm>,
) -> Response {
    create_transaction_endpoint(state, session, TransactionKind::Income, form).await
}

/// A route handler for adding an expense, redirects to the expenses page on success.
///
/// Invalid input is answered with the form and an error message.
pub async fn create_expense_endpoint(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionForm>,
) -> Response {
    create_transaction_endpoint(state, session, TransactionKind::Expense, form).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, Form, extract::State, http::StatusCode};
    use time::macros::date;

    use crate::{
        api::{ApiClient, InMemoryApiClient, TransactionFilter},
        auth::{Session, User},
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_redirect,
            must_get_form, parse_html_fragment,
        },
        transaction::{TransactionForm, TransactionKind, transactions_page::TransactionsState},
    };

    use super::{create_expense_endpoint, create_income_endpoint};

    const EMAIL: &str = "test@example.com";

    fn setup() -> (Arc<InMemoryApiClient>, TransactionsState, Session) {
        let api = Arc::new(InMemoryApiClient::new().with_user("Test", EMAIL, "password"));
        let session = api.open_session(EMAIL).unwrap();
        let state = TransactionsState { api: api.clone() };

        (api, state, session)
    }

    fn form(label: &str, amount: &str, date: &str) -> TransactionForm {
        TransactionForm {
            label: label.to_owned(),
            amount: amount.to_owned(),
            date: date.to_owned(),
            icon: String::new(),
        }
    }

    #[tokio::test]
    async fn can_create_income() {
        let (api, state, session) = setup();

        let response = create_income_endpoint(
            State(state),
            Extension(session.clone()),
            Form(form("Salary", "4200", "2025-06-01")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOME_VIEW);
        let stored = api
            .fetch_transactions(
                &session,
                TransactionKind::Income,
                &TransactionFilter::default(),
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].label.as_deref(), Some("Salary"));
        assert_eq!(stored[0].amount, 4200.0);
        assert_eq!(stored[0].date, date!(2025 - 06 - 01));
    }

    #[tokio::test]
    async fn invalid_amount_renders_form_with_error() {
        let (api, state, session) = setup();

        let response = create_expense_endpoint(
            State(state),
            Extension(session.clone()),
            Form(form("Rent", "-12", "")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "The amount cannot be negative, got -12");
        assert_form_input_with_value(&form, "amount", "number", "-12");
        let stored = api
            .fetch_transactions(
                &session,
                TransactionKind::Expense,
                &TransactionFilter::default(),
            )
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn invalid_date_renders_form_with_error() {
        let (_, state, session) = setup();

        let response = create_income_endpoint(
            State(state),
            Extension(session),
            Form(form("Salary", "10", "2025-02-30")),
        )
        .await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "\"2025-02-30\" is not a valid date, use the format YYYY-MM-DD",
        );
    }

    #[tokio::test]
    async fn expired_backend_session_redirects_to_log_in() {
        let (_, state, _) = setup();
        let stale_session = Session {
            user: User {
                id: "1".to_owned(),
                name: "Test".to_owned(),
                email: EMAIL.to_owned(),
            },
            token: "revoked".to_owned(),
        };

        let response = create_expense_endpoint(
            State(state),
            Extension(stale_session),
            Form(form("Rent", "12", "")),
        )
        .await;

        assert_hx_redirect(&response, endpoints::LOG_IN_VIEW);
    }
}
