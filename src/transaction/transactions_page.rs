//! The pages listing the user's income and expenses.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    api::{ApiClient, TransactionFilter},
    auth::Session,
    dashboard::{
        DashboardChart, expense_trend_chart, group_by_label, income_overview_chart,
        recency_order,
    },
    transaction::{Transaction, TransactionKind, view::transactions_view},
};

/// The state needed by the income and expense pages and their endpoints.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The backend that stores the records.
    pub api: Arc<dyn ApiClient>,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// Fetch every record of `kind`, newest first.
pub(crate) async fn fetch_sorted(
    api: &dyn ApiClient,
    session: &Session,
    kind: TransactionKind,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, Error> {
    let mut transactions = api
        .fetch_transactions(session, kind, filter)
        .await
        .inspect_err(|error| tracing::error!("could not fetch {kind} records: {error}"))?;
    transactions.sort_by(recency_order);

    Ok(transactions)
}

fn page_chart(kind: TransactionKind, transactions: &[Transaction]) -> Option<DashboardChart> {
    if transactions.is_empty() {
        return None;
    }

    let chart = match kind {
        TransactionKind::Income => {
            DashboardChart::new("income-chart", income_overview_chart(&group_by_label(transactions)))
        }
        TransactionKind::Expense => {
            let oldest_first: Vec<Transaction> = transactions.iter().rev().cloned().collect();
            DashboardChart::new("expense-chart", expense_trend_chart(&oldest_first))
        }
    };

    Some(chart)
}

async fn get_transactions_page(
    state: TransactionsState,
    session: Session,
    kind: TransactionKind,
) -> Result<Response, Error> {
    let transactions = fetch_sorted(
        state.api.as_ref(),
        &session,
        kind,
        &TransactionFilter::default(),
    )
    .await?;
    let chart = page_chart(kind, &transactions);

    Ok(transactions_view(kind, session.display_name(), &transactions, chart).into_response())
}

/// Display the user's income with a chart per source and a form for adding more.
pub async fn get_income_page(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    get_transactions_page(state, session, TransactionKind::Income).await
}

/// Display the user's expenses with a chart over time and a form for adding more.
pub async fn get_expenses_page(
    State(state): State<TransactionsState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    get_transactions_page(state, session, TransactionKind::Expense).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        api::InMemoryApiClient,
        auth::Session,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::test_utils::{expense, income},
    };

    use super::{TransactionsState, get_expenses_page, get_income_page};

    const EMAIL: &str = "test@example.com";

    fn state_and_session(api: InMemoryApiClient) -> (TransactionsState, Session) {
        let session = api.open_session(EMAIL).unwrap();
        (TransactionsState { api: Arc::new(api) }, session)
    }

    fn rows(html: &Html) -> Vec<ElementRef<'_>> {
        html.select(&Selector::parse("tr[data-transaction-row]").unwrap())
            .collect()
    }

    fn row_text(row: &ElementRef<'_>) -> String {
        row.text().collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn income_page_lists_income_newest_first() {
        let api = InMemoryApiClient::new()
            .with_user("Test", EMAIL, "password")
            .with_transactions(
                EMAIL,
                vec![
                    income("1", "Salary", 4200.0, date!(2025 - 05 - 01)),
                    income("2", "Gift", 50.0, date!(2025 - 06 - 01)),
                    expense("3", "Rent", 900.0, date!(2025 - 06 - 02)),
                ],
            );
        let (state, session) = state_and_session(api);

        let response = get_income_page(State(state), Extension(session)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows = rows(&html);
        assert_eq!(rows.len(), 2, "only income should be listed");
        assert!(row_text(&rows[0]).contains("Gift"));
        assert!(row_text(&rows[1]).contains("Salary"));
        assert!(
            html.select(&Selector::parse("#income-chart").unwrap())
                .next()
                .is_some(),
            "want income chart"
        );
    }

    #[tokio::test]
    async fn income_page_has_add_form_and_download_link() {
        let api = InMemoryApiClient::new().with_user("Test", EMAIL, "password");
        let (state, session) = state_and_session(api);

        let response = get_income_page(State(state), Extension(session)).await.unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::INCOME_API, "hx-post");
        assert_form_input(&form, "source", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);

        let download = html
            .select(&Selector::parse("a[download]").unwrap())
            .next()
            .expect("no download link");
        assert_eq!(download.value().attr("href"), Some(endpoints::INCOME_DOWNLOAD));
    }

    #[tokio::test]
    async fn empty_page_shows_empty_state_without_chart() {
        let api = InMemoryApiClient::new().with_user("Test", EMAIL, "password");
        let (state, session) = state_and_session(api);

        let response = get_expenses_page(State(state), Extension(session))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(rows(&html).is_empty());
        assert!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("#expense-chart").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn expense_rows_have_delete_buttons() {
        let api = InMemoryApiClient::new()
            .with_user("Test", EMAIL, "password")
            .with_transactions(
                EMAIL,
                vec![expense("7", "Rent", 900.0, date!(2025 - 06 - 02))],
            );
        let (state, session) = state_and_session(api);

        let response = get_expenses_page(State(state), Extension(session))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let rows = rows(&html);
        assert_eq!(rows.len(), 1);
        let button = rows[0]
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("no delete button");
        assert_eq!(button.value().attr("hx-delete"), Some("/api/expenses/7"));
        assert!(row_text(&rows[0]).contains("-$900.00"));
    }
}
