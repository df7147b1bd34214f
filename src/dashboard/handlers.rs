//! Dashboard HTTP handler and view rendering.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api::{ApiClient, TransactionFilter},
    auth::Session,
    dashboard::{
        aggregation::{DerivedSummary, RECENT_EXPENSES_COUNT, RECENT_INCOME_COUNT, summarize},
        cards::summary_cards_view,
        charts::{
            DashboardChart, chart_container, chart_head_elements, expenses_by_category_chart,
            financial_overview_chart, income_by_source_chart,
        },
        tables::recent_list_view,
    },
    endpoints,
    html::{base, link},
    navigation::NavBar,
    timezone::now_in,
    transaction::{Transaction, TransactionKind},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The backend that stores the records.
    pub api: Arc<dyn ApiClient>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's income and expenses.
///
/// Both kinds of record are fetched afresh and summarised on every request.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let now = now_in(&state.local_timezone)?;
    let transactions = fetch_all(state.api.as_ref(), &session).await?;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, session.display_name());

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    Ok(dashboard_view(nav_bar, &summarize(&transactions, now)).into_response())
}

async fn fetch_all(api: &dyn ApiClient, session: &Session) -> Result<Vec<Transaction>, Error> {
    let filter = TransactionFilter::default();
    let (mut income, expenses) = tokio::try_join!(
        api.fetch_transactions(session, TransactionKind::Income, &filter),
        api.fetch_transactions(session, TransactionKind::Expense, &filter),
    )
    .inspect_err(|error| tracing::error!("could not fetch records for the dashboard: {error}"))?;

    income.extend(expenses);
    Ok(income)
}

fn build_dashboard_charts(summary: &DerivedSummary) -> [DashboardChart; 3] {
    [
        DashboardChart::new(
            "financial-overview-chart",
            financial_overview_chart(summary),
        ),
        DashboardChart::new(
            "expenses-chart",
            expenses_by_category_chart(&summary.expenses.groups, summary.expenses.days),
        ),
        DashboardChart::new(
            "income-chart",
            income_by_source_chart(&summary.income.groups, summary.income.days),
        ),
    ]
}

fn first(transactions: &[Transaction], count: usize) -> &[Transaction] {
    &transactions[..count.min(transactions.len())]
}

/// Renders the dashboard page when the user has no records.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let income_link = link(endpoints::INCOME_VIEW, "income");
    let expenses_link = link(endpoints::EXPENSES_VIEW, "expenses");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some records.
                Start by adding your " (income_link) " or " (expenses_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the dashboard with the summary cards, charts and recent records.
fn dashboard_view(nav_bar: NavBar, summary: &DerivedSummary) -> Markup {
    let nav_bar = nav_bar.into_html();
    let [overview_chart, expenses_chart, income_chart] = build_dashboard_charts(summary);
    let expenses_window = format!("Last {} days", summary.expenses.days);
    let income_window = format!("Last {} days", summary.income.days);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(summary))

            section class="w-full grid grid-cols-1 xl:grid-cols-2 gap-4 mb-4"
            {
                (recent_list_view("Recent Transactions", None, None, &summary.recent))
                (chart_container(&overview_chart))

                (recent_list_view(
                    "Expenses",
                    Some(&expenses_window),
                    Some(endpoints::EXPENSES_VIEW),
                    first(&summary.expenses.transactions, RECENT_EXPENSES_COUNT),
                ))
                (chart_container(&expenses_chart))

                (chart_container(&income_chart))
                (recent_list_view(
                    "Income",
                    Some(&income_window),
                    Some(endpoints::INCOME_VIEW),
                    first(&summary.income.transactions, RECENT_INCOME_COUNT),
                ))
            }
        }
    );

    let head_elements = chart_head_elements(&[overview_chart, expenses_chart, income_chart]);

    base("Dashboard", &head_elements, &content)
}
