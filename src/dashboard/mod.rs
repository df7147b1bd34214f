//! Dashboard module
//!
//! Provides an overview page with the user's totals, charts of the trailing
//! expense and income windows and the most recent records. The aggregation
//! used by the page is pure and also backs the income and expense pages.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use aggregation::{
    DerivedSummary, EXPENSE_WINDOW_DAYS, INCOME_WINDOW_DAYS, LabelledAmount, WindowedTransactions,
    group_by_label, recency_order, recent, summarize, windowed,
};
pub use charts::{PALETTE, palette_color};
pub use handlers::{DashboardState, get_dashboard_page};

pub(crate) use charts::{
    DashboardChart, chart_container, chart_head_elements, expense_trend_chart,
    income_overview_chart,
};
