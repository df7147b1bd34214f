//! Cards showing the overall balance, income and expenses.

use maud::{Markup, html};

use crate::{dashboard::aggregation::DerivedSummary, html::format_currency};

/// Which total a card shows, which decides its icon and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardKind {
    Balance,
    Income,
    Expenses,
}

impl CardKind {
    fn title(self) -> &'static str {
        match self {
            CardKind::Balance => "Total Balance",
            CardKind::Income => "Total Income",
            CardKind::Expenses => "Total Expenses",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            CardKind::Balance => "💳",
            CardKind::Income => "💰",
            CardKind::Expenses => "🧾",
        }
    }

    fn icon_style(self) -> &'static str {
        match self {
            CardKind::Balance => "bg-purple-600",
            CardKind::Income => "bg-orange-500",
            CardKind::Expenses => "bg-red-500",
        }
    }
}

fn summary_card(kind: CardKind, amount: f64) -> Markup {
    let formatted = format_currency(amount);

    html! {
        div
            class="flex items-center gap-4 bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md"
            aria-label=(format!("{}: {}", kind.title(), formatted))
            data-summary-card=(kind.title())
        {
            div class={ "flex items-center justify-center w-12 h-12 rounded-full text-2xl " (kind.icon_style()) }
            {
                (kind.icon())
            }

            div
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400" { (kind.title()) }
                span class="text-2xl font-semibold" { (formatted) }
            }
        }
    }
}

/// Renders the row of cards with the all-time totals.
pub(super) fn summary_cards_view(summary: &DerivedSummary) -> Markup {
    html! {
        section class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-4"
        {
            (summary_card(CardKind::Balance, summary.total_balance))
            (summary_card(CardKind::Income, summary.total_income))
            (summary_card(CardKind::Expenses, summary.total_expenses))
        }
    }
}
