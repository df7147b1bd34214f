//! Lists of recent records for the dashboard.

use maud::{Markup, html};

use crate::{
    html::{LINK_STYLE, format_currency},
    transaction::Transaction,
};

fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    }
}

fn recent_item(transaction: &Transaction) -> Markup {
    let amount = transaction.signed_amount();

    html! {
        li class="flex items-center justify-between gap-3 py-3" data-recent-item="true"
        {
            div class="flex items-center gap-3 min-w-0"
            {
                span
                    class="flex items-center justify-center w-10 h-10 rounded-full bg-gray-100 dark:bg-gray-700 text-xl"
                    aria-hidden="true"
                {
                    (transaction.display_icon())
                }

                div class="min-w-0"
                {
                    p class="text-sm font-medium truncate" { (transaction.label_or_default()) }
                    time
                        datetime=(transaction.date)
                        class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (transaction.date)
                    }
                }
            }

            span class={ "text-sm font-semibold whitespace-nowrap " (amount_color_class(amount)) }
            {
                (format_currency(amount))
            }
        }
    }
}

/// Renders a titled list of `transactions` with a link to the full page.
///
/// `subtitle` is shown next to the title, e.g. the window the list covers.
pub(super) fn recent_list_view(
    title: &str,
    subtitle: Option<&str>,
    see_all_url: Option<&str>,
    transactions: &[Transaction],
) -> Markup {
    html! {
        div class="bg-white dark:bg-gray-800 rounded-lg shadow-md p-4"
        {
            div class="flex justify-between items-baseline mb-2"
            {
                h3 class="text-lg font-semibold"
                {
                    (title)

                    @if let Some(subtitle) = subtitle {
                        " "
                        span class="text-sm font-normal text-gray-600 dark:text-gray-400" { (subtitle) }
                    }
                }

                @if let Some(url) = see_all_url {
                    a href=(url) class=(LINK_STYLE) { "See all" }
                }
            }

            @if transactions.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" { "No records yet." }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in transactions {
                        (recent_item(transaction))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::transaction::test_utils::{expense, income};

    use super::recent_list_view;

    #[test]
    fn expenses_are_shown_as_negative() {
        let transactions = [
            income("1", "Salary", 900.0, date!(2025 - 06 - 02)),
            expense("2", "Rent", 400.0, date!(2025 - 06 - 01)),
        ];

        let markup = recent_list_view("Recent Transactions", None, None, &transactions);

        let html = Html::parse_fragment(&markup.into_string());
        let items: Vec<String> = html
            .select(&Selector::parse("li[data-recent-item]").unwrap())
            .map(|item| item.text().collect())
            .collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("Salary") && items[0].contains("$900.00"));
        assert!(items[1].contains("Rent") && items[1].contains("-$400.00"));
    }

    #[test]
    fn empty_list_shows_message() {
        let markup = recent_list_view("Recent Income", Some("Last 60 days"), Some("/income"), &[]);

        let html = Html::parse_fragment(&markup.into_string());
        assert!(
            html.select(&Selector::parse("li").unwrap())
                .next()
                .is_none()
        );
        assert!(html.html().contains("No records yet."));
    }
}
