//! Alert messages that htmx swaps into the page's alert container.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert shown at the bottom of the page after an htmx request.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// An error message with extra details.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                "✓",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "!",
            ),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class={"flex items-start p-4 mb-4 text-sm border rounded-lg " (container_style)}
                {
                    span class="shrink-0 me-3 font-bold" { (icon) }

                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Close"
                        class="ms-3 font-bold"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let markup = Alert::Error {
            message: "Could not delete transaction".to_owned(),
            details: "Try refreshing the page.".to_owned(),
        }
        .into_html()
        .into_string();

        let fragment = Html::parse_fragment(&markup);
        let paragraphs = fragment
            .select(&Selector::parse("div[role=alert] p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();

        assert_eq!(
            paragraphs,
            vec!["Could not delete transaction", "Try refreshing the page."]
        );
    }

    #[test]
    fn empty_details_are_omitted() {
        let markup = Alert::Success {
            message: "Saved".to_owned(),
            details: String::new(),
        }
        .into_html()
        .into_string();

        let fragment = Html::parse_fragment(&markup);
        let count = fragment
            .select(&Selector::parse("div[role=alert] p").unwrap())
            .count();

        assert_eq!(count, 1);
    }
}
