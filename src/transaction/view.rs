//! HTML rendering for the income and expense pages.

use maud::{Markup, html};

use crate::{
    dashboard::{DashboardChart, chart_container, chart_head_elements},
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency, loading_spinner,
    },
    icons::{EXPENSE_CATEGORIES, INCOME_ICON_CHOICES},
    navigation::NavBar,
    transaction::{Transaction, TransactionForm, TransactionKind, ValidationError},
};

/// An error message to show on the add form.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FormError {
    /// The name of the input the message belongs to, or `None` for the whole form.
    pub field: Option<&'static str>,
    pub message: String,
}

impl FormError {
    /// An error that is not tied to a single input, e.g. a failed request.
    pub(crate) fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    fn message_for<'a>(error: Option<&'a Self>, field: &str) -> Option<&'a str> {
        error
            .filter(|error| error.field == Some(field))
            .map(|error| error.message.as_str())
    }

    fn form_message(error: Option<&Self>) -> Option<&str> {
        error
            .filter(|error| error.field.is_none())
            .map(|error| error.message.as_str())
    }
}

impl From<&ValidationError> for FormError {
    fn from(error: &ValidationError) -> Self {
        Self {
            field: Some(error.field()),
            message: capitalise(&error.to_string()),
        }
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="text-red-500 text-base" { (message) }
        }
    }
}

fn amount_input(value: &str, error: Option<&FormError>) -> Markup {
    html! {
        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    type="number"
                    name="amount"
                    id="amount"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=(value)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (field_error(FormError::message_for(error, "amount")))
        }
    }
}

fn date_input(value: &str, error: Option<&FormError>) -> Markup {
    html! {
        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date (optional)" }

            input
                type="date"
                name="date"
                id="date"
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(FormError::message_for(error, "date")))
        }
    }
}

fn source_inputs(values: &TransactionForm, error: Option<&FormError>) -> Markup {
    html! {
        div
        {
            label for="source" class=(FORM_LABEL_STYLE) { "Income Source" }

            input
                type="text"
                name="source"
                id="source"
                placeholder="Salary, Freelance, etc."
                required
                value=(values.label)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(FormError::message_for(error, "source")))
        }

        fieldset
        {
            legend class=(FORM_LABEL_STYLE) { "Icon" }

            div class="grid grid-cols-5 gap-2"
            {
                @for (index, icon) in INCOME_ICON_CHOICES.iter().enumerate() {
                    @let id = format!("icon-{index}");

                    div class="flex items-center"
                    {
                        input
                            type="radio"
                            name="icon"
                            id=(id)
                            value=(icon)
                            checked[values.icon == *icon]
                            class={ (FORM_RADIO_INPUT_STYLE) " sr-only" };

                        label for=(id) class={ (FORM_RADIO_LABEL_STYLE) " text-center text-lg" }
                        {
                            (icon)
                        }
                    }
                }
            }
        }
    }
}

fn category_input(values: &TransactionForm, error: Option<&FormError>) -> Markup {
    html! {
        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected[values.label.is_empty()] { "Select a category" }

                @for (category, icon) in EXPENSE_CATEGORIES {
                    option value=(category) selected[values.label == category]
                    {
                        (icon) " " (category)
                    }
                }
            }

            (field_error(FormError::message_for(error, "category")))
        }
    }
}

/// The form for adding income or an expense.
///
/// `values` are echoed back into the inputs so the user can fix a rejected
/// submission.
pub(crate) fn transaction_form(
    kind: TransactionKind,
    values: &TransactionForm,
    error: Option<&FormError>,
) -> Markup {
    let (title, button_text) = match kind {
        TransactionKind::Income => ("Add Income", "Add Income"),
        TransactionKind::Expense => ("Add Expense", "Add Expense"),
    };

    html! {
        form
            id="transaction-form"
            hx-post=(kind.create_endpoint())
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4"
        {
            h2 class="text-lg font-semibold" { (title) }

            (field_error(FormError::form_message(error)))

            @match kind {
                TransactionKind::Income => (source_inputs(values, error)),
                TransactionKind::Expense => (category_input(values, error)),
            }

            (amount_input(&values.amount, error))
            (date_input(&values.date, error))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                (button_text)
            }
        }
    }
}

/// A table row for one record, with a button that deletes it.
pub(crate) fn transaction_row(transaction: &Transaction) -> Markup {
    let amount = transaction.signed_amount();
    let label = transaction.label_or_default();
    let delete_url = format_endpoint(transaction.kind.delete_endpoint(), transaction.id.as_str());
    let confirm_message = format!(
        "Are you sure you want to delete '{label}' on {}? This cannot be undone.",
        transaction.date
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) aria-hidden="true" { (transaction.display_icon()) }
            td class=(TABLE_CELL_STYLE) { (label) }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class={ "px-6 py-4 text-right " (amount_class(amount)) } { (format_currency(amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-confirm=(confirm_message)
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn transactions_table(kind: TransactionKind, transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class="sr-only" { "Icon" }
                        th scope="col" class=(TABLE_CELL_STYLE)
                        {
                            @match kind {
                                TransactionKind::Income => "Source",
                                TransactionKind::Expense => "Category",
                            }
                        }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                @match kind {
                                    TransactionKind::Income => "No income yet. Add some with the form.",
                                    TransactionKind::Expense => "No expenses yet. Add some with the form.",
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The page listing the records of one kind.
///
/// `transactions` should already be sorted newest first.
pub(crate) fn transactions_view(
    kind: TransactionKind,
    user_name: &str,
    transactions: &[Transaction],
    chart: Option<DashboardChart>,
) -> Markup {
    let nav_bar = NavBar::new(kind.view_endpoint(), user_name).into_html();
    let title = format!("{} Overview", kind.display_name());

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { (title) }

                    a
                        href=(kind.download_endpoint())
                        download=(kind.download_filename())
                        class=(LINK_STYLE)
                    {
                        "Download"
                    }
                }

                @if let Some(chart) = &chart {
                    section class="w-full" { (chart_container(chart)) }
                }

                div class="grid grid-cols-1 lg:grid-cols-3 gap-6"
                {
                    section class="lg:col-span-1 rounded bg-white dark:bg-gray-800 p-4 shadow-sm"
                    {
                        (transaction_form(kind, &TransactionForm::default(), None))
                    }

                    section id="transactions" class="lg:col-span-2"
                    {
                        (transactions_table(kind, transactions))
                    }
                }
            }
        }
    };

    let mut head_elements = vec![dollar_input_styles()];

    if let Some(chart) = &chart {
        head_elements.extend(chart_head_elements(std::slice::from_ref(chart)));
    }

    base(kind.display_name(), &head_elements, &content)
}
