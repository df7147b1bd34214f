//! ECharts configuration for the dashboard and the income and expense pages.
//!
//! Charts are built with `charming` on the server and serialised to JSON.
//! The page initialises them with a small script produced by [charts_script].

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle, JsFunction, Tooltip,
        Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{DerivedSummary, LabelledAmount},
    html::HeadElement,
    transaction::Transaction,
};

/// Colours assigned to chart segments by position.
pub const PALETTE: [&str; 10] = [
    "#6B46C1", "#EF4444", "#F97316", "#10B981", "#3B82F6", "#EAB308", "#EC4899", "#14B8A6",
    "#8B5CF6", "#64748B",
];

/// The colour for the segment at `index`, cycling through [PALETTE].
///
/// The same index always gets the same colour, so a chart looks the same
/// every time the page is loaded.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// A chart with its HTML container ID and ECharts configuration.
pub(crate) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(crate) fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders the container for a single chart.
pub(crate) fn chart_container(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[320px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// Generates the script that initialises `charts` once the page has loaded.
///
/// Each chart follows the user's light or dark preference and resizes with
/// the window.
pub(crate) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) return;
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                escape_for_script(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Make chart options safe to place inside an inline `<script>`.
///
/// Labels are user input, so a label such as `</script>` must not be able to
/// end the script element. The replacements are JSON escapes, which is fine
/// because `<`, `>` and `&` only ever appear inside string literals here: the
/// formatter functions in this module never use them.
fn escape_for_script(options: &str) -> String {
    let mut escaped = String::with_capacity(options.len());

    for c in options.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// The ECharts library served from the static directory.
const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// The `<head>` elements a page needs to display `charts`.
pub(crate) fn chart_head_elements(charts: &[DashboardChart]) -> [HeadElement; 2] {
    [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(charts),
    ]
}

fn palette() -> Vec<Color> {
    PALETTE.iter().map(|&color| Color::from(color)).collect()
}

/// A doughnut chart of one segment per group, coloured by position.
fn pie_chart(title: &str, subtitle: &str, series_name: &str, groups: &[LabelledAmount]) -> Chart {
    let data: Vec<(f64, &str)> = groups
        .iter()
        .map(|group| (group.amount, group.label.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .color(palette())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name(series_name)
                .radius(vec!["40%", "65%"])
                .data(data),
        )
}

/// Total balance, income and expenses as a doughnut chart.
///
/// The balance segment shows the magnitude of the balance so that a negative
/// balance still gets a visible segment.
pub(crate) fn financial_overview_chart(summary: &DerivedSummary) -> Chart {
    let segments = [
        LabelledAmount {
            label: "Total Balance".to_owned(),
            amount: summary.total_balance.abs(),
        },
        LabelledAmount {
            label: "Total Expenses".to_owned(),
            amount: summary.total_expenses,
        },
        LabelledAmount {
            label: "Total Income".to_owned(),
            amount: summary.total_income,
        },
    ];

    pie_chart("Financial Overview", "All time", "Overview", &segments)
}

/// The expense window summed per category as a bar chart.
pub(crate) fn expenses_by_category_chart(groups: &[LabelledAmount], days: i64) -> Chart {
    let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
    let values: Vec<f64> = groups.iter().map(|group| group.amount).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by Category")
                .subtext(format!("Last {days} days")),
        )
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Amount")
                .item_style(ItemStyle::new().color(palette_color(1)))
                .data(values),
        )
}

/// The income window summed per source as a doughnut chart.
pub(crate) fn income_by_source_chart(groups: &[LabelledAmount], days: i64) -> Chart {
    pie_chart(
        "Income by Source",
        &format!("Last {days} days"),
        "Income",
        groups,
    )
}

/// All income summed per source as a bar chart, one colour per source.
pub(crate) fn income_overview_chart(groups: &[LabelledAmount]) -> Chart {
    let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Income Overview").subtext("Grouped by source"))
        .color(palette())
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    // One stacked series per source keeps the colour tied to the position.
    for (index, group) in groups.iter().enumerate() {
        let data: Vec<Option<f64>> = (0..groups.len())
            .map(|column| (column == index).then_some(group.amount))
            .collect();

        chart = chart.series(
            Bar::new()
                .name(group.label.as_str())
                .stack("Income")
                .data(data),
        );
    }

    chart
}

/// Expense amounts in date order as a line chart.
///
/// `transactions` must already be sorted from oldest to newest.
pub(crate) fn expense_trend_chart(transactions: &[Transaction]) -> Chart {
    let labels: Vec<String> = transactions
        .iter()
        .map(|transaction| transaction.date.to_string())
        .collect();
    let values: Vec<f64> = transactions
        .iter()
        .map(|transaction| transaction.amount)
        .collect();

    Chart::new()
        .title(Title::new().text("Expense Overview").subtext("By date"))
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Amount")
                .item_style(ItemStyle::new().color(palette_color(0)))
                .data(values),
        )
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        dashboard::aggregation::LabelledAmount,
        transaction::test_utils::expense,
    };

    use super::{
        DashboardChart, PALETTE, charts_script, escape_for_script, expense_trend_chart,
        income_by_source_chart, income_overview_chart, palette_color,
    };

    fn groups() -> Vec<LabelledAmount> {
        vec![
            LabelledAmount {
                label: "Salary".to_owned(),
                amount: 1000.0,
            },
            LabelledAmount {
                label: "Freelance".to_owned(),
                amount: 250.0,
            },
        ]
    }

    #[test]
    fn palette_is_deterministic_and_cycles() {
        assert_eq!(palette_color(0), PALETTE[0]);
        assert_eq!(palette_color(3), palette_color(3));
        assert_eq!(palette_color(PALETTE.len() + 2), PALETTE[2]);
    }

    #[test]
    fn pie_chart_lists_groups_in_order_with_palette() {
        let options = income_by_source_chart(&groups(), 60).to_string();

        let salary = options.find("Salary").unwrap();
        let freelance = options.find("Freelance").unwrap();
        assert!(salary < freelance);
        assert!(options.contains(PALETTE[0]));
        assert!(options.contains("Last 60 days"));
    }

    #[test]
    fn trend_chart_uses_dates_as_labels() {
        let transactions = vec![
            expense("1", "Rent", 10.0, date!(2025 - 01 - 01)),
            expense("2", "Rent", 20.0, date!(2025 - 01 - 02)),
        ];

        let options = expense_trend_chart(&transactions).to_string();

        assert!(options.contains("2025-01-01"));
        assert!(options.contains("2025-01-02"));
    }

    #[test]
    fn script_initialises_every_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let crate::html::HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };

        assert!(script.0.contains("first-chart"));
        assert!(script.0.contains("second-chart"));
    }

    #[test]
    fn script_keeps_hostile_labels_inside_strings() {
        let groups = vec![LabelledAmount {
            label: "</script><script>alert(1)</script>".to_owned(),
            amount: 10.0,
        }];
        let charts = [DashboardChart::new(
            "income-chart",
            income_overview_chart(&groups),
        )];

        let crate::html::HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };
        let rendered = maud::html!(script { (script) }).into_string();

        assert_eq!(rendered.matches("</script>").count(), 1);
        assert!(!rendered.contains("<script>alert"));
        assert!(rendered.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn escaped_options_are_still_valid_json() {
        let options = "{\"name\":\"Tom & Jerry <3\",\"sep\":\"\u{2028}\"}";

        let escaped = escape_for_script(options);
        let parsed: serde_json::Value = serde_json::from_str(&escaped).unwrap();

        assert!(!escaped.contains(['<', '>', '&', '\u{2028}']));
        assert_eq!(parsed["name"], "Tom & Jerry <3");
        assert_eq!(parsed["sep"], "\u{2028}");
    }
}
