//! Display glyphs for categories and income sources.

/// The glyph shown for labels without a dedicated icon.
pub const FALLBACK_ICON: &str = "📝";

/// The expense categories offered in the add-expense form, with their icons.
pub const EXPENSE_CATEGORIES: [(&str, &str); 10] = [
    ("Food & Dining", "🍔"),
    ("Transportation", "🚗"),
    ("Shopping", "🛍️"),
    ("Bills & Utilities", "💡"),
    ("Entertainment", "🎬"),
    ("Healthcare", "🏥"),
    ("Education", "📚"),
    ("Travel", "✈️"),
    ("Rent", "🏠"),
    ("Others", "📝"),
];

/// The glyphs offered by the icon picker in the add-income form.
pub const INCOME_ICON_CHOICES: [&str; 20] = [
    "💰", "💵", "🧾", "💼", "🏦", "🪙", "📈", "🛍️", "🎁", "🍔", "🚗", "✈️", "🏠", "🧸", "🎮", "🩺",
    "📚", "🎓", "⚽", "🎵",
];

/// Get the icon for a category or income source.
///
/// Matching is exact. Unknown labels get [FALLBACK_ICON].
pub fn icon_for(label: &str) -> &'static str {
    match label {
        "Shopping" => "🛍️",
        "Travel" => "✈️",
        "Salary" => "💼",
        "Electricity Bill" => "💡",
        "Loan Repayment" => "🏦",
        "Food & Dining" => "🍔",
        "Transportation" => "🚗",
        "Bills & Utilities" => "💡",
        "Entertainment" => "🎬",
        "Healthcare" => "🏥",
        "Education" => "📚",
        "Rent" => "🏠",
        "Interest from Savings" => "💰",
        "E-commerce Sales" => "🛒",
        "Graphing Design" => "🎨",
        "Affiliate Marketing" => "📈",
        _ => FALLBACK_ICON,
    }
}
