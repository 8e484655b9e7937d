//! Display formatting for prices, volumes and percentages
//!
//! Every formatter is total: `None` and non-finite inputs render as [`PLACEHOLDER`].
//! Output follows en-US conventions (`,` grouping, `.` decimal point).

/// Rendered for missing values
pub const PLACEHOLDER: &str = "-";

/// Format a USD amount (e.g. 1234.5 -> "$1,234.50", 0.00012 -> "$0.00012")
///
/// Amounts below one dollar keep up to six fraction digits so that small-cap
/// prices stay readable.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let max_decimals = if value.abs() < 1.0 { 6 } else { 2 };
    let body = decimal_string(value.abs(), max_decimals, 2);
    format!("{}${}", sign(value, &body), body)
}

/// Format a plain number with grouping and at most two decimals
pub fn format_number(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let body = decimal_string(value.abs(), 2, 0);
    format!("{}{}", sign(value, &body), body)
}

/// Format a percentage change (e.g. 2.346 -> "2.35%")
pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(value) => format!("{:.2}%", value),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a large USD amount with a magnitude suffix (e.g. "$2.45T")
pub fn format_compact_currency(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let abs = value.abs();
    for (scale, suffix) in UNITS {
        if abs >= scale {
            let body = format!("{:.2}{}", abs / scale, suffix);
            return format!("{}${}", if value < 0.0 { "-" } else { "" }, body);
        }
    }
    format_currency(Some(value))
}

/// Leading minus, unless rounding produced zero
fn sign(value: f64, body: &str) -> &'static str {
    if value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    }
}

/// Non-negative `value` with grouped integer part and trimmed fraction
fn decimal_string(value: f64, max_decimals: usize, min_decimals: usize) -> String {
    let formatted = format!("{:.prec$}", value, prec = max_decimals);
    let (integer_part, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    let mut fraction = fraction.to_string();
    while fraction.len() > min_decimals && fraction.ends_with('0') {
        fraction.pop();
    }

    let grouped = group_thousands(integer_part);
    if fraction.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, fraction)
    }
}

/// Insert commas every three digits (e.g. "1234567" -> "1,234,567")
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
