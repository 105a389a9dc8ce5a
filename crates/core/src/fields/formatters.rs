//! en-US number formatting for widget values.

/// `$1,234.56`, with a leading `-` for negative amounts.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}", sign, group_fixed(&fixed))
}

/// Signed percentage with two decimals: `+1.23%`, `-0.50%`, `0.00%`.
pub fn format_percent(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

/// Grouped number with at most three fraction digits: `1,234,567.891`.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let sign = if value < 0.0 && trimmed != "0" { "-" } else { "" };
    format!("{}{}", sign, group_fixed(trimmed))
}

fn group_fixed(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    let first = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (i + 3 - first) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
