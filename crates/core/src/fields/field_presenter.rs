use serde_json::Value;

use super::formatters::{format_currency, format_number, format_percent};

const GLOBAL_QUOTE_PREFIX: &str = "Global Quote.";

/// Short quote codes with fixed labels.
fn known_label(path: &str) -> Option<&'static str> {
    match path {
        "c" => Some("Current Price"),
        "d" => Some("Change"),
        "dp" => Some("Change %"),
        "h" => Some("Day High"),
        "l" => Some("Day Low"),
        "o" => Some("Open Price"),
        "pc" => Some("Previous Close"),
        _ => None,
    }
}

/// Human-readable label for a field path.
///
/// Known quote codes map to fixed names. Anything else drops a leading
/// `Global Quote.` and `NN. ` ordinal, turns underscores into spaces and
/// upper-cases the rest.
pub fn label(path: &str) -> String {
    if let Some(known) = known_label(path) {
        return known.to_string();
    }

    let rest = path.strip_prefix(GLOBAL_QUOTE_PREFIX).unwrap_or(path);
    strip_ordinal(rest).replace('_', " ").to_uppercase()
}

fn strip_ordinal(path: &str) -> &str {
    let digits = path.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return path;
    }
    match path[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => path,
    }
}

/// Display string for a resolved field value.
///
/// Missing or null values show as `N/A`. Strings already carrying a `%`
/// are shown verbatim. Numeric values are formatted as currency when the
/// field is a price, as a signed percentage when it is a change, and as a
/// grouped number otherwise. Anything non-numeric falls back to its plain
/// string form.
pub fn display_value(path: &str, value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) => return "N/A".to_string(),
        Some(value) => value,
    };

    if let Value::String(text) = value {
        if text.contains('%') {
            return text.clone();
        }
    }

    let Some(number) = coerce_number(value) else {
        return display_string(value);
    };

    let key = path.to_lowercase();
    let label = label(path).to_lowercase();
    if path == "c" || key.contains("price") || label.contains("price") {
        format_currency(number)
    } else if path == "dp" || key.contains("change") || label.contains("change") {
        format_percent(number)
    } else {
        format_number(number)
    }
}

/// Numbers and numeric strings as `f64`. Empty strings, booleans and
/// non-finite values are not numeric: `true` displays as "true" and `""`
/// as an empty string, never as 1 or 0.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() || text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Plain string form of a value: strings unquoted, arrays comma-joined,
/// everything else as compact JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_known_labels() {
        assert_eq!(label("c"), "Current Price");
        assert_eq!(label("d"), "Change");
        assert_eq!(label("dp"), "Change %");
        assert_eq!(label("h"), "Day High");
        assert_eq!(label("l"), "Day Low");
        assert_eq!(label("o"), "Open Price");
        assert_eq!(label("pc"), "Previous Close");
    }

    #[test]
    fn test_derived_labels() {
        assert_eq!(label("Global Quote.05. price"), "PRICE");
        assert_eq!(label("Global Quote.10. change percent"), "CHANGE PERCENT");
        assert_eq!(label("market_cap"), "MARKET CAP");
        assert_eq!(label("profile.name"), "PROFILE.NAME");
        assert_eq!(label("01. symbol"), "SYMBOL");
        assert_eq!(label("2024.total"), "TOTAL");
        assert_eq!(label("123abc"), "123ABC");
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(display_value("c", None), "N/A");
        assert_eq!(display_value("c", Some(&Value::Null)), "N/A");
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(display_value("c", Some(&json!(150.25))), "$150.25");
        assert_eq!(
            display_value("Global Quote.05. price", Some(&json!("1234.5000"))),
            "$1,234.50"
        );
        assert_eq!(display_value("o", Some(&json!(149))), "$149.00");
    }

    #[test]
    fn test_change_formatting() {
        assert_eq!(display_value("dp", Some(&json!(1.01))), "+1.01%");
        assert_eq!(display_value("dp", Some(&json!(-0.5))), "-0.50%");
        assert_eq!(display_value("dp", Some(&json!(0))), "0.00%");
        assert_eq!(
            display_value("Global Quote.10. change percent", Some(&json!("0.4500%"))),
            "0.4500%"
        );
    }

    #[test]
    fn test_plain_numbers_and_strings() {
        assert_eq!(display_value("volume", Some(&json!(1234567))), "1,234,567");
        assert_eq!(display_value("h", Some(&json!(151.5))), "151.5");
        assert_eq!(display_value("name", Some(&json!("Apple Inc"))), "Apple Inc");
        assert_eq!(display_value("flag", Some(&json!(true))), "true");
        assert_eq!(display_value("tags", Some(&json!(["a", "b"]))), "a,b");
        assert_eq!(display_value("blank", Some(&json!(""))), "");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(coerce_number(&json!("1e3")), Some(1000.0));
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("12abc")), None);
        assert_eq!(coerce_number(&json!(false)), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("  ")), None);
        assert_eq!(coerce_number(&json!({"a": 1})), None);
    }

    proptest! {
        #[test]
        fn prop_current_price_is_currency(cents in -10_000_000i64..10_000_000i64) {
            let value = cents as f64 / 100.0;
            let shown = display_value("c", Some(&json!(value)));
            prop_assert!(shown.starts_with('$') || shown.starts_with("-$"));
            let digits: String = shown.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
            let parsed: f64 = digits.parse().unwrap();
            prop_assert!((parsed - value.abs()).abs() < 0.005);
        }

        #[test]
        fn prop_change_percent_is_signed(value in -1000.0f64..1000.0) {
            let shown = display_value("dp", Some(&json!(value)));
            prop_assert!(shown.ends_with('%'));
            if value > 0.0 {
                prop_assert!(shown.starts_with('+'));
            } else if value < 0.0 && shown != "-0.00%" {
                prop_assert!(shown.starts_with('-'));
            }
        }

        #[test]
        fn prop_strings_with_percent_verbatim(text in "[a-z0-9 .]{0,10}%[a-z0-9 .]{0,5}") {
            prop_assert_eq!(display_value("c", Some(&json!(text.clone()))), text);
        }
    }
}
