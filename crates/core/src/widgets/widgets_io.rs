//! Config file import and export.
//!
//! An exported file is a pretty-printed JSON array of widget configs. Import
//! takes the same shape and rejects the whole file on any bad element.

use std::collections::HashSet;

use serde_json::Value;

use super::widgets_model::WidgetConfig;
use crate::errors::{Error, Result};

pub fn export_widgets(widgets: &[WidgetConfig]) -> Result<String> {
    Ok(serde_json::to_string_pretty(widgets)?)
}

pub fn parse_widgets(raw: &str) -> Result<Vec<WidgetConfig>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| Error::MalformedImport(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(Error::MalformedImport(
            "expected an array of widgets".to_string(),
        ));
    };

    let mut widgets = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let config: WidgetConfig = serde_json::from_value(item)
            .map_err(|e| Error::MalformedImport(format!("widget {}: {}", index, e)))?;
        widgets.push(config);
    }

    check_widgets(&widgets)?;
    Ok(widgets)
}

/// Every config valid, no id repeated.
pub(crate) fn check_widgets(widgets: &[WidgetConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, config) in widgets.iter().enumerate() {
        config
            .validate()
            .map_err(|e| Error::MalformedImport(format!("widget {}: {}", index, e)))?;
        if !seen.insert(config.id.as_str()) {
            return Err(Error::MalformedImport(format!(
                "widget {}: duplicate id {}",
                index, config.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::DisplayMode;

    fn widget(id: &str) -> WidgetConfig {
        WidgetConfig {
            id: id.to_string(),
            name: format!("Widget {}", id),
            description: Some("Daily quote".to_string()),
            request_url: "/api/finnhub?symbol=AAPL&endpoint=quote".to_string(),
            refresh_interval_secs: 30,
            display_mode: DisplayMode::Table,
            selected_fields: vec!["c".to_string()],
        }
    }

    #[test]
    fn test_export_then_import() {
        let widgets = vec![widget("a"), widget("b")];
        let raw = export_widgets(&widgets).unwrap();
        assert!(raw.starts_with("[\n  {"));
        assert_eq!(parse_widgets(&raw).unwrap(), widgets);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_widgets("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_files() {
        let cases = [
            "not json",
            r#"{"widgets": []}"#,
            r#"[{"id": "a"}]"#,
            r#"[{"id": "a", "name": "A", "apiUrl": "/x", "refreshInterval": 0, "displayMode": "card"}]"#,
            r#"[{"id": "a", "name": "A", "apiUrl": "/x", "refreshInterval": 5, "displayMode": "grid"}]"#,
        ];
        for raw in cases {
            assert!(
                matches!(parse_widgets(raw), Err(Error::MalformedImport(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let raw = export_widgets(&[widget("a"), widget("a")]).unwrap();
        let err = parse_widgets(&raw).unwrap_err();
        assert!(err.to_string().contains("duplicate id a"));
    }
}
