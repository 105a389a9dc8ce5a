//! Widget domain models.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use finboard_market_data::PollSpec;

use crate::constants::DEFAULT_REFRESH_INTERVAL_SECS;
use crate::errors::{Error, ValidationError};

/// How a widget presents its selected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Card,
    Table,
    Chart,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Card => "card",
            DisplayMode::Table => "table",
            DisplayMode::Chart => "chart",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(DisplayMode::Card),
            "table" => Ok(DisplayMode::Table),
            "chart" => Ok(DisplayMode::Chart),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown display mode: {}",
                other
            )))),
        }
    }
}

/// One dashboard tile. Configs are replaced wholesale, never patched.
///
/// Serialized field names match exported config files, e.g.
/// `{"id": "...", "name": "AAPL", "apiUrl": "/api/finnhub?symbol=AAPL&endpoint=quote",
/// "refreshInterval": 30, "displayMode": "card", "selectedFields": ["c", "dp"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "apiUrl", alias = "requestUrl")]
    pub request_url: String,
    #[serde(rename = "refreshInterval", alias = "refreshIntervalSeconds")]
    pub refresh_interval_secs: u64,
    pub display_mode: DisplayMode,
    #[serde(rename = "selectedFields", alias = "selectedFieldPaths", default)]
    pub selected_fields: Vec<String>,
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        if self.request_url.trim().is_empty() {
            return Err(ValidationError::MissingField("apiUrl".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ValidationError::InvalidRefreshInterval);
        }
        Ok(())
    }

    /// First `-`-delimited segment of the id, shown in widget headers.
    pub fn short_id(&self) -> &str {
        self.id.split('-').next().unwrap_or(&self.id)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn poll_spec(&self) -> PollSpec {
        PollSpec::new(self.request_url.clone(), self.refresh_interval_secs)
    }
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

/// Input model for creating a widget. The registry assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWidget {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "apiUrl", alias = "requestUrl")]
    pub request_url: String,
    #[serde(rename = "refreshInterval", default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(rename = "selectedFields", default)]
    pub selected_fields: Vec<String>,
}

impl NewWidget {
    pub fn new(name: impl Into<String>, request_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            request_url: request_url.into(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            display_mode: DisplayMode::default(),
            selected_fields: Vec::new(),
        }
    }

    /// Trim inputs, drop a blank description, and validate.
    pub fn into_config(self, id: String) -> Result<WidgetConfig, ValidationError> {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let config = WidgetConfig {
            id,
            name: self.name.trim().to_string(),
            description,
            request_url: self.request_url.trim().to_string(),
            refresh_interval_secs: self.refresh_interval_secs,
            display_mode: self.display_mode,
            selected_fields: self.selected_fields,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Persisted widget list record: `{ "widgets": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetsRecord {
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> WidgetConfig {
        WidgetConfig {
            id: "3f2a9c1e-1111-4222-8333-444455556666".to_string(),
            name: "AAPL".to_string(),
            description: None,
            request_url: "/api/finnhub?symbol=AAPL&endpoint=quote".to_string(),
            refresh_interval_secs: 30,
            display_mode: DisplayMode::Card,
            selected_fields: vec!["c".to_string(), "dp".to_string()],
        }
    }

    #[test]
    fn test_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "3f2a9c1e-1111-4222-8333-444455556666",
                "name": "AAPL",
                "apiUrl": "/api/finnhub?symbol=AAPL&endpoint=quote",
                "refreshInterval": 30,
                "displayMode": "card",
                "selectedFields": ["c", "dp"]
            })
        );
    }

    #[test]
    fn test_aliases_and_defaults() {
        let config: WidgetConfig = serde_json::from_value(json!({
            "id": "w1",
            "name": "IBM",
            "requestUrl": "/api/alphavantage?symbol=IBM",
            "refreshIntervalSeconds": 60,
            "displayMode": "table"
        }))
        .unwrap();
        assert_eq!(config.request_url, "/api/alphavantage?symbol=IBM");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.display_mode, DisplayMode::Table);
        assert!(config.selected_fields.is_empty());
    }

    #[test]
    fn test_null_selected_fields_rejected() {
        let result: Result<WidgetConfig, _> = serde_json::from_value(json!({
            "id": "w1",
            "name": "IBM",
            "apiUrl": "/x",
            "refreshInterval": 60,
            "displayMode": "card",
            "selectedFields": null
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(sample().short_id(), "3f2a9c1e");

        let mut plain = sample();
        plain.id = "abc".to_string();
        assert_eq!(plain.short_id(), "abc");
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut config = sample();
        config.refresh_interval_secs = 0;
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRefreshInterval)
        );

        let mut config = sample();
        config.name = "  ".to_string();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingField("name".to_string()))
        );
    }

    #[test]
    fn test_poll_spec_caps_huge_interval() {
        let mut config = sample();
        config.refresh_interval_secs = u64::MAX;
        assert!(config.validate().is_ok());
        assert_eq!(
            config.poll_spec().interval,
            Duration::from_secs(finboard_market_data::MAX_REFRESH_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_new_widget_normalizes() {
        let mut new = NewWidget::new("  Apple  ", " /api/finnhub?symbol=AAPL&endpoint=quote ");
        new.description = Some("   ".to_string());
        let config = new.into_config("id-1".to_string()).unwrap();
        assert_eq!(config.name, "Apple");
        assert_eq!(config.request_url, "/api/finnhub?symbol=AAPL&endpoint=quote");
        assert_eq!(config.description, None);
        assert_eq!(config.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);

        let blank = NewWidget::new("", "/x").into_config("id-2".to_string());
        assert!(blank.is_err());
    }
}
