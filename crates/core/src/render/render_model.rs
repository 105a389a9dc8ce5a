use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use finboard_market_data::SessionError;

use crate::fields::{coerce_number, resolve};
use crate::widgets::DisplayMode;

/// A selected field with its label and display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRow {
    pub path: String,
    pub label: String,
    pub value: String,
}

/// Search text and 1-based page for table widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: first_page(),
        }
    }
}

impl TableQuery {
    pub fn new(search: impl Into<String>, page: usize) -> Self {
        Self {
            search: search.into(),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub rows: Vec<FieldRow>,
    /// Rows left after the search filter, across all pages.
    pub total_rows: usize,
    pub page: usize,
    /// Never below 1, even with no rows.
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Points for a line chart plus the path plotted on the y axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub data_key: String,
    pub points: Vec<Value>,
}

impl ChartSeries {
    /// The plotted value of each point, `None` where it is missing or not numeric.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points
            .iter()
            .map(|point| resolve(point, &self.data_key).and_then(coerce_number))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WidgetBody {
    Loading,
    Error { error: SessionError },
    Card { rows: Vec<FieldRow> },
    Table { table: TablePage },
    Chart { series: ChartSeries },
    ChartUnavailable { message: String },
}

/// Everything needed to draw one widget tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub description: Option<String>,
    pub display_mode: DisplayMode,
    pub refresh_interval_secs: u64,
    pub body: WidgetBody,
    #[serde(skip)]
    pub data: Option<Arc<Value>>,
}
