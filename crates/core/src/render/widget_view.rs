use serde_json::Value;

use finboard_market_data::SessionState;

use super::render_model::{ChartSeries, FieldRow, TablePage, TableQuery, WidgetBody, WidgetView};
use crate::constants::TABLE_PAGE_SIZE;
use crate::fields::{display_value, label, resolve};
use crate::widgets::{DisplayMode, WidgetConfig};

/// Payload member holding the points of a chart widget.
pub const CHART_DATA_KEY: &str = "history";

const NO_HISTORY_MESSAGE: &str = "Chart requires historical array data.";
const NO_FIELD_MESSAGE: &str = "Select a field to plot.";

/// Build the view of one widget.
///
/// While the first fetch is pending the body is `Loading`; an error replaces
/// the content until a later poll succeeds. Otherwise the body follows the
/// widget's display mode.
pub fn render_widget(config: &WidgetConfig, state: &SessionState, query: &TableQuery) -> WidgetView {
    let data = state.data.as_deref();
    let body = if state.loading {
        WidgetBody::Loading
    } else if let Some(error) = &state.error {
        WidgetBody::Error {
            error: error.clone(),
        }
    } else {
        match config.display_mode {
            DisplayMode::Card => WidgetBody::Card {
                rows: card_rows(config, data),
            },
            DisplayMode::Table => WidgetBody::Table {
                table: table_page(card_rows(config, data), query),
            },
            DisplayMode::Chart => match chart_series(config, data) {
                Ok(series) => WidgetBody::Chart { series },
                Err(message) => WidgetBody::ChartUnavailable { message },
            },
        }
    };

    WidgetView {
        id: config.id.clone(),
        short_id: config.short_id().to_string(),
        name: config.name.clone(),
        description: config.description.clone(),
        display_mode: config.display_mode,
        refresh_interval_secs: config.refresh_interval_secs,
        body,
        data: state.data.clone(),
    }
}

/// One row per selected field, in selection order.
pub fn card_rows(config: &WidgetConfig, data: Option<&Value>) -> Vec<FieldRow> {
    config
        .selected_fields
        .iter()
        .map(|path| FieldRow {
            path: path.clone(),
            label: label(path),
            value: display_value(path, data.and_then(|d| resolve(d, path))),
        })
        .collect()
}

/// Filter rows by a case-insensitive label search and cut out one page.
/// Out-of-range pages are clamped.
pub fn table_page(rows: Vec<FieldRow>, query: &TableQuery) -> TablePage {
    let needle = query.search.to_lowercase();
    let filtered: Vec<FieldRow> = rows
        .into_iter()
        .filter(|row| row.label.to_lowercase().contains(&needle))
        .collect();

    let total_rows = filtered.len();
    let total_pages = total_rows.div_ceil(TABLE_PAGE_SIZE).max(1);
    let page = query.page.clamp(1, total_pages);

    let rows = filtered
        .into_iter()
        .skip((page - 1) * TABLE_PAGE_SIZE)
        .take(TABLE_PAGE_SIZE)
        .collect();

    TablePage {
        rows,
        total_rows,
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

/// The payload's `history` array keyed by the first selected field.
pub fn chart_series(config: &WidgetConfig, data: Option<&Value>) -> Result<ChartSeries, String> {
    let Some(data_key) = config.selected_fields.first() else {
        return Err(NO_FIELD_MESSAGE.to_string());
    };

    match data.and_then(|d| d.get(CHART_DATA_KEY)) {
        Some(Value::Array(points)) => Ok(ChartSeries {
            data_key: data_key.clone(),
            points: points.clone(),
        }),
        _ => Err(NO_HISTORY_MESSAGE.to_string()),
    }
}
