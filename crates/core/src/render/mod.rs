//! Turn a widget config and its session state into a presentable view.

mod render_model;
mod widget_view;

pub use render_model::{ChartSeries, FieldRow, TablePage, TableQuery, WidgetBody, WidgetView};
pub use widget_view::{card_rows, chart_series, render_widget, table_page, CHART_DATA_KEY};
