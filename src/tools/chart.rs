//! Tool for rendering a year's trend chart
//!
//! This module implements the report_chart MCP tool.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::to_chart_rows;
use crate::chart::{render_svg, ChartKind, ChartLayout, Drawing};
use crate::domain::ValidationError;
use crate::storage::ReportStorage;
use crate::tools::ServiceError;

/// Parameters for rendering a chart
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ChartParams {
    /// Year to chart; defaults to the current year
    pub year: Option<i32>,
    /// Chart style: "line" (default) or "bar"
    pub kind: Option<String>,
    /// Output: "svg" (default) or "json" for the raw drawing
    pub format: Option<String>,
}

/// How a chart is handed back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    #[default]
    Svg,
    Json,
}

impl FromStr for ChartFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Ok(ChartFormat::Svg),
            "json" => Ok(ChartFormat::Json),
            other => Err(format!("Invalid chart format '{}'. Valid options: svg, json", other)),
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartFormat::Svg => write!(f, "svg"),
            ChartFormat::Json => write!(f, "json"),
        }
    }
}

/// A rendered chart
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChartOutput {
    Svg(String),
    Drawing(Drawing),
}

/// Render the chart of `kind` for one year of reports
pub fn render_chart<S: ReportStorage>(
    storage: &S,
    params: ChartParams,
    current_year: i32,
) -> Result<ChartOutput, ServiceError> {
    let kind = parse_option::<ChartKind>(params.kind.as_deref(), "kind")?;
    let format = parse_option::<ChartFormat>(params.format.as_deref(), "format")?;
    let year = params.year.unwrap_or(current_year);

    let reports = storage.list_reports_by_year(year)?;
    let drawing = kind.draw(&to_chart_rows(&reports), &ChartLayout::default());

    tracing::debug!("Rendered {} chart for {} as {}", kind, year, format);

    Ok(match format {
        ChartFormat::Svg => ChartOutput::Svg(render_svg(&drawing)?),
        ChartFormat::Json => ChartOutput::Drawing(drawing),
    })
}

fn parse_option<T>(value: Option<&str>, field: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = String> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|message| ValidationError::single(field, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, ReportInput, SystemClock};
    use crate::storage::SqliteStorage;
    use std::sync::Arc;

    fn storage_with_two_months() -> SqliteStorage {
        let storage = SqliteStorage::in_memory(Arc::new(SystemClock)).unwrap();
        for (month, new_books) in [(1, 25), (2, 32)] {
            storage
                .create_report(&ReportInput {
                    month,
                    year: 2024,
                    new_books,
                    books_borrowed: 300,
                    new_members: 15,
                    total_visitors: 1200,
                    fine_collections: Money::from_cents(18550),
                    notes: None,
                })
                .unwrap();
        }
        storage
    }

    #[test]
    fn test_default_chart_is_line_svg() {
        let storage = storage_with_two_months();

        match render_chart(&storage, ChartParams::default(), 2024).unwrap() {
            ChartOutput::Svg(svg) => {
                assert!(svg.contains("<svg"));
                assert_eq!(svg.matches("<polyline").count(), 8);
            }
            other => panic!("expected svg, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_chart_as_json() {
        let storage = storage_with_two_months();
        let params = ChartParams {
            year: Some(2024),
            kind: Some("bar".to_string()),
            format: Some("JSON".to_string()),
        };

        match render_chart(&storage, params, 2030).unwrap() {
            ChartOutput::Drawing(drawing) => {
                assert_eq!(drawing.rects.len(), 4);
                assert!(drawing.polylines.is_empty());
            }
            other => panic!("expected drawing, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_year_renders_empty_svg() {
        let storage = storage_with_two_months();

        match render_chart(&storage, ChartParams::default(), 2019).unwrap() {
            ChartOutput::Svg(svg) => {
                assert!(svg.trim_end().ends_with("</svg>"));
                assert!(!svg.contains("<polyline"));
            }
            other => panic!("expected svg, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_kind_and_format() {
        let storage = storage_with_two_months();

        let bad_kind = ChartParams {
            kind: Some("pie".to_string()),
            ..Default::default()
        };
        match render_chart(&storage, bad_kind, 2024) {
            Err(ServiceError::Validation(err)) => assert!(err.has("kind")),
            other => panic!("expected validation error, got {:?}", other),
        }

        let bad_format = ChartParams {
            format: Some("png".to_string()),
            ..Default::default()
        };
        match render_chart(&storage, bad_format, 2024) {
            Err(ServiceError::Validation(err)) => assert!(err.has("format")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
