//! Chart rendering of monthly trends
//!
//! `geometry` turns chart rows into a renderer-neutral `Drawing`; `svg`
//! turns a drawing into an SVG document.

pub mod geometry;
pub mod svg;

pub use geometry::*;
pub use svg::{render_svg, RenderError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analytics::ChartRow;

/// The two chart styles the reports page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// New books, new members and books borrowed as lines
    #[default]
    Line,
    /// Visitors and fine collections as bars
    Bar,
}

impl ChartKind {
    /// Compute the drawing for this kind of chart
    pub fn draw(&self, rows: &[ChartRow], layout: &ChartLayout) -> Drawing {
        match self {
            ChartKind::Line => line_chart(rows, layout),
            ChartKind::Bar => bar_chart(rows, layout),
        }
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            other => Err(format!("Invalid chart kind '{}'. Valid options: line, bar", other)),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => write!(f, "line"),
            ChartKind::Bar => write!(f, "bar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_parsing() {
        assert_eq!("line".parse::<ChartKind>(), Ok(ChartKind::Line));
        assert_eq!(" BAR ".parse::<ChartKind>(), Ok(ChartKind::Bar));
        assert!("pie".parse::<ChartKind>().is_err());
        assert_eq!(ChartKind::default().to_string(), "line");
    }
}
