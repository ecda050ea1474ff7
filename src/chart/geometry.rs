//! Chart geometry: monthly chart rows to drawable coordinates
//!
//! Everything here is pure arithmetic over a handful of rows. The output is
//! a `Drawing` that any renderer (SVG, canvas, terminal) can consume.

use serde::{Deserialize, Serialize};

use crate::analytics::ChartRow;
use crate::domain::month_abbrev;

/// Fraction of the inner height the tallest bar reaches
pub const BAR_HEIGHT_RATIO: f64 = 0.8;

/// Horizontal gap between the two bars of one month
pub const BAR_GAP: f64 = 2.0;

/// Inner-height ratios at which horizontal grid lines are drawn
pub const GRID_RATIOS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Distance of axis labels from the bottom edge
const LABEL_OFFSET: f64 = 10.0;

/// Canvas dimensions for a chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// Width of the plotting area, excluding padding
    pub content_width: f64,
    /// Total height, including padding
    pub height: f64,
    /// Padding applied on every side
    pub padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            content_width: 600.0,
            height: 300.0,
            padding: 40.0,
        }
    }
}

impl ChartLayout {
    pub fn with_height(height: f64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Width of the whole canvas
    pub fn view_width(&self) -> f64 {
        self.content_width + self.padding * 2.0
    }

    pub fn inner_width(&self) -> f64 {
        self.content_width.max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.padding * 2.0).max(0.0)
    }

    /// Y coordinate of the zero line
    pub fn baseline(&self) -> f64 {
        self.padding + self.inner_height()
    }
}

/// Which monthly value a primitive represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    NewBooks,
    NewMembers,
    BooksBorrowed,
    Visitors,
    FineCollections,
}

impl Series {
    pub fn label(&self) -> &'static str {
        match self {
            Series::NewBooks => "New Books",
            Series::NewMembers => "New Members",
            Series::BooksBorrowed => "Books Borrowed",
            Series::Visitors => "Visitors",
            Series::FineCollections => "Fine Collections ($)",
        }
    }

    pub fn value(&self, row: &ChartRow) -> f64 {
        match self {
            Series::NewBooks => row.new_books as f64,
            Series::NewMembers => row.new_members as f64,
            Series::BooksBorrowed => row.books_borrowed as f64,
            Series::Visitors => row.total_visitors as f64,
            Series::FineCollections => row.fine_collections,
        }
    }
}

/// Line chart series, in drawing order
pub const LINE_SERIES: [Series; 3] = [Series::NewBooks, Series::NewMembers, Series::BooksBorrowed];

/// Bar chart series, left bar first
pub const BAR_SERIES: [Series; 2] = [Series::Visitors, Series::FineCollections];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub series: Series,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub series: Series,
}

/// Horizontal guide line across the plotting area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Text centred at (x, y)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Renderer-neutral description of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub grid_lines: Vec<GridLine>,
    pub polylines: Vec<Polyline>,
    pub rects: Vec<Rect>,
    pub labels: Vec<AxisLabel>,
}

impl Drawing {
    /// A canvas with nothing on it
    pub fn blank(layout: &ChartLayout) -> Self {
        Self {
            width: layout.view_width(),
            height: layout.height,
            grid_lines: Vec::new(),
            polylines: Vec::new(),
            rects: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// True when there is no data to draw
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty() && self.rects.is_empty()
    }

    /// Series present in the drawing, in first-seen order
    pub fn series(&self) -> Vec<Series> {
        let mut seen = Vec::new();
        let all = self
            .polylines
            .iter()
            .map(|line| line.series)
            .chain(self.rects.iter().map(|rect| rect.series));
        for series in all {
            if !seen.contains(&series) {
                seen.push(series);
            }
        }
        seen
    }

    fn add_grid(&mut self, layout: &ChartLayout) {
        let inner_height = layout.inner_height();
        self.grid_lines = GRID_RATIOS
            .iter()
            .map(|ratio| GridLine {
                x1: layout.padding,
                x2: layout.padding + layout.inner_width(),
                y: layout.baseline() - ratio * inner_height,
            })
            .collect();
    }
}

/// Three-series line chart of new books, new members and books borrowed
///
/// All series share one vertical scale; an all-zero data set sits on the
/// baseline. A single row is drawn at the left edge.
pub fn line_chart(rows: &[ChartRow], layout: &ChartLayout) -> Drawing {
    let mut drawing = Drawing::blank(layout);
    if rows.is_empty() {
        return drawing;
    }

    let inner_height = layout.inner_height();
    let x_step = layout.inner_width() / rows.len().saturating_sub(1).max(1) as f64;
    let max_value = rows
        .iter()
        .map(|row| row.new_books.max(row.books_borrowed).max(row.new_members))
        .max()
        .unwrap_or(0) as f64;

    let x_at = |index: usize| layout.padding + index as f64 * x_step;
    let y_at = |value: f64| {
        if max_value > 0.0 {
            layout.baseline() - value * (inner_height / max_value)
        } else {
            layout.baseline()
        }
    };

    drawing.add_grid(layout);
    drawing.polylines = LINE_SERIES
        .iter()
        .map(|series| Polyline {
            series: *series,
            points: rows
                .iter()
                .enumerate()
                .map(|(index, row)| Point {
                    x: x_at(index),
                    y: y_at(series.value(row)),
                })
                .collect(),
        })
        .collect();
    drawing.labels = rows
        .iter()
        .enumerate()
        .map(|(index, row)| AxisLabel {
            x: x_at(index),
            y: layout.height - LABEL_OFFSET,
            text: month_abbrev(row.month).to_string(),
        })
        .collect();

    drawing
}

/// Side-by-side bars of visitors and fine collections per month
///
/// Each series is scaled to its own maximum; a series whose maximum is zero
/// gets zero-height bars.
pub fn bar_chart(rows: &[ChartRow], layout: &ChartLayout) -> Drawing {
    let mut drawing = Drawing::blank(layout);
    if rows.is_empty() {
        return drawing;
    }

    let count = rows.len() as f64;
    let inner_height = layout.inner_height();
    let slot_width = layout.inner_width() / count;
    let bar_width = layout.inner_width() / (count * 2.5);

    let series_max = |series: Series| {
        rows.iter()
            .map(|row| series.value(row))
            .fold(0.0_f64, f64::max)
    };
    let maxima: Vec<(Series, f64)> = BAR_SERIES.iter().map(|s| (*s, series_max(*s))).collect();

    drawing.add_grid(layout);
    for (index, row) in rows.iter().enumerate() {
        let slot_x = layout.padding + index as f64 * slot_width + slot_width / 4.0;
        for (position, (series, max)) in maxima.iter().enumerate() {
            let height = if *max > 0.0 {
                series.value(row) / max * inner_height * BAR_HEIGHT_RATIO
            } else {
                0.0
            };
            drawing.rects.push(Rect {
                x: slot_x + position as f64 * (bar_width + BAR_GAP),
                y: layout.baseline() - height,
                width: bar_width,
                height,
                series: *series,
            });
        }
    }
    drawing.labels = rows
        .iter()
        .enumerate()
        .map(|(index, row)| AxisLabel {
            x: layout.padding + index as f64 * slot_width + slot_width / 2.0,
            y: layout.height - LABEL_OFFSET,
            text: month_abbrev(row.month).to_string(),
        })
        .collect();

    drawing
}
