//! SVG rendering of chart drawings
//!
//! A `Drawing` is replayed onto a plotters SVG backend; the geometry itself
//! stays in `chart::geometry`.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;

use crate::chart::geometry::{Drawing, Point, Series};

const GRID_COLOR: RGBColor = RGBColor(0xe5, 0xe7, 0xeb);
const LABEL_COLOR: RGBColor = RGBColor(0x6b, 0x72, 0x80);
const LEGEND_TEXT_COLOR: RGBColor = RGBColor(0x37, 0x41, 0x51);

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f64 = 12.0;

/// Horizontal offsets of legend entries, relative to the left padding
const LEGEND_OFFSETS: [f64; 5] = [0.0, 100.0, 220.0, 340.0, 460.0];
const LEGEND_TOP: f64 = 20.0;

/// Failure while writing the SVG document
#[derive(Error, Debug)]
#[error("Failed to render chart: {0}")]
pub struct RenderError(String);

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError(err.to_string())
    }
}

fn series_color(series: Series) -> RGBColor {
    match series {
        Series::NewBooks => RGBColor(0x3b, 0x82, 0xf6),
        Series::NewMembers => RGBColor(0x10, 0xb9, 0x81),
        Series::BooksBorrowed => RGBColor(0x8b, 0x5c, 0xf6),
        Series::Visitors => RGBColor(0xf5, 0x9e, 0x0b),
        Series::FineCollections => RGBColor(0xef, 0x44, 0x44),
    }
}

fn stroke_width(series: Series) -> u32 {
    match series {
        Series::BooksBorrowed => 2,
        _ => 3,
    }
}

/// Backend pixel for a drawing coordinate
fn pixel(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn pixels(points: &[Point]) -> Vec<(i32, i32)> {
    points.iter().map(|point| pixel(point.x, point.y)).collect()
}

fn text_style<'a>(color: &RGBColor, anchor: HPos) -> TextStyle<'a> {
    (FONT_FAMILY, FONT_SIZE)
        .into_font()
        .color(color)
        .pos(Pos::new(anchor, VPos::Bottom))
}

/// Render a drawing as a standalone SVG document
///
/// An empty drawing yields an `<svg>` element with nothing inside.
pub fn render_svg(drawing: &Drawing) -> Result<String, RenderError> {
    let size = (
        drawing.width.max(0.0).round() as u32,
        drawing.height.max(0.0).round() as u32,
    );

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();

        if !drawing.is_empty() {
            draw_contents(&root, drawing)?;
        }

        root.present()?;
    }

    Ok(buffer)
}

fn draw_contents<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    drawing: &Drawing,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for line in &drawing.grid_lines {
        root.draw(&PathElement::new(
            vec![pixel(line.x1, line.y), pixel(line.x2, line.y)],
            ShapeStyle::from(&GRID_COLOR).stroke_width(1),
        ))?;
    }

    for rect in &drawing.rects {
        root.draw(&Rectangle::new(
            [
                pixel(rect.x, rect.y),
                pixel(rect.x + rect.width, rect.y + rect.height),
            ],
            ShapeStyle::from(&series_color(rect.series)).filled(),
        ))?;
    }

    for line in &drawing.polylines {
        root.draw(&PathElement::new(
            pixels(&line.points),
            ShapeStyle::from(&series_color(line.series)).stroke_width(stroke_width(line.series)),
        ))?;
    }

    for label in &drawing.labels {
        root.draw(&Text::new(
            label.text.clone(),
            pixel(label.x, label.y),
            text_style(&LABEL_COLOR, HPos::Center),
        ))?;
    }

    draw_legend(root, drawing)
}

/// Legend swatches: thin strokes for line series, squares for bar series
fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    drawing: &Drawing,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let padding = drawing
        .grid_lines
        .first()
        .map(|line| line.x1)
        .unwrap_or(0.0);
    let bars = !drawing.rects.is_empty();
    let (swatch_height, text_y) = if bars { (12.0, 10.0) } else { (3.0, 8.0) };

    for (series, offset) in drawing.series().into_iter().zip(LEGEND_OFFSETS) {
        let x = padding + offset;
        root.draw(&Rectangle::new(
            [
                pixel(x, LEGEND_TOP),
                pixel(x + 12.0, LEGEND_TOP + swatch_height),
            ],
            ShapeStyle::from(&series_color(series)).filled(),
        ))?;
        root.draw(&Text::new(
            series.label(),
            pixel(x + 20.0, LEGEND_TOP + text_y),
            text_style(&LEGEND_TEXT_COLOR, HPos::Left),
        ))?;
    }

    Ok(())
}
