//! Chart assembly and rendering.
//!
//! The renderer takes fully prepared line specs (date/value points, label,
//! palette slot, line style) plus chart metadata and draws one multi-series
//! chart per invocation. Output backend is chosen by file extension:
//! `.svg` writes a standalone markup file, anything else a PNG bitmap.

use crate::models::{Metric, Row};
use anyhow::{Result, anyhow};
use chrono::{Duration, NaiveDate};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

/// One-time registration of a bundled "sans-serif" font for the `ab_glyph`
/// text path, which does not discover OS fonts on its own.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
    });
}

/// Visual style of one line, so the three series kinds of a region stay
/// distinguishable while sharing the region's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Rolling average.
    Solid,
    /// Daily delta.
    Dashed,
    /// Raw cumulative counts (drawn as point markers).
    Dotted,
}

/// One line to draw: the renderer-facing contract.
#[derive(Debug, Clone)]
pub struct LineSpec {
    pub points: Vec<(NaiveDate, f64)>,
    pub label: String,
    /// Slot in the cyclic palette, assigned per region in request order.
    pub color_idx: usize,
    pub style: LineStyle,
}

/// Chart-level metadata.
#[derive(Debug, Clone)]
pub struct ChartMeta {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl ChartMeta {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }
}

/// Fixed cyclic palette (the classic Category10 colors); repeats when more
/// regions are requested than it has entries.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub fn palette_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Build the chart title: sorted, uppercased region ids, the observed date
/// span of the filtered dataset, the metric name, and a per-100k marker.
pub fn chart_title(ids: &[String], rows: &[Row], metric: Metric, per_capita: bool) -> String {
    let mut names: Vec<String> = ids.iter().map(|s| s.to_uppercase()).collect();
    names.sort();
    let span = match (
        rows.iter().map(|r| r.date).min(),
        rows.iter().map(|r| r.date).max(),
    ) {
        (Some(first), Some(last)) => format!(" {}-{}", first, last),
        _ => String::new(),
    };
    let marker = if per_capita { " per 100k" } else { "" };
    format!("{}{} {}{}", names.join("-"), span, metric.name(), marker)
}

/// Render the lines to `out_path` (default locale = "en" for y labels).
pub fn render<P: AsRef<Path>>(lines: &[LineSpec], meta: &ChartMeta, out_path: P) -> Result<()> {
    ensure_fonts_registered();

    if lines.iter().all(|l| l.points.is_empty()) {
        return Err(anyhow!("no data to plot"));
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    let dates = lines.iter().flat_map(|l| l.points.iter().map(|(d, _)| *d));
    let (mut min_date, mut max_date) = (
        dates.clone().min().ok_or_else(|| anyhow!("no dates"))?,
        dates.max().ok_or_else(|| anyhow!("no dates"))?,
    );
    if min_date == max_date {
        min_date = min_date - Duration::days(1);
        max_date = max_date + Duration::days(1);
    }

    let values = lines.iter().flat_map(|l| l.points.iter().map(|(_, v)| *v));
    let (mut min_val, mut max_val) = (
        values.clone().fold(f64::INFINITY, f64::min),
        values.fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root =
            SVGBackend::new(path_string.as_str(), (meta.width, meta.height)).into_drawing_area();
        draw_chart(root, lines, meta, min_date, max_date, min_val, max_val)?;
    } else {
        let root =
            BitMapBackend::new(path_string.as_str(), (meta.width, meta.height)).into_drawing_area();
        draw_chart(root, lines, meta, min_date, max_date, min_val, max_val)?;
    }

    Ok(())
}

/// Helper that draws to any Plotters backend.
#[allow(clippy::too_many_arguments)]
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    lines: &[LineSpec],
    meta: &ChartMeta,
    min_date: NaiveDate,
    max_date: NaiveDate,
    min_val: f64,
    max_val: f64,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&meta.title, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(min_date..max_date, min_val..max_val)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Axis label formatters: Y uses thousands separators; X is compact m/d
    let y_label_fmt = |v: &f64| {
        let n = (*v).round() as i64;
        n.to_formatted_string(&Locale::en)
    };
    let x_label_fmt = |d: &NaiveDate| d.format("%m/%d").to_string();

    // Limit label counts to avoid overlap
    let span_days = (max_date - min_date).num_days() + 1;
    let x_label_count = (span_days as usize).min(12);
    let y_label_count = 10usize;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Cases")
        .x_labels(x_label_count)
        .y_labels(y_label_count)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for line in lines {
        if line.points.is_empty() {
            continue;
        }
        let color = palette_color(line.color_idx).to_rgba();
        let style = ShapeStyle {
            color: color.clone(),
            filled: false,
            stroke_width: 2,
        };

        let anno = match line.style {
            LineStyle::Solid => chart
                .draw_series(LineSeries::new(line.points.clone(), style))
                .map_err(|e| anyhow!("{:?}", e))?,
            LineStyle::Dashed => chart
                .draw_series(DashedLineSeries::new(line.points.clone(), 6, 4, style))
                .map_err(|e| anyhow!("{:?}", e))?,
            LineStyle::Dotted => chart
                .draw_series(
                    line.points
                        .iter()
                        .map(|(d, v)| Circle::new((*d, *v), 2, color.filled())),
                )
                .map_err(|e| anyhow!("{:?}", e))?,
        };
        anno.label(line.label.clone())
            // Move the color into the closure; clone for each legend glyph draw
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.clone()));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
