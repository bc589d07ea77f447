//! Box footprints and label placeholders.
//!
//! Footprints are measured in pixels and converted to pad NDC with the pad's
//! final geometry, so they must only be computed after the margins are fixed.

use super::{PadGeometry, TextMetrics};
use crate::objects::Plottable;

/// Line height relative to the text size.
pub const LINE_SPACING: f64 = 1.2;
/// Width of a legend symbol relative to the text size.
pub const SYMBOL_WIDTH: f64 = 1.6;
/// Padding inside a box border, in pixels.
pub const BOX_PADDING_PX: f64 = 6.0;

/// Size of a box in pad NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Font settings used to measure a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font code.
    pub font: i16,
    /// Size in pixels.
    pub size: f64,
}

/// Footprint of a legend with `labels` laid out row by row in `columns` columns.
///
/// Every column is as wide as its widest label plus the symbol.
pub fn legend_footprint(
    labels: &[String],
    title: Option<&str>,
    columns: usize,
    text: TextStyle,
    metrics: &dyn TextMetrics,
    geometry: &PadGeometry,
) -> Footprint {
    let columns = columns.clamp(1, labels.len().max(1));
    let mut column_widths = vec![0.0_f64; columns];
    let mut line_height = text.size;
    for (index, label) in labels.iter().enumerate() {
        let (width, height) = metrics.measure(label, text.font, text.size);
        let column = &mut column_widths[index % columns];
        *column = column.max(width);
        line_height = line_height.max(height);
    }
    let symbol = SYMBOL_WIDTH * text.size;
    let mut width: f64 = column_widths.iter().map(|w| w + symbol).sum();
    let rows = labels.len().div_ceil(columns);
    let mut height = rows as f64 * line_height * LINE_SPACING;
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        let (title_width, title_height) = metrics.measure(title, text.font, text.size);
        width = width.max(title_width);
        height += title_height * LINE_SPACING;
    }
    to_ndc(width, height, geometry)
}

/// Footprint of a text box.
pub fn text_footprint(
    lines: &[&str],
    text: TextStyle,
    metrics: &dyn TextMetrics,
    geometry: &PadGeometry,
) -> Footprint {
    let (width, height) = lines
        .iter()
        .map(|line| metrics.measure(line, text.font, text.size))
        .fold((0.0_f64, 0.0_f64), |(w, h), (lw, lh)| {
            (w.max(lw), h + lh.max(text.size) * LINE_SPACING)
        });
    to_ndc(width, height, geometry)
}

fn to_ndc(width: f64, height: f64, geometry: &PadGeometry) -> Footprint {
    Footprint {
        width: geometry.pixels_to_ndc_x(width + 2.0 * BOX_PADDING_PX),
        height: geometry.pixels_to_ndc_y(height + 2.0 * BOX_PADDING_PX),
    }
}

/// Label placeholders.
const PLACEHOLDERS: [&str; 7] = [
    "<name>",
    "<title>",
    "<entries>",
    "<integral>",
    "<mean>",
    "<maximum>",
    "<minimum>",
];

/// Replace the first placeholder found in `label` by the property of `object`.
///
/// Only one substitution is made per label. Statistical placeholders are only
/// available for histograms and stay untouched otherwise.
pub fn substitute_placeholders(label: &str, object: &Plottable) -> String {
    let stats = object.statistics();
    let first = PLACEHOLDERS
        .iter()
        .filter_map(|token| label.find(token).map(|at| (at, *token)))
        .min_by_key(|(at, _)| *at);
    let Some((_, token)) = first else {
        return label.to_string();
    };
    let value = match (token, stats) {
        ("<name>", _) => object.name().to_string(),
        ("<title>", _) => object.title().to_string(),
        ("<entries>", Some(s)) => format!("{:.0}", s.entries),
        ("<integral>", Some(s)) => format_number(s.integral),
        ("<mean>", Some(s)) => format_number(s.mean),
        ("<maximum>", Some(s)) => format_number(s.maximum),
        ("<minimum>", Some(s)) => format_number(s.minimum),
        _ => return label.to_string(),
    };
    label.replacen(token, &value, 1)
}

fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e4).contains(&magnitude) {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        format!("{value:.3e}")
    }
}
