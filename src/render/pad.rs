//! Drawing of a single pad.
//!
//! The steps run in a fixed order because later steps read what earlier ones
//! produced: data are drawn first, the axes are finalized from the first drawn
//! series, 2D pads then make room for their colour scale, boxes are measured and
//! placed against the final geometry and the log/grid switches are applied last.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use super::RenderContext;
use crate::attributes::{Color, LineStyle};
use crate::control::{self, ControlFlags, DrawStyle};
use crate::defaults::{self, Appearance, resolve_appearance};
use crate::error::LayoutError;
use crate::figure::{
    AxisFrame, AxisSet, Legend, LegendRow, PadCanvas, PadScales, PaletteRequest, Primitive,
    PrimitiveId, ReferenceLine, Series, TextBlock,
};
use crate::layout::{
    Footprint, Margins, NdcRect, PadGeometry, TextStyle, auto_place, exclusion_rects,
    legend_footprint, substitute_placeholders, text_footprint,
};
use crate::objects::{Plottable, PlottableKind, bind_and_clone};
use crate::ratio::{ErrorPropagation, divide};
use crate::registry::DataRegistry;
use crate::spec::{Axis, AxisLetter, AxisRange, Data, DataEntry, LegendBox, Overlay, Pad, PadBox};
use crate::style::Style;

/// Relative room left above the data.
const HEADROOM: f64 = 0.05;

/// Pad to draw.
pub(crate) struct PadInput<'a> {
    pub id: u8,
    pub pad: &'a Pad,
    /// Every drawable pad of the plot, for linked axes.
    pub all_pads: &'a [(u8, Pad)],
    pub canvas_size: (u32, u32),
}

/// Series that may show up in a legend.
struct LegendCandidate {
    series: PrimitiveId,
    label: String,
    letters: &'static str,
    legend_id: u8,
}

/// Draw one pad. Returns `None` if the style has no pad with this ID.
pub(crate) fn render_pad(
    ctx: &mut RenderContext<'_>,
    input: PadInput<'_>,
    registry: &dyn DataRegistry,
) -> Option<PadCanvas> {
    let PadInput {
        id,
        pad,
        all_pads,
        canvas_size,
    } = input;
    let style = ctx.style;
    let Some(pad_style) = style.pad(id) else {
        warn!(plot = ctx.plot.as_str(), pad = id, "style defines no such pad, skipping");
        return None;
    };

    let geometry = PadGeometry {
        rect: pad.position.unwrap_or(pad_style.position),
        margins: Margins::new(
            pad.margin_top.unwrap_or(pad_style.margins.top),
            pad.margin_bottom.unwrap_or(pad_style.margins.bottom),
            pad.margin_left.unwrap_or(pad_style.margins.left),
            pad.margin_right.unwrap_or(pad_style.margins.right),
        ),
        canvas_width: canvas_size.0,
        canvas_height: canvas_size.1,
    };
    let state = ctx.pad_state(pad, pad_style);
    let mut canvas = PadCanvas::new(id, geometry, state);
    canvas.title = pad.title.clone().or_else(|| pad_style.title.clone());
    canvas.fill_color = pad.fill_color;
    canvas.frame_fill_color = pad.frame_fill_color;

    let pad_flags = ControlFlags::parse_opt(pad.options.as_deref());
    let overrides = effective_axes(id, pad, all_pads, style);
    let scales = pad_scales(pad_flags, &overrides);

    let (candidates, drawn) = draw_data(ctx, &mut canvas, pad, pad_flags, registry);
    if let Some(y) = pad.ref_value {
        canvas.push(Primitive::ReferenceLine(ReferenceLine {
            y,
            color: Color::BLACK,
            line_style: LineStyle::DASHED,
            line_width: state.line_width,
        }));
    }

    finalize_axes(ctx, &mut canvas, &overrides, scales);
    if owner_is_2d(&canvas) {
        make_room_for_palette(ctx, &mut canvas, pad);
    }
    place_boxes(ctx, &mut canvas, pad, &candidates, &drawn);

    canvas.scales = scales;
    debug!(
        plot = ctx.plot.as_str(),
        pad = id,
        primitives = canvas.primitives.len(),
        "pad drawn"
    );
    Some(canvas)
}

/// Draw every datum of the pad in order.
///
/// Returns the legend candidates and, per data entry, the series drawn for it.
fn draw_data(
    ctx: &mut RenderContext<'_>,
    canvas: &mut PadCanvas,
    pad: &Pad,
    pad_flags: ControlFlags,
    registry: &dyn DataRegistry,
) -> (Vec<LegendCandidate>, Vec<Option<PrimitiveId>>) {
    let id = canvas.id;
    let mut cycle_index = 0usize;
    let mut candidates = Vec::new();
    let mut drawn = vec![None; pad.data.len()];

    for (position, entry) in pad.data.iter().enumerate() {
        let data = entry.data();
        let identity = data.identity();
        let bound = match bind_and_clone(&identity, registry, id) {
            Ok(bound) => bound,
            Err(err) => {
                ctx.report(err);
                continue;
            }
        };
        let mut plottable = bound.plottable;

        if let DataEntry::Ratio(ratio) = entry {
            let denominator_identity = ratio.denominator.identity();
            let denominator = match bind_and_clone(&denominator_identity, registry, id) {
                Ok(bound) => bound.plottable,
                Err(err) => {
                    ctx.report(err);
                    continue;
                }
            };
            plottable = match divide(
                plottable,
                &denominator,
                ErrorPropagation::from_correlated(ratio.correlated),
                id,
                (&identity, &denominator_identity),
            ) {
                Ok(quotient) => quotient,
                Err(err) => {
                    ctx.report(err);
                    continue;
                }
            };
            if canvas.series().next().is_none() {
                draw_ratio_frame(ctx, canvas, pad, data, &plottable, bound.kind, &mut cycle_index);
            }
        }

        let flags = pad_flags.union(ControlFlags::parse_opt(data.options.as_deref()));
        prepare(&mut plottable, data, flags);

        let is_function = matches!(plottable, Plottable::Function1d(_) | Plottable::Function2d(_));
        let draw_style = DrawStyle::resolve(data.options.as_deref(), plottable.is_2d(), is_function);
        let appearance = resolve_appearance(data, pad, ctx.style, flags, draw_style, cycle_index);
        let owns_axes = canvas.series().next().is_none();
        let base = match (&data.draw_option, draw_style) {
            (Some(option), _) => option.clone(),
            (None, DrawStyle::ColorMap) => ctx.style.draw_option_2d.clone(),
            (None, style) => style.option().to_string(),
        };
        let draw_option = control::draw_option(&base, plottable.is_graph(), owns_axes);
        if plottable.is_2d() && draw_option.contains('Z') {
            canvas.request_palette(PaletteRequest {
                width: ctx.style.color_scale.width,
                palette: canvas.style.palette,
                contours: canvas.style.contours,
            });
        }
        let label = data
            .label
            .as_deref()
            .filter(|label| !label.is_empty())
            .map(|label| substitute_placeholders(label, &plottable));

        trace!(pad = id, identity = identity.as_str(), draw_option = draw_option.as_str(), "drawing");
        let series = canvas.push(Primitive::Series(Box::new(Series {
            identity,
            plottable,
            kind: bound.kind,
            draw_style,
            draw_option,
            appearance,
            label: label.clone(),
            owns_axes,
        })));
        drawn[position] = Some(series);
        if let Some(label) = label.filter(|_| draw_style.is_visible()) {
            candidates.push(LegendCandidate {
                series,
                label,
                letters: draw_style.legend_letters(appearance.is_filled()),
                legend_id: data.legend_id.unwrap_or(1),
            });
        }
        cycle_index += 1;
    }
    (candidates, drawn)
}

/// Range cut, normalization and scaling, in this order.
fn prepare(plottable: &mut Plottable, data: &Data, flags: ControlFlags) {
    if let Some(range) = data.range {
        plottable.cut_x(range);
    }
    if flags.normalize || data.normalize.unwrap_or(false) {
        plottable.normalize();
    }
    if let Some(factor) = data.scale {
        plottable.scale(factor);
    }
}

/// Draw an invisible axis carrier and the line at one before the first ratio.
///
/// The line takes the colour of the current cycle slot and consumes it.
fn draw_ratio_frame(
    ctx: &RenderContext<'_>,
    canvas: &mut PadCanvas,
    pad: &Pad,
    data: &Data,
    quotient: &Plottable,
    kind: PlottableKind,
    cycle_index: &mut usize,
) {
    let carrier_base = if quotient.is_graph() { "" } else { "AXIS" };
    let appearance = resolve_appearance(
        data,
        pad,
        ctx.style,
        ControlFlags::default(),
        DrawStyle::None,
        *cycle_index,
    );
    canvas.push(Primitive::Series(Box::new(Series {
        identity: data.identity(),
        plottable: quotient.clone(),
        kind,
        draw_style: DrawStyle::None,
        draw_option: control::draw_option(carrier_base, quotient.is_graph(), true),
        appearance,
        label: None,
        owns_axes: true,
    })));
    canvas.push(Primitive::ReferenceLine(reference_line(ctx.style, pad, &appearance, *cycle_index)));
    *cycle_index += 1;
}

fn reference_line(style: &Style, pad: &Pad, appearance: &Appearance, index: usize) -> ReferenceLine {
    ReferenceLine {
        y: 1.0,
        color: defaults::resolve(
            None,
            pad.default_colors.as_deref(),
            &style.default_colors,
            Color::BLACK,
            index,
        ),
        line_style: appearance.line_style,
        line_width: appearance.line_width,
    }
}

/// Axis overrides of the pad, completed from the pads it is linked with.
///
/// The pad's own settings win; among linked pads the one with the highest ID wins.
fn effective_axes(
    pad_id: u8,
    pad: &Pad,
    all_pads: &[(u8, Pad)],
    style: &Style,
) -> BTreeMap<AxisLetter, Axis> {
    AxisLetter::ALL
        .into_iter()
        .map(|letter| {
            let mut axis = pad.axes.get(&letter).cloned().unwrap_or_default();
            for linked in style.linked_pads(pad_id, letter).into_iter().rev() {
                let shared = all_pads
                    .iter()
                    .find(|(id, _)| *id == linked)
                    .and_then(|(_, other)| other.axes.get(&letter));
                if let Some(shared) = shared {
                    axis.overlay(&Axis {
                        range: shared.range,
                        title: shared.title.clone(),
                        log: shared.log,
                        ..Axis::default()
                    });
                }
            }
            (letter, axis)
        })
        .collect()
}

fn pad_scales(flags: ControlFlags, axes: &BTreeMap<AxisLetter, Axis>) -> PadScales {
    let log = |letter, flag| axes.get(&letter).and_then(|a| a.log).unwrap_or(flag);
    let grid = |letter, flag| axes.get(&letter).and_then(|a| a.grid).unwrap_or(flag);
    PadScales {
        log_x: log(AxisLetter::X, flags.log_x),
        log_y: log(AxisLetter::Y, flags.log_y),
        log_z: log(AxisLetter::Z, flags.log_z),
        grid_x: grid(AxisLetter::X, flags.grid_x),
        grid_y: grid(AxisLetter::Y, flags.grid_y),
    }
}

/// Build the axes from the first drawn series and apply the overrides.
fn finalize_axes(
    ctx: &mut RenderContext<'_>,
    canvas: &mut PadCanvas,
    overrides: &BTreeMap<AxisLetter, Axis>,
    scales: PadScales,
) {
    let Some((owner, plottable)) = canvas.series().next().map(|(id, s)| (id, &s.plottable)) else {
        ctx.report(LayoutError::MissingAxisOwner { pad: canvas.id });
        return;
    };
    let (x, y, z) = data_ranges(plottable, scales);
    let state = &canvas.style;
    let frame = |letter: AxisLetter, range: AxisRange, log: bool, grid: bool| {
        let over = overrides.get(&letter).cloned().unwrap_or_default();
        axis_frame(letter, range, &over, state, log, grid)
    };
    let axes = AxisSet {
        owner,
        x: frame(AxisLetter::X, x, scales.log_x, scales.grid_x),
        y: frame(AxisLetter::Y, y, scales.log_y, scales.grid_y),
        z: z.map(|z| frame(AxisLetter::Z, z, scales.log_z, false)),
    };
    canvas.axes = Some(axes);
}

fn axis_frame(
    letter: AxisLetter,
    range: AxisRange,
    over: &Axis,
    state: &super::StyleState,
    log: bool,
    grid: bool,
) -> AxisFrame {
    AxisFrame {
        letter,
        range: over.range.filter(AxisRange::is_valid).unwrap_or(range),
        title: over.title.clone(),
        title_offset: over.title_offset.unwrap_or(state.title_offsets[letter as usize]),
        title_size: over.title_size.unwrap_or(state.text.title_size),
        label_size: over.label_size.unwrap_or(state.text.label_size),
        tick_length: over.tick_length.unwrap_or(state.tick_length),
        num_divisions: over.num_divisions,
        center_title: over.center_title.unwrap_or(false),
        log,
        grid,
    }
}

/// Default x, y and z ranges shown for `plottable`.
fn data_ranges(plottable: &Plottable, scales: PadScales) -> (AxisRange, AxisRange, Option<AxisRange>) {
    let x = plottable.x_range();
    if plottable.is_2d() {
        let z = plottable.z_range().map(|z| {
            let mut min = z.min;
            if scales.log_z && min <= 0.0 {
                min = smallest_positive(plottable).map_or(1e-3, |v| 0.5 * v);
            }
            let max = if z.max > min { z.max } else { min + 1.0 };
            AxisRange::new(min, max)
        });
        return (x, plottable.y_range(), z);
    }
    let y = with_headroom(
        plottable.y_range(),
        plottable.is_histogram(),
        scales.log_y,
        smallest_positive(plottable),
    );
    (x, y, None)
}

fn with_headroom(range: AxisRange, from_zero: bool, log: bool, smallest_positive: Option<f64>) -> AxisRange {
    let mut min = if from_zero && range.min >= 0.0 { 0.0 } else { range.min };
    let span = range.max - min;
    let span = if span > 0.0 { span } else { range.max.abs().max(1.0) };
    let mut max = range.max + HEADROOM * span;
    if min < 0.0 {
        min -= HEADROOM * span;
    }
    if log && min <= 0.0 {
        min = smallest_positive.map_or(max * 1e-3, |v| 0.5 * v);
    }
    if max <= min {
        max = min + 1.0;
    }
    AxisRange::new(min, max)
}

/// Smallest positive value drawn, for log axes.
fn smallest_positive(plottable: &Plottable) -> Option<f64> {
    let values: Vec<f64> = match plottable {
        Plottable::Hist1d(hist) => hist.contents.to_vec(),
        Plottable::Hist2d(hist) => hist.contents.iter().copied().collect(),
        Plottable::Graph1d(graph) => graph.points().iter().map(|p| p.y).collect(),
        Plottable::Graph2d(graph) => graph.points.iter().map(|p| p.z).collect(),
        Plottable::Function1d(function) => function
            .sample(crate::objects::FUNCTION_SAMPLES)
            .into_iter()
            .map(|(_, y)| y)
            .collect(),
        Plottable::Function2d(_) => return None,
    };
    values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .min_by(f64::total_cmp)
}

fn owner_is_2d(canvas: &PadCanvas) -> bool {
    canvas
        .axes
        .as_ref()
        .and_then(|axes| canvas.get(axes.owner))
        .and_then(Primitive::as_series)
        .is_some_and(|series| series.plottable.is_2d())
}

/// Widen the right margin for the colour scale and nudge the scale off the frame.
fn make_room_for_palette(ctx: &mut RenderContext<'_>, canvas: &mut PadCanvas, pad: &Pad) {
    let color_scale = ctx.style.color_scale;
    let pad_id = canvas.id;
    let margins = &mut canvas.geometry.margins;
    margins.right = margins.right.max(color_scale.right_margin);
    if pad.margin_top.is_none() {
        margins.top *= color_scale.vertical_margin_scale;
    }
    if pad.margin_bottom.is_none() {
        margins.bottom *= color_scale.vertical_margin_scale;
    }
    canvas.update();
    match canvas.palette_mut() {
        Some(palette) => palette.rect = palette.rect.shifted_x(color_scale.offset),
        None => ctx.report(LayoutError::MissingPalette { pad: pad_id }),
    }
    canvas.update();
}

/// Measure and place every box of the pad, in order.
fn place_boxes(
    ctx: &mut RenderContext<'_>,
    canvas: &mut PadCanvas,
    pad: &Pad,
    candidates: &[LegendCandidate],
    drawn: &[Option<PrimitiveId>],
) {
    let mut legend_number = 0u8;
    for (box_index, pad_box) in pad.boxes.iter().enumerate() {
        let style = pad_box.style().clone();
        let text = TextStyle {
            font: style.text_font.unwrap_or(canvas.style.text.font),
            size: style.text_size.unwrap_or(canvas.style.text.size),
        };
        let primitive = match pad_box {
            PadBox::Legend(legend) => {
                legend_number = legend_number.saturating_add(1);
                let rows = legend_rows(legend, legend_number, candidates, drawn, canvas);
                let labels: Vec<String> = rows.iter().map(|row| row.label.clone()).collect();
                let columns = usize::from(legend.columns.unwrap_or(1)).max(1);
                let footprint = legend_footprint(
                    &labels,
                    legend.title.as_deref(),
                    columns,
                    text,
                    ctx.metrics,
                    &canvas.geometry,
                );
                Primitive::Legend(Legend {
                    rect: box_rect(ctx, canvas, pad_box, box_index, footprint),
                    title: legend.title.clone(),
                    columns,
                    rows,
                    style,
                    text,
                })
            }
            PadBox::Text(text_box) => {
                let lines = text_box.lines();
                let footprint = text_footprint(&lines, text, ctx.metrics, &canvas.geometry);
                Primitive::Text(TextBlock {
                    rect: box_rect(ctx, canvas, pad_box, box_index, footprint),
                    lines: lines.into_iter().map(str::to_string).collect(),
                    style,
                    text,
                })
            }
        };
        canvas.push(primitive);
    }
}

/// Rows of the `number`-th legend of a pad: matching labeled series, then explicit entries.
fn legend_rows(
    legend: &LegendBox,
    number: u8,
    candidates: &[LegendCandidate],
    drawn: &[Option<PrimitiveId>],
    canvas: &PadCanvas,
) -> Vec<LegendRow> {
    let mut rows: Vec<LegendRow> = candidates
        .iter()
        .filter(|candidate| candidate.legend_id == number)
        .map(|candidate| LegendRow {
            label: candidate.label.clone(),
            letters: candidate.letters.to_string(),
            series: Some(candidate.series),
        })
        .collect();
    for entry in &legend.entries {
        let series_id = entry.data_index.and_then(|index| drawn.get(index).copied().flatten());
        let series = series_id.and_then(|id| canvas.get(id)).and_then(Primitive::as_series);
        let letters = entry.draw_style.clone().unwrap_or_else(|| {
            series
                .map(|s| s.draw_style.legend_letters(s.appearance.is_filled()).to_string())
                .unwrap_or_default()
        });
        let label = match series {
            Some(s) => substitute_placeholders(&entry.label, &s.plottable),
            None => entry.label.clone(),
        };
        rows.push(LegendRow {
            label,
            letters,
            series: series_id,
        });
    }
    rows
}

/// Position of a box: its explicit corner, or a free spot inside the frame.
fn box_rect(
    ctx: &mut RenderContext<'_>,
    canvas: &mut PadCanvas,
    pad_box: &PadBox,
    box_index: usize,
    footprint: Footprint,
) -> NdcRect {
    match pad_box.explicit_position() {
        Some(at) if pad_box.uses_user_coordinates() => {
            let (x, y) = canvas.transform().map_or((at.x, at.y), |t| t.to_ndc(at.x, at.y));
            NdcRect::from_corner(x, y, footprint.width, footprint.height)
        }
        Some(at) => NdcRect::from_corner(at.x, at.y, footprint.width, footprint.height),
        None => auto_rect(ctx, canvas, box_index, footprint),
    }
}

/// Auto-place a box with the tick bands blocked by temporary exclusion primitives.
fn auto_rect(
    ctx: &mut RenderContext<'_>,
    canvas: &mut PadCanvas,
    box_index: usize,
    footprint: Footprint,
) -> NdcRect {
    let frame = canvas.geometry.frame();
    let (tick_x, tick_y) = canvas.axes.as_ref().map_or(
        (canvas.style.tick_length, canvas.style.tick_length),
        |axes| (axes.x.tick_length, axes.y.tick_length),
    );
    let bands = exclusion_rects(&frame, tick_x, tick_y);
    let kept = canvas.primitives.len();
    for band in bands {
        canvas.push(Primitive::Exclusion(band));
    }
    let shapes = canvas.shapes();
    let placement = auto_place(&shapes, &bands, footprint, &frame, &canvas.geometry, ctx.placement);
    canvas.primitives.truncate(kept);
    if placement.fallback {
        ctx.report(LayoutError::NoFreePlacement {
            pad: canvas.id,
            box_index,
        });
    }
    trace!(pad = canvas.id, box_index, rect = ?placement.rect, "placed box");
    placement.rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_histogram_range_starts_at_zero() {
        let range = with_headroom(AxisRange::new(2.0, 12.0), true, false, Some(2.0));
        assert_eq!(range.min, 0.0);
        assert_approx_eq!(range.max, 12.6, 1e-12);
    }

    #[test]
    fn test_negative_values_get_room_below() {
        let range = with_headroom(AxisRange::new(-10.0, 10.0), false, false, None);
        assert_approx_eq!(range.min, -11.0, 1e-12);
        assert_approx_eq!(range.max, 11.0, 1e-12);
    }

    #[test]
    fn test_log_axis_starts_below_smallest_positive() {
        let range = with_headroom(AxisRange::new(0.0, 100.0), true, true, Some(0.2));
        assert_approx_eq!(range.min, 0.1, 1e-12);
    }

    #[test]
    fn test_flat_data_get_a_range() {
        let range = with_headroom(AxisRange::new(3.0, 3.0), false, false, None);
        assert!(range.is_valid());
    }

    #[test]
    fn test_linked_pads_share_range_but_own_settings_win() {
        let style = Style::default_1d_ratio();
        let mut upper = Pad::default();
        upper.axis_mut(AxisLetter::X).range = Some(AxisRange::new(0.0, 50.0));
        let mut lower = Pad::default();
        lower.axis_mut(AxisLetter::X).title = Some("m".to_string());
        let pads = vec![(1, upper.clone()), (2, lower.clone())];

        let axes = effective_axes(2, &lower, &pads, &style);
        assert_eq!(axes[&AxisLetter::X].range, Some(AxisRange::new(0.0, 50.0)));
        assert_eq!(axes[&AxisLetter::X].title.as_deref(), Some("m"));

        lower.axis_mut(AxisLetter::X).range = Some(AxisRange::new(10.0, 20.0));
        let axes = effective_axes(2, &lower, &pads, &style);
        assert_eq!(axes[&AxisLetter::X].range, Some(AxisRange::new(10.0, 20.0)));
    }

    #[test]
    fn test_axis_log_overrides_pad_flags() {
        let mut axes = BTreeMap::new();
        axes.insert(AxisLetter::Y, Axis::default().log(false));
        let scales = pad_scales(ControlFlags::parse("logY logX"), &axes);
        assert!(scales.log_x);
        assert!(!scales.log_y);
    }
}
