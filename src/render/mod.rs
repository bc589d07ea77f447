//! Figure generation.
//!
//! [`generate`] turns a [`Plot`] into a [`Figure`] using one [`Style`] and a
//! [`DataRegistry`] of loaded objects. Configuration errors abort the figure
//! before any pad is drawn; problems with single data or boxes are logged,
//! recorded on the figure and drawing continues.
//!
//! A [`Plotter`] bundles the style registry, text metrics, placement strategy and
//! an optional fixed timestamp so that many plots can be generated with the same
//! settings, in parallel with the `parallel-processing` feature.
//!
//! ```
//! use plotting_framework::objects::{DataObject, Hist1d};
//! use plotting_framework::registry::DataStore;
//! use plotting_framework::render::Plotter;
//! use plotting_framework::spec::{Data, Plot};
//!
//! let mut store = DataStore::new();
//! let hist = Hist1d::with_poisson_errors("mass", vec![0.0, 1.0, 2.0], vec![4.0, 9.0]).unwrap();
//! store.insert_from("mass", "run1", DataObject::Hist1d(hist));
//!
//! let mut plot = Plot::new("mass", "overview", "default_1d");
//! plot.pad_mut(1).add_data(Data::new("mass", "run1"));
//!
//! let figure = Plotter::default().generate(&plot, &store).unwrap();
//! assert_eq!(figure.pads.len(), 1);
//! ```

mod context;
mod pad;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

pub use context::{RenderContext, StyleState};

use crate::error::{ConfigurationError, PlotResult};
use crate::figure::{Figure, Timestamp};
use crate::layout::{ApproximateTextMetrics, PlacementStrategy, TextMetrics};
use crate::registry::{DataRegistry, StyleRegistry};
use crate::spec::Plot;
use crate::style::{FALLBACK_STYLE, Style};
use pad::{PadInput, render_pad};

/// Format of the timestamp annotation.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generate the figure of `plot` with `style` and default settings.
///
/// # Errors
/// Fails with a [`ConfigurationError`] if the plot uses a reserved name, the style
/// is invalid or the plot needs more pads than the style defines. No pad is drawn
/// in that case.
pub fn generate(plot: &Plot, style: &Style, registry: &dyn DataRegistry) -> PlotResult<Figure> {
    Plotter::new(StyleRegistry::new()).generate_with_style(plot, style, registry)
}

/// Reusable generation settings.
#[derive(Clone)]
pub struct Plotter {
    styles: StyleRegistry,
    metrics: Arc<dyn TextMetrics>,
    placement: PlacementStrategy,
    now: Option<DateTime<Utc>>,
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new(StyleRegistry::with_defaults())
    }
}

impl fmt::Debug for Plotter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plotter")
            .field("styles", &self.styles)
            .field("placement", &self.placement)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl Plotter {
    /// Plotter resolving style names in `styles`.
    pub fn new(styles: StyleRegistry) -> Self {
        Self {
            styles,
            metrics: Arc::new(ApproximateTextMetrics::default()),
            placement: PlacementStrategy::default(),
            now: None,
        }
    }

    /// Measure text with `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Auto-place boxes with `placement`.
    pub const fn with_placement(mut self, placement: PlacementStrategy) -> Self {
        self.placement = placement;
        self
    }

    /// Stamp every figure with `time` instead of the current time.
    pub const fn with_fixed_time(mut self, time: DateTime<Utc>) -> Self {
        self.now = Some(time);
        self
    }

    /// Registered styles.
    pub const fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Mutable access to the registered styles.
    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    /// Generate the figure of `plot` with its named style.
    ///
    /// Unknown style names fall back to the default style with a warning.
    ///
    /// # Errors
    /// See [`generate`].
    pub fn generate(&self, plot: &Plot, registry: &dyn DataRegistry) -> PlotResult<Figure> {
        let style = self
            .styles
            .get_style(plot.style.as_deref().unwrap_or(FALLBACK_STYLE));
        self.generate_with_style(plot, &style, registry)
    }

    /// Generate the figure of `plot` with an explicit `style`.
    ///
    /// # Errors
    /// See [`generate`].
    pub fn generate_with_style(
        &self,
        plot: &Plot,
        style: &Style,
        registry: &dyn DataRegistry,
    ) -> PlotResult<Figure> {
        plot.validate()?;
        style.validate()?;
        let unique_name = plot.unique_name();
        let required = plot.required_pads();
        if required > style.pad_count() {
            let err = ConfigurationError::PadCountMismatch {
                plot: unique_name,
                style: style.name.clone(),
                required,
                available: style.pad_count(),
            };
            error!("{err}");
            return Err(err.into());
        }

        let size = (
            plot.width.unwrap_or(style.width),
            plot.height.unwrap_or(style.height),
        );
        let mut figure = Figure::new(
            plot.name.clone(),
            unique_name.clone(),
            plot.figure_group.clone(),
            plot.figure_category.clone(),
            style.name.clone(),
            size,
            plot.fixed_aspect_ratio.unwrap_or(style.fixed_aspect_ratio),
            (plot.fill_color.unwrap_or(style.fill_color), style.fill_style),
        );

        let mut ctx = RenderContext::new(style, self.metrics.as_ref(), self.placement, unique_name);
        let pads = plot.resolved_pads();
        for (id, pad) in &pads {
            let input = PadInput {
                id: *id,
                pad,
                all_pads: &pads,
                canvas_size: size,
            };
            if let Some(canvas) = render_pad(&mut ctx, input, registry) {
                figure.pads.push(canvas);
            }
        }

        if let Some(stamp) = style.timestamp {
            let time = self.now.unwrap_or_else(Utc::now);
            figure.timestamp = Some(Timestamp {
                text: time.format(TIMESTAMP_FORMAT).to_string(),
                x: stamp.x,
                y: stamp.y,
            });
        }

        let issues = ctx.into_issues();
        info!(
            plot = figure.unique_name.as_str(),
            style = figure.style_name.as_str(),
            pads = figure.pads.len(),
            issues = issues.len(),
            "generated figure"
        );
        figure.extend_issues(issues);
        Ok(figure)
    }

    /// Generate the figures of all `plots`, in parallel.
    #[cfg(feature = "parallel-processing")]
    pub fn generate_all<R>(&self, plots: &[Plot], registry: &R) -> Vec<PlotResult<Figure>>
    where
        R: DataRegistry + Sync,
    {
        use rayon::prelude::*;

        plots
            .par_iter()
            .map(|plot| self.generate(plot, registry))
            .collect()
    }

    /// Generate the figures of all `plots`, one after the other.
    #[cfg(not(feature = "parallel-processing"))]
    pub fn generate_all<R>(&self, plots: &[Plot], registry: &R) -> Vec<PlotResult<Figure>>
    where
        R: DataRegistry + Sync,
    {
        plots.iter().map(|plot| self.generate(plot, registry)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Color, Marker};
    use crate::error::{DataError, LayoutError, PlotError};
    use crate::figure::Primitive;
    use crate::layout::{ApproximateTextMetrics, PLACEMENT_INSET, TextStyle, text_footprint};
    use crate::objects::{DataObject, Graph1d, Hist1d, Hist2d, Plottable};
    use crate::registry::DataStore;
    use crate::spec::{Axis, AxisLetter, AxisRange, Data, LegendBox, Ratio, TextBox};
    use crate::style::PadStyle;
    use approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use ndarray::arr2;

    fn hist(name: &str, contents: Vec<f64>) -> DataObject {
        let edges = (0..=contents.len()).map(|e| e as f64).collect();
        let errors = contents.iter().map(|c: &f64| c.sqrt()).collect();
        DataObject::Hist1d(Hist1d::new(name, edges, contents, errors).expect("valid histogram"))
    }

    fn store() -> DataStore {
        let mut store = DataStore::new();
        store.insert_from("h1", "f", hist("h1", vec![2.0, 6.0]));
        store.insert_from("a", "f", hist("a", vec![10.0, 20.0, 0.0]));
        store.insert_from("b", "f", hist("b", vec![5.0, 4.0, 0.0]));
        let map = Hist2d::new(
            "map",
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 1.0, 2.0, 3.0],
            arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]),
        )
        .expect("valid histogram");
        store.insert_from("map", "f", DataObject::Hist2d(map));
        store
    }

    fn style_s() -> Style {
        Style::builder("S")
            .add_pad(PadStyle::default())
            .with_colors(vec![Color::BLACK, Color::BLUE])
            .with_markers(vec![Marker::FULL_SQUARE, Marker::FULL_CIRCLE])
            .build()
            .expect("valid style")
    }

    fn text_block(figure: &Figure, pad: u8) -> &crate::figure::TextBlock {
        figure
            .pad(pad)
            .expect("pad drawn")
            .primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Text(text) => Some(text),
                _ => None,
            })
            .expect("text box drawn")
    }

    fn series(figure: &Figure, pad: u8) -> Vec<&crate::figure::Series> {
        figure
            .pad(pad)
            .expect("pad drawn")
            .series()
            .map(|(_, s)| s)
            .collect()
    }

    #[test]
    fn test_too_many_pads_abort_before_drawing() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1).add_data(Data::new("h1", "f"));
        plot.pad_mut(2).add_data(Data::new("h1", "f"));
        let result = generate(&plot, &style_s(), &store());
        assert!(matches!(
            result,
            Err(PlotError::Configuration(ConfigurationError::PadCountMismatch {
                required: 2,
                available: 1,
                ..
            }))
        ));
    }

    #[test]
    fn test_single_datum_takes_first_cycle_entries() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1).add_data(Data::new("h1", "f"));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");

        assert_eq!(figure.pads.len(), 1);
        let pad = figure.pad(1).expect("pad 1");
        assert_eq!(pad.primitives.len(), 1);
        let drawn = series(&figure, 1);
        assert_eq!(drawn[0].appearance.color, Color::BLACK);
        assert_eq!(drawn[0].appearance.marker, Marker::FULL_SQUARE);
        assert!(drawn[0].owns_axes);
        assert!(figure.issues().is_empty());
    }

    #[test]
    fn test_negative_color_offsets_the_cycle() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1).add_data(Data::new("h1", "f").with_color(Color(-1)));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");
        assert_eq!(series(&figure, 1)[0].appearance.color, Color::BLUE);
    }

    #[test]
    fn test_missing_data_is_skipped_without_advancing_the_cycle() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1)
            .add_data(Data::new("nope", "f"))
            .add_data(Data::new("h1", "f"));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");

        let drawn = series(&figure, 1);
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].appearance.color, Color::BLACK);
        assert_eq!(figure.issues(), &[PlotError::Data(DataError::missing(1, "nope_IN_f"))]);
    }

    #[test]
    fn test_ratio_first_draws_frame_and_reference_line() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1)
            .add_data(Ratio::new("a", "f", "b", "f"))
            .add_data(Data::new("h1", "f"));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");
        let pad = figure.pad(1).expect("pad 1");

        assert_eq!(pad.primitives.len(), 4);
        let Primitive::ReferenceLine(line) = &pad.primitives[1] else {
            panic!("expected the reference line second");
        };
        assert_approx_eq!(line.y, 1.0, 1e-12);
        assert_eq!(line.color, Color::BLACK);

        let drawn = series(&figure, 1);
        assert!(!drawn[0].draw_style.is_visible());
        assert!(drawn[0].owns_axes);
        let Plottable::Hist1d(quotient) = &drawn[1].plottable else {
            panic!("expected a histogram quotient");
        };
        assert_approx_eq!(quotient.contents[0], 2.0, 1e-12);
        assert_approx_eq!(quotient.contents[1], 5.0, 1e-12);
        assert_eq!(quotient.contents[2], 0.0);
        assert_eq!(drawn[1].appearance.color, Color::BLUE);
        assert!(drawn[1].draw_option.ends_with("SAME"));
        // the cycle wraps: slot 2 of a two-colour cycle
        assert_eq!(drawn[2].appearance.color, Color::BLACK);
    }

    #[test]
    fn test_ratio_after_skipped_datum_still_gets_its_frame() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1)
            .add_data(Data::new("nope", "f"))
            .add_data(Ratio::new("a", "f", "b", "f"));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");
        let pad = figure.pad(1).expect("pad 1");

        assert_eq!(figure.issues(), &[PlotError::Data(DataError::missing(1, "nope_IN_f"))]);
        assert_eq!(pad.primitives.len(), 3);
        let Primitive::ReferenceLine(line) = &pad.primitives[1] else {
            panic!("expected the reference line second");
        };
        assert_approx_eq!(line.y, 1.0, 1e-12);
        assert_eq!(line.color, Color::BLACK);

        let drawn = series(&figure, 1);
        assert!(!drawn[0].draw_style.is_visible());
        assert!(drawn[0].owns_axes);
        assert!(drawn[1].draw_style.is_visible());
        assert_eq!(drawn[1].appearance.color, Color::BLUE);
    }

    #[test]
    fn test_two_dimensional_pad_gets_a_palette() {
        let mut plot = Plot::new("P", "G", "default_2d");
        plot.pad_mut(1).add_data(Data::new("map", "f"));
        let figure = generate(&plot, &Style::default_2d(), &store()).expect("figure");
        let pad = figure.pad(1).expect("pad 1");

        assert!(figure.issues().is_empty());
        assert_approx_eq!(pad.geometry.margins.right, 0.18, 1e-12);
        assert_approx_eq!(pad.geometry.margins.top, 0.07 * 0.75, 1e-12);
        let frame = pad.geometry.frame();
        let palette = pad.palette().expect("palette");
        assert_approx_eq!(palette.rect.x_low, frame.x_up + 0.01, 1e-12);
        assert_approx_eq!(palette.rect.y_up, frame.y_up, 1e-12);
        assert_approx_eq!(palette.range.max, 9.0, 1e-12);
        assert_eq!(series(&figure, 1)[0].draw_option, "COLZ");
    }

    #[test]
    fn test_auto_placed_legend_leaves_no_exclusions() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1)
            .add_data(Data::new("h1", "f").with_label("data"))
            .add_box(LegendBox::new())
            .add_box(TextBox::new("CMS//Preliminary"));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");
        let pad = figure.pad(1).expect("pad 1");

        assert!(figure.issues().is_empty());
        assert!(
            !pad.primitives
                .iter()
                .any(|p| matches!(p, Primitive::Exclusion(_)))
        );
        let Primitive::Legend(legend) = &pad.primitives[1] else {
            panic!("expected the legend after the data");
        };
        assert_eq!(legend.rows.len(), 1);
        assert_eq!(legend.rows[0].label, "data");
        let frame = pad.geometry.frame();
        assert!(legend.rect.x_low >= frame.x_low && legend.rect.x_up <= frame.x_up);
        assert!(legend.rect.y_low >= frame.y_low && legend.rect.y_up <= frame.y_up);

        let Primitive::Text(text) = &pad.primitives[2] else {
            panic!("expected the text box last");
        };
        assert_eq!(text.lines, vec!["CMS", "Preliminary"]);
        assert!(!text.rect.overlaps(&legend.rect));
    }

    #[test]
    fn test_text_in_user_coordinates_follows_the_axes() {
        let mut plot = Plot::new("P", "G", "S");
        let pad = plot.pad_mut(1);
        pad.add_data(Data::new("h1", "f"))
            .add_box(TextBox::at("note", 0.5, 4.0).in_user_coordinates());
        *pad.axis_mut(AxisLetter::X) = Axis::with_range(0.0, 2.0);
        *pad.axis_mut(AxisLetter::Y) = Axis::with_range(0.0, 10.0);
        let figure = generate(&plot, &style_s(), &store()).expect("figure");

        let canvas = figure.pad(1).expect("pad 1");
        let frame = canvas.geometry.frame();
        let text = text_block(&figure, 1);
        assert_approx_eq!(text.rect.x_low, frame.x_low + 0.25 * frame.width(), 1e-12);
        assert_approx_eq!(text.rect.y_low, frame.y_low + 0.4 * frame.height(), 1e-12);
        let (x, y) = canvas.transform().expect("axes").to_ndc(0.5, 4.0);
        assert_approx_eq!(text.rect.x_low, x, 1e-12);
        assert_approx_eq!(text.rect.y_low, y, 1e-12);
    }

    #[test]
    fn test_text_in_user_coordinates_on_log_axis() {
        let mut plot = Plot::new("P", "G", "S");
        let pad = plot.pad_mut(1);
        pad.add_data(Data::new("h1", "f"))
            .add_box(TextBox::at("note", 1.0, 10.0).in_user_coordinates());
        *pad.axis_mut(AxisLetter::X) = Axis::with_range(0.0, 2.0);
        *pad.axis_mut(AxisLetter::Y) = Axis {
            log: Some(true),
            ..Axis::with_range(1.0, 100.0)
        };
        let figure = generate(&plot, &style_s(), &store()).expect("figure");

        let canvas = figure.pad(1).expect("pad 1");
        let frame = canvas.geometry.frame();
        let text = text_block(&figure, 1);
        // 10 is halfway between 1 and 100 in decades
        assert_approx_eq!(text.rect.y_low, frame.y_low + 0.5 * frame.height(), 1e-9);
        assert_approx_eq!(text.rect.x_low, frame.x_low + 0.5 * frame.width(), 1e-12);
        let (x, y) = canvas.transform().expect("axes").to_ndc(1.0, 10.0);
        assert_approx_eq!(text.rect.x_low, x, 1e-12);
        assert_approx_eq!(text.rect.y_low, y, 1e-12);
    }

    #[test]
    fn test_oversized_box_falls_back_to_frame_corner() {
        let mut text_box = TextBox::new("crowded");
        text_box.style.text_size = Some(2000.0);
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1)
            .add_data(Data::new("h1", "f").with_label("data"))
            .add_box(text_box);
        let figure = generate(&plot, &style_s(), &store()).expect("figure");
        let canvas = figure.pad(1).expect("pad 1");

        assert_eq!(
            figure.issues(),
            &[PlotError::Layout(LayoutError::NoFreePlacement { pad: 1, box_index: 0 })]
        );
        assert!(
            !canvas
                .primitives
                .iter()
                .any(|p| matches!(p, Primitive::Exclusion(_)))
        );
        assert_eq!(canvas.primitives.len(), 2);

        let text = text_block(&figure, 1);
        let footprint = text_footprint(
            &["crowded"],
            TextStyle {
                font: text.text.font,
                size: 2000.0,
            },
            &ApproximateTextMetrics::default(),
            &canvas.geometry,
        );
        let frame = canvas.geometry.frame();
        assert_approx_eq!(text.rect.x_up, frame.x_up - PLACEMENT_INSET, 1e-12);
        assert_approx_eq!(text.rect.y_up, frame.y_up - PLACEMENT_INSET, 1e-12);
        assert_approx_eq!(text.rect.x_low, frame.x_up - PLACEMENT_INSET - footprint.width, 1e-12);
        assert_approx_eq!(text.rect.y_low, frame.y_up - PLACEMENT_INSET - footprint.height, 1e-12);
    }

    #[test]
    fn test_graph_far_outside_the_axis_range_still_places_legend() {
        let graph = Graph1d::from_xy("g", &[0.0, 1.0, 2.0], &[0.5, 1e12, 1.0]).expect("valid graph");
        let mut store = store();
        store.insert_from("g", "f", DataObject::Graph1d(graph));
        let mut plot = Plot::new("P", "G", "S");
        let pad = plot.pad_mut(1);
        pad.add_data(Data::new("g", "f").with_label("spike"))
            .add_box(LegendBox::new());
        *pad.axis_mut(AxisLetter::Y) = Axis::with_range(0.0, 2.0);
        let figure = generate(&plot, &style_s(), &store).expect("figure");

        let canvas = figure.pad(1).expect("pad 1");
        assert_eq!(canvas.axes.as_ref().expect("axes").y.range, AxisRange::new(0.0, 2.0));
        let Primitive::Legend(legend) = &canvas.primitives[1] else {
            panic!("expected the legend after the graph");
        };
        assert_eq!(legend.rows[0].label, "spike");
        assert!(
            !canvas
                .primitives
                .iter()
                .any(|p| matches!(p, Primitive::Exclusion(_)))
        );
    }

    #[test]
    fn test_pad_overrides_stay_on_their_canvas() {
        let mut plot = Plot::new("P", "G", "default_1d_ratio");
        let upper = plot.pad_mut(1);
        upper.add_data(Data::new("h1", "f"));
        upper.default_text_size = Some(40.0);
        plot.pad_mut(2).add_data(Ratio::new("a", "f", "b", "f"));

        let style = Style::default_1d_ratio();
        let figure = generate(&plot, &style, &store()).expect("figure");
        let upper = figure.pad(1).expect("pad 1");
        let lower = figure.pad(2).expect("pad 2");
        assert_approx_eq!(upper.style.text.size, 40.0, 1e-12);
        assert_approx_eq!(lower.style.text.size, style.text.size, 1e-12);
        assert_approx_eq!(lower.style.title_offsets[0], 4.1, 1e-12);
    }

    #[test]
    fn test_linked_axes_share_ranges_across_pads() {
        let mut plot = Plot::new("P", "G", "default_1d_ratio");
        let upper = plot.pad_mut(1);
        upper.add_data(Data::new("h1", "f"));
        upper.axis_mut(AxisLetter::X).range = Some(AxisRange::new(0.0, 1.5));
        plot.pad_mut(2).add_data(Ratio::new("a", "f", "b", "f"));

        let figure = generate(&plot, &Style::default_1d_ratio(), &store()).expect("figure");
        for id in [1, 2] {
            let axes = figure.pad(id).and_then(|pad| pad.axes.as_ref()).expect("axes");
            assert_eq!(axes.x.range, AxisRange::new(0.0, 1.5));
        }
        let lower = figure.pad(2).and_then(|pad| pad.axes.as_ref()).expect("axes");
        assert_approx_eq!(lower.x.title_offset, 4.1, 1e-12);
    }

    #[test]
    fn test_pad_without_data_reports_missing_axis_owner() {
        let mut plot = Plot::new("P", "G", "S");
        plot.pad_mut(1).add_box(TextBox::new("empty"));
        let figure = generate(&plot, &style_s(), &store()).expect("figure");
        assert_eq!(
            figure.issues(),
            &[PlotError::Layout(LayoutError::MissingAxisOwner { pad: 1 })]
        );
        assert_eq!(figure.pad(1).expect("pad 1").primitives.len(), 1);
    }

    #[test]
    fn test_timestamp_uses_injected_time() {
        let style = Style::builder("stamped")
            .add_pad(PadStyle::default())
            .with_timestamp(0.01, 0.01)
            .build()
            .expect("valid style");
        let mut plotter = Plotter::new(StyleRegistry::new())
            .with_fixed_time(Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap());
        plotter.styles_mut().insert(style).expect("registered");

        let mut plot = Plot::new("P", "G", "stamped");
        plot.pad_mut(1).add_data(Data::new("h1", "f"));
        let figure = plotter.generate(&plot, &store()).expect("figure");
        let stamp = figure.timestamp.expect("timestamp");
        assert_eq!(stamp.text, "2024-05-17 08:30:00");
    }

    #[test]
    fn test_unknown_style_falls_back() {
        let mut plot = Plot::new("P", "G", "does_not_exist");
        plot.pad_mut(1).add_data(Data::new("h1", "f"));
        let before = plot.clone();
        let figure = Plotter::default().generate(&plot, &store()).expect("figure");
        assert_eq!(figure.style_name, FALLBACK_STYLE);
        assert_eq!(figure.unique_name, "P_IN_G");
        assert_eq!(plot, before);
    }

    #[test]
    fn test_generate_all_keeps_order() {
        let plots: Vec<Plot> = ["one", "two", "three"]
            .into_iter()
            .map(|name| {
                let mut plot = Plot::new(name, "G", "default_1d");
                plot.pad_mut(1).add_data(Data::new("h1", "f"));
                plot
            })
            .collect();
        let figures = Plotter::default().generate_all(&plots, &store());
        let names: Vec<String> = figures
            .into_iter()
            .map(|figure| figure.expect("figure").name)
            .collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }
}
