//! Explicit rendering state.
//!
//! Text sizes, fonts, palette and marker defaults would be process-wide settings
//! of a classic plotting backend. Here a [`RenderContext`] is threaded through
//! the pipeline and derives a fresh [`StyleState`] for every pad, which the pad's
//! canvas then carries. Figures can therefore be generated concurrently.

use tracing::warn;

use crate::defaults::{TextSettings, resolve_text};
use crate::error::PlotError;
use crate::layout::{PlacementStrategy, TextMetrics};
use crate::spec::Pad;
use crate::style::{PadStyle, Style};

/// Style values in effect while one pad is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleState {
    /// Text fonts and sizes.
    pub text: TextSettings,
    /// Default marker size.
    pub marker_size: f64,
    /// Default line width.
    pub line_width: f64,
    /// Palette code for 2D data.
    pub palette: i32,
    /// Number of colour contours.
    pub contours: u32,
    /// Tick length in pad NDC.
    pub tick_length: f64,
    /// Title offsets of x, y and z.
    pub title_offsets: [f64; 3],
}

impl StyleState {
    /// State of a pad drawn with `style`, before pad overrides.
    pub fn from_style(style: &Style) -> Self {
        Self {
            text: resolve_text(&Pad::default(), style),
            marker_size: style.marker_size,
            line_width: style.line_width,
            palette: style.palette,
            contours: style.contours,
            tick_length: 0.03,
            title_offsets: [1.1, 1.4, 1.2],
        }
    }
}

/// State threaded through the generation of one figure.
pub struct RenderContext<'a> {
    /// Style of the figure.
    pub style: &'a Style,
    /// Text measurement.
    pub metrics: &'a dyn TextMetrics,
    /// Auto-placement strategy.
    pub placement: PlacementStrategy,
    /// Unique name of the plot, for messages.
    pub plot: String,
    issues: Vec<PlotError>,
}

impl<'a> RenderContext<'a> {
    /// Context for one figure.
    pub fn new(
        style: &'a Style,
        metrics: &'a dyn TextMetrics,
        placement: PlacementStrategy,
        plot: impl Into<String>,
    ) -> Self {
        Self {
            style,
            metrics,
            placement,
            plot: plot.into(),
            issues: Vec::new(),
        }
    }

    /// Figure defaults with the pad's overrides applied.
    pub fn pad_state(&self, pad: &Pad, pad_style: &PadStyle) -> StyleState {
        let mut state = StyleState::from_style(self.style);
        state.text = resolve_text(pad, self.style);
        state.marker_size = pad.default_marker_size.unwrap_or(state.marker_size);
        state.line_width = pad.default_line_width.unwrap_or(state.line_width);
        state.tick_length = pad_style.tick_length;
        state.title_offsets = [
            pad.title_offset_x.unwrap_or(pad_style.title_offsets[0]),
            pad.title_offset_y.unwrap_or(pad_style.title_offsets[1]),
            pad.title_offset_z.unwrap_or(pad_style.title_offsets[2]),
        ];
        state
    }

    /// Record a non-fatal problem.
    pub fn report(&mut self, issue: impl Into<PlotError>) {
        let issue = issue.into();
        warn!(plot = self.plot.as_str(), "{issue}");
        self.issues.push(issue);
    }

    /// Problems recorded so far.
    pub fn issues(&self) -> &[PlotError] {
        &self.issues
    }

    /// Hand over the recorded problems.
    pub fn into_issues(self) -> Vec<PlotError> {
        self.issues
    }
}
