//! Named, reusable plot styles.
//!
//! A [`Style`] bundles the canvas geometry, one [`PadStyle`] per pad, axis links
//! between pads, the default-value cycles consumed once per drawn datum and the
//! text sizing defaults. Styles are immutable once they enter a
//! [`StyleRegistry`](crate::registry::StyleRegistry); every style is validated
//! on the way in so rendering never sees an empty cycle.

use serde::{Deserialize, Serialize};

use crate::attributes::{Color, FillStyle, LineStyle, Marker};
use crate::error::ConfigurationError;
use crate::layout::{Margins, NdcRect};
use crate::spec::AxisLetter;

/// Geometry of one pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadStyle {
    /// Pad rectangle in canvas NDC.
    pub position: NdcRect,
    /// Margins as fractions of the pad size.
    pub margins: Margins,
    /// Title offsets of the x, y and z axes.
    pub title_offsets: [f64; 3],
    /// Pad title.
    pub title: Option<String>,
    /// Tick length in pad NDC.
    pub tick_length: f64,
}

impl PadStyle {
    /// Pad covering `position` with default margins.
    pub fn new(position: NdcRect) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Replace the margins.
    pub const fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Replace the title offsets.
    pub const fn with_title_offsets(mut self, x: f64, y: f64, z: f64) -> Self {
        self.title_offsets = [x, y, z];
        self
    }
}

impl Default for PadStyle {
    fn default() -> Self {
        Self {
            position: NdcRect::UNIT,
            margins: Margins::default(),
            title_offsets: [1.1, 1.4, 1.2],
            title: None,
            tick_length: 0.03,
        }
    }
}

/// Pads sharing range and log settings of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLink {
    /// Shared axis.
    pub axis: AxisLetter,
    /// Linked pad IDs.
    pub pads: Vec<u8>,
}

/// Text sizing defaults. Sizes are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    /// Font code for labels and boxes.
    pub font: i16,
    /// Font code for titles.
    pub title_font: i16,
    /// Base text size.
    pub size: f64,
    /// Axis label size relative to the base size.
    pub label_scale: f64,
    /// Axis title size relative to the base size.
    pub title_scale: f64,
    /// Text colour.
    pub color: Color,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font: 43,
            title_font: 43,
            size: 24.0,
            label_scale: 0.9,
            title_scale: 1.0,
            color: Color::BLACK,
        }
    }
}

/// Multipliers applied by the `thick` control token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThickScale {
    /// Line width multiplier.
    pub line_width: f64,
    /// Marker size multiplier.
    pub marker_size: f64,
}

impl Default for ThickScale {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            marker_size: 1.5,
        }
    }
}

/// Colour scale (palette) geometry for 2D pads, in pad NDC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScaleStyle {
    /// Right margin of a pad that hosts a palette.
    pub right_margin: f64,
    /// Factor applied to top and bottom margins of such a pad.
    pub vertical_margin_scale: f64,
    /// Palette width.
    pub width: f64,
    /// Horizontal nudge applied to the palette after creation.
    pub offset: f64,
}

impl Default for ColorScaleStyle {
    fn default() -> Self {
        Self {
            right_margin: 0.18,
            vertical_margin_scale: 0.75,
            width: 0.04,
            offset: 0.01,
        }
    }
}

/// Timestamp annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampStyle {
    /// Horizontal position in canvas NDC.
    pub x: f64,
    /// Vertical position in canvas NDC.
    pub y: f64,
}

/// Named style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Unique name.
    pub name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Keep the aspect ratio when the output is resized.
    pub fixed_aspect_ratio: bool,
    /// Canvas fill colour.
    pub fill_color: Color,
    /// Canvas fill style.
    pub fill_style: FillStyle,
    /// Pads, index `i` describes pad ID `i + 1`.
    pub pads: Vec<PadStyle>,
    /// Axis links between pads.
    pub linked_axes: Vec<AxisLink>,
    /// Colour cycle.
    pub default_colors: Vec<Color>,
    /// Filled marker cycle.
    pub default_markers: Vec<Marker>,
    /// Open marker cycle.
    pub default_markers_open: Vec<Marker>,
    /// Line-style cycle.
    pub default_line_styles: Vec<LineStyle>,
    /// Fill-style cycle.
    pub default_fill_styles: Vec<FillStyle>,
    /// Text sizing.
    pub text: TextDefaults,
    /// Marker size.
    pub marker_size: f64,
    /// Line width.
    pub line_width: f64,
    /// `thick` multipliers.
    pub thick: ThickScale,
    /// Palette code for 2D data.
    pub palette: i32,
    /// Number of colour contours for 2D data.
    pub contours: u32,
    /// Default draw option of 2D data.
    pub draw_option_2d: String,
    /// Colour scale geometry.
    pub color_scale: ColorScaleStyle,
    /// Timestamp annotation, disabled when unset.
    pub timestamp: Option<TimestampStyle>,
}

impl Default for Style {
    fn default() -> Self {
        Self::default_1d()
    }
}

/// Name of the style used when a requested style is unknown.
pub const FALLBACK_STYLE: &str = "default_1d";

impl Style {
    /// Start building a style with the given name.
    pub fn builder(name: impl Into<String>) -> StyleBuilder {
        StyleBuilder::new(name)
    }

    /// Style of pad `pad_id` (1-based).
    pub fn pad(&self, pad_id: u8) -> Option<&PadStyle> {
        usize::from(pad_id)
            .checked_sub(1)
            .and_then(|index| self.pads.get(index))
    }

    /// Number of pads.
    pub fn pad_count(&self) -> usize {
        self.pads.len()
    }

    /// Pads linked with `pad_id` on `axis`, excluding `pad_id` itself.
    pub fn linked_pads(&self, pad_id: u8, axis: AxisLetter) -> Vec<u8> {
        let mut linked: Vec<u8> = self
            .linked_axes
            .iter()
            .filter(|link| link.axis == axis && link.pads.contains(&pad_id))
            .flat_map(|link| link.pads.iter().copied())
            .filter(|id| *id != pad_id)
            .collect();
        linked.sort_unstable();
        linked.dedup();
        linked
    }

    /// Check the invariants rendering relies on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.pads.is_empty() {
            return Err(ConfigurationError::NoPads(self.name.clone()));
        }
        let cycles = [
            ("color", self.default_colors.is_empty()),
            ("marker", self.default_markers.is_empty()),
            ("open marker", self.default_markers_open.is_empty()),
            ("line style", self.default_line_styles.is_empty()),
            ("fill style", self.default_fill_styles.is_empty()),
        ];
        if let Some((cycle, _)) = cycles.iter().find(|(_, empty)| *empty) {
            return Err(ConfigurationError::empty_cycle(&self.name, *cycle));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigurationError::invalid_style(
                &self.name,
                "canvas size",
                format!("{}x{} pixels", self.width, self.height),
            ));
        }
        for (index, pad) in self.pads.iter().enumerate() {
            if !pad.position.is_within_unit() {
                return Err(ConfigurationError::invalid_style(
                    &self.name,
                    format!("position of pad {}", index + 1),
                    "must be a non-empty rectangle inside [0, 1]",
                ));
            }
            if !pad.margins.leave_frame() {
                return Err(ConfigurationError::invalid_style(
                    &self.name,
                    format!("margins of pad {}", index + 1),
                    "leave no room for the frame",
                ));
            }
        }
        for link in &self.linked_axes {
            if let Some(id) = link
                .pads
                .iter()
                .find(|id| **id == 0 || usize::from(**id) > self.pads.len())
            {
                return Err(ConfigurationError::invalid_style(
                    &self.name,
                    "axis link",
                    format!("pad {id} does not exist"),
                ));
            }
        }
        if self.thick.line_width <= 0.0 || self.thick.marker_size <= 0.0 {
            return Err(ConfigurationError::invalid_style(
                &self.name,
                "thick scale",
                "multipliers must be positive",
            ));
        }
        Ok(())
    }

    /// Single-pad style for 1D data.
    pub fn default_1d() -> Self {
        Self {
            name: "default_1d".to_string(),
            width: 710,
            height: 710,
            fixed_aspect_ratio: false,
            fill_color: Color::WHITE,
            fill_style: FillStyle::SOLID,
            pads: vec![PadStyle::default()],
            linked_axes: Vec::new(),
            default_colors: vec![
                Color::BLACK,
                Color::DARK_BLUE,
                Color::DARK_RED,
                Color::DARK_GREEN,
                Color::ORANGE,
                Color::DARK_MAGENTA,
                Color::DARK_CYAN,
                Color::OLIVE,
            ],
            default_markers: vec![
                Marker::FULL_CIRCLE,
                Marker::FULL_SQUARE,
                Marker::FULL_DIAMOND,
                Marker::FULL_CROSS,
                Marker::FULL_TRIANGLE_UP,
                Marker::FULL_TRIANGLE_DOWN,
                Marker::FULL_STAR,
            ],
            default_markers_open: vec![
                Marker::OPEN_CIRCLE,
                Marker::OPEN_SQUARE,
                Marker::OPEN_DIAMOND,
                Marker::OPEN_CROSS,
                Marker::OPEN_TRIANGLE_UP,
                Marker::OPEN_TRIANGLE_DOWN,
                Marker::OPEN_STAR,
            ],
            default_line_styles: vec![LineStyle::SOLID],
            default_fill_styles: vec![FillStyle::SOLID],
            text: TextDefaults::default(),
            marker_size: 1.2,
            line_width: 1.0,
            thick: ThickScale::default(),
            palette: 112,
            contours: 255,
            draw_option_2d: "COLZ".to_string(),
            color_scale: ColorScaleStyle::default(),
            timestamp: None,
        }
    }

    /// Two pads: data on top, ratio below, x axes linked.
    pub fn default_1d_ratio() -> Self {
        let upper = PadStyle::new(NdcRect::new(0.0, 0.28, 1.0, 1.0))
            .with_margins(Margins::new(0.055, 0.0, 0.12, 0.07))
            .with_title_offsets(1.1, 1.4, 1.2);
        let lower = PadStyle::new(NdcRect::new(0.0, 0.0, 1.0, 0.28))
            .with_margins(Margins::new(0.0, 0.4, 0.12, 0.07))
            .with_title_offsets(4.1, 1.4, 1.2);
        Self {
            name: "default_1d_ratio".to_string(),
            height: 841,
            pads: vec![upper, lower],
            linked_axes: vec![AxisLink {
                axis: AxisLetter::X,
                pads: vec![1, 2],
            }],
            ..Self::default_1d()
        }
    }

    /// Single-pad style for 2D data with room for the colour scale.
    pub fn default_2d() -> Self {
        let pad = PadStyle::new(NdcRect::UNIT)
            .with_margins(Margins::new(0.07, 0.14, 0.12, 0.12))
            .with_title_offsets(1.1, 1.1, 1.6);
        Self {
            name: "default_2d".to_string(),
            width: 825,
            pads: vec![pad],
            ..Self::default_1d()
        }
    }
}

/// Fluent construction of a validated [`Style`].
#[derive(Debug, Clone)]
pub struct StyleBuilder {
    style: Style,
}

impl StyleBuilder {
    /// Builder starting from the 1D defaults without any pads.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            style: Style {
                name: name.into(),
                pads: Vec::new(),
                ..Style::default_1d()
            },
        }
    }

    /// Canvas size in pixels.
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.style.width = width;
        self.style.height = height;
        self
    }

    /// Keep the aspect ratio fixed.
    pub const fn with_fixed_aspect_ratio(mut self, fixed: bool) -> Self {
        self.style.fixed_aspect_ratio = fixed;
        self
    }

    /// Append the next pad.
    pub fn add_pad(mut self, pad: PadStyle) -> Self {
        self.style.pads.push(pad);
        self
    }

    /// Link `axis` across `pads`.
    pub fn link_axis(mut self, axis: AxisLetter, pads: Vec<u8>) -> Self {
        self.style.linked_axes.push(AxisLink { axis, pads });
        self
    }

    /// Replace the colour cycle.
    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.style.default_colors = colors;
        self
    }

    /// Replace the filled marker cycle.
    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.style.default_markers = markers;
        self
    }

    /// Replace the open marker cycle.
    pub fn with_open_markers(mut self, markers: Vec<Marker>) -> Self {
        self.style.default_markers_open = markers;
        self
    }

    /// Replace the line-style cycle.
    pub fn with_line_styles(mut self, line_styles: Vec<LineStyle>) -> Self {
        self.style.default_line_styles = line_styles;
        self
    }

    /// Replace the fill-style cycle.
    pub fn with_fill_styles(mut self, fill_styles: Vec<FillStyle>) -> Self {
        self.style.default_fill_styles = fill_styles;
        self
    }

    /// Replace the text defaults.
    pub fn with_text(mut self, text: TextDefaults) -> Self {
        self.style.text = text;
        self
    }

    /// Base marker size and line width.
    pub const fn with_marker_size_and_line_width(mut self, marker_size: f64, line_width: f64) -> Self {
        self.style.marker_size = marker_size;
        self.style.line_width = line_width;
        self
    }

    /// Multipliers of the `thick` token.
    pub const fn with_thick_scale(mut self, thick: ThickScale) -> Self {
        self.style.thick = thick;
        self
    }

    /// Palette code and contour count for 2D data.
    pub const fn with_palette(mut self, palette: i32, contours: u32) -> Self {
        self.style.palette = palette;
        self.style.contours = contours;
        self
    }

    /// Enable the timestamp at the given canvas position.
    pub const fn with_timestamp(mut self, x: f64, y: f64) -> Self {
        self.style.timestamp = Some(TimestampStyle { x, y });
        self
    }

    /// Validate and return the style.
    pub fn build(self) -> Result<Style, ConfigurationError> {
        self.style.validate()?;
        Ok(self.style)
    }
}
