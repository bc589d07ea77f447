//! Plots and pads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    Axis, AxisLetter, DataEntry, IDENTITY_SEPARATOR, Overlay, PadBox, is_valid_identifier,
    overlay_list, overlay_options,
};
use crate::attributes::{Color, FillStyle, LineStyle, Marker};
use crate::error::ConfigurationError;
use crate::layout::NdcRect;

/// Pad ID whose settings act as defaults for every other pad. It is never drawn.
pub const DEFAULTS_PAD: u8 = 0;

/// One pad of a plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pad {
    /// Pad rectangle in canvas NDC, overrides the style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<NdcRect>,
    /// Top margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    /// Bottom margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    /// Left margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    /// Right margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f64>,
    /// X title offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_offset_x: Option<f64>,
    /// Y title offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_offset_y: Option<f64>,
    /// Z title offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_offset_z: Option<f64>,
    /// Pad title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Pad background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    /// Frame background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_fill_color: Option<Color>,
    /// Control string (`logX`, `gridY`, `thick`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Colour cycle replacing the style's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_colors: Option<Vec<Color>>,
    /// Marker cycle replacing the style's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_markers: Option<Vec<Marker>>,
    /// Line-style cycle replacing the style's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_line_styles: Option<Vec<LineStyle>>,
    /// Fill-style cycle replacing the style's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_fill_styles: Option<Vec<FillStyle>>,
    /// Marker size for data without an explicit one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_marker_size: Option<f64>,
    /// Line width for data without an explicit one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_line_width: Option<f64>,
    /// Base text size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_text_size: Option<f64>,
    /// Text font code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_text_font: Option<i16>,
    /// Use the style's open marker cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_markers: Option<bool>,
    /// Draw a horizontal reference line at this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_value: Option<f64>,
    /// Data in drawing order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<DataEntry>,
    /// Boxes in drawing order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boxes: Vec<PadBox>,
    /// Axis overrides.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub axes: BTreeMap<AxisLetter, Axis>,
}

impl Pad {
    /// Append a datum or ratio.
    pub fn add_data(&mut self, entry: impl Into<DataEntry>) -> &mut Self {
        self.data.push(entry.into());
        self
    }

    /// Append a legend or text box.
    pub fn add_box(&mut self, pad_box: impl Into<PadBox>) -> &mut Self {
        self.boxes.push(pad_box.into());
        self
    }

    /// Mutable override of one axis, created on first access.
    pub fn axis_mut(&mut self, letter: AxisLetter) -> &mut Axis {
        self.axes.entry(letter).or_default()
    }

    /// Set the control string.
    pub fn set_options(&mut self, options: impl Into<String>) -> &mut Self {
        self.options = Some(options.into());
        self
    }

    /// Fill unset settings and axis overrides from the defaults pad.
    ///
    /// Data and boxes of the defaults pad are not inherited.
    pub fn inherit_defaults(&mut self, defaults: &Pad) {
        self.overlay_settings(defaults);
        for (letter, axis) in &defaults.axes {
            self.axes.entry(*letter).or_default().overlay(axis);
        }
    }

    fn overlay_settings(&mut self, base: &Pad) {
        overlay_options!(self, base;
            position, margin_top, margin_bottom, margin_left, margin_right,
            title_offset_x, title_offset_y, title_offset_z, title, fill_color,
            frame_fill_color, options, default_colors, default_markers,
            default_line_styles, default_fill_styles, default_marker_size,
            default_line_width, default_text_size, default_text_font, open_markers,
            ref_value,
        );
    }
}

impl Overlay for Pad {
    fn overlay(&mut self, base: &Self) {
        self.overlay_settings(base);
        overlay_list(&mut self.data, &base.data);
        overlay_list(&mut self.boxes, &base.boxes);
        for (letter, axis) in &base.axes {
            self.axes.entry(*letter).or_default().overlay(axis);
        }
    }
}

/// One figure request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    /// Plot name.
    pub name: String,
    /// Group the figure belongs to.
    pub figure_group: String,
    /// Optional sub-category, passed through to the output stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figure_category: Option<String>,
    /// Name of the style to render with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Canvas width override in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Canvas height override in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Fixed aspect ratio override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_aspect_ratio: Option<bool>,
    /// Canvas fill colour override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    /// Pads by ID; ID 0 holds defaults for all pads.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pads: BTreeMap<u8, Pad>,
}

impl Plot {
    /// Empty plot rendered with the named style.
    pub fn new(
        name: impl Into<String>,
        figure_group: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            figure_group: figure_group.into(),
            figure_category: None,
            style: Some(style.into()),
            width: None,
            height: None,
            fixed_aspect_ratio: None,
            fill_color: None,
            pads: BTreeMap::new(),
        }
    }

    /// Set the figure category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.figure_category = Some(category.into());
        self
    }

    /// Pad with the given ID, created on first access.
    pub fn pad_mut(&mut self, pad_id: u8) -> &mut Pad {
        self.pads.entry(pad_id).or_default()
    }

    /// Pad defaults shared by all pads.
    pub fn pad_defaults_mut(&mut self) -> &mut Pad {
        self.pad_mut(DEFAULTS_PAD)
    }

    /// `name + "_IN_" + figure_group[:figure_category]`.
    pub fn unique_name(&self) -> String {
        match &self.figure_category {
            Some(category) => format!(
                "{}{IDENTITY_SEPARATOR}{}:{category}",
                self.name, self.figure_group
            ),
            None => format!("{}{IDENTITY_SEPARATOR}{}", self.name, self.figure_group),
        }
    }

    /// Number of pads this plot needs: the highest pad ID that holds data.
    pub fn required_pads(&self) -> usize {
        self.pads
            .iter()
            .filter(|(id, pad)| **id != DEFAULTS_PAD && !pad.data.is_empty())
            .map(|(id, _)| usize::from(*id))
            .max()
            .unwrap_or(0)
    }

    /// Drawable pads in ascending ID order, each completed from the defaults pad.
    pub fn resolved_pads(&self) -> Vec<(u8, Pad)> {
        let defaults = self.pads.get(&DEFAULTS_PAD);
        self.pads
            .iter()
            .filter(|(id, _)| **id != DEFAULTS_PAD)
            .map(|(id, pad)| {
                let mut pad = pad.clone();
                if let Some(defaults) = defaults {
                    pad.inherit_defaults(defaults);
                }
                (*id, pad)
            })
            .collect()
    }

    /// Check that no user supplied name contains the identity separator.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !is_valid_identifier(&self.name) {
            return Err(ConfigurationError::ReservedSeparator(self.name.clone()));
        }
        if !is_valid_identifier(&self.figure_group) {
            return Err(ConfigurationError::ReservedSeparator(
                self.figure_group.clone(),
            ));
        }
        for pad in self.pads.values() {
            for source in pad.data.iter().flat_map(DataEntry::sources) {
                if !source.is_valid() {
                    return Err(ConfigurationError::ReservedSeparator(source.identity()));
                }
            }
        }
        Ok(())
    }

    /// Copy of this plot completed from `template`.
    pub fn merged_with(&self, template: &Plot) -> Plot {
        let mut merged = self.clone();
        merged.overlay(template);
        merged
    }
}

impl Overlay for Plot {
    fn overlay(&mut self, base: &Self) {
        overlay_options!(self, base;
            figure_category, style, width, height, fixed_aspect_ratio, fill_color,
        );
        for (id, base_pad) in &base.pads {
            self.pads.entry(*id).or_default().overlay(base_pad);
        }
    }
}
