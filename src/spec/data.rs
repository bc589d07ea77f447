//! Data entries of a pad: plain data and ratios.

use serde::{Deserialize, Serialize};

use super::{AxisRange, Overlay, identity, is_valid_identifier, overlay_options};
use crate::attributes::{Color, FillStyle, LineStyle, Marker};

/// Reference to a loaded object: its name inside an input source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataRef {
    /// Object name inside the input.
    pub name: String,
    /// Identifier of the input source the object was loaded from.
    pub input: String,
}

impl DataRef {
    /// Create a reference.
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
        }
    }

    /// Unique identity `name + "_IN_" + input`.
    pub fn identity(&self) -> String {
        identity(&self.name, &self.input)
    }

    /// Whether neither part contains the reserved separator.
    pub fn is_valid(&self) -> bool {
        is_valid_identifier(&self.name) && is_valid_identifier(&self.input)
    }
}

/// One plotted datum with optional appearance overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    /// Loaded object to draw.
    pub source: DataRef,
    /// Legend label; unlabeled data are not listed in legends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Colour (negative values shift the default cycle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Marker style (negative values shift the default cycle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// Marker size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<f64>,
    /// Line style (negative values shift the default cycle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    /// Line width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    /// Fill style (negative values shift the default cycle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<FillStyle>,
    /// Fill opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// Control string (`hist`, `band`, `thick`, `normalize`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Raw backend draw option, takes precedence over draw-style tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_option: Option<String>,
    /// Multiplicative scale applied to values and errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Scale to unit integral.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize: Option<bool>,
    /// Only data inside this x range are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<AxisRange>,
    /// 1-based index of the legend box listing this datum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_id: Option<u8>,
}

impl Data {
    /// Datum `name` from input `input` without overrides.
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            source: DataRef::new(name, input),
            label: None,
            color: None,
            marker: None,
            marker_size: None,
            line_style: None,
            line_width: None,
            fill_style: None,
            fill_opacity: None,
            options: None,
            draw_option: None,
            scale: None,
            normalize: None,
            range: None,
            legend_id: None,
        }
    }

    /// Set the legend label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the colour.
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the marker style.
    pub fn with_marker(mut self, marker: impl Into<Marker>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Set the line style.
    pub fn with_line_style(mut self, line_style: impl Into<LineStyle>) -> Self {
        self.line_style = Some(line_style.into());
        self
    }

    /// Set the fill style and opacity.
    pub fn with_fill(mut self, fill_style: impl Into<FillStyle>, opacity: f64) -> Self {
        self.fill_style = Some(fill_style.into());
        self.fill_opacity = Some(opacity);
        self
    }

    /// Set the control string.
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Set a raw backend draw option.
    pub fn with_draw_option(mut self, draw_option: impl Into<String>) -> Self {
        self.draw_option = Some(draw_option.into());
        self
    }

    /// Set the scale factor.
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Normalize to unit integral.
    pub const fn normalized(mut self) -> Self {
        self.normalize = Some(true);
        self
    }

    /// Keep only data inside `[min, max]`.
    pub const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(AxisRange::new(min, max));
        self
    }

    /// List this datum in the given legend box.
    pub const fn in_legend(mut self, legend_id: u8) -> Self {
        self.legend_id = Some(legend_id);
        self
    }

    /// Unique identity of the referenced object.
    pub fn identity(&self) -> String {
        self.source.identity()
    }
}

impl Overlay for Data {
    fn overlay(&mut self, base: &Self) {
        overlay_options!(self, base;
            label, color, marker, marker_size, line_style, line_width, fill_style,
            fill_opacity, options, draw_option, scale, normalize, range, legend_id,
        );
    }
}

/// Quotient of two loaded objects. Appearance overrides live on the numerator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    /// Numerator and all appearance settings.
    pub numerator: Data,
    /// Denominator object.
    pub denominator: DataRef,
    /// Numerator is a subset of the denominator (binomial errors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlated: Option<bool>,
}

impl Ratio {
    /// Ratio of `name/input` over `denominator_name/denominator_input`.
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        denominator_name: impl Into<String>,
        denominator_input: impl Into<String>,
    ) -> Self {
        Self {
            numerator: Data::new(name, input),
            denominator: DataRef::new(denominator_name, denominator_input),
            correlated: None,
        }
    }

    /// Use binomial error propagation.
    pub const fn correlated(mut self) -> Self {
        self.correlated = Some(true);
        self
    }

    /// Replace the appearance settings through a closure on the numerator.
    pub fn styled(mut self, style: impl FnOnce(Data) -> Data) -> Self {
        self.numerator = style(self.numerator);
        self
    }
}

impl Overlay for Ratio {
    fn overlay(&mut self, base: &Self) {
        self.numerator.overlay(&base.numerator);
        overlay_options!(self, base; correlated);
    }
}

/// Entry of a pad's data list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataEntry {
    /// Plain datum.
    Data(Data),
    /// Ratio of two data.
    Ratio(Ratio),
}

impl DataEntry {
    /// Appearance settings of the entry.
    pub const fn data(&self) -> &Data {
        match self {
            DataEntry::Data(data) => data,
            DataEntry::Ratio(ratio) => &ratio.numerator,
        }
    }

    /// Mutable appearance settings of the entry.
    pub fn data_mut(&mut self) -> &mut Data {
        match self {
            DataEntry::Data(data) => data,
            DataEntry::Ratio(ratio) => &mut ratio.numerator,
        }
    }

    /// Whether this entry is a ratio.
    pub const fn is_ratio(&self) -> bool {
        matches!(self, DataEntry::Ratio(_))
    }

    /// All object references this entry needs.
    pub fn sources(&self) -> Vec<&DataRef> {
        match self {
            DataEntry::Data(data) => vec![&data.source],
            DataEntry::Ratio(ratio) => vec![&ratio.numerator.source, &ratio.denominator],
        }
    }
}

impl From<Data> for DataEntry {
    fn from(data: Data) -> Self {
        DataEntry::Data(data)
    }
}

impl From<Ratio> for DataEntry {
    fn from(ratio: Ratio) -> Self {
        DataEntry::Ratio(ratio)
    }
}

impl Overlay for DataEntry {
    fn overlay(&mut self, base: &Self) {
        match (self, base) {
            (DataEntry::Data(data), DataEntry::Data(base)) => data.overlay(base),
            (DataEntry::Ratio(ratio), DataEntry::Ratio(base)) => ratio.overlay(base),
            // a ratio cannot inherit from a plain datum or vice versa
            _ => {}
        }
    }
}
