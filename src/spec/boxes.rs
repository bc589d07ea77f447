//! Legend and text boxes.

use serde::{Deserialize, Serialize};

use super::{LINE_DELIMITER, Overlay, overlay_options};
use crate::attributes::{Color, FillStyle, LineStyle};

/// Lower-left corner of a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPosition {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl BoxPosition {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Border, fill and text appearance shared by all boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxStyle {
    /// Border line style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<LineStyle>,
    /// Border width in pixels, `0` hides the border.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Border colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    /// Fill colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    /// Fill style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<FillStyle>,
    /// Fill opacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// Font code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_font: Option<i16>,
    /// Text size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<f64>,
    /// Text colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
}

impl Overlay for BoxStyle {
    fn overlay(&mut self, base: &Self) {
        overlay_options!(self, base;
            border_style, border_width, border_color, fill_color, fill_style,
            fill_opacity, text_font, text_size, text_color,
        );
    }
}

/// Explicit legend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Text, may contain placeholders such as `<integral>`.
    pub label: String,
    /// Index into the pad's data list whose drawing this entry shows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_index: Option<usize>,
    /// Draw letters (`"L"`, `"F"`, `"EP"`); derived from the datum when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_style: Option<String>,
}

impl LegendEntry {
    /// Entry with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data_index: None,
            draw_style: None,
        }
    }

    /// Bind the entry to a datum of the pad.
    pub const fn for_data(mut self, data_index: usize) -> Self {
        self.data_index = Some(data_index);
        self
    }
}

/// Legend listing labeled data of a pad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendBox {
    /// Explicit position; auto-placed when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<BoxPosition>,
    /// Force auto-placement even if a position is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_placement: Option<bool>,
    /// Position is in data coordinates instead of NDC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_coordinates: Option<bool>,
    /// Header line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Number of columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u16>,
    /// Appearance.
    pub style: BoxStyle,
    /// Additional entries after the labeled data.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<LegendEntry>,
}

impl LegendBox {
    /// Auto-placed legend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Legend at an explicit position.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Some(BoxPosition::new(x, y)),
            ..Default::default()
        }
    }

    /// Set the header line.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the column count.
    pub const fn with_columns(mut self, columns: u16) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Interpret the position in data coordinates.
    pub const fn in_user_coordinates(mut self) -> Self {
        self.user_coordinates = Some(true);
        self
    }

    /// Append an explicit entry.
    pub fn with_entry(mut self, entry: LegendEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl Overlay for LegendBox {
    fn overlay(&mut self, base: &Self) {
        overlay_options!(self, base;
            position, auto_placement, user_coordinates, title, columns,
        );
        self.style.overlay(&base.style);
        if self.entries.is_empty() {
            self.entries = base.entries.clone();
        }
    }
}

/// Free text, lines separated by `//`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBox {
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Explicit position; auto-placed when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<BoxPosition>,
    /// Force auto-placement even if a position is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_placement: Option<bool>,
    /// Position is in data coordinates instead of NDC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_coordinates: Option<bool>,
    /// Appearance.
    pub style: BoxStyle,
}

impl TextBox {
    /// Auto-placed text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Text at an explicit position.
    pub fn at(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: Some(text.into()),
            position: Some(BoxPosition::new(x, y)),
            ..Default::default()
        }
    }

    /// Interpret the position in data coordinates.
    pub const fn in_user_coordinates(mut self) -> Self {
        self.user_coordinates = Some(true);
        self
    }

    /// Text lines after splitting at the line delimiter.
    pub fn lines(&self) -> Vec<&str> {
        self.text
            .as_deref()
            .map(|text| text.split(LINE_DELIMITER).collect())
            .unwrap_or_default()
    }
}

impl Overlay for TextBox {
    fn overlay(&mut self, base: &Self) {
        overlay_options!(self, base; text, position, auto_placement, user_coordinates);
        self.style.overlay(&base.style);
    }
}

/// Box drawn on top of a pad's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PadBox {
    /// Legend.
    Legend(LegendBox),
    /// Text.
    Text(TextBox),
}

impl PadBox {
    /// Explicit position if auto-placement is not requested.
    pub fn explicit_position(&self) -> Option<BoxPosition> {
        let (position, auto) = match self {
            PadBox::Legend(legend) => (legend.position, legend.auto_placement),
            PadBox::Text(text) => (text.position, text.auto_placement),
        };
        if auto.unwrap_or(false) { None } else { position }
    }

    /// Whether an explicit position is given in data coordinates.
    pub fn uses_user_coordinates(&self) -> bool {
        match self {
            PadBox::Legend(legend) => legend.user_coordinates,
            PadBox::Text(text) => text.user_coordinates,
        }
        .unwrap_or(false)
    }

    /// Appearance.
    pub const fn style(&self) -> &BoxStyle {
        match self {
            PadBox::Legend(legend) => &legend.style,
            PadBox::Text(text) => &text.style,
        }
    }
}

impl From<LegendBox> for PadBox {
    fn from(legend: LegendBox) -> Self {
        PadBox::Legend(legend)
    }
}

impl From<TextBox> for PadBox {
    fn from(text: TextBox) -> Self {
        PadBox::Text(text)
    }
}

impl Overlay for PadBox {
    fn overlay(&mut self, base: &Self) {
        match (self, base) {
            (PadBox::Legend(legend), PadBox::Legend(base)) => legend.overlay(base),
            (PadBox::Text(text), PadBox::Text(base)) => text.overlay(base),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_split_on_delimiter() {
        let text = TextBox::new("ALICE//pp, 13 TeV//|#eta| < 0.8");
        assert_eq!(text.lines(), vec!["ALICE", "pp, 13 TeV", "|#eta| < 0.8"]);
        assert!(TextBox::default().lines().is_empty());
    }

    #[test]
    fn test_auto_placement_flag_overrides_position() {
        let mut legend = LegendBox::at(0.2, 0.3);
        assert_eq!(
            PadBox::from(legend.clone()).explicit_position(),
            Some(BoxPosition::new(0.2, 0.3))
        );
        legend.auto_placement = Some(true);
        assert_eq!(PadBox::from(legend).explicit_position(), None);
        assert_eq!(PadBox::from(LegendBox::new()).explicit_position(), None);
    }

    #[test]
    fn test_legend_overlay_is_recursive() {
        let mut legend = LegendBox::new().with_title("mine");
        legend.style.text_size = Some(20.0);
        let mut template = LegendBox::at(0.5, 0.5).with_title("theirs").with_columns(2);
        template.style.text_size = Some(10.0);
        template.style.border_width = Some(0.0);
        legend.overlay(&template);
        assert_eq!(legend.title.as_deref(), Some("mine"));
        assert_eq!(legend.columns, Some(2));
        assert_eq!(legend.position, Some(BoxPosition::new(0.5, 0.5)));
        assert_eq!(legend.style.text_size, Some(20.0));
        assert_eq!(legend.style.border_width, Some(0.0));
    }
}
