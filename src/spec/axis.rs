//! Axis overrides.

use serde::{Deserialize, Serialize};

use super::{Overlay, overlay_options};

/// Axis letter of a pad coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLetter {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
    /// Colour (z) axis of 2D data.
    Z,
}

impl AxisLetter {
    /// All axis letters in drawing order.
    pub const ALL: [AxisLetter; 3] = [AxisLetter::X, AxisLetter::Y, AxisLetter::Z];
}

/// Closed value range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower edge.
    pub min: f64,
    /// Upper edge.
    pub max: f64,
}

impl AxisRange {
    /// Create a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range (edges included).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether the range has positive width.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }
}

/// Per-pad override of one axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Axis {
    /// Visible range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<AxisRange>,
    /// Axis title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Logarithmic scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<bool>,
    /// Grid lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
    /// Tick length in NDC of the pad.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_length: Option<f64>,
    /// Title offset factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_offset: Option<f64>,
    /// Title size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_size: Option<f64>,
    /// Label size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_size: Option<f64>,
    /// Division code passed to the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_divisions: Option<i32>,
    /// Centre the title along the axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_title: Option<bool>,
}

impl Axis {
    /// Axis override with only a range.
    pub fn with_range(min: f64, max: f64) -> Self {
        Self {
            range: Some(AxisRange::new(min, max)),
            ..Default::default()
        }
    }

    /// Axis override with only a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the log flag.
    pub const fn log(mut self, log: bool) -> Self {
        self.log = Some(log);
        self
    }
}

impl Overlay for Axis {
    fn overlay(&mut self, base: &Self) {
        overlay_options!(self, base;
            range, title, log, grid, tick_length, title_offset,
            title_size, label_size, num_divisions, center_title,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_keeps_explicit_fields() {
        let mut axis = Axis::with_title("p_{T}");
        let template = Axis {
            range: Some(AxisRange::new(0.0, 10.0)),
            title: Some("x".to_string()),
            log: Some(true),
            ..Default::default()
        };
        axis.overlay(&template);
        assert_eq!(axis.title.as_deref(), Some("p_{T}"));
        assert_eq!(axis.range, Some(AxisRange::new(0.0, 10.0)));
        assert_eq!(axis.log, Some(true));
        assert_eq!(axis.grid, None);
    }

    #[test]
    fn test_range_validity() {
        assert!(AxisRange::new(0.0, 1.0).is_valid());
        assert!(!AxisRange::new(1.0, 1.0).is_valid());
        assert!(!AxisRange::new(0.0, f64::NAN).is_valid());
        assert!(AxisRange::new(0.0, 1.0).contains(1.0));
    }
}
