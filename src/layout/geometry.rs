//! Rectangles, margins and coordinate transforms.
//!
//! Three coordinate systems meet here:
//! - canvas NDC, where pad rectangles are defined,
//! - pad NDC, the `[0, 1] x [0, 1]` space of one pad used for boxes and placement,
//! - user coordinates, the data space spanned by the pad's axes.

use serde::{Deserialize, Serialize};

use crate::spec::AxisRange;

/// Rectangle in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NdcRect {
    /// Left edge.
    pub x_low: f64,
    /// Bottom edge.
    pub y_low: f64,
    /// Right edge.
    pub x_up: f64,
    /// Top edge.
    pub y_up: f64,
}

impl NdcRect {
    /// The whole unit square.
    pub const UNIT: NdcRect = NdcRect::new(0.0, 0.0, 1.0, 1.0);

    /// Create a rectangle from its corners.
    pub const fn new(x_low: f64, y_low: f64, x_up: f64, y_up: f64) -> Self {
        Self {
            x_low,
            y_low,
            x_up,
            y_up,
        }
    }

    /// Rectangle with the given lower-left corner and size.
    pub const fn from_corner(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.x_up - self.x_low
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.y_up - self.y_low
    }

    /// Whether the rectangle is non-empty and lies inside the unit square.
    pub fn is_within_unit(&self) -> bool {
        self.x_low >= 0.0
            && self.y_low >= 0.0
            && self.x_up <= 1.0
            && self.y_up <= 1.0
            && self.x_up > self.x_low
            && self.y_up > self.y_low
    }

    /// Whether two rectangles share interior area.
    pub fn overlaps(&self, other: &NdcRect) -> bool {
        self.x_low < other.x_up
            && other.x_low < self.x_up
            && self.y_low < other.y_up
            && other.y_low < self.y_up
    }

    /// Same size, moved horizontally.
    pub fn shifted_x(&self, dx: f64) -> Self {
        Self::new(self.x_low + dx, self.y_low, self.x_up + dx, self.y_up)
    }
}

/// Pad margins as fractions of the pad size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
}

impl Margins {
    /// Create margins.
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Whether the margins leave a non-empty frame.
    pub fn leave_frame(&self) -> bool {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .all(|m| (0.0..1.0).contains(m))
            && self.left + self.right < 1.0
            && self.top + self.bottom < 1.0
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(0.07, 0.14, 0.12, 0.07)
    }
}

/// Final geometry of one pad on the canvas.
///
/// Text measurements convert pixels to pad NDC with this geometry, so they must
/// only be taken once margins are final.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadGeometry {
    /// Pad rectangle in canvas NDC.
    pub rect: NdcRect,
    /// Margins as fractions of the pad size.
    pub margins: Margins,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}

impl PadGeometry {
    /// Pad width in pixels.
    pub fn pixel_width(&self) -> f64 {
        self.rect.width() * f64::from(self.canvas_width)
    }

    /// Pad height in pixels.
    pub fn pixel_height(&self) -> f64 {
        self.rect.height() * f64::from(self.canvas_height)
    }

    /// Convert a horizontal pixel length to pad NDC.
    pub fn pixels_to_ndc_x(&self, pixels: f64) -> f64 {
        let width = self.pixel_width();
        if width > 0.0 { pixels / width } else { 0.0 }
    }

    /// Convert a vertical pixel length to pad NDC.
    pub fn pixels_to_ndc_y(&self, pixels: f64) -> f64 {
        let height = self.pixel_height();
        if height > 0.0 { pixels / height } else { 0.0 }
    }

    /// Axis frame in pad NDC.
    pub fn frame(&self) -> NdcRect {
        NdcRect::new(
            self.margins.left,
            self.margins.bottom,
            1.0 - self.margins.right,
            1.0 - self.margins.top,
        )
    }
}

/// Mapping from user coordinates to pad NDC inside the axis frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Frame rectangle in pad NDC.
    pub frame: NdcRect,
    /// Visible x range.
    pub x: AxisRange,
    /// Visible y range.
    pub y: AxisRange,
    /// Logarithmic x axis.
    pub log_x: bool,
    /// Logarithmic y axis.
    pub log_y: bool,
}

impl FrameTransform {
    /// Horizontal user coordinate to pad NDC.
    pub fn x_to_ndc(&self, x: f64) -> f64 {
        self.frame.x_low + self.frame.width() * fraction(x, self.x, self.log_x)
    }

    /// Vertical user coordinate to pad NDC.
    pub fn y_to_ndc(&self, y: f64) -> f64 {
        self.frame.y_low + self.frame.height() * fraction(y, self.y, self.log_y)
    }

    /// User point to pad NDC.
    pub fn to_ndc(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x_to_ndc(x), self.y_to_ndc(y))
    }
}

/// Relative position of `value` in `range`, log-scaled if requested.
fn fraction(value: f64, range: AxisRange, log: bool) -> f64 {
    if log && range.min > 0.0 && range.max > 0.0 {
        let value = value.max(range.min * 1e-3);
        let (low, high) = (range.min.log10(), range.max.log10());
        if high > low {
            return (value.log10() - low) / (high - low);
        }
        return 0.0;
    }
    let width = range.max - range.min;
    if width > 0.0 {
        (value - range.min) / width
    } else {
        0.0
    }
}
