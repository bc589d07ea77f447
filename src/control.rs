//! Control-string mini-language.
//!
//! Pads and data carry free text such as `"logY gridX thick"`. Tokens are found by
//! substring containment, so no token may occur inside another one.

/// Behaviour flags found in a control string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    /// `logX`
    pub log_x: bool,
    /// `logY`
    pub log_y: bool,
    /// `logZ`
    pub log_z: bool,
    /// `gridX`
    pub grid_x: bool,
    /// `gridY`
    pub grid_y: bool,
    /// `thick`: scale line width and marker size.
    pub thick: bool,
    /// `normalize`: scale to unit integral.
    pub normalize: bool,
    /// `dotted`: dotted line style.
    pub dotted: bool,
}

impl ControlFlags {
    /// Parse a control string.
    pub fn parse(options: &str) -> Self {
        Self {
            log_x: options.contains("logX"),
            log_y: options.contains("logY"),
            log_z: options.contains("logZ"),
            grid_x: options.contains("gridX"),
            grid_y: options.contains("gridY"),
            thick: options.contains("thick"),
            normalize: options.contains("normalize"),
            dotted: options.contains("dotted"),
        }
    }

    /// Parse an optional control string.
    pub fn parse_opt(options: Option<&str>) -> Self {
        options.map(Self::parse).unwrap_or_default()
    }

    /// Flags set in either operand.
    pub const fn union(self, other: Self) -> Self {
        Self {
            log_x: self.log_x || other.log_x,
            log_y: self.log_y || other.log_y,
            log_z: self.log_z || other.log_z,
            grid_x: self.grid_x || other.grid_x,
            grid_y: self.grid_y || other.grid_y,
            thick: self.thick || other.thick,
            normalize: self.normalize || other.normalize,
            dotted: self.dotted || other.dotted,
        }
    }
}

/// How a datum is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    /// Markers with error bars.
    Points,
    /// Histogram outline or filled area.
    Hist,
    /// Filled error band.
    Band,
    /// Filled error boxes.
    Boxes,
    /// Straight line segments.
    Curve,
    /// Smooth curve.
    Smooth,
    /// Drawn but invisible.
    None,
    /// 2D colour map with colour scale.
    ColorMap,
}

impl DrawStyle {
    /// Draw style named in a control string, if any.
    pub fn parse(options: &str) -> Option<Self> {
        [
            ("hist", DrawStyle::Hist),
            ("band", DrawStyle::Band),
            ("boxes", DrawStyle::Boxes),
            ("curve", DrawStyle::Curve),
            ("smooth", DrawStyle::Smooth),
            ("none", DrawStyle::None),
        ]
        .into_iter()
        .find(|(token, _)| options.contains(token))
        .map(|(_, style)| style)
    }

    /// Draw style of a datum: the named one, else the colour map for 2D kinds,
    /// else lines for functions, else points.
    pub fn resolve(options: Option<&str>, is_2d: bool, is_function: bool) -> Self {
        match options.and_then(Self::parse) {
            Some(style) => style,
            None if is_2d => DrawStyle::ColorMap,
            None if is_function => DrawStyle::Curve,
            None => DrawStyle::Points,
        }
    }

    /// Backend option string.
    pub const fn option(self) -> &'static str {
        match self {
            DrawStyle::Points => "EP",
            DrawStyle::Hist => "HIST",
            DrawStyle::Band => "E3",
            DrawStyle::Boxes => "E2",
            DrawStyle::Curve => "L",
            DrawStyle::Smooth => "C",
            DrawStyle::None => "",
            DrawStyle::ColorMap => "COLZ",
        }
    }

    /// Legend letters for the symbol of this style.
    pub const fn legend_letters(self, filled: bool) -> &'static str {
        match self {
            DrawStyle::Points => "EP",
            DrawStyle::Hist if filled => "F",
            DrawStyle::Hist | DrawStyle::Curve | DrawStyle::Smooth => "L",
            DrawStyle::Band | DrawStyle::Boxes | DrawStyle::ColorMap => "F",
            DrawStyle::None => "",
        }
    }

    /// Whether the datum is styled and listed at all.
    pub const fn is_visible(self) -> bool {
        !matches!(self, DrawStyle::None)
    }
}

/// Complete draw option: `base` plus the structural parts required by drawing order.
///
/// The axis-owning graph gets an `A` prefix, every other series the `SAME` suffix.
pub fn draw_option(base: &str, is_graph: bool, owns_axes: bool) -> String {
    let mut option = String::with_capacity(base.len() + 5);
    if owns_axes {
        if is_graph && !base.contains('A') {
            option.push('A');
        }
        option.push_str(base);
    } else {
        option.push_str(base);
        if !base.contains("SAME") {
            if !option.is_empty() {
                option.push(' ');
            }
            option.push_str("SAME");
        }
    }
    option
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_by_substring() {
        let flags = ControlFlags::parse("logY gridX thick");
        assert!(flags.log_y && flags.grid_x && flags.thick);
        assert!(!flags.log_x && !flags.grid_y && !flags.normalize);
        assert_eq!(ControlFlags::parse_opt(None), ControlFlags::default());
    }

    #[test]
    fn test_union_combines_pad_and_datum() {
        let merged = ControlFlags::parse("logX").union(ControlFlags::parse("dotted normalize"));
        assert!(merged.log_x && merged.dotted && merged.normalize);
    }

    #[test]
    fn test_draw_style_resolution() {
        assert_eq!(DrawStyle::resolve(Some("thick hist"), false, false), DrawStyle::Hist);
        assert_eq!(DrawStyle::resolve(None, true, false), DrawStyle::ColorMap);
        assert_eq!(DrawStyle::resolve(Some("thick"), false, true), DrawStyle::Curve);
        assert_eq!(DrawStyle::resolve(None, false, false).option(), "EP");
        assert_eq!(DrawStyle::Band.option(), "E3");
        assert_eq!(DrawStyle::Hist.legend_letters(true), "F");
        assert!(!DrawStyle::None.is_visible());
    }

    #[test]
    fn test_structural_draw_option() {
        assert_eq!(draw_option("EP", true, true), "AEP");
        assert_eq!(draw_option("HIST", false, true), "HIST");
        assert_eq!(draw_option("HIST", false, false), "HIST SAME");
        assert_eq!(draw_option("", false, false), "SAME");
    }
}
