//! Defaults resolution.
//!
//! Every visual property of a datum comes from the first source that provides it:
//!
//! 1. the explicit value on the datum,
//! 2. the pad's default cycle (pad 0 of a plot fills gaps of the real pads),
//! 3. the style's default cycle,
//! 4. a hard-coded fallback.
//!
//! Cycles are indexed by the datum's position in the drawing order and wrap around.
//! A negative explicit attribute does not name a value; `-m` means "take the cycle
//! at `index + m`".

use crate::attributes::{Color, FillStyle, LineStyle, Marker};
use crate::control::{ControlFlags, DrawStyle};
use crate::spec::{Data, Pad};
use crate::style::Style;

/// Attribute values that can be taken from a default cycle.
pub trait CycleValue: Copy {
    /// Offset encoded by a negative value, `None` for a literal value.
    fn offset(self) -> Option<usize>;
}

macro_rules! impl_cycle_value {
    ($($ty:ty),+) => {
        $(impl CycleValue for $ty {
            fn offset(self) -> Option<usize> {
                self.cycle_offset()
            }
        })+
    };
}

impl_cycle_value!(Color, Marker, LineStyle, FillStyle);

/// Resolve one cycled attribute for the datum at `index`.
///
/// A non-empty `pad_cycle` replaces `style_cycle`; `fallback` is only used when both
/// are empty, which validated styles rule out.
pub fn resolve<T: CycleValue>(
    explicit: Option<T>,
    pad_cycle: Option<&[T]>,
    style_cycle: &[T],
    fallback: T,
    index: usize,
) -> T {
    let index = match explicit {
        Some(value) => match value.offset() {
            Some(offset) => index + offset,
            None => return value,
        },
        None => index,
    };
    let cycle = pad_cycle
        .filter(|cycle| !cycle.is_empty())
        .unwrap_or(style_cycle);
    if cycle.is_empty() {
        return fallback;
    }
    cycle[index % cycle.len()]
}

/// Resolve a scalar: explicit value, else pad default, else style default.
pub fn resolve_scalar(explicit: Option<f64>, pad_default: Option<f64>, style_default: f64) -> f64 {
    explicit.or(pad_default).unwrap_or(style_default)
}

/// Effective appearance of one drawn datum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Line, marker and fill colour.
    pub color: Color,
    /// Marker style.
    pub marker: Marker,
    /// Marker size.
    pub marker_size: f64,
    /// Line style.
    pub line_style: LineStyle,
    /// Line width.
    pub line_width: f64,
    /// Fill style.
    pub fill_style: FillStyle,
    /// Fill opacity.
    pub fill_opacity: f64,
}

impl Appearance {
    /// Whether the datum is drawn with a visible fill.
    pub fn is_filled(&self) -> bool {
        self.fill_style != FillStyle::HOLLOW
    }
}

/// Resolve the appearance of `data`, drawn as the `index`-th datum of `pad`.
///
/// `flags` are the pad's and the datum's control flags combined.
pub fn resolve_appearance(
    data: &Data,
    pad: &Pad,
    style: &Style,
    flags: ControlFlags,
    draw_style: DrawStyle,
    index: usize,
) -> Appearance {
    let color = resolve(
        data.color,
        pad.default_colors.as_deref(),
        &style.default_colors,
        Color::BLACK,
        index,
    );
    let style_markers = if pad.open_markers.unwrap_or(false) {
        &style.default_markers_open
    } else {
        &style.default_markers
    };
    let marker = resolve(
        data.marker,
        pad.default_markers.as_deref(),
        style_markers,
        Marker::FULL_CIRCLE,
        index,
    );
    let line_style = match data.line_style {
        None if flags.dotted => LineStyle::DOTTED,
        explicit => resolve(
            explicit,
            pad.default_line_styles.as_deref(),
            &style.default_line_styles,
            LineStyle::SOLID,
            index,
        ),
    };
    let filled_by_style = matches!(draw_style, DrawStyle::Band | DrawStyle::Boxes);
    let fill_style = match data.fill_style {
        None if !filled_by_style => FillStyle::HOLLOW,
        explicit => resolve(
            explicit,
            pad.default_fill_styles.as_deref(),
            &style.default_fill_styles,
            FillStyle::SOLID,
            index,
        ),
    };

    let mut marker_size = resolve_scalar(data.marker_size, pad.default_marker_size, style.marker_size);
    let mut line_width = resolve_scalar(data.line_width, pad.default_line_width, style.line_width);
    if flags.thick {
        marker_size *= style.thick.marker_size;
        line_width *= style.thick.line_width;
    }

    Appearance {
        color,
        marker,
        marker_size,
        line_style,
        line_width,
        fill_style,
        fill_opacity: data.fill_opacity.unwrap_or(1.0),
    }
}

/// Text settings of a pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSettings {
    /// Font code of labels and boxes.
    pub font: i16,
    /// Font code of titles.
    pub title_font: i16,
    /// Base size in pixels.
    pub size: f64,
    /// Axis label size in pixels.
    pub label_size: f64,
    /// Axis title size in pixels.
    pub title_size: f64,
    /// Text colour.
    pub color: Color,
}

/// Resolve text settings: pad overrides the base size and font, the style's scales apply.
pub fn resolve_text(pad: &Pad, style: &Style) -> TextSettings {
    let size = resolve_scalar(None, pad.default_text_size, style.text.size);
    let font = pad.default_text_font.unwrap_or(style.text.font);
    TextSettings {
        font,
        title_font: pad.default_text_font.unwrap_or(style.text.title_font),
        size,
        label_size: size * style.text.label_scale,
        title_size: size * style.text.title_scale,
        color: style.text.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    fn style() -> Style {
        Style::builder("S")
            .add_pad(Default::default())
            .with_colors(vec![Color::BLACK, Color::BLUE])
            .with_markers(vec![Marker::FULL_SQUARE, Marker::FULL_CIRCLE])
            .build()
            .expect("valid style")
    }

    #[test]
    fn test_cycle_wraps_around() {
        let cycle = [Color::RED, Color::GREEN, Color::BLUE];
        for k in 0..10 {
            assert_eq!(
                resolve(None, None, &cycle, Color::BLACK, k),
                resolve(None, None, &cycle, Color::BLACK, k + cycle.len())
            );
        }
    }

    #[test]
    fn test_negative_value_offsets_the_cycle() {
        let cycle = [Color::RED, Color::GREEN, Color::BLUE];
        for k in 0..6 {
            for m in 1..4_i16 {
                assert_eq!(
                    resolve(Some(Color(-m)), None, &cycle, Color::BLACK, k),
                    resolve(None, None, &cycle, Color::BLACK, k + m as usize)
                );
            }
        }
    }

    #[test]
    fn test_precedence_explicit_pad_style_fallback() {
        let style_cycle = [Color::RED];
        let pad_cycle = [Color::GREEN];
        assert_eq!(resolve(Some(Color::BLUE), Some(&pad_cycle[..]), &style_cycle, Color::BLACK, 0), Color::BLUE);
        assert_eq!(resolve(None, Some(&pad_cycle[..]), &style_cycle, Color::BLACK, 0), Color::GREEN);
        assert_eq!(resolve(None, Some(&[][..]), &style_cycle, Color::BLACK, 0), Color::RED);
        assert_eq!(resolve::<Color>(None, None, &[], Color::BLACK, 3), Color::BLACK);
    }

    #[test]
    fn test_first_datum_takes_first_cycle_entries() {
        let appearance = resolve_appearance(
            &Data::new("h1", "in"),
            &Pad::default(),
            &style(),
            ControlFlags::default(),
            DrawStyle::Points,
            0,
        );
        assert_eq!(appearance.color, Color::BLACK);
        assert_eq!(appearance.marker, Marker::FULL_SQUARE);
        assert!(!appearance.is_filled());
    }

    #[test]
    fn test_explicit_minus_one_gives_next_color() {
        let appearance = resolve_appearance(
            &Data::new("h1", "in").with_color(Color(-1)),
            &Pad::default(),
            &style(),
            ControlFlags::default(),
            DrawStyle::Points,
            0,
        );
        assert_eq!(appearance.color, Color::BLUE);
    }

    #[test]
    fn test_flags_modify_lines() {
        let style = style();
        let flags = ControlFlags::parse("thick dotted");
        let appearance = resolve_appearance(
            &Data::new("h", "in"),
            &Pad::default(),
            &style,
            flags,
            DrawStyle::Band,
            0,
        );
        assert_eq!(appearance.line_style, LineStyle::DOTTED);
        assert_approx_eq!(appearance.line_width, style.line_width * style.thick.line_width, 1e-12);
        assert_eq!(appearance.fill_style, FillStyle::SOLID);

        let explicit = resolve_appearance(
            &Data::new("h", "in").with_line_style(LineStyle::DASHED),
            &Pad::default(),
            &style,
            flags,
            DrawStyle::Points,
            0,
        );
        assert_eq!(explicit.line_style, LineStyle::DASHED);
    }

    #[test]
    fn test_open_markers_and_text_scales() {
        let style = style();
        let pad = Pad {
            open_markers: Some(true),
            default_text_size: Some(30.0),
            ..Default::default()
        };
        let appearance = resolve_appearance(
            &Data::new("h", "in"),
            &pad,
            &style,
            ControlFlags::default(),
            DrawStyle::Points,
            1,
        );
        assert_eq!(appearance.marker, style.default_markers_open[1]);
        let text = resolve_text(&pad, &style);
        assert_approx_eq!(text.label_size, 30.0 * style.text.label_scale, 1e-12);
    }
}
