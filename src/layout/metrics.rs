//! Text measurement.

/// Measures rendered text in pixels.
///
/// Implementations are usually backed by the rendering backend's font engine.
pub trait TextMetrics: Send + Sync {
    /// Width and height in pixels of `text` drawn with `font` at `size_px`.
    fn measure(&self, text: &str, font: i16, size_px: f64) -> (f64, f64);
}

/// Font-independent estimate based on the number of visible glyphs.
///
/// Markup characters of the label syntax (`#`, `{`, `}`, `_`, `^`) are not
/// counted, `#` keywords such as `#eta` count as one glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTextMetrics {
    /// Average glyph width relative to the text size.
    pub glyph_width: f64,
    /// Line height relative to the text size.
    pub line_height: f64,
}

impl Default for ApproximateTextMetrics {
    fn default() -> Self {
        Self {
            glyph_width: 0.5,
            line_height: 1.0,
        }
    }
}

impl ApproximateTextMetrics {
    fn visible_glyphs(text: &str) -> usize {
        let mut count = 0;
        let mut in_keyword = false;
        for c in text.chars() {
            match c {
                '#' => {
                    in_keyword = true;
                    count += 1;
                }
                '{' | '}' | '_' | '^' => in_keyword = false,
                c if in_keyword && c.is_ascii_alphabetic() => {}
                _ => {
                    in_keyword = false;
                    count += 1;
                }
            }
        }
        count
    }
}

impl TextMetrics for ApproximateTextMetrics {
    fn measure(&self, text: &str, _font: i16, size_px: f64) -> (f64, f64) {
        let glyphs = Self::visible_glyphs(text) as f64;
        (glyphs * self.glyph_width * size_px, self.line_height * size_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_markup_is_not_measured() {
        let metrics = ApproximateTextMetrics::default();
        let (plain, height) = metrics.measure("pT", 43, 20.0);
        let (markup, _) = metrics.measure("p_{T}", 43, 20.0);
        assert_approx_eq!(plain, markup, 1e-12);
        assert_approx_eq!(height, 20.0, 1e-12);
        // "#eta < 0.8": one glyph for the keyword plus six
        let (keyword, _) = metrics.measure("#eta < 0.8", 43, 10.0);
        assert_approx_eq!(keyword, 35.0, 1e-12);
    }
}
