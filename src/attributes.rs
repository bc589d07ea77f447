//! Visual attribute values: colors, marker styles, line styles and fill styles.
//!
//! All attributes are small integer codes understood by the rendering backend.
//! A negative value is never a valid code; when used as an explicit per-datum
//! override it means "take the default cycle, shifted by `|value|` steps"
//! (see [`crate::defaults`]).

use serde::{Deserialize, Serialize};

macro_rules! attribute_code {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i16);

        impl $name {
            /// Raw backend code.
            pub const fn code(self) -> i16 {
                self.0
            }

            /// Cycle offset encoded by a negative value, `None` for regular codes.
            pub const fn cycle_offset(self) -> Option<usize> {
                if self.0 < 0 {
                    Some(self.0.unsigned_abs() as usize)
                } else {
                    None
                }
            }
        }

        impl From<i16> for $name {
            fn from(code: i16) -> Self {
                Self(code)
            }
        }
    };
}

attribute_code!(
    /// Color index.
    Color
);
attribute_code!(
    /// Marker style code.
    Marker
);
attribute_code!(
    /// Line style code.
    LineStyle
);
attribute_code!(
    /// Fill style code (`0` hollow, `1001` solid, `3xxx` hatched).
    FillStyle
);

#[allow(missing_docs)]
impl Color {
    pub const WHITE: Self = Self(0);
    pub const BLACK: Self = Self(1);
    pub const RED: Self = Self(2);
    pub const GREEN: Self = Self(3);
    pub const BLUE: Self = Self(4);
    pub const YELLOW: Self = Self(5);
    pub const MAGENTA: Self = Self(6);
    pub const CYAN: Self = Self(7);
    pub const GRAY: Self = Self(920);
    pub const DARK_BLUE: Self = Self(601);
    pub const DARK_RED: Self = Self(633);
    pub const DARK_GREEN: Self = Self(418);
    pub const ORANGE: Self = Self(801);
    pub const DARK_MAGENTA: Self = Self(617);
    pub const DARK_CYAN: Self = Self(434);
    pub const OLIVE: Self = Self(402);
}

#[allow(missing_docs)]
impl Marker {
    pub const DOT: Self = Self(1);
    pub const FULL_CIRCLE: Self = Self(20);
    pub const FULL_SQUARE: Self = Self(21);
    pub const FULL_TRIANGLE_UP: Self = Self(22);
    pub const FULL_TRIANGLE_DOWN: Self = Self(23);
    pub const OPEN_CIRCLE: Self = Self(24);
    pub const OPEN_SQUARE: Self = Self(25);
    pub const OPEN_TRIANGLE_UP: Self = Self(26);
    pub const OPEN_DIAMOND: Self = Self(27);
    pub const OPEN_CROSS: Self = Self(28);
    pub const FULL_STAR: Self = Self(29);
    pub const OPEN_STAR: Self = Self(30);
    pub const OPEN_TRIANGLE_DOWN: Self = Self(32);
    pub const FULL_DIAMOND: Self = Self(33);
    pub const FULL_CROSS: Self = Self(34);
}

#[allow(missing_docs)]
impl LineStyle {
    pub const SOLID: Self = Self(1);
    pub const DASHED: Self = Self(2);
    pub const DOTTED: Self = Self(3);
    pub const DASH_DOTTED: Self = Self(4);
}

#[allow(missing_docs)]
impl FillStyle {
    pub const HOLLOW: Self = Self(0);
    pub const SOLID: Self = Self(1001);
    pub const HATCHED: Self = Self(3004);
    pub const CROSS_HATCHED: Self = Self(3005);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_offset_only_for_negative_codes() {
        assert_eq!(Color(-1).cycle_offset(), Some(1));
        assert_eq!(Marker(-3).cycle_offset(), Some(3));
        assert_eq!(Color::BLUE.cycle_offset(), None);
        assert_eq!(FillStyle::HOLLOW.cycle_offset(), None);
    }

    #[test]
    fn test_codes_serialize_as_plain_integers() {
        let json = serde_json::to_string(&Color::DARK_RED).expect("serialize color");
        assert_eq!(json, "633");
        let back: LineStyle = serde_json::from_str("3").expect("deserialize line style");
        assert_eq!(back, LineStyle::DOTTED);
    }
}
