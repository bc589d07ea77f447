//! Error types and result utilities for plot generation.
//!
//! Errors fall into three families. [`ConfigurationError`]s abort a whole figure,
//! [`DataError`]s skip a single datum and [`LayoutError`]s describe non-fatal layout
//! problems for which a fallback was used. Non-fatal errors are collected on the
//! produced [`Figure`](crate::figure::Figure) instead of being returned.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`PlotError`].
pub type PlotResult<T> = Result<T, PlotError>;

/// Top-level error type of the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Style or plot definition is inconsistent; generation of the figure is aborted.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A single datum could not be bound or processed and was skipped.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A layout step could not be completed as requested and fell back.
    #[error("Layout warning: {0}")]
    Layout(#[from] LayoutError),

    /// (De)serialization of a plot or style definition failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A plottable object was constructed from inconsistent parts.
    #[error("Invalid object: {0}")]
    InvalidObject(String),
}

impl PlotError {
    /// Whether this error aborts the generation of a whole figure.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Serialization(_))
    }
}

impl From<serde_json::Error> for PlotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Inconsistent style or plot definitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The plot needs more pads than the style defines.
    #[error(
        "plot '{plot}' requires {required} pads but style '{style}' only defines {available}"
    )]
    PadCountMismatch {
        /// Unique name of the plot.
        plot: String,
        /// Name of the style.
        style: String,
        /// Highest pad ID holding data.
        required: usize,
        /// Pads defined by the style.
        available: usize,
    },

    /// A default-value cycle of a style is empty.
    #[error("style '{style}' has an empty default {cycle} cycle")]
    EmptyCycle {
        /// Name of the style.
        style: String,
        /// Which cycle, e.g. `"color"`.
        cycle: &'static str,
    },

    /// A style defines no pads at all.
    #[error("style '{0}' defines no pads")]
    NoPads(String),

    /// A style parameter is outside its valid domain.
    #[error("style '{style}': invalid {parameter}: {reason}")]
    InvalidStyle {
        /// Name of the style.
        style: String,
        /// Offending parameter.
        parameter: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A user supplied name contains the reserved identity separator.
    #[error("'{0}' contains the reserved separator '{separator}'", separator = crate::spec::IDENTITY_SEPARATOR)]
    ReservedSeparator(String),
}

impl ConfigurationError {
    /// Create an empty-cycle error.
    pub fn empty_cycle(style: impl Into<String>, cycle: &'static str) -> Self {
        Self::EmptyCycle {
            style: style.into(),
            cycle,
        }
    }

    /// Create an invalid-style error.
    pub fn invalid_style(
        style: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidStyle {
            style: style.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

/// Problems with an individual datum. The datum is skipped, the pad continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Nothing with this identity was loaded.
    #[error("pad {pad}: no input data named '{identity}'")]
    Missing {
        /// Pad of the datum.
        pad: u8,
        /// Unique identity that was looked up.
        identity: String,
    },

    /// The loaded object is not one of the plottable kinds.
    #[error("pad {pad}: '{identity}' is a {actual}, expected one of {expected}")]
    TypeMismatch {
        /// Pad of the datum.
        pad: u8,
        /// Unique identity of the object.
        identity: String,
        /// Kind of the loaded object.
        actual: String,
        /// Accepted kinds.
        expected: String,
    },

    /// Numerator and denominator cannot be divided.
    #[error("pad {pad}: cannot divide {numerator} by {denominator}: {reason}")]
    UnsupportedRatio {
        /// Pad of the ratio.
        pad: u8,
        /// Identity of the numerator.
        numerator: String,
        /// Identity of the denominator.
        denominator: String,
        /// Why the division failed.
        reason: String,
    },
}

impl DataError {
    /// Create a missing-data error.
    pub fn missing(pad: u8, identity: impl Into<String>) -> Self {
        Self::Missing {
            pad,
            identity: identity.into(),
        }
    }

    /// Create a ratio error.
    pub fn unsupported_ratio(
        pad: u8,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedRatio {
            pad,
            numerator: numerator.into(),
            denominator: denominator.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal layout problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Auto-placement found no free area; the box was anchored at the frame corner.
    #[error("pad {pad}: no free space for box {box_index}, using frame corner")]
    NoFreePlacement {
        /// Pad of the box.
        pad: u8,
        /// Position of the box in the pad's box list.
        box_index: usize,
    },

    /// A 2D pad was drawn but no colour palette was created.
    #[error("pad {pad}: no palette found on 2D pad")]
    MissingPalette {
        /// Pad ID.
        pad: u8,
    },

    /// Nothing drawn in the pad carries axes; the axes stay unstyled.
    #[error("pad {pad}: nothing drawn carries axes")]
    MissingAxisOwner {
        /// Pad ID.
        pad: u8,
    },
}
