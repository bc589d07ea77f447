// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::box_collection)] // Warns on boxed `Vec`, `String`, etc.
#![warn(clippy::vec_box)] // Avoids using `Vec<Box<T>>` when unnecessary
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![allow(clippy::too_many_arguments)]
#![deny(missing_docs)]

//! # Plotting Framework
//!
//! A declarative plotting front-end. Users describe *what* to plot as a [`Plot`]:
//! pads holding data, ratios, legends, text boxes and axis overrides. A named
//! [`Style`] describes *how*: pad layout, canvas size, default colour, marker,
//! line and fill cycles, text sizes and linked axes. Generation resolves the two
//! against a registry of loaded objects and produces a [`Figure`] of laid-out
//! primitives for an output stage to rasterise.
//!
//! ## Overview
//!
//! - [`spec`]: the plot definition tree, serializable and mergeable via [`spec::Overlay`].
//! - [`style`]: styles and the built-in presets.
//! - [`registry`]: loaded data objects and named styles.
//! - [`objects`]: histograms, graphs and functions, and the binding of identities to them.
//! - [`defaults`]: precedence of explicit values, pad cycles, style cycles and fallbacks.
//! - [`ratio`]: division with error propagation and spline interpolation.
//! - [`layout`]: pad geometry, text footprints and collision-grid box placement.
//! - [`render`]: the per-pad pipeline and [`Plotter`].
//! - [`figure`]: the output model.
//!
//! ## Features
//!
//! - `parallel-processing`: generate many figures concurrently with `rayon`.
//!
//! ## Error Handling
//!
//! Errors fall into three families. Configuration errors abort a figure before
//! anything is drawn; data and layout problems are recorded on the figure and
//! generation continues.
//!
//! ```rust
//! use plotting_framework::{ConfigurationError, PlotError, Style};
//! use plotting_framework::registry::DataStore;
//! use plotting_framework::render::generate;
//! use plotting_framework::spec::{Data, Plot};
//!
//! let mut plot = Plot::new("p", "group", "default_1d");
//! plot.pad_mut(3).add_data(Data::new("h", "file"));
//!
//! match generate(&plot, &Style::default_1d(), &DataStore::new()) {
//!     Err(PlotError::Configuration(ConfigurationError::PadCountMismatch { required, .. })) => {
//!         assert_eq!(required, 3)
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use plotting_framework::objects::{DataObject, Hist1d};
//! use plotting_framework::registry::DataStore;
//! use plotting_framework::spec::{Data, LegendBox, Plot, Ratio};
//! use plotting_framework::Plotter;
//!
//! let mut store = DataStore::new();
//! for (name, contents) in [("data", vec![12.0, 30.0, 8.0]), ("mc", vec![10.0, 28.0, 9.0])] {
//!     let hist = Hist1d::with_poisson_errors(name, vec![0.0, 1.0, 2.0, 3.0], contents).unwrap();
//!     store.insert_from(name, "sample", DataObject::Hist1d(hist));
//! }
//!
//! let mut plot = Plot::new("control", "overview", "default_1d_ratio");
//! plot.pad_mut(1)
//!     .add_data(Data::new("data", "sample").with_label("Data"))
//!     .add_data(Data::new("mc", "sample").with_label("MC").with_options("hist"))
//!     .add_box(LegendBox::new());
//! plot.pad_mut(2).add_data(Ratio::new("data", "sample", "mc", "sample"));
//!
//! let figure = Plotter::default().generate(&plot, &store).unwrap();
//! assert_eq!(figure.pads.len(), 2);
//! ```

pub mod attributes;
pub mod control;
pub mod defaults;
mod error;
pub mod figure;
pub mod layout;
pub mod objects;
pub mod ratio;
pub mod registry;
pub mod render;
pub mod spec;
pub mod style;

pub use crate::attributes::{Color, FillStyle, LineStyle, Marker};
pub use crate::error::{ConfigurationError, DataError, LayoutError, PlotError, PlotResult};
pub use crate::figure::{Figure, PadCanvas, Primitive};
pub use crate::registry::{DataRegistry, DataStore, StyleRegistry};
pub use crate::render::{Plotter, generate};
pub use crate::spec::{Plot, IDENTITY_SEPARATOR, LINE_DELIMITER};
pub use crate::style::Style;
