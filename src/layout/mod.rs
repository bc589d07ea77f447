//! Geometry, text measurement and box placement.
//!
//! Everything here works in pad NDC once a pad's [`PadGeometry`] is final:
//! footprints depend on the pad's pixel size and placement on its frame.

pub mod footprint;
pub mod geometry;
pub mod metrics;
pub mod placement;

pub use footprint::{Footprint, TextStyle, legend_footprint, substitute_placeholders, text_footprint};
pub use geometry::{FrameTransform, Margins, NdcRect, PadGeometry};
pub use metrics::{ApproximateTextMetrics, TextMetrics};
pub use placement::{
    COLLIDE_CELL_PIXELS, CollisionGrid, PLACEMENT_INSET, Placement, PlacementStrategy, Shape,
    auto_place, exclusion_rects,
};
