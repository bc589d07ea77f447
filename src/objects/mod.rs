//! Plottable objects and data binding.
//!
//! Loaded objects reach the generator as [`DataObject`]s, a runtime-typed handle
//! that may also carry kinds the generator cannot draw. [`bind_and_clone`] looks
//! an identity up in a [`DataRegistry`], dispatches it against the ordered list of
//! [`PlottableKind::CANDIDATES`] and returns an owned [`Plottable`] the pipeline
//! may style and mutate freely.

pub mod function;
pub mod graph;
pub mod histogram;

pub use function::{FUNCTION_SAMPLES, Function1d, Function2d};
pub use graph::{Graph1d, Graph2d, GraphPoint, GraphPoint2d};
pub use histogram::{Hist1d, Hist2d};

use tracing::trace;

use crate::error::DataError;
use crate::registry::DataRegistry;
use crate::spec::AxisRange;

/// Object as delivered by the input layer.
#[derive(Debug, Clone)]
pub enum DataObject {
    /// 2D profile: per-cell means, drawn like a 2D histogram.
    Profile2d(Hist2d),
    /// 2D histogram.
    Hist2d(Hist2d),
    /// 1D profile: per-bin means, drawn like a 1D histogram.
    Profile1d(Hist1d),
    /// 1D histogram.
    Hist1d(Hist1d),
    /// 2D graph.
    Graph2d(Graph2d),
    /// 1D graph.
    Graph1d(Graph1d),
    /// 2D function.
    Function2d(Function2d),
    /// 1D function.
    Function1d(Function1d),
    /// Anything else the input layer loaded.
    Other {
        /// Class name reported by the input layer.
        class_name: String,
    },
}

impl DataObject {
    /// Most specific plottable kind of the object.
    pub const fn kind(&self) -> Option<PlottableKind> {
        Some(match self {
            DataObject::Profile2d(_) => PlottableKind::Profile2d,
            DataObject::Hist2d(_) => PlottableKind::Hist2d,
            DataObject::Profile1d(_) => PlottableKind::Profile1d,
            DataObject::Hist1d(_) => PlottableKind::Hist1d,
            DataObject::Graph2d(_) => PlottableKind::Graph2d,
            DataObject::Graph1d(_) => PlottableKind::Graph1d,
            DataObject::Function2d(_) => PlottableKind::Function2d,
            DataObject::Function1d(_) => PlottableKind::Function1d,
            DataObject::Other { .. } => return None,
        })
    }

    /// Type name used in messages.
    pub fn class_name(&self) -> &str {
        match self {
            DataObject::Other { class_name } => class_name,
            other => other.kind().map_or("unknown", PlottableKind::name),
        }
    }

    fn to_plottable(&self) -> Option<Plottable> {
        Some(match self {
            DataObject::Profile2d(h) | DataObject::Hist2d(h) => Plottable::Hist2d(h.clone()),
            DataObject::Profile1d(h) | DataObject::Hist1d(h) => Plottable::Hist1d(h.clone()),
            DataObject::Graph2d(g) => Plottable::Graph2d(g.clone()),
            DataObject::Graph1d(g) => Plottable::Graph1d(g.clone()),
            DataObject::Function2d(f) => Plottable::Function2d(f.clone()),
            DataObject::Function1d(f) => Plottable::Function1d(f.clone()),
            DataObject::Other { .. } => return None,
        })
    }
}

/// Kinds the generator can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlottableKind {
    /// 2D profile.
    Profile2d,
    /// 2D histogram.
    Hist2d,
    /// 1D profile.
    Profile1d,
    /// 1D histogram.
    Hist1d,
    /// 2D graph.
    Graph2d,
    /// 1D graph.
    Graph1d,
    /// 2D function.
    Function2d,
    /// 1D function.
    Function1d,
}

impl PlottableKind {
    /// Dispatch order. A kind must precede every kind it satisfies.
    pub const CANDIDATES: [PlottableKind; 8] = [
        PlottableKind::Profile2d,
        PlottableKind::Hist2d,
        PlottableKind::Profile1d,
        PlottableKind::Hist1d,
        PlottableKind::Graph2d,
        PlottableKind::Graph1d,
        PlottableKind::Function2d,
        PlottableKind::Function1d,
    ];

    /// Whether an object of kind `self` is also a `candidate`.
    pub fn satisfies(self, candidate: PlottableKind) -> bool {
        self == candidate
            || matches!(
                (self, candidate),
                (PlottableKind::Profile2d, PlottableKind::Hist2d)
                    | (PlottableKind::Profile1d, PlottableKind::Hist1d)
            )
    }

    /// Human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            PlottableKind::Profile2d => "2D profile",
            PlottableKind::Hist2d => "2D histogram",
            PlottableKind::Profile1d => "1D profile",
            PlottableKind::Hist1d => "1D histogram",
            PlottableKind::Graph2d => "2D graph",
            PlottableKind::Graph1d => "1D graph",
            PlottableKind::Function2d => "2D function",
            PlottableKind::Function1d => "1D function",
        }
    }

    /// Whether the kind spans a colour axis.
    pub const fn is_2d(self) -> bool {
        matches!(
            self,
            PlottableKind::Profile2d
                | PlottableKind::Hist2d
                | PlottableKind::Graph2d
                | PlottableKind::Function2d
        )
    }

    fn expected() -> String {
        Self::CANDIDATES
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Owned drawable copy of a loaded object.
#[derive(Debug, Clone)]
pub enum Plottable {
    /// 1D histogram or profile.
    Hist1d(Hist1d),
    /// 2D histogram or profile.
    Hist2d(Hist2d),
    /// 1D graph.
    Graph1d(Graph1d),
    /// 2D graph.
    Graph2d(Graph2d),
    /// 1D function.
    Function1d(Function1d),
    /// 2D function.
    Function2d(Function2d),
}

impl Plottable {
    /// Object name.
    pub fn name(&self) -> &str {
        match self {
            Plottable::Hist1d(h) => &h.name,
            Plottable::Hist2d(h) => &h.name,
            Plottable::Graph1d(g) => &g.name,
            Plottable::Graph2d(g) => &g.name,
            Plottable::Function1d(f) => &f.name,
            Plottable::Function2d(f) => &f.name,
        }
    }

    /// Object title.
    pub fn title(&self) -> &str {
        match self {
            Plottable::Hist1d(h) => &h.title,
            Plottable::Hist2d(h) => &h.title,
            Plottable::Graph1d(g) => &g.title,
            Plottable::Graph2d(g) => &g.title,
            Plottable::Function1d(f) => &f.title,
            Plottable::Function2d(f) => &f.title,
        }
    }

    /// Whether the object spans a colour axis.
    pub const fn is_2d(&self) -> bool {
        matches!(
            self,
            Plottable::Hist2d(_) | Plottable::Graph2d(_) | Plottable::Function2d(_)
        )
    }

    /// Whether the object is binned.
    pub const fn is_histogram(&self) -> bool {
        matches!(self, Plottable::Hist1d(_) | Plottable::Hist2d(_))
    }

    /// Whether the object is a graph.
    pub const fn is_graph(&self) -> bool {
        matches!(self, Plottable::Graph1d(_) | Plottable::Graph2d(_))
    }

    /// Horizontal extent.
    pub fn x_range(&self) -> AxisRange {
        match self {
            Plottable::Hist1d(h) => h.x_range(),
            Plottable::Hist2d(h) => h.x_range(),
            Plottable::Graph1d(g) => g.x_range(),
            Plottable::Graph2d(g) => g.x_range(),
            Plottable::Function1d(f) => f.domain,
            Plottable::Function2d(f) => f.x_domain,
        }
    }

    /// Vertical extent.
    pub fn y_range(&self) -> AxisRange {
        match self {
            Plottable::Hist1d(h) => h.y_range(),
            Plottable::Hist2d(h) => h.y_range(),
            Plottable::Graph1d(g) => g.y_range(),
            Plottable::Graph2d(g) => g.y_range(),
            Plottable::Function1d(f) => f.y_range(),
            Plottable::Function2d(f) => f.y_domain,
        }
    }

    /// Colour axis extent of 2D objects.
    pub fn z_range(&self) -> Option<AxisRange> {
        match self {
            Plottable::Hist2d(h) => Some(h.z_range()),
            Plottable::Graph2d(g) => Some(g.z_range()),
            _ => None,
        }
    }

    /// Multiply values and errors.
    pub fn scale(&mut self, factor: f64) {
        match self {
            Plottable::Hist1d(h) => h.scale(factor),
            Plottable::Hist2d(h) => h.scale(factor),
            Plottable::Graph1d(g) => g.scale(factor),
            Plottable::Graph2d(g) => g.scale(factor),
            Plottable::Function1d(f) => f.scale(factor),
            Plottable::Function2d(f) => f.scale(factor),
        }
    }

    /// Scale histograms and functions to unit integral, graphs to unit sum.
    ///
    /// Objects with a vanishing integral are left unchanged.
    pub fn normalize(&mut self) {
        let total = match self {
            Plottable::Hist1d(h) => h.integral(),
            Plottable::Hist2d(h) => h.integral(),
            Plottable::Graph1d(g) => g.sum(),
            Plottable::Graph2d(g) => g.sum(),
            Plottable::Function1d(f) => f.integral(),
            Plottable::Function2d(f) => f.integral(),
        };
        if total != 0.0 && total.is_finite() {
            self.scale(1.0 / total);
        }
    }

    /// Restrict to an x range.
    pub fn cut_x(&mut self, range: AxisRange) {
        match self {
            Plottable::Hist1d(h) => h.cut(range),
            Plottable::Hist2d(h) => h.cut(range),
            Plottable::Graph1d(g) => g.cut(range),
            Plottable::Graph2d(g) => g.cut(range),
            Plottable::Function1d(f) => f.cut(range),
            Plottable::Function2d(f) => f.cut(range),
        }
    }

    /// Summary statistics; only histograms carry them.
    pub fn statistics(&self) -> Option<Statistics> {
        match self {
            Plottable::Hist1d(h) => Some(Statistics {
                entries: h.entries,
                integral: h.integral(),
                mean: h.mean(),
                maximum: h.maximum(),
                minimum: h.minimum(),
            }),
            Plottable::Hist2d(h) => Some(Statistics {
                entries: h.entries,
                integral: h.integral(),
                mean: h.mean(),
                maximum: h.maximum(),
                minimum: h.minimum(),
            }),
            _ => None,
        }
    }
}

/// Statistics of a histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Fill entries.
    pub entries: f64,
    /// Sum of contents.
    pub integral: f64,
    /// Mean along x.
    pub mean: f64,
    /// Largest content.
    pub maximum: f64,
    /// Smallest content.
    pub minimum: f64,
}

/// Result of binding: the matched kind and an owned copy.
#[derive(Debug, Clone)]
pub struct Bound {
    /// Candidate kind that matched first.
    pub kind: PlottableKind,
    /// Owned copy.
    pub plottable: Plottable,
}

/// Look up `identity`, dispatch it against the candidate kinds and clone it.
///
/// # Errors
/// [`DataError::Missing`] if nothing is registered under `identity`,
/// [`DataError::TypeMismatch`] if the object is none of the candidate kinds.
pub fn bind_and_clone(
    identity: &str,
    registry: &dyn DataRegistry,
    pad: u8,
) -> Result<Bound, DataError> {
    let object = registry
        .lookup(identity)
        .ok_or_else(|| DataError::missing(pad, identity))?;
    let mismatch = || DataError::TypeMismatch {
        pad,
        identity: identity.to_string(),
        actual: object.class_name().to_string(),
        expected: PlottableKind::expected(),
    };
    let actual = object.kind().ok_or_else(mismatch)?;
    let kind = PlottableKind::CANDIDATES
        .into_iter()
        .find(|candidate| actual.satisfies(*candidate))
        .ok_or_else(mismatch)?;
    let plottable = object.to_plottable().ok_or_else(mismatch)?;
    trace!(pad, identity, kind = kind.name(), "bound datum");
    Ok(Bound { kind, plottable })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DataStore;

    fn hist(name: &str) -> Hist1d {
        Hist1d::new(name, vec![0.0, 1.0, 2.0], vec![2.0, 6.0], vec![1.0, 1.0])
            .expect("valid histogram")
    }

    #[test]
    fn test_profile_matches_before_histogram() {
        assert!(PlottableKind::Profile2d.satisfies(PlottableKind::Hist2d));
        assert!(!PlottableKind::Hist2d.satisfies(PlottableKind::Profile2d));

        let mut store = DataStore::new();
        store.insert("p_IN_in", DataObject::Profile1d(hist("p")));
        let bound = bind_and_clone("p_IN_in", &store, 1).expect("bound");
        assert_eq!(bound.kind, PlottableKind::Profile1d);
        assert!(matches!(bound.plottable, Plottable::Hist1d(_)));
    }

    #[test]
    fn test_every_kind_precedes_what_it_satisfies() {
        for (i, kind) in PlottableKind::CANDIDATES.iter().enumerate() {
            for earlier in &PlottableKind::CANDIDATES[..i] {
                assert!(!kind.satisfies(*earlier), "{kind:?} after {earlier:?}");
            }
        }
    }

    #[test]
    fn test_missing_and_mismatched_data() {
        let mut store = DataStore::new();
        store.insert(
            "tree_IN_in",
            DataObject::Other {
                class_name: "TTree".to_string(),
            },
        );
        assert_eq!(
            bind_and_clone("nope_IN_in", &store, 2).map(|b| b.kind),
            Err(DataError::missing(2, "nope_IN_in"))
        );
        match bind_and_clone("tree_IN_in", &store, 2) {
            Err(DataError::TypeMismatch { actual, .. }) => assert_eq!(actual, "TTree"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_clone_is_independent_of_registry() {
        let mut store = DataStore::new();
        store.insert("h_IN_in", DataObject::Hist1d(hist("h")));
        let mut bound = bind_and_clone("h_IN_in", &store, 1).expect("bound");
        bound.plottable.scale(10.0);
        match store.lookup("h_IN_in") {
            Some(DataObject::Hist1d(original)) => assert_eq!(original.contents[0], 2.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_normalize_and_statistics() {
        let mut plottable = Plottable::Hist1d(hist("h"));
        plottable.normalize();
        let stats = plottable.statistics().expect("histogram statistics");
        assert_eq!(stats.integral, 1.0);
        assert_eq!(stats.maximum, 0.75);
        let graph = Plottable::Graph1d(
            Graph1d::from_xy("g", &[1.0], &[1.0]).expect("valid graph"),
        );
        assert!(graph.statistics().is_none());
    }
}
