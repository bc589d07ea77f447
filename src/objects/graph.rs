//! Point sets in one and two dimensions.

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};
use crate::spec::AxisRange;

/// Point with asymmetric errors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphPoint {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
    /// Error towards smaller x.
    pub ex_low: f64,
    /// Error towards larger x.
    pub ex_high: f64,
    /// Error towards smaller y.
    pub ey_low: f64,
    /// Error towards larger y.
    pub ey_high: f64,
}

impl GraphPoint {
    /// Point without errors.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ex_low: 0.0,
            ex_high: 0.0,
            ey_low: 0.0,
            ey_high: 0.0,
        }
    }

    /// Point with symmetric errors.
    pub const fn with_errors(x: f64, y: f64, ex: f64, ey: f64) -> Self {
        Self {
            x,
            y,
            ex_low: ex,
            ex_high: ex,
            ey_low: ey,
            ey_high: ey,
        }
    }
}

/// One-dimensional graph; points are kept sorted by x.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph1d {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    points: Vec<GraphPoint>,
}

impl Graph1d {
    /// Graph through `points`.
    ///
    /// # Errors
    /// Fails for non-finite coordinates.
    pub fn new(name: impl Into<String>, mut points: Vec<GraphPoint>) -> PlotResult<Self> {
        let name = name.into();
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(PlotError::InvalidObject(format!(
                "'{name}': graph points must be finite"
            )));
        }
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Ok(Self {
            title: name.clone(),
            name,
            points,
        })
    }

    /// Graph through `(x, y)` pairs without errors.
    ///
    /// # Errors
    /// Same as [`Graph1d::new`].
    pub fn from_xy(name: impl Into<String>, x: &[f64], y: &[f64]) -> PlotResult<Self> {
        let points = x
            .iter()
            .zip(y)
            .map(|(x, y)| GraphPoint::new(*x, *y))
            .collect();
        Self::new(name, points)
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Points in ascending x.
    pub fn points(&self) -> &[GraphPoint] {
        &self.points
    }

    /// Mutable points. Callers must keep them sorted by x.
    pub fn points_mut(&mut self) -> &mut [GraphPoint] {
        &mut self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the graph has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the y values.
    pub fn sum(&self) -> f64 {
        self.points.iter().map(|p| p.y).sum()
    }

    /// Largest y value.
    pub fn maximum(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest y value.
    pub fn minimum(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min)
    }

    /// Multiply y values and errors.
    pub fn scale(&mut self, factor: f64) {
        for point in &mut self.points {
            point.y *= factor;
            point.ey_low *= factor.abs();
            point.ey_high *= factor.abs();
        }
    }

    /// Drop points outside `range`.
    pub fn cut(&mut self, range: AxisRange) {
        self.points.retain(|p| range.contains(p.x));
    }

    /// Horizontal extent including errors.
    pub fn x_range(&self) -> AxisRange {
        extent(self.points.iter().map(|p| (p.x - p.ex_low, p.x + p.ex_high)))
    }

    /// Vertical extent including errors.
    pub fn y_range(&self) -> AxisRange {
        extent(self.points.iter().map(|p| (p.y - p.ey_low, p.y + p.ey_high)))
    }
}

/// Point of a two-dimensional graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint2d {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
    /// Value.
    pub z: f64,
}

/// Unordered cloud of `(x, y, z)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph2d {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Points.
    pub points: Vec<GraphPoint2d>,
}

impl Graph2d {
    /// Graph through `points`.
    pub fn new(name: impl Into<String>, points: Vec<GraphPoint2d>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            points,
        }
    }

    /// Multiply z values.
    pub fn scale(&mut self, factor: f64) {
        for point in &mut self.points {
            point.z *= factor;
        }
    }

    /// Sum of the z values.
    pub fn sum(&self) -> f64 {
        self.points.iter().map(|p| p.z).sum()
    }

    /// Drop points whose x lies outside `range`.
    pub fn cut(&mut self, range: AxisRange) {
        self.points.retain(|p| range.contains(p.x));
    }

    /// Horizontal extent.
    pub fn x_range(&self) -> AxisRange {
        extent(self.points.iter().map(|p| (p.x, p.x)))
    }

    /// Vertical extent.
    pub fn y_range(&self) -> AxisRange {
        extent(self.points.iter().map(|p| (p.y, p.y)))
    }

    /// Value range.
    pub fn z_range(&self) -> AxisRange {
        extent(self.points.iter().map(|p| (p.z, p.z)))
    }
}

fn extent(bounds: impl Iterator<Item = (f64, f64)>) -> AxisRange {
    let (low, high) = bounds.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (l, h)| {
        (lo.min(l), hi.max(h))
    });
    if low > high {
        AxisRange::new(0.0, 1.0)
    } else {
        AxisRange::new(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_sorted_and_cut() {
        let mut graph =
            Graph1d::from_xy("g", &[3.0, 1.0, 2.0], &[30.0, 10.0, 20.0]).expect("valid graph");
        let xs: Vec<f64> = graph.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        graph.cut(AxisRange::new(1.5, 3.0));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.minimum(), 20.0);
    }

    #[test]
    fn test_ranges_include_errors() {
        let graph = Graph1d::new(
            "g",
            vec![
                GraphPoint::with_errors(1.0, 5.0, 0.5, 1.0),
                GraphPoint::with_errors(2.0, 8.0, 0.5, 2.0),
            ],
        )
        .expect("valid graph");
        assert_eq!(graph.x_range(), AxisRange::new(0.5, 2.5));
        assert_eq!(graph.y_range(), AxisRange::new(4.0, 10.0));
    }

    #[test]
    fn test_non_finite_points_are_rejected() {
        assert!(Graph1d::from_xy("g", &[f64::NAN], &[1.0]).is_err());
    }

    #[test]
    fn test_empty_graph_has_unit_extent() {
        let graph = Graph2d::new("g2", Vec::new());
        assert_eq!(graph.z_range(), AxisRange::new(0.0, 1.0));
    }
}
