//! Binned data in one and two dimensions.

use ndarray::{Array1, Array2};

use crate::error::{PlotError, PlotResult};
use crate::spec::AxisRange;

/// One-dimensional histogram with per-bin errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist1d {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Bin edges, one more than the number of bins, strictly increasing.
    edges: Vec<f64>,
    /// Bin contents.
    pub contents: Array1<f64>,
    /// Bin errors.
    pub errors: Array1<f64>,
    /// Number of fill entries.
    pub entries: f64,
}

impl Hist1d {
    /// Histogram with the given edges, contents and errors.
    ///
    /// # Errors
    /// Fails if the edges are not strictly increasing or the lengths do not match.
    pub fn new(
        name: impl Into<String>,
        edges: Vec<f64>,
        contents: Vec<f64>,
        errors: Vec<f64>,
    ) -> PlotResult<Self> {
        let name = name.into();
        check_edges(&name, &edges)?;
        if contents.len() + 1 != edges.len() || errors.len() != contents.len() {
            return Err(PlotError::InvalidObject(format!(
                "'{name}': {} edges, {} contents and {} errors do not describe the same bins",
                edges.len(),
                contents.len(),
                errors.len()
            )));
        }
        let entries = contents.iter().filter(|c| **c != 0.0).count() as f64;
        Ok(Self {
            title: name.clone(),
            name,
            edges,
            contents: Array1::from(contents),
            errors: Array1::from(errors),
            entries,
        })
    }

    /// Empty histogram with `bins` equal-width bins in `[min, max]`.
    ///
    /// # Errors
    /// Fails for zero bins or an empty range.
    pub fn uniform(name: impl Into<String>, bins: usize, min: f64, max: f64) -> PlotResult<Self> {
        let edges = uniform_edges(bins, min, max);
        Self::new(name, edges, vec![0.0; bins], vec![0.0; bins])
    }

    /// Histogram whose errors are the square roots of the contents.
    ///
    /// # Errors
    /// Same as [`Hist1d::new`].
    pub fn with_poisson_errors(
        name: impl Into<String>,
        edges: Vec<f64>,
        contents: Vec<f64>,
    ) -> PlotResult<Self> {
        let errors = contents.iter().map(|c| c.abs().sqrt()).collect();
        Self::new(name, edges, contents, errors)
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.contents.len()
    }

    /// Bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Centre of bin `bin` (0-based).
    pub fn bin_center(&self, bin: usize) -> f64 {
        0.5 * (self.edges[bin] + self.edges[bin + 1])
    }

    /// Width of bin `bin` (0-based).
    pub fn bin_width(&self, bin: usize) -> f64 {
        self.edges[bin + 1] - self.edges[bin]
    }

    /// Whether both histograms have identical bin edges.
    pub fn same_binning(&self, other: &Hist1d) -> bool {
        self.edges == other.edges
    }

    /// Sum of the bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.sum()
    }

    /// Content-weighted mean of the bin centres.
    pub fn mean(&self) -> f64 {
        let total = self.integral();
        if total == 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .contents
            .iter()
            .enumerate()
            .map(|(bin, content)| content * self.bin_center(bin))
            .sum();
        weighted / total
    }

    /// Largest bin content.
    pub fn maximum(&self) -> f64 {
        self.contents.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest bin content.
    pub fn minimum(&self) -> f64 {
        self.contents.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Multiply contents and errors.
    pub fn scale(&mut self, factor: f64) {
        self.contents *= factor;
        self.errors *= factor.abs();
    }

    /// Zero all bins whose centre lies outside `range`.
    pub fn cut(&mut self, range: AxisRange) {
        for bin in 0..self.bins() {
            if !range.contains(self.bin_center(bin)) {
                self.contents[bin] = 0.0;
                self.errors[bin] = 0.0;
            }
        }
    }

    /// Horizontal extent.
    pub fn x_range(&self) -> AxisRange {
        AxisRange::new(self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// Vertical extent including errors.
    pub fn y_range(&self) -> AxisRange {
        let low = self
            .contents
            .iter()
            .zip(self.errors.iter())
            .map(|(c, e)| c - e)
            .fold(f64::INFINITY, f64::min);
        let high = self
            .contents
            .iter()
            .zip(self.errors.iter())
            .map(|(c, e)| c + e)
            .fold(f64::NEG_INFINITY, f64::max);
        AxisRange::new(low, high)
    }
}

/// Two-dimensional histogram, contents indexed `[x bin, y bin]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2d {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    /// Bin contents.
    pub contents: Array2<f64>,
    /// Bin errors.
    pub errors: Array2<f64>,
    /// Number of fill entries.
    pub entries: f64,
}

impl Hist2d {
    /// Histogram with the given edges and contents; errors are the square roots.
    ///
    /// # Errors
    /// Fails if the edges are not increasing or do not match the content shape.
    pub fn new(
        name: impl Into<String>,
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
        contents: Array2<f64>,
    ) -> PlotResult<Self> {
        let name = name.into();
        check_edges(&name, &x_edges)?;
        check_edges(&name, &y_edges)?;
        if contents.dim() != (x_edges.len() - 1, y_edges.len() - 1) {
            return Err(PlotError::InvalidObject(format!(
                "'{name}': contents of shape {:?} do not match {}x{} bins",
                contents.dim(),
                x_edges.len() - 1,
                y_edges.len() - 1
            )));
        }
        let errors = contents.mapv(|c| c.abs().sqrt());
        let entries = contents.iter().filter(|c| **c != 0.0).count() as f64;
        Ok(Self {
            title: name.clone(),
            name,
            x_edges,
            y_edges,
            contents,
            errors,
            entries,
        })
    }

    /// Empty histogram with equal-width bins.
    ///
    /// # Errors
    /// Fails for zero bins or empty ranges.
    pub fn uniform(
        name: impl Into<String>,
        (x_bins, x_min, x_max): (usize, f64, f64),
        (y_bins, y_min, y_max): (usize, f64, f64),
    ) -> PlotResult<Self> {
        Self::new(
            name,
            uniform_edges(x_bins, x_min, x_max),
            uniform_edges(y_bins, y_min, y_max),
            Array2::zeros((x_bins, y_bins)),
        )
    }

    /// Bin edges along x.
    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    /// Bin edges along y.
    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    /// Whether both histograms have identical bin edges.
    pub fn same_binning(&self, other: &Hist2d) -> bool {
        self.x_edges == other.x_edges && self.y_edges == other.y_edges
    }

    /// Sum of the bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.sum()
    }

    /// Largest bin content.
    pub fn maximum(&self) -> f64 {
        self.contents.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest bin content.
    pub fn minimum(&self) -> f64 {
        self.contents.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Content-weighted mean of the x bin centres.
    pub fn mean(&self) -> f64 {
        let total = self.integral();
        if total == 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .contents
            .indexed_iter()
            .map(|((ix, _), content)| content * 0.5 * (self.x_edges[ix] + self.x_edges[ix + 1]))
            .sum();
        weighted / total
    }

    /// Multiply contents and errors.
    pub fn scale(&mut self, factor: f64) {
        self.contents *= factor;
        self.errors *= factor.abs();
    }

    /// Zero all columns whose x centre lies outside `range`.
    pub fn cut(&mut self, range: AxisRange) {
        for ix in 0..self.x_edges.len() - 1 {
            let center = 0.5 * (self.x_edges[ix] + self.x_edges[ix + 1]);
            if !range.contains(center) {
                self.contents.row_mut(ix).fill(0.0);
                self.errors.row_mut(ix).fill(0.0);
            }
        }
    }

    /// Horizontal extent.
    pub fn x_range(&self) -> AxisRange {
        AxisRange::new(self.x_edges[0], self.x_edges[self.x_edges.len() - 1])
    }

    /// Vertical extent.
    pub fn y_range(&self) -> AxisRange {
        AxisRange::new(self.y_edges[0], self.y_edges[self.y_edges.len() - 1])
    }

    /// Range of the bin contents.
    pub fn z_range(&self) -> AxisRange {
        AxisRange::new(self.minimum(), self.maximum())
    }
}

fn uniform_edges(bins: usize, min: f64, max: f64) -> Vec<f64> {
    let width = (max - min) / bins.max(1) as f64;
    (0..=bins).map(|i| min + i as f64 * width).collect()
}

fn check_edges(name: &str, edges: &[f64]) -> PlotResult<()> {
    if edges.len() < 2 {
        return Err(PlotError::InvalidObject(format!(
            "'{name}': at least one bin is required"
        )));
    }
    if edges.windows(2).any(|pair| !(pair[1] > pair[0])) {
        return Err(PlotError::InvalidObject(format!(
            "'{name}': bin edges must be strictly increasing"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use ndarray::array;

    fn sample() -> Hist1d {
        Hist1d::new(
            "h",
            vec![0.0, 1.0, 2.0, 4.0],
            vec![1.0, 3.0, 0.0],
            vec![1.0, 1.5, 0.0],
        )
        .expect("valid histogram")
    }

    #[test]
    fn test_statistics() {
        let hist = sample();
        assert_approx_eq!(hist.integral(), 4.0, 1e-12);
        // (1 * 0.5 + 3 * 1.5) / 4
        assert_approx_eq!(hist.mean(), 1.25, 1e-12);
        assert_eq!(hist.maximum(), 3.0);
        assert_eq!(hist.minimum(), 0.0);
        assert_eq!(hist.entries, 2.0);
        assert_approx_eq!(hist.bin_width(2), 2.0, 1e-12);
    }

    #[test]
    fn test_cut_zeroes_outside_bins() {
        let mut hist = sample();
        hist.cut(AxisRange::new(1.0, 4.0));
        assert_eq!(hist.contents, array![0.0, 3.0, 0.0]);
        assert_eq!(hist.errors[0], 0.0);
    }

    #[test]
    fn test_scale_keeps_errors_positive() {
        let mut hist = sample();
        hist.scale(-2.0);
        assert_eq!(hist.contents, array![-2.0, -6.0, 0.0]);
        assert_eq!(hist.errors, array![2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        assert!(Hist1d::new("h", vec![0.0, 1.0], vec![1.0, 2.0], vec![0.0, 0.0]).is_err());
        assert!(Hist1d::new("h", vec![1.0, 0.0], vec![1.0], vec![0.0]).is_err());
        assert!(Hist2d::new("h", vec![0.0, 1.0], vec![0.0, 1.0], Array2::zeros((2, 1))).is_err());
    }

    #[test]
    fn test_2d_cut_and_ranges() {
        let mut hist = Hist2d::new(
            "h2",
            vec![0.0, 1.0, 2.0],
            vec![0.0, 10.0],
            array![[4.0], [9.0]],
        )
        .expect("valid histogram");
        assert_eq!(hist.errors, array![[2.0], [3.0]]);
        assert_eq!(hist.z_range(), AxisRange::new(4.0, 9.0));
        hist.cut(AxisRange::new(1.0, 2.0));
        assert_eq!(hist.contents, array![[0.0], [9.0]]);
    }
}
