//! Ratio computation.
//!
//! The quotient keeps the numerator's concrete kind. Histograms with identical
//! binning are divided bin by bin with error propagation. Every other 1D
//! combination evaluates the denominator at the numerator's sampling points,
//! interpolating histograms and graphs with a [`CubicSpline`]. A function
//! numerator wraps the quotient into a new function.
//!
//! A vanishing denominator yields content and error 0, never NaN or infinity.

pub mod spline;

pub use spline::CubicSpline;

use tracing::trace;

use crate::error::DataError;
use crate::objects::{Graph1d, GraphPoint, Hist1d, Hist2d, Plottable};

/// How uncertainties of numerator and denominator combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPropagation {
    /// Independent numerator and denominator.
    #[default]
    Uncorrelated,
    /// Numerator is a subset of the denominator (efficiencies).
    Binomial,
}

impl ErrorPropagation {
    /// Propagation selected by a ratio's `correlated` flag.
    pub fn from_correlated(correlated: Option<bool>) -> Self {
        if correlated.unwrap_or(false) {
            ErrorPropagation::Binomial
        } else {
            ErrorPropagation::Uncorrelated
        }
    }
}

/// Divide `c1 ± e1` by `c2 ± e2`.
pub fn divide_values(c1: f64, e1: f64, c2: f64, e2: f64, propagation: ErrorPropagation) -> (f64, f64) {
    if c2 == 0.0 {
        return (0.0, 0.0);
    }
    let ratio = c1 / c2;
    let variance = match propagation {
        ErrorPropagation::Uncorrelated => {
            (e1 * e1 * c2 * c2 + e2 * e2 * c1 * c1) / (c2 * c2 * c2 * c2)
        }
        ErrorPropagation::Binomial => {
            (((1.0 - 2.0 * ratio) * e1 * e1 + ratio * ratio * e2 * e2) / (c2 * c2)).abs()
        }
    };
    (ratio, variance.sqrt())
}

/// Bin-wise quotient of two histograms with identical binning.
pub fn divide_histograms(numerator: &Hist1d, denominator: &Hist1d, propagation: ErrorPropagation) -> Option<Hist1d> {
    if !numerator.same_binning(denominator) {
        return None;
    }
    let mut quotient = numerator.clone();
    for bin in 0..quotient.bins() {
        let (content, error) = divide_values(
            numerator.contents[bin],
            numerator.errors[bin],
            denominator.contents[bin],
            denominator.errors[bin],
            propagation,
        );
        quotient.contents[bin] = content;
        quotient.errors[bin] = error;
    }
    Some(quotient)
}

/// Cell-wise quotient of two 2D histograms with identical binning.
pub fn divide_histograms_2d(numerator: &Hist2d, denominator: &Hist2d, propagation: ErrorPropagation) -> Option<Hist2d> {
    if !numerator.same_binning(denominator) {
        return None;
    }
    let mut quotient = numerator.clone();
    for ((cell, content), error) in quotient
        .contents
        .indexed_iter_mut()
        .zip(quotient.errors.iter_mut())
    {
        let (c, e) = divide_values(
            numerator.contents[cell],
            numerator.errors[cell],
            denominator.contents[cell],
            denominator.errors[cell],
            propagation,
        );
        *content = c;
        *error = e;
    }
    Some(quotient)
}

type Evaluator = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Continuous evaluator of a 1D denominator.
fn interpolant(denominator: &Plottable) -> Result<Evaluator, &'static str> {
    match denominator {
        Plottable::Hist1d(hist) => {
            let centers = (0..hist.bins()).map(|bin| hist.bin_center(bin)).collect();
            let spline = CubicSpline::new(centers, hist.contents.to_vec())
                .ok_or("denominator histogram needs at least two bins")?;
            Ok(Box::new(move |x| spline.eval(x)))
        }
        Plottable::Graph1d(graph) => {
            let (x, y) = graph.points().iter().map(|p| (p.x, p.y)).unzip();
            let spline = CubicSpline::new(x, y)
                .ok_or("denominator graph needs at least two points with distinct x")?;
            Ok(Box::new(move |x| spline.eval(x)))
        }
        Plottable::Function1d(function) => {
            let function = function.clone();
            Ok(Box::new(move |x| function.eval(x)))
        }
        _ => Err("denominator is not one-dimensional"),
    }
}

/// Divide a graph point by point by a graph sampled at the same x values.
///
/// Only the numerator's errors survive, each side scaled by `1 / |den|`.
fn divide_matching_graphs(numerator: &Graph1d, denominator: &Graph1d) -> Option<Graph1d> {
    if numerator.len() != denominator.len()
        || numerator
            .points()
            .iter()
            .zip(denominator.points())
            .any(|(a, b)| a.x != b.x)
    {
        return None;
    }
    let values: Vec<f64> = denominator.points().iter().map(|p| p.y).collect();
    let mut quotient = numerator.clone();
    for (point, den) in quotient.points_mut().iter_mut().zip(values) {
        scale_point(point, den);
    }
    Some(quotient)
}

fn scale_point(point: &mut GraphPoint, den: f64) {
    if den == 0.0 || !den.is_finite() {
        point.y = 0.0;
        point.ey_low = 0.0;
        point.ey_high = 0.0;
    } else {
        point.y /= den;
        point.ey_low /= den.abs();
        point.ey_high /= den.abs();
    }
}

/// Quotient of `numerator` over `denominator`, of the numerator's kind.
///
/// `pad` and the identities only label the error.
///
/// # Errors
/// [`DataError::UnsupportedRatio`] for 2D objects with different binning or
/// anything 2D divided by something else, and for denominators that cannot be
/// interpolated.
pub fn divide(
    numerator: Plottable,
    denominator: &Plottable,
    propagation: ErrorPropagation,
    pad: u8,
    identities: (&str, &str),
) -> Result<Plottable, DataError> {
    let fail = |reason: &str| DataError::unsupported_ratio(pad, identities.0, identities.1, reason);
    trace!(pad, numerator = identities.0, denominator = identities.1, ?propagation, "dividing");

    match (numerator, denominator) {
        (Plottable::Hist1d(num), Plottable::Hist1d(den)) if num.same_binning(den) => {
            divide_histograms(&num, den, propagation)
                .map(Plottable::Hist1d)
                .ok_or_else(|| fail("binning differs"))
        }
        (Plottable::Hist2d(num), Plottable::Hist2d(den)) => divide_histograms_2d(&num, den, propagation)
            .map(Plottable::Hist2d)
            .ok_or_else(|| fail("binning differs")),
        (Plottable::Graph1d(num), Plottable::Graph1d(den)) => {
            match divide_matching_graphs(&num, den) {
                Some(quotient) => Ok(Plottable::Graph1d(quotient)),
                None => {
                    let evaluate = interpolant(denominator).map_err(fail)?;
                    Ok(Plottable::Graph1d(divide_graph(num, &evaluate)))
                }
            }
        }
        (Plottable::Hist1d(num), _) => {
            let evaluate = interpolant(denominator).map_err(fail)?;
            Ok(Plottable::Hist1d(divide_hist(num, &evaluate)))
        }
        (Plottable::Graph1d(num), _) => {
            let evaluate = interpolant(denominator).map_err(fail)?;
            Ok(Plottable::Graph1d(divide_graph(num, &evaluate)))
        }
        (Plottable::Function1d(mut num), _) => {
            let evaluate = interpolant(denominator).map_err(fail)?;
            num.divide_by(evaluate);
            Ok(Plottable::Function1d(num))
        }
        (numerator, _) => Err(fail(if numerator.is_2d() {
            "2D objects can only be divided by 2D histograms with the same binning"
        } else {
            "unsupported combination"
        })),
    }
}

fn divide_hist(mut hist: Hist1d, evaluate: &Evaluator) -> Hist1d {
    for bin in 0..hist.bins() {
        let den = evaluate(hist.bin_center(bin));
        if den == 0.0 || !den.is_finite() {
            hist.contents[bin] = 0.0;
            hist.errors[bin] = 0.0;
        } else {
            hist.contents[bin] /= den;
            hist.errors[bin] /= den.abs();
        }
    }
    hist
}

fn divide_graph(mut graph: Graph1d, evaluate: &Evaluator) -> Graph1d {
    for point in graph.points_mut() {
        let den = evaluate(point.x);
        scale_point(point, den);
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Function1d;
    use crate::spec::AxisRange;
    use approx_eq::assert_approx_eq;
    use ndarray::array;

    fn hist(name: &str, contents: Vec<f64>, errors: Vec<f64>) -> Hist1d {
        Hist1d::new(name, vec![0.0, 1.0, 2.0, 3.0], contents, errors).expect("valid histogram")
    }

    #[test]
    fn test_zero_denominator_bins_are_zero() {
        let a = hist("a", vec![10.0, 20.0, 0.0], vec![1.0, 2.0, 0.0]);
        let b = hist("b", vec![5.0, 4.0, 0.0], vec![5.0_f64.sqrt(), 2.0, 0.0]);
        let ratio = divide(
            Plottable::Hist1d(a),
            &Plottable::Hist1d(b),
            ErrorPropagation::Uncorrelated,
            1,
            ("a_IN_in", "b_IN_in"),
        )
        .expect("same binning");
        let Plottable::Hist1d(ratio) = ratio else {
            panic!("quotient must stay a histogram");
        };
        assert_eq!(ratio.contents, array![2.0, 5.0, 0.0]);
        assert_eq!(ratio.errors[2], 0.0);
        assert!(ratio.errors.iter().all(|e| e.is_finite()));
        // (1^2 * 5^2 + 5 * 10^2) / 5^4
        assert_approx_eq!(ratio.errors[0], 0.84_f64.sqrt(), 1e-12);
    }

    #[test]
    fn test_binomial_errors() {
        let (ratio, error) = divide_values(8.0, 8.0_f64.sqrt(), 10.0, 10.0_f64.sqrt(), ErrorPropagation::Binomial);
        assert_approx_eq!(ratio, 0.8, 1e-12);
        // sqrt(r (1 - r) / n)
        assert_approx_eq!(error, (0.8 * 0.2 / 10.0_f64).sqrt(), 1e-12);
        assert_eq!(ErrorPropagation::from_correlated(Some(true)), ErrorPropagation::Binomial);
    }

    #[test]
    fn test_graph_over_interpolated_graph() {
        let num = Graph1d::new(
            "n",
            vec![GraphPoint::with_errors(1.5, 6.0, 0.0, 1.0), GraphPoint::new(2.5, 10.0)],
        )
        .expect("valid graph");
        let den = Graph1d::from_xy("d", &[0.0, 1.0, 2.0, 3.0], &[0.0, 2.0, 4.0, 6.0]).expect("valid graph");
        let ratio = divide(
            Plottable::Graph1d(num),
            &Plottable::Graph1d(den),
            ErrorPropagation::Uncorrelated,
            2,
            ("n", "d"),
        )
        .expect("interpolated ratio");
        let Plottable::Graph1d(ratio) = ratio else {
            panic!("quotient must stay a graph");
        };
        assert_approx_eq!(ratio.points()[0].y, 2.0, 1e-9);
        assert_approx_eq!(ratio.points()[0].ey_high, 1.0 / 3.0, 1e-9);
        assert_approx_eq!(ratio.points()[1].y, 2.0, 1e-9);
    }

    #[test]
    fn test_graph_over_graph_keeps_asymmetric_errors() {
        let num = Graph1d::new(
            "n",
            vec![GraphPoint {
                ey_low: 3.0,
                ey_high: 1.0,
                ..GraphPoint::new(1.0, 6.0)
            }],
        )
        .expect("valid graph");
        let den = Graph1d::new("d", vec![GraphPoint::with_errors(1.0, 2.0, 0.0, 1.0)]).expect("valid graph");
        let ratio = divide(
            Plottable::Graph1d(num),
            &Plottable::Graph1d(den),
            ErrorPropagation::Uncorrelated,
            2,
            ("n", "d"),
        )
        .expect("point-wise ratio");
        let Plottable::Graph1d(ratio) = ratio else {
            panic!("quotient must stay a graph");
        };
        let point = ratio.points()[0];
        assert_approx_eq!(point.y, 3.0, 1e-12);
        // denominator errors are not added
        assert_approx_eq!(point.ey_low, 1.5, 1e-12);
        assert_approx_eq!(point.ey_high, 0.5, 1e-12);
    }

    #[test]
    fn test_function_numerator_wraps_quotient() {
        let num = Function1d::new("f", AxisRange::new(0.0, 2.0), |x| x * x);
        let den = Function1d::new("g", AxisRange::new(0.0, 2.0), |x| x);
        let ratio = divide(
            Plottable::Function1d(num),
            &Plottable::Function1d(den),
            ErrorPropagation::Uncorrelated,
            1,
            ("f", "g"),
        )
        .expect("function ratio");
        let Plottable::Function1d(ratio) = ratio else {
            panic!("quotient must stay a function");
        };
        assert_approx_eq!(ratio.eval(1.5), 1.5, 1e-12);
        assert_eq!(ratio.eval(0.0), 0.0);
    }

    #[test]
    fn test_2d_requires_same_binning() {
        let a = Hist2d::new("a", vec![0.0, 1.0], vec![0.0, 1.0], array![[4.0]]).expect("valid");
        let b = Hist2d::new("b", vec![0.0, 2.0], vec![0.0, 1.0], array![[2.0]]).expect("valid");
        let err = divide(
            Plottable::Hist2d(a.clone()),
            &Plottable::Hist2d(b),
            ErrorPropagation::Uncorrelated,
            1,
            ("a", "b"),
        )
        .expect_err("different binning");
        assert!(matches!(err, DataError::UnsupportedRatio { pad: 1, .. }));

        let err = divide(
            Plottable::Hist2d(a),
            &Plottable::Hist1d(hist("h", vec![1.0, 1.0, 1.0], vec![0.0; 3])),
            ErrorPropagation::Uncorrelated,
            1,
            ("a", "h"),
        );
        assert!(err.is_err());
    }
}
