//! Natural cubic spline interpolation.

use num_traits::Float;

/// Natural cubic spline through a set of knots.
///
/// Outside the knot range the spline is extrapolated linearly with the end slopes.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline<T: Float> {
    x: Vec<T>,
    y: Vec<T>,
    /// Second derivatives at the knots.
    m: Vec<T>,
}

impl<T: Float> CubicSpline<T> {
    /// Spline through `(x[i], y[i])`; `x` must be strictly increasing.
    ///
    /// Returns `None` for fewer than two knots, mismatched lengths or unsorted x.
    pub fn new(x: Vec<T>, y: Vec<T>) -> Option<Self> {
        let n = x.len();
        if n < 2 || y.len() != n || x.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }
        let two = T::one() + T::one();
        let six = two + two + two;

        // Thomas algorithm on the interior knots, m[0] = m[n-1] = 0.
        let mut m = vec![T::zero(); n];
        if n > 2 {
            let mut c_prime = vec![T::zero(); n];
            let mut d_prime = vec![T::zero(); n];
            for i in 1..n - 1 {
                let h0 = x[i] - x[i - 1];
                let h1 = x[i + 1] - x[i];
                let a = h0;
                let b = two * (h0 + h1);
                let c = h1;
                let d = six * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
                let denom = b - a * c_prime[i - 1];
                c_prime[i] = c / denom;
                d_prime[i] = (d - a * d_prime[i - 1]) / denom;
            }
            for i in (1..n - 1).rev() {
                m[i] = d_prime[i] - c_prime[i] * m[i + 1];
            }
        }
        Some(Self { x, y, m })
    }

    /// Value at `at`.
    pub fn eval(&self, at: T) -> T {
        let n = self.x.len();
        let six = T::from(6.0).unwrap_or_else(T::one);
        if at <= self.x[0] {
            return self.y[0] + self.slope(0, true) * (at - self.x[0]);
        }
        if at >= self.x[n - 1] {
            return self.y[n - 1] + self.slope(n - 2, false) * (at - self.x[n - 1]);
        }
        let i = match self.x.iter().position(|&knot| knot > at) {
            Some(upper) => upper - 1,
            None => n - 2,
        };
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - at) / h;
        let b = (at - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / six
    }

    /// Derivative at the left (`start`) or right end of segment `i`.
    fn slope(&self, i: usize, start: bool) -> T {
        let six = T::from(6.0).unwrap_or_else(T::one);
        let two = T::one() + T::one();
        let h = self.x[i + 1] - self.x[i];
        let secant = (self.y[i + 1] - self.y[i]) / h;
        if start {
            secant - h * (two * self.m[i] + self.m[i + 1]) / six
        } else {
            secant + h * (self.m[i] + two * self.m[i + 1]) / six
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_passes_through_knots() {
        let spline = CubicSpline::new(vec![0.0, 1.0, 3.0, 4.0], vec![1.0, 2.0, 0.5, 5.0])
            .expect("valid knots");
        for (x, y) in [(0.0, 1.0), (1.0, 2.0), (3.0, 0.5), (4.0, 5.0)] {
            assert_approx_eq!(spline.eval(x), y, 1e-12);
        }
    }

    #[test]
    fn test_reproduces_straight_line() {
        let xs = vec![0.0_f32, 1.0, 2.5, 4.0];
        let ys = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let spline = CubicSpline::new(xs, ys).expect("valid knots");
        assert!((spline.eval(1.7) - 4.4).abs() < 1e-5);
        assert!((spline.eval(5.0) - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_bad_knots() {
        assert!(CubicSpline::new(vec![0.0], vec![1.0]).is_none());
        assert!(CubicSpline::new(vec![1.0, 0.0], vec![1.0, 2.0]).is_none());
        assert!(CubicSpline::new(vec![0.0, 1.0], vec![1.0]).is_none());
    }
}
