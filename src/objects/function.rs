//! Analytic functions of one and two variables.

use std::fmt;
use std::sync::Arc;

use crate::spec::AxisRange;

/// Number of samples used to draw and integrate a function.
pub const FUNCTION_SAMPLES: usize = 200;

type Fn1 = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
type Fn2 = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Function `f(x)` on a finite domain.
///
/// Clones share the underlying closure; scaling wraps it instead of mutating it.
#[derive(Clone)]
pub struct Function1d {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Domain.
    pub domain: AxisRange,
    function: Fn1,
}

impl Function1d {
    /// Function `f` on `[min, max]`.
    pub fn new(
        name: impl Into<String>,
        domain: AxisRange,
        function: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            domain,
            function: Arc::new(function),
        }
    }

    /// Value at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    /// Evenly spaced `(x, f(x))` samples over the domain.
    pub fn sample(&self, count: usize) -> Vec<(f64, f64)> {
        let count = count.max(2);
        let step = (self.domain.max - self.domain.min) / (count - 1) as f64;
        (0..count)
            .map(|i| {
                let x = self.domain.min + i as f64 * step;
                (x, self.eval(x))
            })
            .collect()
    }

    /// Trapezoidal integral over the domain.
    pub fn integral(&self) -> f64 {
        let samples = self.sample(FUNCTION_SAMPLES);
        samples
            .windows(2)
            .map(|pair| 0.5 * (pair[0].1 + pair[1].1) * (pair[1].0 - pair[0].0))
            .sum()
    }

    /// Multiply the function by `factor`.
    pub fn scale(&mut self, factor: f64) {
        let inner = Arc::clone(&self.function);
        self.function = Arc::new(move |x| factor * inner(x));
    }

    /// Replace the function by `f(x) / g(x)`, zero where `g` vanishes.
    pub fn divide_by(&mut self, denominator: impl Fn(f64) -> f64 + Send + Sync + 'static) {
        let inner = Arc::clone(&self.function);
        self.function = Arc::new(move |x| {
            let den = denominator(x);
            if den == 0.0 { 0.0 } else { inner(x) / den }
        });
    }

    /// Clip the domain to `range`.
    pub fn cut(&mut self, range: AxisRange) {
        self.domain = AxisRange::new(self.domain.min.max(range.min), self.domain.max.min(range.max));
    }

    /// Vertical extent of the sampled curve.
    pub fn y_range(&self) -> AxisRange {
        let (low, high) = self
            .sample(FUNCTION_SAMPLES)
            .iter()
            .map(|(_, y)| *y)
            .filter(|y| y.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
        if low > high {
            AxisRange::new(0.0, 1.0)
        } else {
            AxisRange::new(low, high)
        }
    }
}

impl fmt::Debug for Function1d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function1d")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// Function `f(x, y)` on a rectangular domain.
#[derive(Clone)]
pub struct Function2d {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Domain in x.
    pub x_domain: AxisRange,
    /// Domain in y.
    pub y_domain: AxisRange,
    function: Fn2,
}

impl Function2d {
    /// Function `f` on the given domain.
    pub fn new(
        name: impl Into<String>,
        x_domain: AxisRange,
        y_domain: AxisRange,
        function: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            x_domain,
            y_domain,
            function: Arc::new(function),
        }
    }

    /// Value at `(x, y)`.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        (self.function)(x, y)
    }

    /// Multiply the function by `factor`.
    pub fn scale(&mut self, factor: f64) {
        let inner = Arc::clone(&self.function);
        self.function = Arc::new(move |x, y| factor * inner(x, y));
    }

    /// Clip the x domain to `range`.
    pub fn cut(&mut self, range: AxisRange) {
        self.x_domain = AxisRange::new(
            self.x_domain.min.max(range.min),
            self.x_domain.max.min(range.max),
        );
    }

    /// Midpoint-rule integral on a coarse grid.
    pub fn integral(&self) -> f64 {
        let n = 50;
        let dx = (self.x_domain.max - self.x_domain.min) / n as f64;
        let dy = (self.y_domain.max - self.y_domain.min) / n as f64;
        let mut total = 0.0;
        for i in 0..n {
            for j in 0..n {
                let x = self.x_domain.min + (i as f64 + 0.5) * dx;
                let y = self.y_domain.min + (j as f64 + 0.5) * dy;
                total += self.eval(x, y);
            }
        }
        total * dx * dy
    }
}

impl fmt::Debug for Function2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function2d")
            .field("name", &self.name)
            .field("x_domain", &self.x_domain)
            .field("y_domain", &self.y_domain)
            .finish_non_exhaustive()
    }
}
