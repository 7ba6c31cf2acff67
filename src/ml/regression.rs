//! Straight-line trend estimation.
//!
//! Fits `y = slope * x + intercept` by ordinary least squares through the
//! normal equations. The abscissa is centered first, which turns the 2x2
//! normal matrix into `diag(n, Sxx)`; its pseudo-inverse simply drops pivots
//! that are negligible relative to the largest one.

use serde::Serialize;

/// Pivots smaller than this fraction of the largest pivot are treated as zero.
const PINV_RCOND: f64 = 1e-15;

/// Slope and intercept of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares line through `(x, y)` points.
///
/// Never fails: a design with a single distinct `x` yields a flat line through
/// the mean of `y`, and an empty input yields the zero line. Identical input
/// always produces bit-identical output.
pub fn fit(points: &[(f64, f64)]) -> LinearTrend {
    if points.is_empty() {
        return LinearTrend {
            slope: 0.0,
            intercept: 0.0,
        };
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0_f64, 0.0_f64), |(sxx, sxy), (x, y)| {
        let dx = x - x_mean;
        (sxx + dx * dx, sxy + dx * (y - y_mean))
    });

    let largest_pivot = n.max(sxx);
    let slope = if sxx > PINV_RCOND * largest_pivot {
        sxy / sxx
    } else {
        0.0
    };
    let intercept = y_mean - slope * x_mean;

    if slope.is_finite() && intercept.is_finite() {
        LinearTrend { slope, intercept }
    } else {
        LinearTrend {
            slope: 0.0,
            intercept: if y_mean.is_finite() { y_mean } else { 0.0 },
        }
    }
}
