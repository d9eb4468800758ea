/// Floating point type used for scores and metrics.
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Clamp a score into the unit interval.
pub fn unit_clamp(v: Real) -> Real {
    v.clamp(0.0, 1.0)
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn ratio(numerator: usize, denominator: usize) -> Real {
    if denominator == 0 {
        0.0
    } else {
        numerator as Real / denominator as Real
    }
}
