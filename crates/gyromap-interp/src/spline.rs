use crate::{Accelerator, InterpError, InterpKind, Result};
use crate::{akima, cubic, steffen};

/// Piecewise-cubic 1D interpolant.
///
/// All supported kinds reduce to one cubic polynomial per knot interval;
/// only the coefficient construction differs between them. The coefficients
/// are computed once at construction, so evaluation is read-only and can be
/// shared between threads (each thread owning its [`Accelerator`]).
///
/// Queries outside the knot range are clamped to the boundary knot; no
/// extrapolation is performed.
pub struct Spline {
    /// The knots, strictly increasing.
    pub xa: Vec<f64>,
    /// The interpolated values, one per knot.
    pub ya: Vec<f64>,
    /// The interpolation kind the coefficients were built with.
    kind: InterpKind,
    /// Per-interval coefficients `(a, b, c, d)` of
    /// `S(x) = a + b·t + c·t² + d·t³` with `t = x − xa[i]`.
    coeffs: Vec<[f64; 4]>,
}

/// Creates a [`Spline`] of the given kind over `(xa, ya)`.
///
/// # Example
/// ```
/// # use gyromap_interp::{make_spline, Accelerator};
/// # fn main() -> gyromap_interp::Result<()> {
/// let xa = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let ya = [0.0, 2.0, 4.0, 6.0, 8.0];
/// let spline = make_spline("steffen", &xa, &ya)?;
///
/// let mut acc = Accelerator::new();
/// assert_eq!(spline.eval(1.5, &mut acc)?, 3.0);
/// # Ok(())
/// # }
/// ```
pub fn make_spline(typ: &str, xa: &[f64], ya: &[f64]) -> Result<Spline> {
    Spline::new(typ.parse()?, xa, ya)
}

/// Creation
impl Spline {
    /// Creates a [`Spline`] of `kind` over `(xa, ya)`.
    pub fn new(kind: InterpKind, xa: &[f64], ya: &[f64]) -> Result<Self> {
        validate_axis(xa, kind.min_size(), kind.name())?;
        if xa.len() != ya.len() {
            return Err(InterpError::LengthMismatch {
                xlen: xa.len(),
                ylen: ya.len(),
            });
        }
        if !ya.iter().all(|y| y.is_finite()) {
            return Err(InterpError::NonFiniteValues);
        }

        let coeffs = match kind {
            InterpKind::Cubic => cubic::coefficients(xa, ya),
            InterpKind::Akima => akima::coefficients(xa, ya),
            InterpKind::Steffen => steffen::coefficients(xa, ya),
        };

        Ok(Self {
            xa: xa.to_vec(),
            ya: ya.to_vec(),
            kind,
            coeffs,
        })
    }
}

/// Evaluation
impl Spline {
    /// Evaluates the spline at `x`.
    pub fn eval(&self, x: f64, acc: &mut Accelerator) -> Result<f64> {
        let (i, t) = self.locate(x, acc)?;
        // Interior knots hit `t == 0` and reproduce their datum through the
        // constant coefficient; the last knot must short-circuit to stay
        // exact as well.
        if i + 2 == self.xa.len() && t == self.xa[i + 1] - self.xa[i] {
            return Ok(self.ya[i + 1]);
        }
        let [a, b, c, d] = self.coeffs[i];
        Ok(a + t * (b + t * (c + t * d)))
    }

    /// Evaluates the spline's first derivative at `x`.
    pub fn eval_deriv(&self, x: f64, acc: &mut Accelerator) -> Result<f64> {
        let (i, t) = self.locate(x, acc)?;
        let [_, b, c, d] = self.coeffs[i];
        Ok(b + t * (2.0 * c + t * 3.0 * d))
    }

    /// Evaluates the spline's second derivative at `x`.
    pub fn eval_deriv2(&self, x: f64, acc: &mut Accelerator) -> Result<f64> {
        let (i, t) = self.locate(x, acc)?;
        let [_, _, c, d] = self.coeffs[i];
        Ok(2.0 * c + t * 6.0 * d)
    }

    /// Clamps the query to the knot range and locates its interval.
    fn locate(&self, x: f64, acc: &mut Accelerator) -> Result<(usize, f64)> {
        if !x.is_finite() {
            return Err(InterpError::QueryOutOfRange { x });
        }
        let x = x.clamp(self.min_x(), self.max_x());
        let i = acc.find(&self.xa, x);
        Ok((i, x - self.xa[i]))
    }
}

/// Getters
impl Spline {
    /// Returns the interpolation kind.
    pub fn kind(&self) -> InterpKind {
        self.kind
    }

    /// Returns the number of knots.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.xa.len()
    }

    /// Returns the first knot.
    pub fn min_x(&self) -> f64 {
        self.xa[0]
    }

    /// Returns the last knot.
    pub fn max_x(&self) -> f64 {
        self.xa[self.xa.len() - 1]
    }
}

impl std::fmt::Debug for Spline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spline")
            .field("kind", &self.kind.name())
            .field("len", &self.len())
            .field("range", &(self.min_x(), self.max_x()))
            .finish()
    }
}

/// Checks that an axis is long enough, finite and strictly increasing.
pub(crate) fn validate_axis(xa: &[f64], min_size: usize, kind: &'static str) -> Result<()> {
    if xa.len() < min_size {
        return Err(InterpError::InsufficientKnots {
            kind,
            required: min_size,
            got: xa.len(),
        });
    }
    let increasing = xa
        .windows(2)
        .all(|pair| pair[0].is_finite() && pair[1].is_finite() && pair[0] < pair[1]);
    if !increasing {
        return Err(InterpError::NonMonotonicKnots);
    }
    Ok(())
}

/// Builds per-interval cubics from node derivatives (Hermite form).
///
/// Used by the kinds that are defined through their node slopes.
pub(crate) fn hermite_coefficients(xa: &[f64], ya: &[f64], deriv: &[f64]) -> Vec<[f64; 4]> {
    (0..xa.len() - 1)
        .map(|i| {
            let h = xa[i + 1] - xa[i];
            let secant = (ya[i + 1] - ya[i]) / h;
            let b = deriv[i];
            let c = (3.0 * secant - 2.0 * deriv[i] - deriv[i + 1]) / h;
            let d = (deriv[i] + deriv[i + 1] - 2.0 * secant) / (h * h);
            [ya[i], b, c, d]
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const KINDS: [InterpKind; 3] = [InterpKind::Cubic, InterpKind::Akima, InterpKind::Steffen];

    fn sample_data() -> (Vec<f64>, Vec<f64>) {
        let xa: Vec<f64> = (0..12).map(|i| 0.3 * f64::from(i)).collect();
        let ya: Vec<f64> = xa.iter().map(|x| (1.3 * x).sin() + 0.1 * x * x).collect();
        (xa, ya)
    }

    #[test]
    fn test_knot_exactness() {
        let (xa, ya) = sample_data();
        for kind in KINDS {
            let spline = Spline::new(kind, &xa, &ya).unwrap();
            let mut acc = Accelerator::new();
            for (x, y) in xa.iter().zip(ya.iter()) {
                assert_eq!(spline.eval(*x, &mut acc).unwrap(), *y, "{}", kind.name());
            }
        }
    }

    #[test]
    fn test_deriv_continuity_across_knots() {
        let (xa, ya) = sample_data();
        let eps = 1e-9;
        for kind in KINDS {
            let spline = Spline::new(kind, &xa, &ya).unwrap();
            let mut acc = Accelerator::new();
            for x in xa.iter().skip(1).take(xa.len() - 2) {
                let left = spline.eval_deriv(x - eps, &mut acc).unwrap();
                let right = spline.eval_deriv(x + eps, &mut acc).unwrap();
                assert_abs_diff_eq!(left, right, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_cubic_reproduces_lines_exactly() {
        let xa = [0.0, 1.0, 2.5, 3.0, 4.5, 6.0];
        let ya: Vec<f64> = xa.iter().map(|x| 2.0 - 0.5 * x).collect();
        for kind in KINDS {
            let spline = Spline::new(kind, &xa, &ya).unwrap();
            let mut acc = Accelerator::new();
            for i in 0..=50 {
                let x = 6.0 * f64::from(i) / 50.0;
                assert_relative_eq!(
                    spline.eval(x, &mut acc).unwrap(),
                    2.0 - 0.5 * x,
                    epsilon = 1e-12
                );
                assert_abs_diff_eq!(
                    spline.eval_deriv(x, &mut acc).unwrap(),
                    -0.5,
                    epsilon = 1e-12
                );
                assert_abs_diff_eq!(spline.eval_deriv2(x, &mut acc).unwrap(), 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let (xa, ya) = sample_data();
        for kind in KINDS {
            let spline = Spline::new(kind, &xa, &ya).unwrap();
            let mut acc = Accelerator::new();
            let below = spline.eval(-100.0, &mut acc).unwrap();
            let above = spline.eval(100.0, &mut acc).unwrap();
            assert_eq!(below, ya[0]);
            assert_eq!(above, *ya.last().unwrap());
        }
    }

    #[test]
    fn test_non_finite_query() {
        let (xa, ya) = sample_data();
        let spline = Spline::new(InterpKind::Cubic, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();
        assert!(matches!(
            spline.eval(f64::NAN, &mut acc),
            Err(InterpError::QueryOutOfRange { .. })
        ));
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            Spline::new(InterpKind::Cubic, &[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]),
            Err(InterpError::InsufficientKnots { .. })
        ));
        assert!(matches!(
            Spline::new(InterpKind::Cubic, &[0.0, 2.0, 1.0, 3.0], &[0.0; 4]),
            Err(InterpError::NonMonotonicKnots)
        ));
        assert!(matches!(
            Spline::new(InterpKind::Cubic, &[0.0, 1.0, 2.0, 3.0], &[0.0; 3]),
            Err(InterpError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Spline::new(
                InterpKind::Cubic,
                &[0.0, 1.0, 2.0, 3.0],
                &[0.0, f64::NAN, 0.0, 1.0]
            ),
            Err(InterpError::NonFiniteValues)
        ));
        assert!(matches!(
            make_spline("quintic", &[0.0, 1.0, 2.0, 3.0], &[0.0; 4]),
            Err(InterpError::UnknownInterpType(..))
        ));
    }

    #[test]
    fn test_steffen_preserves_monotonicity() {
        // Step-like data, where an unconstrained cubic overshoots.
        let xa = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ya = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let spline = Spline::new(InterpKind::Steffen, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=500 {
            let value = spline.eval(5.0 * f64::from(i) / 500.0, &mut acc).unwrap();
            assert!((0.0..=1.0).contains(&value));
            assert!(value >= previous - 1e-14);
            previous = value;
        }
    }
}
