//! Natural cubic spline coefficients.
//!
//! The boundary condition is *natural* (zero second derivative at both
//! ends). The interior second derivatives solve a tridiagonal system, done
//! here with the Thomas algorithm.

/// Computes the per-interval coefficients of the natural cubic spline.
pub(crate) fn coefficients(xa: &[f64], ya: &[f64]) -> Vec<[f64; 4]> {
    let n = xa.len();
    let h: Vec<f64> = (0..n - 1).map(|i| xa[i + 1] - xa[i]).collect();
    let secant: Vec<f64> = (0..n - 1).map(|i| (ya[i + 1] - ya[i]) / h[i]).collect();

    // Second derivatives at the knots; the natural condition pins the ends.
    let mut m2 = vec![0.0; n];
    let dim = n - 2;
    let mut diag: Vec<f64> = (0..dim).map(|k| 2.0 * (h[k] + h[k + 1])).collect();
    let mut rhs: Vec<f64> = (0..dim).map(|k| 6.0 * (secant[k + 1] - secant[k])).collect();

    // Thomas forward sweep: the sub/super diagonals are h[k] / h[k + 1].
    for k in 1..dim {
        let w = h[k] / diag[k - 1];
        diag[k] -= w * h[k];
        rhs[k] -= w * rhs[k - 1];
    }
    // Back substitution.
    m2[dim] = rhs[dim - 1] / diag[dim - 1];
    for k in (0..dim - 1).rev() {
        m2[k + 1] = (rhs[k] - h[k + 1] * m2[k + 2]) / diag[k];
    }

    (0..n - 1)
        .map(|i| {
            let b = secant[i] - h[i] * (2.0 * m2[i] + m2[i + 1]) / 6.0;
            let c = m2[i] / 2.0;
            let d = (m2[i + 1] - m2[i]) / (6.0 * h[i]);
            [ya[i], b, c, d]
        })
        .collect()
}

#[cfg(test)]
mod test {
    use crate::{Accelerator, InterpKind, Spline};
    use approx::assert_abs_diff_eq;

    /// A natural cubic must have zero curvature at both boundaries.
    #[test]
    fn test_natural_boundary_condition() {
        let xa: Vec<f64> = (0..10).map(f64::from).collect();
        let ya: Vec<f64> = xa.iter().map(|x| (0.7 * x).cos()).collect();
        let spline = Spline::new(InterpKind::Cubic, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();

        assert_abs_diff_eq!(spline.eval_deriv2(0.0, &mut acc).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spline.eval_deriv2(9.0, &mut acc).unwrap(), 0.0, epsilon = 1e-12);
    }

    /// The second derivative must be continuous across interior knots.
    #[test]
    fn test_c2_continuity() {
        let xa: Vec<f64> = (0..10).map(|i| 0.5 * f64::from(i)).collect();
        let ya: Vec<f64> = xa.iter().map(|x| x.sin() * x.exp()).collect();
        let spline = Spline::new(InterpKind::Cubic, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();

        let eps = 1e-9;
        for x in xa.iter().skip(1).take(xa.len() - 2) {
            let left = spline.eval_deriv2(x - eps, &mut acc).unwrap();
            let right = spline.eval_deriv2(x + eps, &mut acc).unwrap();
            assert_abs_diff_eq!(left, right, epsilon = 1e-5);
        }
    }

    /// Interpolation error on a smooth function shrinks well below the
    /// sampling scale.
    #[test]
    fn test_accuracy_on_smooth_function() {
        let n = 60;
        let xa: Vec<f64> = (0..n).map(|i| 4.0 * f64::from(i) / f64::from(n - 1)).collect();
        let ya: Vec<f64> = xa.iter().map(|x| x.sin()).collect();
        let spline = Spline::new(InterpKind::Cubic, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();

        for i in 0..400 {
            let x = 0.2 + 3.6 * f64::from(i) / 400.0;
            assert_abs_diff_eq!(spline.eval(x, &mut acc).unwrap(), x.sin(), epsilon = 1e-6);
        }
    }
}
