//! Akima spline coefficients.
//!
//! Node slopes follow Akima's weighted formula; the two extra secants needed
//! on each side are reflected linearly past the boundary.

use crate::spline::hermite_coefficients;

/// Computes the per-interval coefficients of the Akima spline.
pub(crate) fn coefficients(xa: &[f64], ya: &[f64]) -> Vec<[f64; 4]> {
    let n = xa.len();
    let intervals = n - 1;

    // Secants, extended by two reflected entries on each side, shifted by 2:
    // ext[k] holds the secant of interval k - 2.
    let mut ext = Vec::with_capacity(intervals + 4);
    let secant = |i: usize| (ya[i + 1] - ya[i]) / (xa[i + 1] - xa[i]);
    ext.push(0.0);
    ext.push(0.0);
    for i in 0..intervals {
        ext.push(secant(i));
    }
    ext[0] = 3.0 * ext[2] - 2.0 * ext[3];
    ext[1] = 2.0 * ext[2] - ext[3];
    ext.push(2.0 * ext[intervals + 1] - ext[intervals]);
    ext.push(3.0 * ext[intervals + 1] - 2.0 * ext[intervals]);

    let deriv: Vec<f64> = (0..n)
        .map(|i| {
            let m_im2 = ext[i];
            let m_im1 = ext[i + 1];
            let m_i = ext[i + 2];
            let m_ip1 = ext[i + 3];
            let w1 = (m_ip1 - m_i).abs();
            let w2 = (m_im1 - m_im2).abs();
            if w1 + w2 == 0.0 {
                0.5 * (m_im1 + m_i)
            } else {
                (w1 * m_im1 + w2 * m_i) / (w1 + w2)
            }
        })
        .collect();

    hermite_coefficients(xa, ya, &deriv)
}

#[cfg(test)]
mod test {
    use crate::{Accelerator, InterpKind, Spline};
    use approx::assert_abs_diff_eq;

    /// Akima's flagship property: a flat region next to a slope stays flat
    /// instead of picking up the wiggles a global spline would.
    #[test]
    fn test_flat_region_stays_flat() {
        let xa = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let ya = [0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0];
        let spline = Spline::new(InterpKind::Akima, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();

        for i in 0..=100 {
            let x = 2.0 * f64::from(i) / 100.0;
            assert_abs_diff_eq!(spline.eval(x, &mut acc).unwrap(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_accuracy_on_smooth_function() {
        let n = 80;
        let xa: Vec<f64> = (0..n).map(|i| 3.0 * f64::from(i) / f64::from(n - 1)).collect();
        let ya: Vec<f64> = xa.iter().map(|x| (2.0 * x).cos()).collect();
        let spline = Spline::new(InterpKind::Akima, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();

        for i in 0..300 {
            let x = 0.1 + 2.8 * f64::from(i) / 300.0;
            assert_abs_diff_eq!(
                spline.eval(x, &mut acc).unwrap(),
                (2.0 * x).cos(),
                epsilon = 1e-4
            );
        }
    }
}
