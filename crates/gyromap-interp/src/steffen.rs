//! Steffen spline coefficients.
//!
//! Steffen's method (A&A 239, 443–450, 1990) limits the node slopes so the
//! interpolant never overshoots the data: on monotone input the result is
//! monotone.

use crate::spline::hermite_coefficients;

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// One-sided boundary slope: a parabola through the first three points,
/// limited against the boundary secant.
fn boundary_slope(parabola: f64, secant: f64) -> f64 {
    if parabola * secant <= 0.0 {
        0.0
    } else if parabola.abs() > 2.0 * secant.abs() {
        2.0 * secant
    } else {
        parabola
    }
}

/// Computes the per-interval coefficients of the Steffen spline.
pub(crate) fn coefficients(xa: &[f64], ya: &[f64]) -> Vec<[f64; 4]> {
    let n = xa.len();
    let intervals = n - 1;
    let h: Vec<f64> = (0..intervals).map(|i| xa[i + 1] - xa[i]).collect();
    let secant: Vec<f64> = (0..intervals).map(|i| (ya[i + 1] - ya[i]) / h[i]).collect();

    let mut deriv = vec![0.0; n];

    let p0 = secant[0] * (1.0 + h[0] / (h[0] + h[1])) - secant[1] * h[0] / (h[0] + h[1]);
    deriv[0] = boundary_slope(p0, secant[0]);

    for i in 1..n - 1 {
        let p = (secant[i - 1] * h[i] + secant[i] * h[i - 1]) / (h[i - 1] + h[i]);
        deriv[i] = (sign(secant[i - 1]) + sign(secant[i]))
            * secant[i - 1]
                .abs()
                .min(secant[i].abs())
                .min(0.5 * p.abs());
    }

    let last = intervals - 1;
    let pn = secant[last] * (1.0 + h[last] / (h[last] + h[last - 1]))
        - secant[last - 1] * h[last] / (h[last] + h[last - 1]);
    deriv[n - 1] = boundary_slope(pn, secant[last]);

    hermite_coefficients(xa, ya, &deriv)
}
