use std::f64::consts::TAU;

use approx::assert_abs_diff_eq;
use gyromap_interp::{Accelerator, make_spline, make_spline2d};

/// Every kind interpolates its data exactly at the knots and keeps the first
/// derivative continuous across them.
#[test]
fn test_interpolation_invariants() {
    let xa: Vec<f64> = (0..20).map(|i| 0.05 * f64::from(i * i) + 0.1 * f64::from(i)).collect();
    let ya: Vec<f64> = xa.iter().map(|x| (x - 1.5).tanh() + 0.05 * x).collect();

    for typ in ["cubic", "akima", "steffen"] {
        let spline = make_spline(typ, &xa, &ya).unwrap();
        let mut acc = Accelerator::new();

        for (x, y) in xa.iter().zip(ya.iter()) {
            assert_eq!(spline.eval(*x, &mut acc).unwrap(), *y, "{typ}");
        }

        let eps = 1e-9;
        for x in xa.iter().skip(1).take(xa.len() - 2) {
            let left = spline.eval_deriv(x - eps, &mut acc).unwrap();
            let right = spline.eval_deriv(x + eps, &mut acc).unwrap();
            assert_abs_diff_eq!(left, right, epsilon = 1e-5);
        }
    }
}

/// The bicubic treats its second axis as periodic: both period endpoints map
/// to the same point, for the value and all derivatives.
#[test]
fn test_bicubic_periodicity() {
    let xa: Vec<f64> = (0..12).map(|i| 0.1 * f64::from(i)).collect();
    let ya: Vec<f64> = (0..24).map(|j| TAU * f64::from(j) / 24.0).collect();
    let mut za = Vec::with_capacity(xa.len() * ya.len());
    for x in &xa {
        for y in &ya {
            za.push((1.0 + x) * y.cos() - 0.3 * x * (2.0 * y).sin());
        }
    }

    let spline = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let mut xacc = Accelerator::new();
    let mut yacc = Accelerator::new();

    for i in 0..=10 {
        let x = 1.1 * f64::from(i) / 10.0;
        assert_eq!(
            spline.eval(x, 0.0, &mut xacc, &mut yacc).unwrap(),
            spline.eval(x, TAU, &mut xacc, &mut yacc).unwrap()
        );
        assert_eq!(
            spline.eval_deriv_x(x, 0.0, &mut xacc, &mut yacc).unwrap(),
            spline.eval_deriv_x(x, TAU, &mut xacc, &mut yacc).unwrap()
        );
        assert_eq!(
            spline.eval_deriv_y(x, 0.0, &mut xacc, &mut yacc).unwrap(),
            spline.eval_deriv_y(x, TAU, &mut xacc, &mut yacc).unwrap()
        );
        assert_eq!(
            spline.eval_deriv_yy(x, 0.0, &mut xacc, &mut yacc).unwrap(),
            spline.eval_deriv_yy(x, TAU, &mut xacc, &mut yacc).unwrap()
        );
        assert_eq!(
            spline.eval_deriv_xy(x, 0.0, &mut xacc, &mut yacc).unwrap(),
            spline.eval_deriv_xy(x, TAU, &mut xacc, &mut yacc).unwrap()
        );
    }
}
