use std::f64::consts::TAU;

use approx::assert_relative_eq;
use gyromap_interp::Accelerator;

use gyromap_equilibrium::stub::{lar_path, stub_path};
use gyromap_equilibrium::{Bfield, NcBfieldBuilder};

#[test]
fn test_nc_bfield_creation() {
    let bfield = NcBfieldBuilder::new(&stub_path(), "bicubic")
        .build()
        .unwrap();

    assert_eq!(bfield.shape(), (100, 200));
    assert_eq!(bfield.baxis(), 1.5);
    assert_eq!(bfield.raxis(), 2.0);
    assert_eq!(bfield.psip_wall(), 3.0);
    assert_eq!(bfield.psi_wall(), 1.0);
    assert_eq!(bfield.b_data().dim(), (100, 200));
}

/// On the analytic large-aspect-ratio field the interpolant must track
/// `B = 1 − √(2ψ)·cosθ` and its partials closely.
#[test]
fn test_lar_field_values() {
    let bfield = NcBfieldBuilder::new(&lar_path(), "bicubic").build().unwrap();
    let mut xacc = Accelerator::new();
    let mut yacc = Accelerator::new();

    let psip_wall = bfield.psip_wall();
    for k in 1..10 {
        let psip = psip_wall * f64::from(k) / 10.0;
        let psi = psip + psip * psip;
        let radius = (2.0 * psi).sqrt();
        for j in 0..12 {
            let theta = TAU * f64::from(j) / 12.0;
            let expected = 1.0 - radius * theta.cos();
            let value = bfield.b(psip, theta, &mut xacc, &mut yacc).unwrap();
            assert_relative_eq!(value, expected, epsilon = 1e-3);

            let db_dtheta = bfield.db_dtheta(psip, theta, &mut xacc, &mut yacc).unwrap();
            assert_relative_eq!(
                db_dtheta,
                radius * theta.sin(),
                epsilon = 1e-2,
                max_relative = 1e-2
            );
        }
    }
}

/// `θ` is periodic: evaluations one full period apart agree exactly.
#[test]
fn test_theta_periodicity() {
    let bfield = NcBfieldBuilder::new(&lar_path(), "bicubic").build().unwrap();
    let mut xacc = Accelerator::new();
    let mut yacc = Accelerator::new();

    let psip = 0.5 * bfield.psip_wall();

    // The two period endpoints are the same point, bit for bit.
    let at_zero = bfield.b(psip, 0.0, &mut xacc, &mut yacc).unwrap();
    let at_tau = bfield.b(psip, TAU, &mut xacc, &mut yacc).unwrap();
    assert_eq!(at_zero, at_tau);
    let d_zero = bfield.db_dtheta(psip, 0.0, &mut xacc, &mut yacc).unwrap();
    let d_tau = bfield.db_dtheta(psip, TAU, &mut xacc, &mut yacc).unwrap();
    assert_eq!(d_zero, d_tau);

    // A full-period shift only picks up the rounding of the addition.
    for j in 1..10 {
        let theta = TAU * f64::from(j) / 10.0;
        let here = bfield.b(psip, theta, &mut xacc, &mut yacc).unwrap();
        let there = bfield.b(psip, theta + TAU, &mut xacc, &mut yacc).unwrap();
        assert_relative_eq!(here, there, epsilon = 1e-12);
    }
}
