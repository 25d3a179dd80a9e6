use approx::{assert_abs_diff_eq, assert_relative_eq};
use gyromap_interp::Accelerator;

use gyromap_equilibrium::stub::{lar_path, stub_path};
use gyromap_equilibrium::{EqError, NcQfactorBuilder, Qfactor};

#[test]
fn test_nc_qfactor_creation() {
    let qfactor = NcQfactorBuilder::new(&stub_path(), "steffen")
        .build()
        .unwrap();

    assert_eq!(qfactor.typ(), "steffen");
    assert!(qfactor.path().is_absolute());
    assert_eq!(qfactor.len(), 100);
    assert_eq!(qfactor.psip_data().len(), 100);
    assert_eq!(qfactor.psi_data().len(), 100);
    assert_eq!(qfactor.q_data().len(), 100);
}

/// The wall fluxes come straight from the dataset: the stub tabulates
/// `ψp ∈ [0, 3]` and the linear `ψ ∈ [0, 1]`, so `ψp_wall = 3` and
/// `ψ_wall = ψ(3) = 1`.
#[test]
fn test_wall_values() {
    let qfactor = NcQfactorBuilder::new(&stub_path(), "cubic").build().unwrap();
    let mut acc = Accelerator::new();

    assert_eq!(qfactor.psip_wall(), 3.0);
    assert_abs_diff_eq!(qfactor.psi_wall(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        qfactor.psi(qfactor.psip_wall(), &mut acc).unwrap(),
        1.0,
        epsilon = 1e-12
    );
}

/// On a consistent dataset `dψ/dψp` at the knots reproduces the tabulated
/// `q`.
#[test]
fn test_q_data_derived_consistency() {
    let qfactor = NcQfactorBuilder::new(&lar_path(), "cubic").build().unwrap();

    let derived = qfactor.q_data_derived();
    let tabulated = qfactor.q_data();
    // The natural boundary condition deviates in the outermost intervals,
    // and its effect decays geometrically towards the interior.
    for k in 4..qfactor.len() - 4 {
        assert_relative_eq!(derived[k], tabulated[k], epsilon = 1e-4);
    }
}

/// Unknown interpolation kind strings are rejected at construction.
#[test]
fn test_unknown_kind_string() {
    assert!(matches!(
        NcQfactorBuilder::new(&stub_path(), "spline-of-doom").build(),
        Err(EqError::InvalidArgument(..))
    ));
}
