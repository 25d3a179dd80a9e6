use approx::assert_abs_diff_eq;

use gyromap_equilibrium::stub::{lar_path, stub_path};
use gyromap_equilibrium::{
    NcBfield, NcBfieldBuilder, NcCurrent, NcCurrentBuilder, NcHarmonicBuilder, NcPerturbation,
    NcQfactor, NcQfactorBuilder, Qfactor,
};
use gyromap_particle::{
    ErrorCause, InitialConditions, IntegrationConfig, Particle, ParticleError, Status,
};

fn lar_equilibrium() -> (NcQfactor, NcCurrent, NcBfield) {
    let path = lar_path();
    (
        NcQfactorBuilder::new(&path, "cubic").build().unwrap(),
        NcCurrentBuilder::new(&path, "cubic").build().unwrap(),
        NcBfieldBuilder::new(&path, "bicubic").build().unwrap(),
    )
}

fn lar_particle(qfactor: &NcQfactor) -> Particle {
    Particle::new(&InitialConditions {
        time0: 0.0,
        theta0: 0.0,
        psip0: 0.5 * qfactor.psip_wall(),
        rho0: 0.05,
        zeta0: 0.0,
        mu: 0.0,
    })
}

#[test]
fn test_particle_integration() {
    let (qfactor, current, bfield) = lar_equilibrium();
    let perturbation = NcPerturbation::from_harmonics(&[]);
    let mut particle = lar_particle(&qfactor);
    assert!(particle.status.is_initialized());

    let t_eval = (0.0, 2000.0);
    particle
        .integrate(
            &qfactor,
            &current,
            &bfield,
            &perturbation,
            t_eval,
            &IntegrationConfig::default(),
        )
        .unwrap();

    assert!(particle.status.is_integrated());
    assert!(particle.initial_energy().is_finite());
    assert!(particle.final_energy().is_finite());

    let evolution = &particle.evolution;
    assert!(evolution.steps_stored() > 2);
    assert_eq!(evolution.time.len(), evolution.theta.len());
    assert_eq!(evolution.time.len(), evolution.psip.len());
    assert_eq!(evolution.time.len(), evolution.energy.len());
    assert_eq!(evolution.time.len(), evolution.pzeta.len());
    assert!(evolution.time.windows(2).all(|pair| pair[0] < pair[1]));
    assert_abs_diff_eq!(evolution.final_time().unwrap(), t_eval.1, epsilon = 1e-6);
}

/// With no perturbation and μ = 0, `Pζ` is a constant of the motion; its
/// numerical drift must stay below 1e-9 at every stored point.
#[test]
fn test_pzeta_conservation() {
    let path = stub_path();
    let qfactor = NcQfactorBuilder::new(&path, "cubic").build().unwrap();
    let current = NcCurrentBuilder::new(&path, "cubic").build().unwrap();
    let bfield = NcBfieldBuilder::new(&path, "bicubic").build().unwrap();
    let perturbation = NcPerturbation::from_harmonics(&[]);

    let mut particle = Particle::new(&InitialConditions {
        time0: 0.0,
        theta0: 3.14,
        psip0: 0.5 * qfactor.psip_wall(),
        rho0: 0.001,
        zeta0: 0.0,
        mu: 0.0,
    });
    let config = IntegrationConfig {
        rtol: 1e-12,
        atol: 1e-14,
        ..Default::default()
    };

    particle
        .integrate(&qfactor, &current, &bfield, &perturbation, (0.0, 10.0), &config)
        .unwrap();
    assert!(particle.status.is_integrated());

    let pzeta = &particle.evolution.pzeta;
    for value in pzeta {
        assert!(
            (value - pzeta[0]).abs() < 1e-9,
            "Pζ drifted from {} to {}",
            pzeta[0],
            value
        );
    }
}

/// A static perturbation preserves the total energy to integrator
/// accuracy.
#[test]
fn test_energy_drift() {
    let path = lar_path();
    let qfactor = NcQfactorBuilder::new(&path, "cubic").build().unwrap();
    let current = NcCurrentBuilder::new(&path, "cubic").build().unwrap();
    let bfield = NcBfieldBuilder::new(&path, "bicubic").build().unwrap();
    let perturbation = NcPerturbation::from_harmonics(&[
        NcHarmonicBuilder::new(&path, "cubic", 2, 1).build().unwrap(),
    ]);

    let mut particle = Particle::new(&InitialConditions {
        time0: 0.0,
        theta0: 0.0,
        psip0: 0.5 * qfactor.psip_wall(),
        rho0: 0.05,
        zeta0: 0.0,
        mu: 0.5,
    });
    let config = IntegrationConfig::default();

    particle
        .integrate(&qfactor, &current, &bfield, &perturbation, (0.0, 10.0), &config)
        .unwrap();
    assert!(particle.status.is_integrated());

    let initial = particle.initial_energy();
    for energy in &particle.evolution.energy {
        assert!(
            ((energy - initial) / initial).abs() <= 10.0 * config.rtol,
            "energy drifted from {initial} to {energy}"
        );
    }
}

/// A degenerate time span is rejected without touching the particle.
#[test]
fn test_invalid_t_eval() {
    let (qfactor, current, bfield) = lar_equilibrium();
    let perturbation = NcPerturbation::from_harmonics(&[]);
    let mut particle = lar_particle(&qfactor);

    let result = particle.integrate(
        &qfactor,
        &current,
        &bfield,
        &perturbation,
        (0.0, -1.0),
        &IntegrationConfig::default(),
    );
    assert!(matches!(result, Err(ParticleError::InvalidArgument(..))));
    assert!(particle.status.is_initialized());
}

/// Running out of steps is a typed failure that keeps the partial orbit.
#[test]
fn test_budget_exceeded() {
    let (qfactor, current, bfield) = lar_equilibrium();
    let perturbation = NcPerturbation::from_harmonics(&[]);
    let mut particle = lar_particle(&qfactor);

    let config = IntegrationConfig {
        max_steps: 5,
        ..Default::default()
    };
    let result = particle.integrate(
        &qfactor,
        &current,
        &bfield,
        &perturbation,
        (0.0, 1e9),
        &config,
    );
    assert!(result.is_err());
    assert_eq!(particle.status, Status::Errored(ErrorCause::BudgetExceeded));
    assert_eq!(particle.evolution.steps_taken(), 5);
    assert!(particle.evolution.steps_stored() > 0);
}

/// Starting outside the wall is a domain error.
#[test]
fn test_initial_conditions_outside_domain() {
    let (qfactor, current, bfield) = lar_equilibrium();
    let perturbation = NcPerturbation::from_harmonics(&[]);
    let mut particle = Particle::new(&InitialConditions {
        time0: 0.0,
        theta0: 0.0,
        psip0: 2.0 * qfactor.psip_wall(),
        rho0: 0.05,
        zeta0: 0.0,
        mu: 0.0,
    });

    let result = particle.integrate(
        &qfactor,
        &current,
        &bfield,
        &perturbation,
        (0.0, 10.0),
        &IntegrationConfig::default(),
    );
    assert!(matches!(result, Err(ParticleError::LeftDomain { .. })));
    assert_eq!(particle.status, Status::Errored(ErrorCause::LeftDomain));
}

/// Requested sample times are honoured exactly through the dense output.
#[test]
fn test_dense_output_samples() {
    let (qfactor, current, bfield) = lar_equilibrium();
    let perturbation = NcPerturbation::from_harmonics(&[]);
    let mut particle = lar_particle(&qfactor);

    let samples = vec![100.0, 250.0, 400.0, 900.0];
    let config = IntegrationConfig {
        t_samples: Some(samples.clone()),
        ..Default::default()
    };
    particle
        .integrate(
            &qfactor,
            &current,
            &bfield,
            &perturbation,
            (0.0, 1000.0),
            &config,
        )
        .unwrap();

    assert_eq!(particle.evolution.time, samples);
    assert_eq!(particle.evolution.steps_stored(), samples.len());

    // Out-of-span samples are rejected.
    let config = IntegrationConfig {
        t_samples: Some(vec![0.5, 2000.0]),
        ..Default::default()
    };
    let result = particle.integrate(
        &qfactor,
        &current,
        &bfield,
        &perturbation,
        (0.0, 1000.0),
        &config,
    );
    assert!(matches!(result, Err(ParticleError::InvalidArgument(..))));
}

/// The storage stride skips points but always keeps the final one.
#[test]
fn test_store_every() {
    let (qfactor, current, bfield) = lar_equilibrium();
    let perturbation = NcPerturbation::from_harmonics(&[]);
    let mut particle = lar_particle(&qfactor);

    let config = IntegrationConfig {
        store_every: 10,
        ..Default::default()
    };
    particle
        .integrate(
            &qfactor,
            &current,
            &bfield,
            &perturbation,
            (0.0, 2000.0),
            &config,
        )
        .unwrap();

    let evolution = &particle.evolution;
    assert!(evolution.steps_stored() < evolution.steps_taken());
    assert_abs_diff_eq!(evolution.final_time().unwrap(), 2000.0, epsilon = 1e-6);
}
