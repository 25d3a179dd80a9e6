use gyromap_equilibrium::{HarmonicCache, Perturbation};
use gyromap_interp::Accelerator;

use crate::particle::InitialConditions;
use crate::{Flux, Length, MagneticMoment, Radians};

/// A particle's full state at one instant.
///
/// The phase-space coordinates are `(θ, ψp, ρ, ζ)`; everything else is
/// derived from them (and from the equilibrium) when the state is
/// evaluated against the dynamical system.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// The time.
    pub time: f64,
    /// The `θ` angle.
    pub theta: Radians,
    /// The poloidal magnetic flux `ψp`.
    pub psip: Flux,
    /// The parallel gyroradius `ρ`.
    pub rho: Length,
    /// The `ζ` angle.
    pub zeta: Radians,
    /// The magnetic moment `μ`.
    pub mu: MagneticMoment,

    /// The toroidal magnetic flux `ψ(ψp)`.
    pub psi: Flux,
    /// The canonical momentum `Pθ = ψ + ρI`.
    pub ptheta: f64,
    /// The canonical momentum `Pζ = ρg − ψp`.
    pub pzeta: f64,
    /// The magnetic field strength at the particle.
    pub b: f64,
    /// The perturbation value at the particle.
    pub phi: f64,

    /// The time derivative of `θ`.
    pub theta_dot: f64,
    /// The time derivative of `ψp`.
    pub psip_dot: f64,
    /// The time derivative of `ρ`.
    pub rho_dot: f64,
    /// The time derivative of `ζ`.
    pub zeta_dot: f64,
}

impl State {
    /// Creates an unevaluated [`State`] from a set of initial conditions.
    pub(crate) fn from_initial(initial: &InitialConditions) -> Self {
        Self {
            time: initial.time0,
            theta: initial.theta0,
            psip: initial.psip0,
            rho: initial.rho0,
            zeta: initial.zeta0,
            mu: initial.mu,
            ..Self::default()
        }
    }

    /// Creates an unevaluated [`State`] from phase-space coordinates.
    pub(crate) fn from_coords(time: f64, coords: &[f64; 4], mu: MagneticMoment) -> Self {
        Self {
            time,
            theta: coords[0],
            psip: coords[1],
            rho: coords[2],
            zeta: coords[3],
            mu,
            ..Self::default()
        }
    }

    /// The phase-space coordinates `(θ, ψp, ρ, ζ)`.
    pub(crate) fn coords(&self) -> [f64; 4] {
        [self.theta, self.psip, self.rho, self.zeta]
    }

    /// The parallel energy `½ρ²B²`.
    pub fn parallel_energy(&self) -> f64 {
        0.5 * (self.rho * self.b).powi(2)
    }

    /// The perpendicular energy `μB`.
    pub fn perpendicular_energy(&self) -> f64 {
        self.mu * self.b
    }

    /// The total energy `½ρ²B² + μB + Φ`.
    pub fn energy(&self) -> f64 {
        self.parallel_energy() + self.perpendicular_energy() + self.phi
    }
}

// ===============================================================================================

/// The per-particle mutable evaluation state.
///
/// Holds the interpolation accelerators and one [`HarmonicCache`] per
/// harmonic. The equilibrium objects themselves stay immutable and shared;
/// every worker owns exactly one workspace, allocated once before its
/// integration starts.
#[derive(Clone, Debug)]
pub struct Workspace {
    /// Accelerator for the ψp-direction lookups, 1D and 2D alike.
    pub(crate) xacc: Accelerator,
    /// Accelerator for the θ-direction lookups.
    pub(crate) yacc: Accelerator,
    /// One cache per harmonic of the perturbation.
    pub(crate) hcaches: Vec<HarmonicCache>,
}

impl Workspace {
    /// Creates a [`Workspace`] sized for `perturbation`.
    pub fn new(perturbation: &impl Perturbation) -> Self {
        Self {
            xacc: Accelerator::new(),
            yacc: Accelerator::new(),
            hcaches: vec![HarmonicCache::new(); perturbation.len()],
        }
    }
}
