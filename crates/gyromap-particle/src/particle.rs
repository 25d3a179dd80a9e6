//! Representation of a particle.

use gyromap_equilibrium::{Bfield, Current, Perturbation, Qfactor};

use crate::routines::{integrate, map_integrate};
use crate::{Evolution, IntegrationConfig, MappingConfig, MappingParameters, State};
use crate::{IntegrationError, ParticleError, Result};
use crate::{MagneticMoment, Radians};

/// A set of a particle's initial conditions.
#[derive(Clone, Debug)]
pub struct InitialConditions {
    /// The initial time.
    pub time0: f64,
    /// The initial `θ` angle.
    pub theta0: Radians,
    /// The initial poloidal magnetic flux `ψp`.
    pub psip0: f64,
    /// The initial parallel gyroradius `ρ`.
    pub rho0: f64,
    /// The initial `ζ` angle.
    pub zeta0: Radians,
    /// The magnetic moment `μ`.
    pub mu: MagneticMoment,
}

impl InitialConditions {
    /// Rejects non-finite entries.
    pub(crate) fn validate(&self) -> Result<()> {
        let entries = [
            self.time0, self.theta0, self.psip0, self.rho0, self.zeta0, self.mu,
        ];
        if entries.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(ParticleError::InvalidArgument(format!(
                "initial conditions must be finite, got {self:?}"
            )))
        }
    }
}

// ===============================================================================================

/// What went wrong with a particle, as carried by [`Status::Errored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCause {
    /// Escaped the domain `ψp ∈ [0, ψp_wall]` (hit the wall or crossed the
    /// axis).
    LeftDomain,
    /// The stepper could not meet the tolerance with a representable step.
    StepSizeUnderflow,
    /// Ran out of steps.
    BudgetExceeded,
    /// NaN/Inf encountered in the equations of motion.
    NonFiniteDerivative,
    /// A cancellation token was observed.
    Cancelled,
    /// An equilibrium evaluation failed.
    Evaluation,
}

impl From<&ParticleError> for ErrorCause {
    fn from(error: &ParticleError) -> Self {
        match error {
            ParticleError::Integration(IntegrationError::StepSizeUnderflow { .. }) => {
                Self::StepSizeUnderflow
            }
            ParticleError::Integration(IntegrationError::BudgetExceeded { .. }) => {
                Self::BudgetExceeded
            }
            ParticleError::Integration(IntegrationError::NonFiniteDerivative { .. }) => {
                Self::NonFiniteDerivative
            }
            ParticleError::LeftDomain { .. } => Self::LeftDomain,
            ParticleError::Cancelled => Self::Cancelled,
            ParticleError::InvalidArgument(..) | ParticleError::Eq(..) => Self::Evaluation,
        }
    }
}

/// The particle's lifecycle status.
///
/// Transitions are one-directional within a routine call: a particle is
/// `Initialized` at construction and ends up `Integrated`, `Mapped` or
/// `Errored`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Status {
    /// Initialized from [`InitialConditions`], not integrated.
    #[default]
    Initialized,
    /// Reached the end of the integration successfully.
    Integrated,
    /// Reached the end of the mapping successfully.
    Mapped,
    /// The routine failed; partial results are retained.
    Errored(ErrorCause),
}

impl Status {
    /// Whether the particle has not been processed yet.
    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized)
    }

    /// Whether the last integration completed.
    pub fn is_integrated(&self) -> bool {
        matches!(self, Self::Integrated)
    }

    /// Whether the last mapping completed.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped)
    }

    /// Whether the last routine failed.
    pub fn is_errored(&self) -> bool {
        matches!(self, Self::Errored(..))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized => write!(f, "initialized"),
            Self::Integrated => write!(f, "integrated"),
            Self::Mapped => write!(f, "mapped"),
            Self::Errored(cause) => write!(f, "errored ({cause:?})"),
        }
    }
}

// ===============================================================================================

/// The Poincaré crossings collected by [`Particle::map`].
///
/// `angles[k]` and `fluxes[k]` describe the k-th crossing: the
/// complementary angle reduced to `(−π, π]` and the flux label of the
/// section.
#[derive(Clone, Debug, Default)]
pub struct Crossings {
    /// The complementary angle at each crossing.
    pub angles: Vec<Radians>,
    /// The flux label at each crossing.
    pub fluxes: Vec<f64>,
}

impl Crossings {
    /// The number of collected crossings.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub(crate) fn push(&mut self, angle: Radians, flux: f64) {
        self.angles.push(angle);
        self.fluxes.push(flux);
    }
}

// ===============================================================================================

/// Representation of a particle.
///
/// The particle corresponds to a proton with `m = q = 1`; all its related
/// quantities and calculated time series are in Normalized Units.
#[derive(Clone)]
pub struct Particle {
    /// The [`InitialConditions`] set of the particle.
    pub initial_conditions: InitialConditions,
    /// The initial [`State`] of the particle.
    pub(crate) initial_state: State,
    /// The final [`State`] of the particle.
    pub(crate) final_state: State,
    /// The time [`Evolution`] of the particle.
    pub evolution: Evolution,
    /// The Poincaré crossings, filled by [`Particle::map`].
    pub crossings: Crossings,
    /// Status of the particle's last routine.
    pub status: Status,
}

impl Particle {
    /// Creates a new [`Particle`] from a set of [`InitialConditions`].
    ///
    /// # Example
    /// ```
    /// # use gyromap_particle::*;
    /// let initial_conditions = InitialConditions {
    ///     time0: 0.0,
    ///     theta0: 0.0,
    ///     psip0: 0.15,
    ///     rho0: 1e-4,
    ///     zeta0: 0.0,
    ///     mu: 0.0,
    /// };
    /// let particle = Particle::new(&initial_conditions);
    /// assert!(particle.status.is_initialized());
    /// ```
    pub fn new(initial_conditions: &InitialConditions) -> Self {
        Self {
            initial_conditions: initial_conditions.to_owned(),
            initial_state: State::from_initial(initial_conditions),
            final_state: State::default(),
            evolution: Evolution::default(),
            crossings: Crossings::default(),
            status: Status::default(),
        }
    }

    /// Integrates the particle over `t_eval = (t0, t_end)`, storing the
    /// calculated orbit in [`Particle::evolution`].
    ///
    /// On failure the particle is marked [`Status::Errored`] and the
    /// partial orbit is retained; invalid arguments are returned without
    /// touching the particle.
    pub fn integrate(
        &mut self,
        qfactor: &impl Qfactor,
        current: &impl Current,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        t_eval: (f64, f64),
        config: &IntegrationConfig,
    ) -> Result<()> {
        match integrate(self, qfactor, current, bfield, perturbation, t_eval, config) {
            Ok(()) => {
                self.status = Status::Integrated;
                Ok(())
            }
            Err(error) => self.set_status_from_error(error),
        }
    }

    /// Integrates the particle until `params.intersections` crossings of
    /// the Poincaré surface have been located, storing them in
    /// [`Particle::crossings`] (and the crossing states in
    /// [`Particle::evolution`]).
    ///
    /// On failure the particle is marked [`Status::Errored`] and the
    /// partial crossing list is retained; invalid arguments are returned
    /// without touching the particle.
    pub fn map(
        &mut self,
        qfactor: &impl Qfactor,
        current: &impl Current,
        bfield: &impl Bfield,
        perturbation: &impl Perturbation,
        params: &MappingParameters,
        config: &MappingConfig,
    ) -> Result<()> {
        match map_integrate(self, qfactor, current, bfield, perturbation, params, config) {
            Ok(()) => {
                self.status = Status::Mapped;
                Ok(())
            }
            Err(error) => self.set_status_from_error(error),
        }
    }

    /// Returns the initial energy of the particle, calculated from its
    /// initial state.
    pub fn initial_energy(&self) -> f64 {
        self.initial_state.energy()
    }

    /// Returns the final energy of the particle, calculated from its
    /// final state.
    pub fn final_energy(&self) -> f64 {
        self.final_state.energy()
    }

    /// Marks the particle from a routine error, letting invalid arguments
    /// pass through untouched.
    fn set_status_from_error(&mut self, error: ParticleError) -> Result<()> {
        if !matches!(error, ParticleError::InvalidArgument(..)) {
            self.status = Status::Errored(ErrorCause::from(&error));
        }
        Err(error)
    }
}

impl std::fmt::Debug for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Particle")
            .field("Initial energy", &self.initial_energy())
            .field("Final energy  ", &self.final_energy())
            .field("Status", &self.status)
            .field("Crossings", &self.crossings.len())
            .field("Evolution", &self.evolution)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_initial_conditions_validation() {
        let good = InitialConditions {
            time0: 0.0,
            theta0: 1.0,
            psip0: 0.1,
            rho0: 1e-3,
            zeta0: 0.0,
            mu: 0.0,
        };
        assert!(good.validate().is_ok());

        let bad = InitialConditions {
            psip0: f64::NAN,
            ..good
        };
        assert!(matches!(
            bad.validate(),
            Err(ParticleError::InvalidArgument(..))
        ));
    }

    #[test]
    fn test_status_predicates() {
        assert!(Status::Initialized.is_initialized());
        assert!(Status::Integrated.is_integrated());
        assert!(Status::Mapped.is_mapped());
        assert!(Status::Errored(ErrorCause::LeftDomain).is_errored());
        assert!(!Status::Errored(ErrorCause::Cancelled).is_mapped());
    }
}
