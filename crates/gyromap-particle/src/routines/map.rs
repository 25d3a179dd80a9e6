//! Integration of a [`Particle`] and location of its exact intersections
//! with a constant-θ or constant-ζ surface.
//!
//! Crossing detection runs on the stepper's dense output: after every
//! accepted step the section function `s(t) = wrap(angle(t) − α)` is
//! sampled on a subdivision of the step, sign changes in the increasing
//! direction are bracketed, and each bracket is refined with Brent's
//! method. Decreasing crossings and branch-cut jumps are ignored, so
//! trajectories tangent to the section do not count spuriously.

use std::f64::consts::{PI, TAU};
use std::str::FromStr;
use std::time::Instant;

use gyromap_equilibrium::{Bfield, Current, Perturbation, Qfactor};

use crate::brent::brent;
use crate::config::StepperConfig;
use crate::rhs::GuidingCentre;
use crate::rk45::{DenseOutput, Stepper};
use crate::routines::integrate::check_domain;
use crate::routines::wrap_pi;
use crate::{Crossings, Evolution, MappingConfig, Particle, Radians, State};
use crate::{IntegrationError, ParticleError, Result};

/// Absolute tolerance on the crossing time.
const CROSSING_TOL: f64 = 1e-12;

/// Defines the surface of the Poincaré section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoincareSection {
    /// A surface of constant `θ`.
    ConstTheta,
    /// A surface of constant `ζ`.
    ConstZeta,
}

impl FromStr for PoincareSection {
    type Err = ParticleError;

    fn from_str(section: &str) -> Result<Self> {
        if section.eq_ignore_ascii_case("consttheta") || section.eq_ignore_ascii_case("theta") {
            Ok(Self::ConstTheta)
        } else if section.eq_ignore_ascii_case("constzeta") || section.eq_ignore_ascii_case("zeta")
        {
            Ok(Self::ConstZeta)
        } else {
            Err(ParticleError::InvalidArgument(format!(
                "unknown Poincare section {section:?}"
            )))
        }
    }
}

/// Defines all the necessary parameters of a Poincaré map.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct MappingParameters {
    /// The surface of section Σ, defined by an equation xᵢ = α, where
    /// xᵢ = θ or ζ.
    pub section: PoincareSection,
    /// The constant that defines the surface of section, reduced mod 2π.
    pub alpha: Radians,
    /// The number of intersections to calculate.
    pub intersections: usize,
}

impl MappingParameters {
    /// Creates a new [`MappingParameters`].
    ///
    /// `alpha` is reduced mod 2π once here, to avoid reducing it in every
    /// step; `intersections` must be positive.
    pub fn new(section: PoincareSection, alpha: Radians, intersections: usize) -> Result<Self> {
        if intersections == 0 {
            return Err(ParticleError::InvalidArgument(
                "the number of intersections must be positive".into(),
            ));
        }
        if !alpha.is_finite() {
            return Err(ParticleError::InvalidArgument(format!(
                "the section constant must be finite, got {alpha}"
            )));
        }
        Ok(Self {
            section,
            alpha: alpha.rem_euclid(TAU),
            intersections,
        })
    }
}

// ===============================================================================================

/// Calculates the intersections with the Poincaré surface.
pub(crate) fn map_integrate(
    particle: &mut Particle,
    qfactor: &impl Qfactor,
    current: &impl Current,
    bfield: &impl Bfield,
    perturbation: &impl Perturbation,
    params: &MappingParameters,
    config: &MappingConfig,
) -> Result<()> {
    // ==================== Setup

    let start = Instant::now();
    particle.initial_conditions.validate()?;

    let wall = qfactor.psip_wall();
    let mu = particle.initial_conditions.mu;
    let mut system = GuidingCentre::new(qfactor, current, bfield, perturbation, mu);

    particle.evolution = Evolution::default();
    particle.crossings = Crossings::default();
    particle.initial_state = State::from_initial(&particle.initial_conditions);
    check_domain(particle.initial_state.psip, wall)?;
    system.evaluate_state(&mut particle.initial_state)?;
    particle.evolution.push_state(&particle.initial_state);

    let mut stepper = Stepper::start(
        particle.initial_state.time,
        particle.initial_state.coords(),
        config,
        &mut |t, y| system.rhs(t, y),
    )?;

    // ==================== Main loop

    let res = 'main: loop {
        if particle.crossings.len() >= params.intersections {
            break Ok(());
        }
        if particle.evolution.steps_taken == config.max_steps {
            break Err(IntegrationError::BudgetExceeded {
                max_steps: config.max_steps,
            }
            .into());
        }
        if let Some(token) = config.cancel()
            && token.is_cancelled()
        {
            break Err(ParticleError::Cancelled);
        }

        let dense = match stepper.step(&mut |t, y| system.rhs(t, y)) {
            Ok(dense) => dense,
            Err(error) => break Err(error),
        };
        particle.evolution.steps_taken += 1;

        if !(0.0..=wall).contains(&stepper.y[1]) {
            break Err(ParticleError::LeftDomain { psip: stepper.y[1] });
        }

        if let Err(error) = scan_step(particle, &mut system, &dense, params, mu) {
            break 'main Err(error);
        }
    };

    // ==================== Finalization

    let mut final_state = State::from_coords(stepper.t, &stepper.y, mu);
    system.evaluate_state(&mut final_state)?;
    particle.final_state = final_state;
    particle.evolution.finish();
    particle.evolution.duration = start.elapsed();
    res
}

/// Scans one accepted step for increasing crossings of the section and
/// records them.
fn scan_step<Q, C, B, P>(
    particle: &mut Particle,
    system: &mut GuidingCentre<'_, Q, C, B, P>,
    dense: &DenseOutput,
    params: &MappingParameters,
    mu: f64,
) -> Result<()>
where
    Q: Qfactor,
    C: Current,
    B: Bfield,
    P: Perturbation,
{
    let angle_of = |coords: &[f64; 4]| match params.section {
        PoincareSection::ConstTheta => coords[0],
        PoincareSection::ConstZeta => coords[3],
    };
    let section_distance = |t: f64| wrap_pi(angle_of(&dense.eval(t)) - params.alpha);

    // Subdivide so no subinterval can sweep more than a quarter turn; this
    // separates multiple crossings within one step.
    let swept = (angle_of(&dense.eval(dense.t_end())) - angle_of(&dense.eval(dense.t0))).abs();
    let subdivisions = ((swept / (PI / 4.0)).ceil() as usize).clamp(2, 64);

    let mut t_left = dense.t0;
    let mut s_left = section_distance(t_left);
    for j in 1..=subdivisions {
        let t_right = dense.t0 + dense.h * (j as f64) / (subdivisions as f64);
        let s_right = section_distance(t_right);

        // Increasing crossings only; a jump of nearly 2π is the branch cut
        // of the wrapping, not a crossing.
        if s_left < 0.0 && s_right >= 0.0 && s_right - s_left < PI {
            let t_star = brent(|t| section_distance(t), t_left, t_right, CROSSING_TOL, 100)
                .unwrap_or(t_right);
            record_crossing(particle, system, dense, params, mu, t_star)?;
            if particle.crossings.len() >= params.intersections {
                return Ok(());
            }
        }
        t_left = t_right;
        s_left = s_right;
    }
    Ok(())
}

/// Evaluates the dense output at the crossing and stores the full state
/// plus the `(angle, flux)` pair of the section.
fn record_crossing<Q, C, B, P>(
    particle: &mut Particle,
    system: &mut GuidingCentre<'_, Q, C, B, P>,
    dense: &DenseOutput,
    params: &MappingParameters,
    mu: f64,
    t_star: f64,
) -> Result<()>
where
    Q: Qfactor,
    C: Current,
    B: Bfield,
    P: Perturbation,
{
    let coords = dense.eval(t_star);
    let mut state = State::from_coords(t_star, &coords, mu);
    system.evaluate_state(&mut state)?;
    particle.evolution.push_state(&state);

    match params.section {
        PoincareSection::ConstTheta => particle.crossings.push(wrap_pi(state.zeta), state.psip),
        PoincareSection::ConstZeta => particle.crossings.push(wrap_pi(state.theta), state.psi),
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_section_parsing() {
        assert_eq!(
            "ConstTheta".parse::<PoincareSection>().unwrap(),
            PoincareSection::ConstTheta
        );
        assert_eq!(
            "zeta".parse::<PoincareSection>().unwrap(),
            PoincareSection::ConstZeta
        );
        assert!(matches!(
            "diagonal".parse::<PoincareSection>(),
            Err(ParticleError::InvalidArgument(..))
        ));
    }

    #[test]
    fn test_parameters_validation() {
        let params = MappingParameters::new(PoincareSection::ConstTheta, -PI, 10).unwrap();
        assert_eq!(params.alpha, PI);
        assert_eq!(params.intersections, 10);

        assert!(matches!(
            MappingParameters::new(PoincareSection::ConstZeta, 0.0, 0),
            Err(ParticleError::InvalidArgument(..))
        ));
        assert!(matches!(
            MappingParameters::new(PoincareSection::ConstZeta, f64::NAN, 5),
            Err(ParticleError::InvalidArgument(..))
        ));
    }
}
