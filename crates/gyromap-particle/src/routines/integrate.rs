//! Integration of a [`Particle`] over a specific time interval.

use std::time::Instant;

use gyromap_equilibrium::{Bfield, Current, Perturbation, Qfactor};

use crate::config::StepperConfig;
use crate::rhs::GuidingCentre;
use crate::rk45::Stepper;
use crate::{Evolution, IntegrationConfig, Particle, State};
use crate::{IntegrationError, ParticleError, Result};

/// Relative width of the landing window on `t_end`.
const SPAN_TOLERANCE: f64 = 1e-12;

/// Integrates the particle over `t_eval`, storing the orbit.
pub(crate) fn integrate(
    particle: &mut Particle,
    qfactor: &impl Qfactor,
    current: &impl Current,
    bfield: &impl Bfield,
    perturbation: &impl Perturbation,
    t_eval: (f64, f64),
    config: &IntegrationConfig,
) -> Result<()> {
    // ==================== Setup

    let start = Instant::now();
    let (t0, t_end) = t_eval;
    validate(particle, t_eval, config)?;

    let wall = qfactor.psip_wall();
    let mu = particle.initial_conditions.mu;
    let mut system = GuidingCentre::new(qfactor, current, bfield, perturbation, mu);

    particle.evolution = Evolution::default();
    particle.initial_state = State::from_initial(&particle.initial_conditions);
    particle.initial_state.time = t0;
    check_domain(particle.initial_state.psip, wall)?;
    system.evaluate_state(&mut particle.initial_state)?;
    if config.t_samples.is_none() {
        particle.evolution.push_state(&particle.initial_state);
    }

    let mut stepper = Stepper::start(
        t0,
        particle.initial_state.coords(),
        config,
        &mut |t, y| system.rhs(t, y),
    )?;
    let mut sample_index = 0;

    // ==================== Main loop

    let res = 'main: loop {
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

        // Land exactly on the end of the span.
        let remaining = t_end - stepper.t;
        let last = 1.01 * stepper.next_step_size() >= remaining;
        if last {
            stepper.limit_step(remaining);
        }

        let dense = match stepper.step(&mut |t, y| system.rhs(t, y)) {
            Ok(dense) => dense,
            Err(error) => break Err(error),
        };
        particle.evolution.steps_taken += 1;

        if !(0.0..=wall).contains(&stepper.y[1]) {
            break Err(ParticleError::LeftDomain { psip: stepper.y[1] });
        }

        // Storage: either the requested sample times from the dense
        // output, or every n-th accepted step.
        match &config.t_samples {
            Some(samples) => {
                // Once the span end is reached, flush the remaining samples
                // as well: they can sit a rounding error past `stepper.t`.
                let spent = t_end - stepper.t <= SPAN_TOLERANCE * (t_end - t0);
                while sample_index < samples.len()
                    && (samples[sample_index] <= stepper.t || spent)
                {
                    let coords = dense.eval(samples[sample_index]);
                    let mut state = State::from_coords(samples[sample_index], &coords, mu);
                    if let Err(error) = system.evaluate_state(&mut state) {
                        break 'main Err(error);
                    }
                    particle.evolution.push_state(&state);
                    sample_index += 1;
                }
            }
            None => {
                let due = particle.evolution.steps_taken % config.store_every == 0;
                if due || last {
                    let mut state = State::from_coords(stepper.t, &stepper.y, mu);
                    if let Err(error) = system.evaluate_state(&mut state) {
                        break 'main Err(error);
                    }
                    particle.evolution.push_state(&state);
                }
            }
        }

        if t_end - stepper.t <= SPAN_TOLERANCE * (t_end - t0) {
            break Ok(());
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

/// Rejects malformed spans, sample lists and configurations.
fn validate(particle: &Particle, t_eval: (f64, f64), config: &IntegrationConfig) -> Result<()> {
    let (t0, t_end) = t_eval;
    particle.initial_conditions.validate()?;
    if !t0.is_finite() || !t_end.is_finite() || t_end <= t0 {
        return Err(ParticleError::InvalidArgument(format!(
            "t_eval must satisfy t_end > t0, got ({t0}, {t_end})"
        )));
    }
    if config.store_every == 0 {
        return Err(ParticleError::InvalidArgument(
            "store_every must be positive".into(),
        ));
    }
    if let Some(samples) = &config.t_samples {
        let increasing = samples.windows(2).all(|pair| pair[0] < pair[1]);
        let inside = samples
            .iter()
            .all(|t| t.is_finite() && *t > t0 && *t <= t_end);
        if !increasing || !inside {
            return Err(ParticleError::InvalidArgument(
                "t_samples must be strictly increasing and inside (t0, t_end]".into(),
            ));
        }
    }
    Ok(())
}

/// The valid domain is `ψp ∈ [0, ψp_wall]`.
pub(crate) fn check_domain(psip: f64, wall: f64) -> Result<()> {
    if (0.0..=wall).contains(&psip) {
        Ok(())
    } else {
        Err(ParticleError::LeftDomain { psip })
    }
}
