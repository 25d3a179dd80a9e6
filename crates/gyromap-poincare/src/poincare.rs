//! The parallel Poincaré driver.

use ndarray::Array2;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};

use gyromap_common::array2D_getter_impl;
use gyromap_equilibrium::{Bfield, Current, Perturbation, Qfactor};
use gyromap_particle::{CancelToken, MappingConfig, MappingParameters, Particle};

use crate::progress::PoincarePbar;
use crate::stats::PoincareStats;
use crate::{PoincareInit, Result};

/// A Poincaré map calculation over a particle ensemble.
///
/// Owns one [`Particle`] per initial-conditions set. [`Poincare::run`] maps
/// them in parallel; every worker owns its integration state, while the
/// equilibrium objects are shared read-only. The per-particle
/// `angles`/`fluxes` lists are assembled in **input order**, so two runs
/// over identical inputs produce identical arrays no matter how the work
/// was scheduled.
pub struct Poincare {
    /// The initial conditions arrays.
    pub init: PoincareInit,
    /// The mapping parameters.
    pub params: MappingParameters,
    /// The tracked [`Particle`]s.
    pub particles: Vec<Particle>,
    /// Statistics of the last run.
    pub stats: PoincareStats,
    /// Per-particle crossing angles, one row per particle in input order.
    angles: Vec<Vec<f64>>,
    /// Per-particle crossing fluxes, matching `angles` row by row.
    fluxes: Vec<Vec<f64>>,
}

impl Poincare {
    /// Creates a [`Poincare`], initializing a particle for each set of
    /// initial conditions.
    pub fn new(init: PoincareInit, params: MappingParameters) -> Self {
        let particles = init.to_particles();
        Self {
            init,
            params,
            particles,
            stats: PoincareStats::default(),
            angles: Vec::new(),
            fluxes: Vec::new(),
        }
    }

    /// Maps every particle against the shared equilibrium, in parallel.
    ///
    /// Failed particles keep their partial crossing lists and their
    /// individual `Errored` status; one particle's failure never aborts
    /// its peers.
    pub fn run<Q, C, B, P>(
        &mut self,
        qfactor: &Q,
        current: &C,
        bfield: &B,
        perturbation: &P,
        config: &MappingConfig,
    ) -> Result<()>
    where
        Q: Qfactor + Sync,
        C: Current + Sync,
        B: Bfield + Sync,
        P: Perturbation + Sync,
    {
        let pbar = PoincarePbar::new(self.particles.len(), &self.params);
        pbar.print_prelude();

        let params = self.params;
        self.particles.par_iter_mut().for_each(|particle| {
            // The per-particle error is already recorded in the status.
            let _ = particle.map(qfactor, current, bfield, perturbation, &params, config);
            pbar.inc(&particle.status);
        });
        pbar.finish();

        self.store_results();
        self.stats = PoincareStats::from_particles(&self.particles);
        Ok(())
    }

    /// Same as [`Poincare::run`], with a cooperative cancellation token
    /// observed between accepted steps.
    pub fn run_with_cancel<Q, C, B, P>(
        &mut self,
        qfactor: &Q,
        current: &C,
        bfield: &B,
        perturbation: &P,
        config: &MappingConfig,
        token: &CancelToken,
    ) -> Result<()>
    where
        Q: Qfactor + Sync,
        C: Current + Sync,
        B: Bfield + Sync,
        P: Perturbation + Sync,
    {
        let config = MappingConfig {
            cancel: Some(token.clone()),
            ..config.clone()
        };
        self.run(qfactor, current, bfield, perturbation, &config)
    }

    /// Copies the per-particle crossings into the result rows, in input
    /// order.
    fn store_results(&mut self) {
        self.angles = self
            .particles
            .iter()
            .map(|p| p.crossings.angles.clone())
            .collect();
        self.fluxes = self
            .particles
            .iter()
            .map(|p| p.crossings.fluxes.clone())
            .collect();
    }

    /// The number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the ensemble is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Data extraction
impl Poincare {
    /// Returns the per-particle crossing angles, in input order. Row `i`
    /// holds at most `params.intersections` values, fewer if the particle
    /// errored out early.
    pub fn angles(&self) -> &[Vec<f64>] {
        &self.angles
    }

    /// Returns the per-particle crossing fluxes, matching
    /// [`Poincare::angles`] row by row.
    pub fn fluxes(&self) -> &[Vec<f64>] {
        &self.fluxes
    }

    array2D_getter_impl!(angles_padded, angles);
    array2D_getter_impl!(fluxes_padded, fluxes);
}

impl std::fmt::Debug for Poincare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.stats.fmt(f)
    }
}
