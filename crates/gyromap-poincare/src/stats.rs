use std::time::Duration;

use gyromap_particle::{ErrorCause, Particle, Status};

/// Summary of a finished Poincaré run.
#[non_exhaustive]
#[derive(Default)]
pub struct PoincareStats {
    total_particles: usize,
    mapped: usize,
    escaped: usize,
    cancelled: usize,
    failed: usize,
    /// Steps and duration of the slowest particle.
    slowest: MapDuration,
    /// Steps and duration of the fastest particle.
    fastest: MapDuration,
}

impl PoincareStats {
    /// Summarizes a mapped particle collection.
    pub(crate) fn from_particles(particles: &[Particle]) -> Self {
        let count = |predicate: fn(&Status) -> bool| {
            particles.iter().filter(|p| predicate(&p.status)).count()
        };
        let mut stats = Self {
            total_particles: particles.len(),
            mapped: count(Status::is_mapped),
            escaped: count(|s| *s == Status::Errored(ErrorCause::LeftDomain)),
            cancelled: count(|s| *s == Status::Errored(ErrorCause::Cancelled)),
            ..Default::default()
        };
        stats.failed = count(Status::is_errored) - stats.escaped - stats.cancelled;

        if let Some(slowest) = particles.iter().max_by_key(|p| p.evolution.duration) {
            stats.slowest = MapDuration::from(slowest);
        }
        if let Some(fastest) = particles
            .iter()
            .filter(|p| p.evolution.steps_stored() > 0)
            .min_by_key(|p| p.evolution.duration)
        {
            stats.fastest = MapDuration::from(fastest);
        }
        stats
    }

    /// The number of particles in the run.
    pub fn total_particles(&self) -> usize {
        self.total_particles
    }

    /// The number of fully mapped particles.
    pub fn mapped(&self) -> usize {
        self.mapped
    }

    /// The number of particles that left the domain.
    pub fn escaped(&self) -> usize {
        self.escaped
    }

    /// The number of particles stopped by cancellation.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// The number of particles that failed for any other reason.
    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl std::fmt::Debug for PoincareStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoincareStats")
            .field("total_particles", &self.total_particles)
            .field("mapped", &self.mapped)
            .field("escaped", &self.escaped)
            .field("cancelled", &self.cancelled)
            .field("failed", &self.failed)
            .field("slowest", &self.slowest)
            .field("fastest", &self.fastest)
            .finish()
    }
}

// ===============================================================================================

/// Helper struct to display the fastest and slowest particles.
#[derive(Default)]
struct MapDuration {
    steps: usize,
    duration: Duration,
}

impl From<&Particle> for MapDuration {
    fn from(particle: &Particle) -> Self {
        Self {
            steps: particle.evolution.steps_taken(),
            duration: particle.evolution.duration,
        }
    }
}

impl std::fmt::Debug for MapDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duration: {:?} ({} steps)", self.duration, self.steps)
    }
}
