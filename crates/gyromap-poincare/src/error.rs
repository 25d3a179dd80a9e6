/// Custom error types for a collection of particles.
#[derive(thiserror::Error, Debug)]
pub enum PoincareError {
    /// From [`gyromap_particle::ParticleError`].
    #[error(transparent)]
    Particle(#[from] gyromap_particle::ParticleError),

    /// Initial conditions arrays must be of the same length.
    #[error("initial conditions arrays must be of the same length")]
    InitMismatch,
}
