/// Failure modes of the adaptive stepper itself.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum IntegrationError {
    /// The step required to meet the tolerance fell below the resolution
    /// of the time variable.
    #[error("step size underflow at t = {t}")]
    StepSizeUnderflow { t: f64 },

    /// The step budget ran out before the integration finished.
    #[error("step budget of {max_steps} steps exceeded")]
    BudgetExceeded { max_steps: usize },

    /// A stage derivative or the error norm came out NaN/Inf.
    #[error("non-finite derivative encountered at t = {t}")]
    NonFiniteDerivative { t: f64 },
}

/// Custom error types for particle routines.
#[derive(thiserror::Error, Debug)]
pub enum ParticleError {
    /// The stepper failed.
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// The particle left the valid domain `ψp ∈ [0, ψp_wall]`.
    #[error("particle left the domain at ψp = {psip}")]
    LeftDomain { psip: f64 },

    /// A cancellation token was observed.
    #[error("integration cancelled")]
    Cancelled,

    /// Invalid routine arguments; reported to the caller without touching
    /// the particle.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An equilibrium evaluation failed.
    #[error(transparent)]
    Eq(#[from] gyromap_equilibrium::EqError),
}
