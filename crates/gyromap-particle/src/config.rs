use crate::CancelToken;

#[allow(unused_imports)] // doc
use crate::Particle;

/// Ensures that all routine configurations expose the fields required by
/// the stepper.
pub(crate) trait StepperConfig {
    fn rtol(&self) -> f64;
    fn atol(&self) -> f64;
    fn max_step(&self) -> f64;
    fn first_step(&self) -> Option<f64>;
    fn max_steps(&self) -> usize;
    fn cancel(&self) -> Option<&CancelToken>;
}

#[rustfmt::skip]
macro_rules! stepper_config_impl {
    ($object:ident) => {
        impl StepperConfig for $object {
            #[inline(always)]
            fn rtol(&self) -> f64 { self.rtol }
            #[inline(always)]
            fn atol(&self) -> f64 { self.atol }
            #[inline(always)]
            fn max_step(&self) -> f64 { self.max_step }
            #[inline(always)]
            fn first_step(&self) -> Option<f64> { self.first_step }
            #[inline(always)]
            fn max_steps(&self) -> usize { self.max_steps }
            #[inline(always)]
            fn cancel(&self) -> Option<&CancelToken> { self.cancel.as_ref() }
        }
    };
}

stepper_config_impl!(IntegrationConfig);
stepper_config_impl!(MappingConfig);

// ===============================================================================================

/// Defines the parameters of the [`Particle::integrate`] routine.
///
/// See [`IntegrationConfig::default`] for the default values.
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    /// The relative tolerance on each state component.
    pub rtol: f64,
    /// The absolute tolerance on each state component.
    pub atol: f64,
    /// Ceiling on the step size.
    pub max_step: f64,
    /// The initial step; estimated automatically when `None`.
    pub first_step: Option<f64>,
    /// The maximum amount of steps a particle can make before its
    /// integration is aborted.
    pub max_steps: usize,
    /// Store every n-th accepted step in the [`Evolution`](crate::Evolution).
    pub store_every: usize,
    /// Sample the dense output at these times instead of storing accepted
    /// steps. Must be increasing and inside the integration span.
    pub t_samples: Option<Vec<f64>>,
    /// Cooperative cancellation flag, checked between accepted steps.
    pub cancel: Option<CancelToken>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-10,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 10_000_000,
            store_every: 1,
            t_samples: None,
            cancel: None,
        }
    }
}

// ===============================================================================================

/// Defines the parameters of the [`Particle::map`] routine.
///
/// See [`MappingConfig::default`] for the default values.
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// The relative tolerance on each state component.
    pub rtol: f64,
    /// The absolute tolerance on each state component.
    pub atol: f64,
    /// Ceiling on the step size.
    pub max_step: f64,
    /// The initial step; estimated automatically when `None`.
    pub first_step: Option<f64>,
    /// The maximum amount of steps a particle can make before its mapping
    /// is aborted.
    pub max_steps: usize,
    /// Cooperative cancellation flag, checked between accepted steps.
    pub cancel: Option<CancelToken>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-10,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 10_000_000,
            cancel: None,
        }
    }
}
