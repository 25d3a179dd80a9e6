#![doc = include_str!("../README.md")]

mod brent;
mod cancel;
mod config;
mod error;
mod evolution;
mod particle;
mod rhs;
mod rk45;
mod routines;
mod state;

pub use cancel::CancelToken;
pub use config::{IntegrationConfig, MappingConfig};
pub use error::{IntegrationError, ParticleError};
pub use evolution::Evolution;
pub use particle::{Crossings, ErrorCause, InitialConditions, Particle, Status};
pub use routines::{MappingParameters, PoincareSection};
pub use state::{State, Workspace};

pub use gyromap_equilibrium::{Flux, Length, MagneticMoment, Radians};

pub type Result<T> = std::result::Result<T, ParticleError>;
