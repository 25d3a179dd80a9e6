#![doc = include_str!("../README.md")]

mod bfields;
mod cache;
mod currents;
mod error;
mod eval;
mod harmonics;
mod perturbations;
mod qfactors;

pub mod extract;
pub mod stub;

pub use eval::{Bfield, Current, Harmonic, Perturbation, Qfactor};

pub use bfields::{NcBfield, NcBfieldBuilder};
pub use currents::{NcCurrent, NcCurrentBuilder};
pub use harmonics::{NcHarmonic, NcHarmonicBuilder};
pub use perturbations::NcPerturbation;
pub use qfactors::{NcQfactor, NcQfactorBuilder};

pub use cache::HarmonicCache;
pub use error::{EqError, LoadError};

pub type Result<T> = std::result::Result<T, EqError>;

/// Magnetic flux, in Normalized Units.
#[doc(alias = "f64")]
pub type Flux = f64;

/// Angle in radians.
#[doc(alias = "f64")]
pub type Radians = f64;

/// Distance, in Normalized Units (normalized to the major radius R0).
#[doc(alias = "f64")]
pub type Length = f64;

/// Magnetic moment, in Normalized Units.
#[doc(alias = "f64")]
pub type MagneticMoment = f64;
