//! # gyromap
//!
//! Guiding-centre orbits and Poincaré maps in axisymmetric toroidal
//! equilibria.
//!
//! This crate only gathers the workspace's public surface under one roof,
//! for the convenience of downstream binding layers:
//!
//! - [`interp`]: 1D and 2D spline interpolation.
//! - [`equilibrium`]: the equilibrium and perturbation models.
//! - [`particle`]: single-particle integration and mapping.
//! - [`poincare`]: the parallel Poincaré driver.

pub use gyromap_equilibrium as equilibrium;
pub use gyromap_interp as interp;
pub use gyromap_particle as particle;
pub use gyromap_poincare as poincare;
