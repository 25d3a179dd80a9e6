//! The particle routines: plain integration and Poincaré mapping.

mod integrate;
mod map;

pub(crate) use integrate::integrate;
pub(crate) use map::map_integrate;

pub use map::{MappingParameters, PoincareSection};

use std::f64::consts::{PI, TAU};

/// Reduces an angle to `(−π, π]`.
pub(crate) fn wrap_pi(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    if reduced > PI { reduced - TAU } else { reduced }
}
