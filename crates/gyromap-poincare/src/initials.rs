//! The ensemble's initial conditions.

use gyromap_common::array1D_getter_impl;
use ndarray::Array1;

use gyromap_equilibrium::{Flux, Length, MagneticMoment, Radians};
use gyromap_particle::{InitialConditions, Particle};

use crate::{PoincareError, Result};

/// Stores the initial-conditions arrays of a particle ensemble.
///
/// Constructed once and read-only afterwards; particles are initialized
/// from the i-th entry of every array.
#[non_exhaustive]
pub struct PoincareInit {
    thetas: Vec<Radians>,
    psips: Vec<Flux>,
    rhos: Vec<Length>,
    zetas: Vec<Radians>,
    mus: Vec<MagneticMoment>,
}

/// Initial conditions and particle creation
impl PoincareInit {
    /// Creates a new [`PoincareInit`].
    ///
    /// # Error
    ///
    /// Returns [`PoincareError::InitMismatch`] if the input arrays are not
    /// of the same length.
    ///
    /// # Example
    /// ```
    /// # use gyromap_poincare::*;
    /// # fn main() -> Result<()> {
    /// let init = PoincareInit::build(
    ///     &[0.0, 0.1, 0.2],
    ///     &[0.1, 0.15, 0.2],
    ///     &[1e-3, 2e-3, 3e-3],
    ///     &[0.0, 0.0, 0.0],
    ///     &[0.0, 0.0, 0.0],
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(
        thetas: &[Radians],
        psips: &[Flux],
        rhos: &[Length],
        zetas: &[Radians],
        mus: &[MagneticMoment],
    ) -> Result<Self> {
        let len = thetas.len();
        if psips.len() != len || rhos.len() != len || zetas.len() != len || mus.len() != len {
            return Err(PoincareError::InitMismatch);
        }

        Ok(Self {
            thetas: thetas.to_vec(),
            psips: psips.to_vec(),
            rhos: rhos.to_vec(),
            zetas: zetas.to_vec(),
            mus: mus.to_vec(),
        })
    }

    /// Creates a vector with one [`Particle`] per initial-conditions set.
    pub(crate) fn to_particles(&self) -> Vec<Particle> {
        (0..self.len())
            .map(|index| Particle::new(&self.initial_from_index(index)))
            .collect()
    }

    /// Creates the [`InitialConditions`] set at `index`.
    pub(crate) fn initial_from_index(&self, index: usize) -> InitialConditions {
        InitialConditions {
            time0: 0.0,
            theta0: self.thetas[index],
            psip0: self.psips[index],
            rho0: self.rhos[index],
            zeta0: self.zetas[index],
            mu: self.mus[index],
        }
    }

    /// Returns the length of the stored arrays.
    pub fn len(&self) -> usize {
        self.thetas.len()
    }

    /// Returns `true` if the arrays have a length of 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PoincareInit {
    array1D_getter_impl!(thetas, thetas);
    array1D_getter_impl!(psips, psips);
    array1D_getter_impl!(rhos, rhos);
    array1D_getter_impl!(zetas, zetas);
    array1D_getter_impl!(mus, mus);
}

impl std::fmt::Debug for PoincareInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoincareInit")
            .field("length", &self.len())
            .finish()
    }
}
