//! Definitions of the evaluation methods of equilibrium objects.
//!
//! These traits are the seams between the equilibrium representation and
//! the particle dynamics: the dynamics only ever sees `q`, `g`, `I`, `B`,
//! the perturbation, and their derivatives. All methods are read-only with
//! respect to the object; the mutable lookup state (accelerators, harmonic
//! caches) is owned by the calling worker and passed in.

use gyromap_interp::Accelerator;

use crate::HarmonicCache;
use crate::Result;
use crate::{Flux, Radians};

/// q-factor related quantities computation.
pub trait Qfactor {
    /// Calculates the q-factor `q(ψp)`.
    fn q(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates the toroidal flux `ψ(ψp)`.
    fn psi(&self, psip: Flux, acc: &mut Accelerator) -> Result<Flux>;

    /// Calculates the derivative `dψ/dψp`.
    fn dpsi_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Returns the poloidal flux at the wall.
    fn psip_wall(&self) -> Flux;

    /// Returns the toroidal flux at the wall, `ψ(psip_wall)`.
    fn psi_wall(&self) -> Flux;
}

/// Plasma current related quantities computation.
pub trait Current {
    /// Calculates `g(ψp)`.
    fn g(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates `I(ψp)`.
    fn i(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates `𝜕g(ψp)/𝜕ψp`.
    fn dg_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates `𝜕I(ψp)/𝜕ψp`.
    fn di_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;
}

/// Magnetic field related quantities computation.
///
/// `θ` is periodic: implementations reduce it into one period themselves.
pub trait Bfield {
    /// Calculates `B(ψp, θ)`.
    fn b(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator)
    -> Result<f64>;

    /// Calculates `𝜕B/𝜕ψp`.
    fn db_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates `𝜕B/𝜕θ`.
    fn db_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates `𝜕²B/𝜕ψp²`.
    fn d2b_dpsip2(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates `𝜕²B/𝜕θ²`.
    fn d2b_dtheta2(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates `𝜕²B/𝜕ψp𝜕θ`.
    fn d2b_dpsip_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<f64>;
}

/// Single harmonic related quantities computation.
///
/// The perturbation is static; only the time derivative knows.
pub trait Harmonic {
    /// Calculates the harmonic `α(ψp)·cos(mθ − nζ + φ₀)`.
    fn h(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕ψp`.
    fn dh_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕θ`.
    fn dh_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕ζ`.
    fn dh_dzeta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the harmonic derivative `𝜕h/𝜕t`.
    #[allow(unused_variables)]
    fn dh_dt(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64> {
        // Time-independent perturbations at the moment.
        Ok(0.0)
    }

    /// Calculates the harmonic's amplitude `α(ψp)`.
    fn a(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;

    /// Calculates the harmonic's amplitude derivative `dα(ψp)/dψp`.
    fn da_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64>;
}

/// Perturbation related quantities computation, as an ordered superposition
/// of harmonics.
pub trait Perturbation {
    /// Calculates the perturbation `Σ α{m,n}(ψp)·cos(mθ − nζ + φ₀)`.
    fn p(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        caches: &mut [HarmonicCache],
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `ψp`.
    fn dp_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        caches: &mut [HarmonicCache],
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `θ`.
    fn dp_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        caches: &mut [HarmonicCache],
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `ζ`.
    fn dp_dzeta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        caches: &mut [HarmonicCache],
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// Calculates the perturbation's derivative with respect to `t`.
    fn dp_dt(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        caches: &mut [HarmonicCache],
        acc: &mut Accelerator,
    ) -> Result<f64>;

    /// The number of harmonics in the superposition.
    fn len(&self) -> usize;

    /// Whether the superposition is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
