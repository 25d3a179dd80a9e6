//! Representation of a total perturbation, a sum of multiple harmonics.

use gyromap_interp::Accelerator;

use crate::NcHarmonic;
use crate::cache::HarmonicCache;
use crate::{Harmonic, Perturbation};

/// An ordered superposition of perturbation [`NcHarmonics`](NcHarmonic).
///
/// It has the general form `Σ α{m,n}(ψp)·cos(mθ − nζ + φ₀)`; the values and
/// every partial derivative sum linearly over the harmonics. An empty
/// perturbation evaluates to 0 everywhere.
pub struct NcPerturbation {
    harmonics: Vec<NcHarmonic>,
}

/// Creation and data extraction
impl NcPerturbation {
    /// Creates a perturbation from the given [`NcHarmonics`](NcHarmonic).
    ///
    /// # Examples
    ///
    /// No perturbation:
    /// ```
    /// # use gyromap_equilibrium::*;
    /// let perturbation = NcPerturbation::from_harmonics(&[]);
    /// ```
    ///
    /// Multiple harmonics:
    /// ```
    /// # use gyromap_equilibrium::*;
    /// # let path = stub::stub_path();
    /// let perturbation = NcPerturbation::from_harmonics(&[
    ///     NcHarmonicBuilder::new(&path, "steffen", 2, 1).build()?,
    ///     NcHarmonicBuilder::new(&path, "steffen", 3, 2).build()?,
    /// ]);
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn from_harmonics(harmonics: &[NcHarmonic]) -> Self {
        Self {
            harmonics: harmonics.into(),
        }
    }

    /// Returns the contained harmonics, in superposition order.
    pub fn get_harmonics(&self) -> Vec<NcHarmonic> {
        self.harmonics.clone()
    }

    /// Creates one [`HarmonicCache`] per harmonic, for a single worker.
    pub fn make_caches(&self) -> Vec<HarmonicCache> {
        vec![HarmonicCache::new(); self.harmonics.len()]
    }
}

/// Sums `harmonic.$method(...)` over all harmonics, threading each its own
/// cache.
macro_rules! superposition_impl {
    ($fun_name:ident, $method:ident) => {
        fn $fun_name(
            &self,
            psip: f64,
            theta: f64,
            zeta: f64,
            caches: &mut [HarmonicCache],
            acc: &mut Accelerator,
        ) -> crate::Result<f64> {
            self.harmonics
                .iter()
                .zip(caches.iter_mut())
                .try_fold(0.0, |total, (harmonic, cache)| {
                    harmonic
                        .$method(psip, theta, zeta, cache, acc)
                        .map(|value| total + value)
                })
        }
    };
}

impl Perturbation for NcPerturbation {
    superposition_impl!(p, h);
    superposition_impl!(dp_dpsip, dh_dpsip);
    superposition_impl!(dp_dtheta, dh_dtheta);
    superposition_impl!(dp_dzeta, dh_dzeta);
    superposition_impl!(dp_dt, dh_dt);

    fn len(&self) -> usize {
        self.harmonics.len()
    }
}

impl std::fmt::Debug for NcPerturbation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.harmonics.iter()).finish()
    }
}
