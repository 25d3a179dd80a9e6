//! Representation of a perturbation's single harmonic.

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use gyromap_common::array1D_getter_impl;
use gyromap_interp::{Accelerator, Spline};
use ndarray::Array1;

use crate::cache::HarmonicCache;
use crate::qfactors::parse_kind;
use crate::{Flux, Harmonic, Length, Radians, Result};

/// Used to create an [`NcHarmonic`].
#[non_exhaustive]
pub struct NcHarmonicBuilder {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 1D interpolation kind, in case-insensitive string format.
    typ: String,
    /// The `θ` frequency number.
    m: i64,
    /// The `ζ` frequency number.
    n: i64,
    /// The constant phase `φ₀`.
    phase: Radians,
}

impl NcHarmonicBuilder {
    /// Creates a new [`NcHarmonicBuilder`] from a netCDF file at `path`,
    /// with spline of `typ` interpolation kind, for the mode `(m, n)`.
    ///
    /// # Example
    /// ```
    /// # use std::path::PathBuf;
    /// # use gyromap_equilibrium::*;
    /// let path = PathBuf::from("./netcdf.nc");
    /// let builder = NcHarmonicBuilder::new(&path, "steffen", 2, 1);
    /// ```
    pub fn new(path: &Path, typ: &str, m: i64, n: i64) -> Self {
        Self {
            path: path.to_path_buf(),
            typ: typ.into(),
            m,
            n,
            phase: 0.0,
        }
    }

    /// Sets the harmonic's constant phase `φ₀` (default 0).
    ///
    /// # Example
    /// ```
    /// # use std::path::PathBuf;
    /// # use std::f64::consts::PI;
    /// # use gyromap_equilibrium::*;
    /// # let path = stub::stub_path();
    /// let harmonic = NcHarmonicBuilder::new(&path, "steffen", 2, 1)
    ///     .with_phase(PI / 2.0)
    ///     .build()?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn with_phase(mut self, phase: Radians) -> Self {
        self.phase = phase;
        self
    }

    /// Creates a new [`NcHarmonic`] with the builder's configuration.
    ///
    /// # Example
    /// ```
    /// # use gyromap_equilibrium::*;
    /// # let path = stub::stub_path();
    /// let harmonic = NcHarmonicBuilder::new(&path, "steffen", 2, 1).build()?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn build(self) -> Result<NcHarmonic> {
        NcHarmonic::build(self)
    }
}

// ===============================================================================================

/// Single perturbation harmonic from a netCDF file.
///
/// The harmonic has the form `α(ψp)·cos(mθ − nζ + φ₀)`, where `α(ψp)` is
/// calculated by interpolation over the mode's tabulated amplitude profile
/// and `φ₀` is a constant set at construction. The file's phase profile is
/// kept for inspection but does not enter the evaluation.
///
/// Should be created with an [`NcHarmonicBuilder`].
#[non_exhaustive]
pub struct NcHarmonic {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 1D interpolation kind, in case-insensitive string format.
    typ: String,

    /// The `θ` frequency number, cast to f64 for the calculations.
    _m: f64,
    /// The `ζ` frequency number, cast to f64 for the calculations.
    _n: f64,
    /// The constant phase `φ₀`.
    phase: Radians,
    /// The largest amplitude magnitude over the profile.
    amax: f64,

    /// The `ψp` data array.
    psip_data: Vec<Flux>,
    /// The `α` data array.
    alpha_data: Vec<Length>,
    /// The `φ` data array, as tabulated in the file.
    phase_data: Vec<Radians>,

    /// Spline over the `α` values, as a function of ψp.
    alpha_spline: Spline,
}

/// Creation
impl NcHarmonic {
    /// Constructs an [`NcHarmonic`] from an [`NcHarmonicBuilder`].
    pub(crate) fn build(builder: NcHarmonicBuilder) -> Result<Self> {
        use crate::extract::netcdf_fields::PSIP;
        use crate::extract::{extract_1d_array, extract_harmonic_arrays, open};

        // Make path absolute for display purposes.
        let path = std::path::absolute(builder.path)?;
        let file = open(&path)?;

        let psip_data = extract_1d_array(&file, PSIP)?.to_vec();
        let (alpha_data, phase_data) = extract_harmonic_arrays(&file, builder.m, builder.n)?;

        let kind = parse_kind(&builder.typ)?;
        let alpha_spline = Spline::new(kind, &psip_data, &alpha_data)?;
        let amax = alpha_data.iter().fold(0.0_f64, |acc, a| acc.max(a.abs()));

        Ok(Self {
            path,
            typ: builder.typ,
            _m: builder.m as f64,
            _n: builder.n as f64,
            phase: builder.phase,
            amax,
            psip_data,
            alpha_data,
            phase_data,
            alpha_spline,
        })
    }

    /// The angular argument `mθ − nζ + φ₀`, reduced into one period.
    pub(crate) fn mod_arg(&self, theta: Radians, zeta: Radians) -> Radians {
        (self._m * theta - self._n * zeta + self.phase).rem_euclid(TAU)
    }
}

/// Interpolation
impl Harmonic for NcHarmonic {
    fn h(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta) {
            cache.update(self, psip, theta, zeta, acc)?;
        }
        Ok(cache.alpha * cache.cos)
    }

    fn dh_dpsip(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta) {
            cache.update(self, psip, theta, zeta, acc)?;
        }
        Ok(cache.da_dpsip * cache.cos)
    }

    fn dh_dtheta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta) {
            cache.update(self, psip, theta, zeta, acc)?;
        }
        Ok(cache.alpha * (-self._m) * cache.sin)
    }

    fn dh_dzeta(
        &self,
        psip: Flux,
        theta: Radians,
        zeta: Radians,
        cache: &mut HarmonicCache,
        acc: &mut Accelerator,
    ) -> Result<f64> {
        if !cache.is_updated(psip, theta, zeta) {
            cache.update(self, psip, theta, zeta, acc)?;
        }
        Ok(cache.alpha * self._n * cache.sin)
    }

    fn a(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.alpha_spline.eval(psip, acc)?)
    }

    fn da_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.alpha_spline.eval_deriv(psip, acc)?)
    }
}

/// Getters
impl NcHarmonic {
    /// Returns the netCDF file's path.
    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    /// Returns the interpolation kind.
    pub fn typ(&self) -> String {
        self.typ.clone()
    }

    /// Returns the number of data points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.psip_data.len()
    }

    /// Returns the poloidal mode number `m`.
    pub fn m(&self) -> i64 {
        self._m as i64
    }

    /// Returns the toroidal mode number `n`.
    pub fn n(&self) -> i64 {
        self._n as i64
    }

    /// Returns the constant phase `φ₀`.
    pub fn phase(&self) -> Radians {
        self.phase
    }

    /// Returns the largest amplitude magnitude over the profile.
    pub fn amax(&self) -> f64 {
        self.amax
    }

    array1D_getter_impl!(psip_data, psip_data);
    array1D_getter_impl!(a_data, alpha_data);
    array1D_getter_impl!(phase_data, phase_data);
}

impl Clone for NcHarmonic {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            typ: self.typ.clone(),
            _m: self._m,
            _n: self._n,
            phase: self.phase,
            amax: self.amax,
            psip_data: self.psip_data.clone(),
            alpha_data: self.alpha_data.clone(),
            phase_data: self.phase_data.clone(),
            alpha_spline: Spline::new(
                self.alpha_spline.kind(),
                &self.psip_data,
                &self.alpha_data,
            )
            .expect("already created from the same arrays"),
        }
    }
}

impl std::fmt::Debug for NcHarmonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcHarmonic")
            .field("path", &self.path())
            .field("typ", &self.typ())
            .field("m", &self.m())
            .field("n", &self.n())
            .field("phase", &format!("{:.7}", self.phase()))
            .field("amax", &format!("{:.7}", self.amax()))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stub::stub_path;
    use approx::assert_relative_eq;

    fn create_harmonic() -> NcHarmonic {
        NcHarmonicBuilder::new(&stub_path(), "steffen", 1, 1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_creation() {
        let harmonic = create_harmonic();
        let _ = harmonic.clone();
        let _ = format!("{harmonic:?}");
        assert_eq!(harmonic.m(), 1);
        assert_eq!(harmonic.n(), 1);
        assert_eq!(harmonic.phase(), 0.0);
        assert!(harmonic.path().is_absolute());
    }

    #[test]
    fn test_getters() {
        let harmonic = create_harmonic();
        assert_eq!(harmonic.psip_data().len(), harmonic.len());
        assert_eq!(harmonic.a_data().ndim(), 1);
        assert_eq!(harmonic.phase_data().ndim(), 1);
        assert!(harmonic.amax() > 0.0);
    }

    /// The chain-rule derivatives against the analytic expressions.
    #[test]
    fn test_derivative_signs() {
        let harmonic = NcHarmonicBuilder::new(&stub_path(), "steffen", 2, 3)
            .with_phase(0.4)
            .build()
            .unwrap();
        let mut cache = HarmonicCache::new();
        let mut acc = Accelerator::new();

        let (psip, theta, zeta) = (1.2, 0.7, 0.3);
        let alpha = harmonic.a(psip, &mut acc).unwrap();
        let angle = 2.0 * theta - 3.0 * zeta + 0.4;

        let h = harmonic.h(psip, theta, zeta, &mut cache, &mut acc).unwrap();
        assert_relative_eq!(h, alpha * angle.cos(), epsilon = 1e-12);

        let dh_dtheta = harmonic
            .dh_dtheta(psip, theta, zeta, &mut cache, &mut acc)
            .unwrap();
        assert_relative_eq!(dh_dtheta, -alpha * 2.0 * angle.sin(), epsilon = 1e-12);

        let dh_dzeta = harmonic
            .dh_dzeta(psip, theta, zeta, &mut cache, &mut acc)
            .unwrap();
        assert_relative_eq!(dh_dzeta, alpha * 3.0 * angle.sin(), epsilon = 1e-12);

        let dh_dt = harmonic
            .dh_dt(psip, theta, zeta, &mut cache, &mut acc)
            .unwrap();
        assert_eq!(dh_dt, 0.0);
    }
}
