//! Representation of an equilibrium's q-factor.

use std::path::{Path, PathBuf};

use gyromap_common::array1D_getter_impl;
use gyromap_interp::{Accelerator, Spline};
use ndarray::Array1;

use crate::Flux;
use crate::Qfactor;
use crate::Result;
use crate::error::EqError;

/// Used to create an [`NcQfactor`].
///
/// Exists for future configuration flexibility.
#[non_exhaustive]
pub struct NcQfactorBuilder {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 1D interpolation kind, in case-insensitive string format.
    typ: String,
}

impl NcQfactorBuilder {
    /// Creates a new [`NcQfactorBuilder`] from a netCDF file at `path`,
    /// with spline of `typ` interpolation kind.
    ///
    /// # Example
    /// ```
    /// # use std::path::PathBuf;
    /// # use gyromap_equilibrium::*;
    /// let path = PathBuf::from("./netcdf.nc");
    /// let builder = NcQfactorBuilder::new(&path, "cubic");
    /// ```
    pub fn new(path: &Path, typ: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            typ: typ.into(),
        }
    }

    /// Creates a new [`NcQfactor`] with the builder's configuration.
    ///
    /// # Example
    /// ```
    /// # use gyromap_equilibrium::*;
    /// # let path = stub::stub_path();
    /// let qfactor = NcQfactorBuilder::new(&path, "cubic").build()?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn build(self) -> Result<NcQfactor> {
        NcQfactor::build(self)
    }
}

// ===============================================================================================

/// q-factor reconstructed from a netCDF file.
///
/// Related quantities are computed by interpolating over the data arrays.
///
/// Should be created with an [`NcQfactorBuilder`].
#[non_exhaustive]
pub struct NcQfactor {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 1D interpolation kind, in case-insensitive string format.
    typ: String,

    /// The `ψp` data array.
    psip_data: Vec<Flux>,
    /// The `q` data array.
    q_data: Vec<f64>,
    /// The `ψ` data array.
    psi_data: Vec<Flux>,

    /// Spline over the `q` values, as a function of ψp.
    q_spline: Spline,
    /// Spline over the `ψ` values, as a function of ψp.
    psi_spline: Spline,
}

/// Creation
impl NcQfactor {
    /// Constructs an [`NcQfactor`] from an [`NcQfactorBuilder`].
    pub(crate) fn build(builder: NcQfactorBuilder) -> Result<Self> {
        use crate::extract::netcdf_fields::{PSI, PSIP, Q};
        use crate::extract::{extract_1d_array, open};

        // Make path absolute for display purposes.
        let path = std::path::absolute(builder.path)?;
        let file = open(&path)?;

        let psip_data = extract_1d_array(&file, PSIP)?.to_vec();
        let psi_data = extract_1d_array(&file, PSI)?.to_vec();
        let q_data = extract_1d_array(&file, Q)?.to_vec();

        let kind = parse_kind(&builder.typ)?;
        let q_spline = Spline::new(kind, &psip_data, &q_data)?;
        let psi_spline = Spline::new(kind, &psip_data, &psi_data)?;

        Ok(Self {
            path,
            typ: builder.typ,
            psip_data,
            q_data,
            psi_data,
            q_spline,
            psi_spline,
        })
    }
}

/// Interpolation
impl Qfactor for NcQfactor {
    fn q(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.q_spline.eval(psip, acc)?)
    }

    fn psi(&self, psip: Flux, acc: &mut Accelerator) -> Result<Flux> {
        Ok(self.psi_spline.eval(psip, acc)?)
    }

    fn dpsi_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.psi_spline.eval_deriv(psip, acc)?)
    }

    fn psip_wall(&self) -> Flux {
        // `psip_data` is non-empty, otherwise construction would have failed
        *self.psip_data.last().expect("array is non-empty")
    }

    fn psi_wall(&self) -> Flux {
        *self.psi_data.last().expect("array is non-empty")
    }
}

/// Getters
impl NcQfactor {
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

    /// Returns the `dψ/dψp` values at the knots, evaluated from the `ψ`
    /// spline's derivative.
    ///
    /// In a consistent dataset these coincide with the `q` data.
    pub fn q_data_derived(&self) -> Array1<f64> {
        let mut acc = Accelerator::new();
        Array1::from_shape_fn(self.len(), |i| {
            self.psi_spline
                .eval_deriv(self.psip_data[i], &mut acc)
                .expect("knots are valid query points")
        })
    }

    array1D_getter_impl!(psip_data, psip_data);
    array1D_getter_impl!(psi_data, psi_data);
    array1D_getter_impl!(q_data, q_data);
}

impl std::fmt::Debug for NcQfactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcQfactor")
            .field("path", &self.path())
            .field("typ", &self.typ())
            .field("len", &self.len())
            .field("ψp_wall", &format!("{:.7}", self.psip_wall()))
            .field("ψ_wall", &format!("{:.7}", self.psi_wall()))
            .finish()
    }
}

/// Parses a 1D interpolation kind string, mapping unknown strings to
/// [`EqError::InvalidArgument`].
pub(crate) fn parse_kind(typ: &str) -> Result<gyromap_interp::InterpKind> {
    typ.parse()
        .map_err(|_| EqError::InvalidArgument(format!("unknown interpolation kind {typ:?}")))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stub::stub_path;

    fn create_nc_qfactor() -> NcQfactor {
        NcQfactorBuilder::new(&stub_path(), "steffen")
            .build()
            .unwrap()
    }

    #[test]
    fn test_qfactor_creation() {
        let qfactor = create_nc_qfactor();
        let _ = format!("{qfactor:?}");
        assert!(qfactor.path().is_absolute());
        assert_eq!(qfactor.typ(), "steffen");
    }

    #[test]
    fn test_getters() {
        let qfactor = create_nc_qfactor();
        assert_eq!(qfactor.psip_data().len(), qfactor.len());
        assert_eq!(qfactor.psi_data().ndim(), 1);
        assert_eq!(qfactor.q_data().ndim(), 1);
        assert_eq!(qfactor.q_data_derived().len(), qfactor.len());
    }

    #[test]
    fn test_spline_evaluation() {
        let qfactor = create_nc_qfactor();
        let mut acc = Accelerator::new();

        let psip = 0.5 * qfactor.psip_wall();
        assert!(qfactor.q(psip, &mut acc).unwrap().is_finite());
        assert!(qfactor.psi(psip, &mut acc).unwrap().is_finite());
        assert!(qfactor.dpsi_dpsip(psip, &mut acc).unwrap().is_finite());
    }

    #[test]
    fn test_unknown_kind() {
        let builder = NcQfactorBuilder::new(&stub_path(), "quadratic");
        assert!(matches!(
            builder.build(),
            Err(EqError::InvalidArgument(..))
        ));
    }
}
