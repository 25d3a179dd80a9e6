//! Representation of an equilibrium's plasma currents.

use std::path::{Path, PathBuf};

use gyromap_common::array1D_getter_impl;
use gyromap_interp::{Accelerator, Spline};
use ndarray::Array1;

use crate::Current;
use crate::Flux;
use crate::Result;
use crate::qfactors::parse_kind;

/// Used to create an [`NcCurrent`].
///
/// Exists for future configuration flexibility.
#[non_exhaustive]
pub struct NcCurrentBuilder {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 1D interpolation kind, in case-insensitive string format.
    typ: String,
}

impl NcCurrentBuilder {
    /// Creates a new [`NcCurrentBuilder`] from a netCDF file at `path`,
    /// with spline of `typ` interpolation kind.
    ///
    /// # Example
    /// ```
    /// # use std::path::PathBuf;
    /// # use gyromap_equilibrium::*;
    /// let path = PathBuf::from("./netcdf.nc");
    /// let builder = NcCurrentBuilder::new(&path, "akima");
    /// ```
    pub fn new(path: &Path, typ: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            typ: typ.into(),
        }
    }

    /// Creates a new [`NcCurrent`] with the builder's configuration.
    ///
    /// # Example
    /// ```
    /// # use gyromap_equilibrium::*;
    /// # let path = stub::stub_path();
    /// let current = NcCurrentBuilder::new(&path, "akima").build()?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn build(self) -> Result<NcCurrent> {
        NcCurrent::build(self)
    }
}

// ===============================================================================================

/// Plasma currents reconstructed from a netCDF file.
///
/// Related quantities are computed by interpolating over the data arrays.
///
/// Should be created with an [`NcCurrentBuilder`].
#[non_exhaustive]
pub struct NcCurrent {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 1D interpolation kind, in case-insensitive string format.
    typ: String,

    /// The `ψp` data array.
    psip_data: Vec<Flux>,
    /// The toroidal current `g` data array.
    g_data: Vec<f64>,
    /// The poloidal current `I` data array.
    i_data: Vec<f64>,

    /// Spline over the `g` values, as a function of ψp.
    g_spline: Spline,
    /// Spline over the `I` values, as a function of ψp.
    i_spline: Spline,
}

/// Creation
impl NcCurrent {
    /// Constructs an [`NcCurrent`] from an [`NcCurrentBuilder`].
    pub(crate) fn build(builder: NcCurrentBuilder) -> Result<Self> {
        use crate::extract::netcdf_fields::{G, I, PSIP};
        use crate::extract::{extract_1d_array, open};

        // Make path absolute for display purposes.
        let path = std::path::absolute(builder.path)?;
        let file = open(&path)?;

        let psip_data = extract_1d_array(&file, PSIP)?.to_vec();
        let g_data = extract_1d_array(&file, G)?.to_vec();
        let i_data = extract_1d_array(&file, I)?.to_vec();

        let kind = parse_kind(&builder.typ)?;
        let g_spline = Spline::new(kind, &psip_data, &g_data)?;
        let i_spline = Spline::new(kind, &psip_data, &i_data)?;

        Ok(Self {
            path,
            typ: builder.typ,
            psip_data,
            g_data,
            i_data,
            g_spline,
            i_spline,
        })
    }
}

/// Interpolation
impl Current for NcCurrent {
    fn g(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.g_spline.eval(psip, acc)?)
    }

    fn i(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.i_spline.eval(psip, acc)?)
    }

    fn dg_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.g_spline.eval_deriv(psip, acc)?)
    }

    fn di_dpsip(&self, psip: Flux, acc: &mut Accelerator) -> Result<f64> {
        Ok(self.i_spline.eval_deriv(psip, acc)?)
    }
}

/// Getters
impl NcCurrent {
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

    /// Returns the poloidal flux at the wall.
    pub fn psip_wall(&self) -> Flux {
        // `psip_data` is non-empty, otherwise construction would have failed
        *self.psip_data.last().expect("array is non-empty")
    }

    array1D_getter_impl!(psip_data, psip_data);
    array1D_getter_impl!(g_data, g_data);
    array1D_getter_impl!(i_data, i_data);
}

impl std::fmt::Debug for NcCurrent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcCurrent")
            .field("path", &self.path())
            .field("typ", &self.typ())
            .field("len", &self.len())
            .finish()
    }
}
