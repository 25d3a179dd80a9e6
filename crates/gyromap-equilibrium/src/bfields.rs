//! Representation of an equilibrium's magnetic field and lab-frame
//! geometry.

use std::path::{Path, PathBuf};

use gyromap_common::array1D_getter_impl;
use gyromap_interp::{Accelerator, Interp2dKind, Spline2d};
use ndarray::{Array1, Array2};

use crate::error::EqError;
use crate::{Bfield, Flux, Length, Radians, Result};

/// Used to create an [`NcBfield`].
///
/// Exists for future configuration flexibility.
#[non_exhaustive]
pub struct NcBfieldBuilder {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 2D interpolation kind, in case-insensitive string format.
    typ: String,
}

impl NcBfieldBuilder {
    /// Creates a new [`NcBfieldBuilder`] from a netCDF file at `path`,
    /// with spline of `typ` interpolation kind.
    ///
    /// # Example
    /// ```
    /// # use std::path::PathBuf;
    /// # use gyromap_equilibrium::*;
    /// let path = PathBuf::from("./netcdf.nc");
    /// let builder = NcBfieldBuilder::new(&path, "bicubic");
    /// ```
    pub fn new(path: &Path, typ: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            typ: typ.into(),
        }
    }

    /// Creates a new [`NcBfield`] with the builder's configuration.
    ///
    /// # Example
    /// ```
    /// # use gyromap_equilibrium::*;
    /// # let path = stub::stub_path();
    /// let bfield = NcBfieldBuilder::new(&path, "bicubic").build()?;
    /// # Ok::<_, EqError>(())
    /// ```
    pub fn build(self) -> Result<NcBfield> {
        NcBfield::build(self)
    }
}

// ===============================================================================================

/// Magnetic field reconstructed from a netCDF file.
///
/// Owns the bicubic interpolants of `B(ψp, θ)` and of the lab-frame
/// coordinates `R(ψp, θ)`, `Z(ψp, θ)`, plus the on-axis scalars. The raw
/// grids are kept around for plotting.
///
/// Should be created with an [`NcBfieldBuilder`].
#[non_exhaustive]
pub struct NcBfield {
    /// Path to the netCDF file.
    path: PathBuf,
    /// 2D interpolation kind, in case-insensitive string format.
    typ: String,

    /// Magnetic field strength on the axis `B0` **in \[T\]**.
    baxis: f64,
    /// The major radius `R0` **in \[m\]**.
    raxis: Length,
    /// The toroidal flux at the wall.
    psi_wall: Flux,

    /// The `ψp` data array.
    psip_data: Vec<Flux>,
    /// The `θ` data array.
    theta_data: Vec<Radians>,

    /// Interpolant over the `B` values, as a function of (ψp, θ).
    b_spline: Spline2d,
    /// Interpolant over the `R` values, as a function of (ψp, θ).
    rlab_spline: Spline2d,
    /// Interpolant over the `Z` values, as a function of (ψp, θ).
    zlab_spline: Spline2d,
}

/// Creation
impl NcBfield {
    /// Constructs an [`NcBfield`] from an [`NcBfieldBuilder`].
    pub(crate) fn build(builder: NcBfieldBuilder) -> Result<Self> {
        use crate::extract::netcdf_fields::{B, BAXIS, PSI, PSIP, RAXIS, RLAB, THETA, ZLAB};
        use crate::extract::{extract_1d_array, extract_2d_array, extract_scalar, open};

        // Make path absolute for display purposes.
        let path = std::path::absolute(builder.path)?;
        let file = open(&path)?;

        let baxis = extract_scalar(&file, BAXIS)?;
        let raxis = extract_scalar(&file, RAXIS)?;
        let psip_data = extract_1d_array(&file, PSIP)?.to_vec();
        let psi_data = extract_1d_array(&file, PSI)?.to_vec();
        let theta_data = extract_1d_array(&file, THETA)?.to_vec();
        let (npsip, ntheta) = (psip_data.len(), theta_data.len());
        let b_data = extract_2d_array(&file, B, npsip, ntheta)?;
        let rlab_data = extract_2d_array(&file, RLAB, npsip, ntheta)?;
        let zlab_data = extract_2d_array(&file, ZLAB, npsip, ntheta)?;

        let kind: Interp2dKind = builder.typ.parse().map_err(|_| {
            EqError::InvalidArgument(format!("unknown interpolation kind {:?}", builder.typ))
        })?;
        let spline_over = |grid: &Array2<f64>| -> Result<Spline2d> {
            // Logical iteration order is row-major, matching the spline's
            // flattening convention.
            let flat: Vec<f64> = grid.iter().copied().collect();
            Ok(Spline2d::new(kind, &psip_data, &theta_data, &flat)?)
        };
        let b_spline = spline_over(&b_data)?;
        let rlab_spline = spline_over(&rlab_data)?;
        let zlab_spline = spline_over(&zlab_data)?;

        Ok(Self {
            path,
            typ: builder.typ,
            baxis,
            raxis,
            psi_wall: *psi_data.last().expect("array is non-empty"),
            psip_data,
            theta_data,
            b_spline,
            rlab_spline,
            zlab_spline,
        })
    }
}

/// Interpolation
#[rustfmt::skip] // pretty!
impl Bfield for NcBfield {
    fn b(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        Ok(self.b_spline.eval(psip, theta, xacc, yacc)?)
    }

    fn db_dpsip(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_x(psip, theta, xacc, yacc)?)
    }

    fn db_dtheta(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_y(psip, theta, xacc, yacc)?)
    }

    fn d2b_dpsip2(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_xx(psip, theta, xacc, yacc)?)
    }

    fn d2b_dtheta2(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_yy(psip, theta, xacc, yacc)?)
    }

    fn d2b_dpsip_dtheta(&self, psip: Flux, theta: Radians, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        Ok(self.b_spline.eval_deriv_xy(psip, theta, xacc, yacc)?)
    }
}

/// Lab-frame geometry
impl NcBfield {
    /// Calculates the horizontal lab coordinate `R(ψp, θ)` **in \[m\]**.
    pub fn rlab(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<Length> {
        Ok(self.rlab_spline.eval(psip, theta, xacc, yacc)?)
    }

    /// Calculates the vertical lab coordinate `Z(ψp, θ)` **in \[m\]**.
    pub fn zlab(
        &self,
        psip: Flux,
        theta: Radians,
        xacc: &mut Accelerator,
        yacc: &mut Accelerator,
    ) -> Result<Length> {
        Ok(self.zlab_spline.eval(psip, theta, xacc, yacc)?)
    }
}

/// Getters
impl NcBfield {
    /// Returns the netCDF file's path.
    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    /// Returns the interpolation kind.
    pub fn typ(&self) -> String {
        self.typ.clone()
    }

    /// Returns the shape of the 2D grids.
    pub fn shape(&self) -> (usize, usize) {
        (self.psip_data.len(), self.theta_data.len())
    }

    /// Returns the magnetic field strength on the axis `B0` **in \[T\]**.
    pub fn baxis(&self) -> f64 {
        self.baxis
    }

    /// Returns the major radius `R0` **in \[m\]**.
    pub fn raxis(&self) -> Length {
        self.raxis
    }

    /// Returns the poloidal flux at the wall.
    pub fn psip_wall(&self) -> Flux {
        // `psip_data` is non-empty, otherwise construction would have failed
        *self.psip_data.last().expect("array is non-empty")
    }

    /// Returns the toroidal flux at the wall.
    pub fn psi_wall(&self) -> Flux {
        self.psi_wall
    }

    /// Returns the `B(ψp, θ)` data as a 2D array.
    pub fn b_data(&self) -> Array2<f64> {
        self.grid_of(&self.b_spline)
    }

    /// Returns the `R(ψp, θ)` data as a 2D array.
    pub fn rlab_data(&self) -> Array2<f64> {
        self.grid_of(&self.rlab_spline)
    }

    /// Returns the `Z(ψp, θ)` data as a 2D array.
    pub fn zlab_data(&self) -> Array2<f64> {
        self.grid_of(&self.zlab_spline)
    }

    fn grid_of(&self, spline: &Spline2d) -> Array2<f64> {
        Array2::from_shape_vec(self.shape(), spline.za.clone()).expect("shape is correct")
    }

    array1D_getter_impl!(psip_data, psip_data);
    array1D_getter_impl!(theta_data, theta_data);
}

impl std::fmt::Debug for NcBfield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcBfield")
            .field("path", &self.path())
            .field("typ", &self.typ())
            .field("shape", &self.shape())
            .field("Baxis [T]", &format!("{:.7}", self.baxis()))
            .field("Raxis [m]", &format!("{:.7}", self.raxis()))
            .field("ψp_wall", &format!("{:.7}", self.psip_wall()))
            .field("ψ_wall", &format!("{:.7}", self.psi_wall()))
            .finish()
    }
}
