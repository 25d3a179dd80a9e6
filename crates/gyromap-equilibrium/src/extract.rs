//! Extraction of typed arrays from the equilibrium netCDF dataset.
//!
//! Byte order is handled by the netCDF container itself; what is validated
//! here is everything the container cannot promise: presence of the
//! variables, their shapes, and the finiteness of required data. NaN/Inf
//! entries in the perturbation tables (`alphas`, `phases`) are replaced with
//! zero, as the data-preparation pipeline may leave them behind.

use std::path::Path;

use ndarray::{Array1, Array2};

use crate::{LoadError, Result};

/// The names each variable is expected to appear under in the netCDF file.
///
/// If the naming convention changes, this is the only module to update.
pub mod netcdf_fields {
    /// Magnetic field strength on the axis `B0` **in \[T\]**.
    pub const BAXIS: &str = "baxis";
    /// The major radius `R0` **in \[m\]**.
    pub const RAXIS: &str = "raxis";
    /// The boozer poloidal angle `θ` **in \[rads\]**, covering one period.
    pub const THETA: &str = "theta";
    /// The poloidal flux `ψp` **in Normalized Units**.
    pub const PSIP: &str = "psip";
    /// The toroidal flux `ψ` **in Normalized Units**.
    pub const PSI: &str = "psi";
    /// q(ψp): The safety factor.
    pub const Q: &str = "q";
    /// g(ψp): The covariant toroidal plasma current **in Normalized Units**.
    pub const G: &str = "g";
    /// I(ψp): The covariant poloidal plasma current **in Normalized Units**.
    pub const I: &str = "i";
    /// B(ψp, θ): The magnetic field strength **in Normalized Units**.
    pub const B: &str = "b";
    /// R(ψp, θ): The horizontal lab coordinate **in \[m\]**.
    pub const RLAB: &str = "R";
    /// Z(ψp, θ): The vertical lab coordinate **in \[m\]**.
    pub const ZLAB: &str = "Z";
    /// The poloidal mode numbers `m`.
    pub const M: &str = "m";
    /// The toroidal mode numbers `n`.
    pub const N: &str = "n";
    /// The 3D array containing all the `α{m,n}(ψp)` profiles, **in
    /// Normalized Units**.
    pub const ALPHAS: &str = "alphas";
    /// The 3D array containing all the `φ{m,n}(ψp)` profiles **in \[rads\]**.
    pub const PHASES: &str = "phases";
}

/// Opens the netCDF file at `path`.
pub(crate) fn open(path: &Path) -> Result<netcdf::File> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()).into());
    }
    netcdf::open(path).map_err(|source| {
        LoadError::NetCdf {
            source,
            reason: format!("could not open dataset at {path:?}"),
        }
        .into()
    })
}

/// Looks a variable up, with its absence as a typed error.
fn variable<'f>(file: &'f netcdf::File, name: &str) -> Result<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| LoadError::MissingVariable(name.into()).into())
}

/// Returns the dimension lengths of a variable.
fn shape_of(var: &netcdf::Variable<'_>) -> Vec<usize> {
    var.dimensions().iter().map(netcdf::Dimension::len).collect()
}

fn read_error(name: &str, source: netcdf::Error) -> LoadError {
    LoadError::NetCdf {
        source,
        reason: format!("could not read variable {name:?}"),
    }
}

/// Extracts a scalar variable.
pub(crate) fn extract_scalar(file: &netcdf::File, name: &str) -> Result<f64> {
    let var = variable(file, name)?;
    let value = var
        .get_value::<f64, _>(..)
        .map_err(|source| read_error(name, source))?;
    if !value.is_finite() {
        return Err(LoadError::NonFinite(name.into()).into());
    }
    Ok(value)
}

/// Extracts a 1D float variable, requiring every entry to be finite.
pub(crate) fn extract_1d_array(file: &netcdf::File, name: &str) -> Result<Array1<f64>> {
    let var = variable(file, name)?;
    let shape = shape_of(&var);
    if shape.len() != 1 {
        return Err(LoadError::WrongShape {
            name: name.into(),
            expected: vec![0],
            got: shape,
        }
        .into());
    }
    let values = var
        .get_values::<f64, _>(..)
        .map_err(|source| read_error(name, source))?;
    if !values.iter().all(|v| v.is_finite()) {
        return Err(LoadError::NonFinite(name.into()).into());
    }
    Ok(Array1::from_vec(values))
}

/// Extracts a 1D integer variable (the mode-number tables).
pub(crate) fn extract_1d_ints(file: &netcdf::File, name: &str) -> Result<Vec<i64>> {
    let var = variable(file, name)?;
    var.get_values::<i64, _>(..)
        .map_err(|source| read_error(name, source).into())
}

/// Extracts a 2D float variable of shape `(Nψ, Nθ)`, requiring every entry
/// to be finite.
pub(crate) fn extract_2d_array(
    file: &netcdf::File,
    name: &str,
    npsip: usize,
    ntheta: usize,
) -> Result<Array2<f64>> {
    let var = variable(file, name)?;
    let shape = shape_of(&var);
    if shape != [npsip, ntheta] {
        return Err(LoadError::WrongShape {
            name: name.into(),
            expected: vec![npsip, ntheta],
            got: shape,
        }
        .into());
    }
    let values = var
        .get_values::<f64, _>(..)
        .map_err(|source| read_error(name, source))?;
    if !values.iter().all(|v| v.is_finite()) {
        return Err(LoadError::NonFinite(name.into()).into());
    }
    Ok(Array2::from_shape_vec((npsip, ntheta), values).expect("shape was just checked"))
}

/// Extracts the `α(ψp)` and `φ(ψp)` profiles of the mode `(m, n)` from the
/// 3D perturbation tables.
///
/// The mode is looked up **by value** in the `m`/`n` tables. NaN/Inf entries
/// are replaced with 0.
pub(crate) fn extract_harmonic_arrays(
    file: &netcdf::File,
    m: i64,
    n: i64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    use netcdf_fields::{ALPHAS, M, N, PHASES, PSIP};

    let m_table = extract_1d_ints(file, M)?;
    let n_table = extract_1d_ints(file, N)?;
    let mode_error = || -> crate::EqError { LoadError::ModeNotFound { m, n }.into() };
    let m_index = m_table.iter().position(|v| *v == m).ok_or_else(mode_error)?;
    let n_index = n_table.iter().position(|v| *v == n).ok_or_else(mode_error)?;

    let npsip = extract_1d_array(file, PSIP)?.len();
    let expected = vec![m_table.len(), n_table.len(), npsip];

    let mut profiles = Vec::with_capacity(2);
    for name in [ALPHAS, PHASES] {
        let var = variable(file, name)?;
        let shape = shape_of(&var);
        if shape != expected {
            return Err(LoadError::WrongShape {
                name: name.into(),
                expected: expected.clone(),
                got: shape,
            }
            .into());
        }
        // Slice the (m, n) profile out of the row-major table.
        let table = var
            .get_values::<f64, _>(..)
            .map_err(|source| read_error(name, source))?;
        let start = (m_index * n_table.len() + n_index) * npsip;
        profiles.push(replace_non_finite(table[start..start + npsip].to_vec()));
    }

    let phases = profiles.pop().expect("pushed above");
    let alphas = profiles.pop().expect("pushed above");
    Ok((alphas, phases))
}

/// Replaces NaN/Inf entries with 0.
fn replace_non_finite(mut values: Vec<f64>) -> Vec<f64> {
    for value in &mut values {
        if !value.is_finite() {
            *value = 0.0;
        }
    }
    values
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stub::stub_path;

    #[test]
    fn test_missing_variable() {
        let file = open(&stub_path()).unwrap();
        assert!(matches!(
            extract_1d_array(&file, "does-not-exist"),
            Err(crate::EqError::Load(LoadError::MissingVariable(..)))
        ));
    }

    #[test]
    fn test_scalars() {
        let file = open(&stub_path()).unwrap();
        assert_eq!(extract_scalar(&file, netcdf_fields::BAXIS).unwrap(), 1.5);
        assert_eq!(extract_scalar(&file, netcdf_fields::RAXIS).unwrap(), 2.0);
    }

    #[test]
    fn test_mode_not_found() {
        let file = open(&stub_path()).unwrap();
        assert!(matches!(
            extract_harmonic_arrays(&file, 100, 100),
            Err(crate::EqError::Load(LoadError::ModeNotFound { .. }))
        ));
    }

    #[test]
    fn test_nan_replacement() {
        // The stub deliberately plants NaN/Inf inside the (m, n) = (-1, -2)
        // profiles; they must come out as zeros.
        let file = open(&stub_path()).unwrap();
        let (alphas, phases) = extract_harmonic_arrays(&file, -1, -2).unwrap();
        assert!(alphas.iter().all(|v| v.is_finite()));
        assert!(phases.iter().all(|v| v.is_finite()));
        assert_eq!(alphas[5], 0.0);
        assert_eq!(phases[7], 0.0);
    }
}
