use std::path::PathBuf;

use gyromap_interp::InterpError;

/// Errors while reading the equilibrium dataset.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The dataset file does not exist.
    #[error("no dataset file at {0:?}")]
    FileNotFound(PathBuf),

    /// Error from the underlying netCDF library.
    #[error("{reason}")]
    NetCdf {
        source: netcdf::Error,
        reason: String,
    },

    /// A required variable is missing from the dataset.
    #[error("dataset variable {0:?} not found")]
    MissingVariable(String),

    /// A variable does not have the expected shape.
    #[error("variable {name:?} has shape {got:?}, expected {expected:?}")]
    WrongShape {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A required variable contains NaN or infinite entries.
    #[error("variable {0:?} contains non-finite values")]
    NonFinite(String),

    /// The requested perturbation mode is not tabulated in the dataset.
    #[error("mode (m, n) = ({m}, {n}) not found in the dataset")]
    ModeNotFound { m: i64, n: i64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Custom error types for equilibrium objects.
#[derive(thiserror::Error, Debug)]
pub enum EqError {
    /// Errors while reading the dataset.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Errors from the interpolation layer.
    #[error(transparent)]
    Interp(#[from] InterpError),

    /// Invalid construction arguments, such as an unknown interpolation
    /// kind string.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::io::Error> for EqError {
    fn from(err: std::io::Error) -> Self {
        Self::Load(LoadError::Io(err))
    }
}
