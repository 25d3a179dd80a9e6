use std::str::FromStr;

use crate::InterpError;

/// The available 1D interpolation kinds.
///
/// Kind strings are parsed case-insensitively at the API boundary; the
/// variants are carried everywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpKind {
    /// Natural cubic spline (zero second derivative at both ends). C².
    Cubic,
    /// Akima's weighted-slope method with reflected boundary slopes. C¹.
    Akima,
    /// Steffen's monotonicity-preserving method. C¹.
    Steffen,
}

impl InterpKind {
    /// The kind's name, as it appears in configuration strings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Akima => "akima",
            Self::Steffen => "steffen",
        }
    }

    /// The minimum number of knots the kind needs.
    pub(crate) fn min_size(&self) -> usize {
        match self {
            Self::Cubic | Self::Steffen => 4,
            Self::Akima => 5,
        }
    }
}

impl FromStr for InterpKind {
    type Err = InterpError;

    fn from_str(typ: &str) -> Result<Self, Self::Err> {
        if typ.eq_ignore_ascii_case("cubic") {
            Ok(Self::Cubic)
        } else if typ.eq_ignore_ascii_case("akima") {
            Ok(Self::Akima)
        } else if typ.eq_ignore_ascii_case("steffen") {
            Ok(Self::Steffen)
        } else {
            Err(InterpError::UnknownInterpType(typ.into()))
        }
    }
}

// ===============================================================================================

/// The available 2D interpolation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interp2dKind {
    /// Tensor-product bicubic with finite-difference node derivatives,
    /// periodic along the second axis with period 2π.
    Bicubic,
}

impl Interp2dKind {
    /// The kind's name, as it appears in configuration strings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bicubic => "bicubic",
        }
    }

    /// The minimum number of knots per axis the kind needs.
    pub(crate) fn min_size(&self) -> usize {
        match self {
            Self::Bicubic => 4,
        }
    }
}

impl FromStr for Interp2dKind {
    type Err = InterpError;

    fn from_str(typ: &str) -> Result<Self, Self::Err> {
        if typ.eq_ignore_ascii_case("bicubic") {
            Ok(Self::Bicubic)
        } else {
            Err(InterpError::UnknownInterpType(typ.into()))
        }
    }
}
