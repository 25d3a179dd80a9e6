/// Custom error types for spline construction and evaluation.
#[derive(thiserror::Error, Debug)]
pub enum InterpError {
    /// Not enough knots for the requested interpolation kind.
    #[error("at least {required} knots are required for {kind} interpolation, got {got}")]
    InsufficientKnots {
        kind: &'static str,
        required: usize,
        got: usize,
    },

    /// Knots must be finite and strictly increasing.
    #[error("knot values must be finite and strictly increasing")]
    NonMonotonicKnots,

    /// Interpolated values must be finite.
    #[error("value arrays must contain only finite values")]
    NonFiniteValues,

    /// Knot and value arrays must pair up.
    #[error("knot and value arrays must have the same length ({xlen} != {ylen})")]
    LengthMismatch { xlen: usize, ylen: usize },

    /// 2D value grid does not match the knot vectors.
    #[error("2D value grid of length {zlen} does not match {xlen}x{ylen} knots")]
    GridShapeMismatch {
        xlen: usize,
        ylen: usize,
        zlen: usize,
    },

    /// A periodic axis must fit inside a single period.
    #[error("periodic axis must span less than one period (2π)")]
    PeriodicSpanTooLarge,

    /// Finite queries are clamped to the knot range; only a non-finite
    /// query point is rejected.
    #[error("cannot evaluate the spline at the non-finite point {x}")]
    QueryOutOfRange { x: f64 },

    /// Unknown interpolation type string.
    #[error("unknown interpolation type {0:?}")]
    UnknownInterpType(String),
}
