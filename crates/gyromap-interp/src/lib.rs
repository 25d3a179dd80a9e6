#![doc = include_str!("../README.md")]

mod accel;
mod akima;
mod cubic;
mod error;
mod kinds;
mod spline;
mod spline2d;
mod steffen;

pub use accel::Accelerator;
pub use error::InterpError;
pub use kinds::{Interp2dKind, InterpKind};
pub use spline::{Spline, make_spline};
pub use spline2d::{Spline2d, make_spline2d};

pub type Result<T> = std::result::Result<T, InterpError>;
