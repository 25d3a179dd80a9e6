#![doc = include_str!("../README.md")]

mod error;
mod initials;
mod poincare;
mod progress;
mod stats;

pub use error::PoincareError;
pub use initials::PoincareInit;
pub use poincare::Poincare;
pub use stats::PoincareStats;

pub type Result<T> = std::result::Result<T, PoincareError>;
