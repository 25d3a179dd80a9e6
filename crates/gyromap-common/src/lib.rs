//! Small utilities shared across the workspace crates.

mod getters;
