//! Shared numerical utilities.

pub mod orthogonalize;
pub use orthogonalize::orthonormalize;
