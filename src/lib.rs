//! kryst-deflation: deflated Krylov subspace relations over Faer
//!
//! This crate provides the small-dimensional machinery behind deflated
//! Krylov solvers: an oblique deflation projector with initial-guess
//! correction, and the reconstruction of Arnoldi relations for a Krylov
//! basis augmented with a deflation basis.

pub mod config;
pub mod context;
pub mod core;
pub mod deflation;
pub mod error;
pub mod linalg;
pub mod matrix;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use context::*;
pub use self::core::*;
pub use deflation::*;
pub use error::*;
pub use matrix::*;
