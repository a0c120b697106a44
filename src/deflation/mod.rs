//! Deflation of Krylov subspace methods.
//!
//! Modules:
//! - [`projector`]: the oblique projector onto a deflation space and the
//!   initial-guess correction.
//! - [`arnoldifyer`]: Arnoldi relations for the combined Krylov and
//!   deflation bases under a chosen reduction subspace.

pub mod arnoldifyer;
pub mod projector;

pub use arnoldifyer::{Arnoldifyer, FullReducedRelation, KrylovDeflationData, ReducedRelation};
pub use projector::DeflationProjector;
