//! Dense factorizations for the deflation machinery: thin wrappers over
//! Faer's QR, LU and SVD, plus the sign-normalized Householder reflector,
//! Hessenberg reduction and triangular solves.

pub mod hessenberg;
pub mod householder;
pub mod lu;
pub mod norm;
pub mod qr;
pub mod triangular;

pub use hessenberg::hessenberg;
pub use householder::HouseholderReflector;
pub use lu::solve_nonsingular;
pub use norm::norm2;
pub use qr::PivotedFactorization;
pub use triangular::{solve_lower, solve_upper};
