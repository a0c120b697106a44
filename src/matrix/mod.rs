//! Matrix module: dense helpers and block assembly.

pub mod block;
pub mod dense;
pub use block::{hstack, vstack, BlockMatrixBuilder};
