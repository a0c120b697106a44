//! Solver-side context consumed by the deflation projector.
//!
//! Modules:
//! - [`solver_state`]: the `SolverState` record (operator, preconditioners,
//!   right-hand side and initial guess).

pub mod solver_state;
pub use solver_state::SolverState;
