pub mod traits;
pub mod wrappers;

pub use traits::{adjoint_apply, InnerProduct, LinearOperator};
pub use wrappers::{IdentityOperator, WeightedInnerProduct};
