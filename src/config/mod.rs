pub mod options;
pub use options::{ArnoldifyerOptions, ProjectorOptions, DEFAULT_ORTHO_TOLERANCE, DEFAULT_RANK_TOLERANCE};
