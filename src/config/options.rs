//! Tuning options for the deflation projector and the relation builder.
//!
//! Both structs carry public fields and a `Default`, so callers can override
//! a single knob with struct-update syntax:
//! `ArnoldifyerOptions { rank_tolerance: 1e-10, ..Default::default() }`.

/// Relative threshold on the diagonal of the pivoted QR of the unexplained
/// part of `AU`: `|r_ii| > DEFAULT_RANK_TOLERANCE · ‖M‖₂` counts towards the rank.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-14;

/// Relative column norm below which Gram–Schmidt reports a dependent column.
pub const DEFAULT_ORTHO_TOLERANCE: f64 = 1e-12;

/// Options for [`crate::deflation::DeflationProjector`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectorOptions {
    /// Dependency threshold for orthonormalizing `U0` and `AᴴU`.
    pub rank_tolerance: f64,

    /// Run a second Gram–Schmidt sweep per column.
    pub reorthogonalize: bool,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self { rank_tolerance: DEFAULT_ORTHO_TOLERANCE, reorthogonalize: true }
    }
}

/// Options for [`crate::deflation::Arnoldifyer`].
#[derive(Clone, Debug, PartialEq)]
pub struct ArnoldifyerOptions {
    /// Rank threshold relative to `‖M‖₂`.
    pub rank_tolerance: f64,
}

impl Default for ArnoldifyerOptions {
    fn default() -> Self {
        Self { rank_tolerance: DEFAULT_RANK_TOLERANCE }
    }
}
