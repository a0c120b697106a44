//! Spectral norm through Faer's singular value decomposition.

use crate::error::KError;
use faer::MatRef;

/// ‖A‖₂, the largest singular value. Zero for an empty matrix.
pub fn norm2(a: MatRef<'_, f64>) -> Result<f64, KError> {
    if a.nrows() == 0 || a.ncols() == 0 {
        return Ok(0.0);
    }
    let s = a
        .singular_values()
        .map_err(|e| KError::FactorError(format!("singular value decomposition failed: {e:?}")))?;
    // nonincreasing order
    Ok(s.first().copied().unwrap_or(0.0))
}
