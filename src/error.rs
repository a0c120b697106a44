use thiserror::Error;

// Unified error type for kryst-deflation

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KError {
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },
    #[error("rank deficiency: column {column} is linearly dependent on the preceding columns")]
    RankDeficiency { column: usize },
    #[error("singular deflation block: <U, AU> is not invertible")]
    SingularDeflationBlock,
    #[error("singular reduction: Wt^H M Wt is not invertible for the chosen reduction subspace")]
    SingularReduction,
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("factorization error: {0}")]
    FactorError(String),
}

impl KError {
    /// Shape mismatch helper: `expected` and `found` are `(rows, cols)`.
    pub(crate) fn shape(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        KError::DimensionMismatch {
            context,
            expected: format!("{}x{}", expected.0, expected.1),
            found: format!("{}x{}", found.0, found.1),
        }
    }
}
