//! Block matrix assembly.
//!
//! [`BlockMatrixBuilder`] lays out a grid of row and column block sizes,
//! preallocates the dense result, and copies each sub-block into place after
//! checking its shape. Blocks that are never set stay zero; zero-sized blocks
//! are legal and contribute nothing.

use crate::error::KError;
use faer::{Mat, MatRef};

/// Shape-checked builder for `[[A₀₀, A₀₁, …], [A₁₀, …], …]`.
#[derive(Debug)]
pub struct BlockMatrixBuilder {
    row_offsets: Vec<usize>,
    col_offsets: Vec<usize>,
    out: Mat<f64>,
}

impl BlockMatrixBuilder {
    /// Grid with the given block heights and widths.
    pub fn new(row_sizes: &[usize], col_sizes: &[usize]) -> Self {
        let row_offsets = offsets(row_sizes);
        let col_offsets = offsets(col_sizes);
        let out = Mat::zeros(
            row_offsets.last().copied().unwrap_or(0),
            col_offsets.last().copied().unwrap_or(0),
        );
        Self { row_offsets, col_offsets, out }
    }

    fn extent(&self, bi: usize, bj: usize) -> Result<(usize, usize, usize, usize), KError> {
        if bi + 1 >= self.row_offsets.len() || bj + 1 >= self.col_offsets.len() {
            return Err(KError::shape(
                "BlockMatrixBuilder: block index",
                (self.row_offsets.len().saturating_sub(1), self.col_offsets.len().saturating_sub(1)),
                (bi + 1, bj + 1),
            ));
        }
        let r0 = self.row_offsets[bi];
        let c0 = self.col_offsets[bj];
        Ok((r0, c0, self.row_offsets[bi + 1] - r0, self.col_offsets[bj + 1] - c0))
    }

    /// Copy `block` into grid position `(bi, bj)`.
    pub fn set(&mut self, bi: usize, bj: usize, block: MatRef<'_, f64>) -> Result<&mut Self, KError> {
        let (r0, c0, nr, nc) = self.extent(bi, bj)?;
        if (block.nrows(), block.ncols()) != (nr, nc) {
            return Err(KError::shape("BlockMatrixBuilder: block shape", (nr, nc), (block.nrows(), block.ncols())));
        }
        for j in 0..nc {
            for i in 0..nr {
                self.out[(r0 + i, c0 + j)] = block[(i, j)];
            }
        }
        Ok(self)
    }

    /// Put a (possibly rectangular) identity at grid position `(bi, bj)`.
    pub fn set_identity(&mut self, bi: usize, bj: usize) -> Result<&mut Self, KError> {
        let (r0, c0, nr, nc) = self.extent(bi, bj)?;
        for k in 0..nr.min(nc) {
            self.out[(r0 + k, c0 + k)] = 1.0;
        }
        Ok(self)
    }

    /// Put a scalar at the top-left entry of grid position `(bi, bj)`.
    pub fn set_scalar(&mut self, bi: usize, bj: usize, value: f64) -> Result<&mut Self, KError> {
        let (r0, c0, nr, nc) = self.extent(bi, bj)?;
        if (nr, nc) != (1, 1) {
            return Err(KError::shape("BlockMatrixBuilder: scalar block", (1, 1), (nr, nc)));
        }
        self.out[(r0, c0)] = value;
        Ok(self)
    }

    pub fn build(self) -> Mat<f64> {
        self.out
    }
}

fn offsets(sizes: &[usize]) -> Vec<usize> {
    let mut acc = Vec::with_capacity(sizes.len() + 1);
    let mut total = 0;
    acc.push(total);
    for s in sizes {
        total += s;
        acc.push(total);
    }
    acc
}

/// Horizontal concatenation `[A, B, …]` of blocks with equal heights.
pub fn hstack(blocks: &[MatRef<'_, f64>]) -> Result<Mat<f64>, KError> {
    let rows = blocks.first().map(|b| b.nrows()).unwrap_or(0);
    let widths: Vec<usize> = blocks.iter().map(|b| b.ncols()).collect();
    let mut builder = BlockMatrixBuilder::new(&[rows], &widths);
    for (j, b) in blocks.iter().enumerate() {
        builder.set(0, j, *b)?;
    }
    Ok(builder.build())
}

/// Vertical concatenation `[A; B; …]` of blocks with equal widths.
pub fn vstack(blocks: &[MatRef<'_, f64>]) -> Result<Mat<f64>, KError> {
    let cols = blocks.first().map(|b| b.ncols()).unwrap_or(0);
    let heights: Vec<usize> = blocks.iter().map(|b| b.nrows()).collect();
    let mut builder = BlockMatrixBuilder::new(&heights, &[cols]);
    for (i, b) in blocks.iter().enumerate() {
        builder.set(i, 0, *b)?;
    }
    Ok(builder.build())
}
