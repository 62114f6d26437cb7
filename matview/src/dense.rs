//! Dense column-major adapter
//!
//! Serves both the plain array format and dense matrix objects that carry a
//! separate dimension slot. Every access is direct offset arithmetic.

use matview_core::validation::{validate_dense, validate_dims};
use matview_core::{InputMatrix, MatrixElement, Result};

/// Borrowed column-major matrix
#[derive(Debug, Clone)]
pub struct DenseMatrix<'a, T> {
    data: &'a [T],
    nrow: usize,
    ncol: usize,
}

impl<'a, T: MatrixElement> DenseMatrix<'a, T> {
    /// Wrap a column-major buffer of `nrow * ncol` values
    pub fn new(data: &'a [T], nrow: usize, ncol: usize) -> Result<Self> {
        validate_dense(data.len(), nrow, ncol)?;
        Ok(Self { data, nrow, ncol })
    }

    /// Wrap a dense matrix object given its dimension slot
    pub fn from_dims(data: &'a [T], dims: &[usize]) -> Result<Self> {
        let (nrow, ncol) = validate_dims(dims)?;
        Self::new(data, nrow, ncol)
    }

    /// The backing buffer
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        col * self.nrow + row
    }
}

impl<T: MatrixElement> InputMatrix<T> for DenseMatrix<'_, T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        Ok(self.data[self.offset(row, col)].clone())
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        for (slot, col) in out.iter_mut().zip(start..end) {
            *slot = self.data[self.offset(row, col)].clone();
        }
        Ok(())
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let base = col * self.nrow;
        out.clone_from_slice(&self.data[base + start..base + end]);
        Ok(())
    }
}
