//! Symmetric matrix with one packed triangle
//!
//! Only the upper or lower triangle is stored, packed column by column. A
//! query in the other triangle is mirrored before the offset is computed, so
//! rows and columns span both triangles and have no slice shortcut.

use matview_core::validation::validate_packed;
use matview_core::{InputMatrix, MatrixElement, Result};

/// Which triangle holds the stored values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triangle {
    /// Cells with `row <= col`
    Upper,
    /// Cells with `row >= col`
    Lower,
}

/// Borrowed packed symmetric matrix of order `n`
#[derive(Debug, Clone)]
pub struct PackedSymmetricMatrix<'a, T> {
    n: usize,
    triangle: Triangle,
    values: &'a [T],
}

impl<'a, T: MatrixElement> PackedSymmetricMatrix<'a, T> {
    /// Wrap `n * (n + 1) / 2` packed values
    pub fn new(n: usize, triangle: Triangle, values: &'a [T]) -> Result<Self> {
        validate_packed(n, values.len())?;
        Ok(Self {
            n,
            triangle,
            values,
        })
    }

    /// Which triangle is stored
    pub fn triangle(&self) -> Triangle {
        self.triangle
    }

    /// Packed offset of `(row, col)` after mirroring into the stored triangle
    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        match self.triangle {
            Triangle::Upper => {
                let (r, c) = if row <= col { (row, col) } else { (col, row) };
                r + c * (c + 1) / 2
            }
            Triangle::Lower => {
                let (r, c) = if row >= col { (row, col) } else { (col, row) };
                // Columns before c hold n, n-1, ... values.
                c * (2 * self.n - c + 1) / 2 + (r - c)
            }
        }
    }
}

impl<T: MatrixElement> InputMatrix<T> for PackedSymmetricMatrix<'_, T> {
    fn nrow(&self) -> usize {
        self.n
    }

    fn ncol(&self) -> usize {
        self.n
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        Ok(self.values[self.offset(row, col)].clone())
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        for (slot, col) in out.iter_mut().zip(start..end) {
            *slot = self.values[self.offset(row, col)].clone();
        }
        Ok(())
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        for (slot, row) in out.iter_mut().zip(start..end) {
            *slot = self.values[self.offset(row, col)].clone();
        }
        Ok(())
    }
}
