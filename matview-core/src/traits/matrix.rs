//! Read and write contracts shared by every adapter
//!
//! Implementors provide the unchecked `fetch_*` / `store_*` hooks; the
//! provided `get_*` / `fill_*` methods run every bound check before the hooks
//! touch the backing store, so a rejected call never performs a partial read
//! or write.

use alloc::vec;
use alloc::vec::Vec;

use super::element::MatrixElement;
use crate::validation::bounds::{check_buffer, check_index, check_slice, check_values};
use crate::Result;

/// Uniform read access to a two-dimensional matrix
///
/// Methods take `&mut self` because adapters may keep private access caches.
/// Caches never change a returned value.
pub trait InputMatrix<T: MatrixElement> {
    /// Number of rows
    fn nrow(&self) -> usize;

    /// Number of columns
    fn ncol(&self) -> usize;

    /// Matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize) {
        (self.nrow(), self.ncol())
    }

    /// Read one cell. `row` and `col` are already validated.
    fn fetch(&mut self, row: usize, col: usize) -> Result<T>;

    /// Read columns `[start, end)` of `row` into `out`.
    ///
    /// Arguments are validated, `start < end` and `out.len() == end - start`.
    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()>;

    /// Read rows `[start, end)` of `col` into `out`.
    ///
    /// Arguments are validated, `start < end` and `out.len() == end - start`.
    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()>;

    /// Get the element at the specified position
    fn get(&mut self, row: usize, col: usize) -> Result<T> {
        check_index("row", row, self.nrow())?;
        check_index("column", col, self.ncol())?;
        self.fetch(row, col)
    }

    /// Copy columns `[start, end)` of a row into the front of `out`
    fn get_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        check_index("row", row, self.nrow())?;
        check_slice("column", start, end, self.ncol())?;
        if start == end {
            return Ok(());
        }
        let out = check_buffer(out, end - start)?;
        self.fetch_row(row, out, start, end)
    }

    /// Copy rows `[start, end)` of a column into the front of `out`
    fn get_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        check_index("column", col, self.ncol())?;
        check_slice("row", start, end, self.nrow())?;
        if start == end {
            return Ok(());
        }
        let out = check_buffer(out, end - start)?;
        self.fetch_col(col, out, start, end)
    }

    /// Copy a full row into `out`
    fn get_row_full(&mut self, row: usize, out: &mut [T]) -> Result<()> {
        let ncol = self.ncol();
        self.get_row(row, out, 0, ncol)
    }

    /// Copy a full column into `out`
    fn get_col_full(&mut self, col: usize, out: &mut [T]) -> Result<()> {
        let nrow = self.nrow();
        self.get_col(col, out, 0, nrow)
    }

    /// Get all elements in a row
    fn row_values(&mut self, row: usize) -> Result<Vec<T>> {
        let mut out = vec![T::empty(); self.ncol()];
        self.get_row_full(row, &mut out)?;
        Ok(out)
    }

    /// Get all elements in a column
    fn col_values(&mut self, col: usize) -> Result<Vec<T>> {
        let mut out = vec![T::empty(); self.nrow()];
        self.get_col_full(col, &mut out)?;
        Ok(out)
    }
}

/// Write access with read-after-write consistency
///
/// Every write is visible to subsequent reads through the same adapter.
pub trait OutputMatrix<T: MatrixElement>: InputMatrix<T> {
    /// What [`OutputMatrix::finalize`] hands back
    type Finalized;

    /// Write one cell. `row` and `col` are already validated.
    fn store(&mut self, row: usize, col: usize, value: T) -> Result<()>;

    /// Write `values` into columns `[start, end)` of `row`. Arguments are validated.
    fn store_row(&mut self, row: usize, values: &[T], start: usize, end: usize) -> Result<()>;

    /// Write `values` into rows `[start, end)` of `col`. Arguments are validated.
    fn store_col(&mut self, col: usize, values: &[T], start: usize, end: usize) -> Result<()>;

    /// Consume the adapter and produce its persisted form
    fn finalize(self) -> Result<Self::Finalized>
    where
        Self: Sized;

    /// Set the element at the specified position
    fn fill(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index("row", row, self.nrow())?;
        check_index("column", col, self.ncol())?;
        self.store(row, col, value)
    }

    /// Write the front of `values` into columns `[start, end)` of a row
    fn fill_row(&mut self, row: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        check_index("row", row, self.nrow())?;
        check_slice("column", start, end, self.ncol())?;
        if start == end {
            return Ok(());
        }
        let values = check_values(values, end - start)?;
        self.store_row(row, values, start, end)
    }

    /// Write the front of `values` into rows `[start, end)` of a column
    fn fill_col(&mut self, col: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        check_index("column", col, self.ncol())?;
        check_slice("row", start, end, self.nrow())?;
        if start == end {
            return Ok(());
        }
        let values = check_values(values, end - start)?;
        self.store_col(col, values, start, end)
    }

    /// Write a full row
    fn fill_row_full(&mut self, row: usize, values: &[T]) -> Result<()> {
        let ncol = self.ncol();
        self.fill_row(row, values, 0, ncol)
    }

    /// Write a full column
    fn fill_col_full(&mut self, col: usize, values: &[T]) -> Result<()> {
        let nrow = self.nrow();
        self.fill_col(col, values, 0, nrow)
    }
}
