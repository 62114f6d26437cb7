//! Positional accumulator producing CSC arrays
//!
//! Entries are kept per column, sorted by row. Writing the empty value
//! removes an entry, so the finalized arrays hold exactly the non-empty
//! cells.

use matview_core::{
    InputMatrix, MatrixElement, MatrixError, OutputKind, OutputMatrix, Result,
};

use super::CscParts;

/// Sparse output adapter
#[derive(Debug, Clone)]
pub struct SparseOutput<T> {
    nrow: usize,
    columns: Vec<Vec<(usize, T)>>,
}

impl<T: MatrixElement> SparseOutput<T> {
    pub fn new(nrow: usize, ncol: usize) -> Result<Self> {
        if !OutputKind::Sparse.supports(T::KIND) {
            return Err(MatrixError::UnsupportedFormat(format!(
                "sparse output cannot hold {} values",
                T::KIND
            )));
        }
        Ok(Self {
            nrow,
            columns: vec![Vec::new(); ncol],
        })
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        let entries = &mut self.columns[col];
        match entries.binary_search_by_key(&row, |(r, _)| *r) {
            Ok(i) if value.is_empty_value() => {
                entries.remove(i);
            }
            Ok(i) => entries[i].1 = value,
            Err(_) if value.is_empty_value() => {}
            Err(i) => entries.insert(i, (row, value)),
        }
    }

    fn lookup(&self, row: usize, col: usize) -> T {
        let entries = &self.columns[col];
        match entries.binary_search_by_key(&row, |(r, _)| *r) {
            Ok(i) => entries[i].1.clone(),
            Err(_) => T::empty(),
        }
    }
}

impl<T: MatrixElement> InputMatrix<T> for SparseOutput<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.columns.len()
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        Ok(self.lookup(row, col))
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        for (slot, col) in out.iter_mut().zip(start..end) {
            *slot = self.lookup(row, col);
        }
        Ok(())
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        out.fill(T::empty());
        let entries = &self.columns[col];
        let first = entries.partition_point(|(r, _)| *r < start);
        for (row, value) in entries[first..].iter().take_while(|(r, _)| *r < end) {
            out[row - start] = value.clone();
        }
        Ok(())
    }
}

impl<T: MatrixElement> OutputMatrix<T> for SparseOutput<T> {
    type Finalized = CscParts<T>;

    fn store(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.set(row, col, value);
        Ok(())
    }

    fn store_row(&mut self, row: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        for (value, col) in values.iter().zip(start..end) {
            self.set(row, col, value.clone());
        }
        Ok(())
    }

    fn store_col(&mut self, col: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        for (value, row) in values.iter().zip(start..end) {
            self.set(row, col, value.clone());
        }
        Ok(())
    }

    fn finalize(self) -> Result<CscParts<T>> {
        let ncol = self.columns.len();
        let nnz = self.nnz();
        let mut offsets = Vec::with_capacity(ncol + 1);
        let mut rows = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        offsets.push(0);
        for entries in self.columns {
            for (row, value) in entries {
                rows.push(row);
                values.push(value);
            }
            offsets.push(rows.len());
        }
        Ok(CscParts {
            nrow: self.nrow,
            ncol,
            offsets,
            rows,
            values,
        })
    }
}
