//! Dense in-memory output

use matview_core::validation::cell_count;
use matview_core::{InputMatrix, MatrixElement, OutputMatrix, Result};

use super::DenseParts;

/// Column-major buffer initialised to the element's empty value
#[derive(Debug, Clone)]
pub struct SimpleOutput<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
}

impl<T: MatrixElement> SimpleOutput<T> {
    pub fn new(nrow: usize, ncol: usize) -> Result<Self> {
        let cells = cell_count(nrow, ncol)?;
        Ok(Self {
            nrow,
            ncol,
            data: vec![T::empty(); cells],
        })
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        col * self.nrow + row
    }
}

impl<T: MatrixElement> InputMatrix<T> for SimpleOutput<T> {
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

impl<T: MatrixElement> OutputMatrix<T> for SimpleOutput<T> {
    type Finalized = DenseParts<T>;

    fn store(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let offset = self.offset(row, col);
        self.data[offset] = value;
        Ok(())
    }

    fn store_row(&mut self, row: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        for (value, col) in values.iter().zip(start..end) {
            let offset = self.offset(row, col);
            self.data[offset] = value.clone();
        }
        Ok(())
    }

    fn store_col(&mut self, col: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        let base = col * self.nrow;
        self.data[base + start..base + end].clone_from_slice(values);
        Ok(())
    }

    fn finalize(self) -> Result<DenseParts<T>> {
        Ok(DenseParts {
            nrow: self.nrow,
            ncol: self.ncol,
            data: self.data,
        })
    }
}
