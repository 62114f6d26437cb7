//! Output adapters
//!
//! Each adapter implements [`OutputMatrix`](matview_core::OutputMatrix) and is
//! consumed by `finalize`, so it can only be finalized once.

pub mod chunked;
pub mod simple;
pub mod sparse;

pub use chunked::{ChunkedDescriptor, ChunkedOutput, DescriptorBuilder};
pub use simple::SimpleOutput;
pub use sparse::SparseOutput;

use matview_core::{MatrixElement, OutputKind, Result};

use crate::dense::DenseMatrix;
use crate::sparse::CscMatrix;

/// Column-major values produced by a simple output
#[derive(Debug, Clone, PartialEq)]
pub struct DenseParts<T> {
    pub nrow: usize,
    pub ncol: usize,
    pub data: Vec<T>,
}

impl<T: MatrixElement> DenseParts<T> {
    /// Read the values back through a dense adapter
    pub fn reader(&self) -> Result<DenseMatrix<'_, T>> {
        DenseMatrix::new(&self.data, self.nrow, self.ncol)
    }
}

/// CSC arrays produced by a sparse output
#[derive(Debug, Clone, PartialEq)]
pub struct CscParts<T> {
    pub nrow: usize,
    pub ncol: usize,
    pub offsets: Vec<usize>,
    pub rows: Vec<usize>,
    pub values: Vec<T>,
}

impl<T: MatrixElement> CscParts<T> {
    /// Read the values back through a CSC adapter
    pub fn reader(&self) -> Result<CscMatrix<'_, T>> {
        CscMatrix::new(self.nrow, self.ncol, &self.offsets, &self.rows, &self.values)
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Result of finalizing any output adapter
#[derive(Debug, Clone, PartialEq)]
pub enum Finalized<T> {
    Simple(DenseParts<T>),
    Sparse(CscParts<T>),
    Chunked(ChunkedDescriptor<T>),
}

impl<T> Finalized<T> {
    /// Representation that produced this result
    pub fn kind(&self) -> OutputKind {
        match self {
            Finalized::Simple(_) => OutputKind::Simple,
            Finalized::Sparse(_) => OutputKind::Sparse,
            Finalized::Chunked(_) => OutputKind::Chunked,
        }
    }

    /// Matrix dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Finalized::Simple(p) => (p.nrow, p.ncol),
            Finalized::Sparse(p) => (p.nrow, p.ncol),
            Finalized::Chunked(d) => (d.nrow, d.ncol),
        }
    }
}
