//! Chunked disk-backed matrices
//!
//! [`store`] implements the on-disk dataset format, [`hyperslab`] the
//! transposed selections over it, and [`input`] the read adapter. The write
//! adapter lives in [`crate::output::chunked`]; both share [`CellCodec`] to
//! move typed cells through a dataset.

pub mod hyperslab;
pub mod input;
pub mod store;

pub use hyperslab::Hyperslab;
pub use input::ChunkedMatrix;
pub use store::{ChunkedStore, Dataset};

use std::marker::PhantomData;

use matview_core::{MatrixElement, MatrixError, Result};

/// Typed cell transfer through a dataset with a reusable byte buffer
///
/// The scratch buffer only avoids reallocation; nothing read is kept between
/// calls.
#[derive(Debug)]
pub(crate) struct CellCodec<T> {
    width: usize,
    scratch: Vec<u8>,
    _element: PhantomData<T>,
}

impl<T: MatrixElement> CellCodec<T> {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            width,
            scratch: Vec::new(),
            _element: PhantomData,
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Read a selection into `out`
    pub(crate) fn read(&mut self, dataset: &Dataset, slab: &Hyperslab, out: &mut [T]) -> Result<()> {
        self.scratch.clear();
        self.scratch.resize(slab.cells() * self.width, 0);
        dataset.read_hyperslab(slab, &mut self.scratch)?;
        for (slot, bytes) in out.iter_mut().zip(self.scratch.chunks_exact(self.width)) {
            *slot = T::decode(bytes)?;
        }
        Ok(())
    }

    /// Read one cell
    pub(crate) fn read_one(&mut self, dataset: &Dataset, slab: &Hyperslab) -> Result<T> {
        self.scratch.clear();
        self.scratch.resize(self.width, 0);
        dataset.read_hyperslab(slab, &mut self.scratch)?;
        T::decode(&self.scratch)
    }

    /// Write `values` to a selection
    ///
    /// Every value is encoded before the dataset is touched, so an encoding
    /// failure leaves the dataset unchanged.
    pub(crate) fn write(&mut self, dataset: &mut Dataset, slab: &Hyperslab, values: &[T]) -> Result<()> {
        if values.len() != slab.cells() {
            return Err(MatrixError::range("value buffer", 0, slab.cells(), values.len()));
        }
        self.scratch.clear();
        self.scratch.resize(values.len() * self.width, 0);
        for (value, bytes) in values.iter().zip(self.scratch.chunks_exact_mut(self.width)) {
            value.encode(bytes)?;
        }
        dataset.write_hyperslab(slab, &self.scratch)
    }
}
