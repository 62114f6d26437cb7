//! Read adapter over a chunked dataset
//!
//! Construction checks the dataset against the declared logical shape and
//! the requested element kind. Each access then selects a one-row,
//! one-column or one-cell hyperslab and reads it synchronously; nothing is
//! cached across calls.

use std::path::Path;

use log::debug;
use matview_core::validation::check_disk_extent;
use matview_core::{InputMatrix, MatrixElement, MatrixError, Result, StorageType};

use super::store::{ChunkedStore, Dataset};
use super::{CellCodec, Hyperslab};

/// Check that a dataset can be read as `T`
pub(crate) fn check_storage<T: MatrixElement>(storage: StorageType) -> Result<usize> {
    if storage == StorageType::VariableString {
        return Err(MatrixError::UnsupportedFormat(
            "variable-length string datasets are not supported".into(),
        ));
    }
    let expected = T::KIND.storage_class();
    if storage.class() != expected {
        return Err(MatrixError::TypeMismatch {
            expected,
            found: storage.class(),
        });
    }
    storage.element_width().ok_or_else(|| {
        MatrixError::UnsupportedFormat(format!("{storage} cells have no fixed width"))
    })
}

/// Matrix backed by a dataset in a [`ChunkedStore`]
#[derive(Debug)]
pub struct ChunkedMatrix<T> {
    dataset: Dataset,
    nrow: usize,
    ncol: usize,
    codec: CellCodec<T>,
}

impl<T: MatrixElement> ChunkedMatrix<T> {
    /// Open dataset `name` in the store at `path` as an `nrow x ncol` matrix
    pub fn open(path: impl AsRef<Path>, name: &str, nrow: usize, ncol: usize) -> Result<Self> {
        let dataset = ChunkedStore::new(path.as_ref()).open_dataset(name)?;
        Self::from_dataset(dataset, nrow, ncol)
    }

    /// Wrap an already open dataset
    pub fn from_dataset(dataset: Dataset, nrow: usize, ncol: usize) -> Result<Self> {
        check_disk_extent(dataset.extent(), nrow, ncol)?;
        let width = check_storage::<T>(dataset.header().storage)?;
        debug!(
            "chunked {} input over {} ({nrow} x {ncol})",
            T::KIND,
            dataset.dir().display()
        );
        Ok(Self {
            dataset,
            nrow,
            ncol,
            codec: CellCodec::new(width),
        })
    }

    /// Whether the dataset carries the boolean type tag
    pub fn is_logical(&self) -> bool {
        self.dataset.header().logical == Some(true)
    }

    /// Bytes per stored cell
    pub fn element_width(&self) -> usize {
        self.codec.width()
    }

    /// The underlying dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl<T: MatrixElement> InputMatrix<T> for ChunkedMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        self.codec.read_one(&self.dataset, &Hyperslab::cell(row, col))
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        self.codec
            .read(&self.dataset, &Hyperslab::row(row, start, end), out)
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        self.codec
            .read(&self.dataset, &Hyperslab::col(col, start, end), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matview_core::{DatasetHeader, StorageClass};

    fn float_dataset(dir: &Path, name: &str, nrow: usize, ncol: usize) -> Dataset {
        let header = DatasetHeader::new(
            [ncol as u64, nrow as u64],
            [2.min(ncol.max(1)) as u64, 2.min(nrow.max(1)) as u64],
            StorageType::Float64,
            0f64.to_le_bytes().to_vec(),
        );
        ChunkedStore::new(dir).create_dataset(name, header).unwrap()
    }

    #[test]
    fn test_reads_transposed_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut ds = float_dataset(dir.path(), "x", 3, 2);
        // Disk row 1 holds logical column 1.
        let column: Vec<u8> = [4.0f64, 5.0, 6.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        ds.write_hyperslab(&Hyperslab::col(1, 0, 3), &column).unwrap();

        let mut m = ChunkedMatrix::<f64>::from_dataset(ds, 3, 2).unwrap();
        assert_eq!(m.col_values(1).unwrap(), vec![4.0, 5.0, 6.0]);
        assert_eq!(m.row_values(2).unwrap(), vec![0.0, 6.0]);
        assert_eq!(m.get(0, 1).unwrap(), 4.0);
        assert_eq!(m.element_width(), 8);
    }

    #[test]
    fn test_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        float_dataset(dir.path(), "x", 3, 2);
        assert!(matches!(
            ChunkedMatrix::<f64>::open(dir.path(), "x", 2, 3),
            Err(MatrixError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_kind_checks() {
        let dir = tempfile::tempdir().unwrap();
        float_dataset(dir.path(), "x", 1, 1);
        assert_eq!(
            ChunkedMatrix::<i32>::open(dir.path(), "x", 1, 1).err(),
            Some(MatrixError::TypeMismatch {
                expected: StorageClass::Integer,
                found: StorageClass::Float,
            })
        );
        assert!(matches!(
            ChunkedMatrix::<String>::open(dir.path(), "x", 1, 1),
            Err(MatrixError::TypeMismatch { .. })
        ));
        assert!(matches!(
            check_storage::<String>(StorageType::VariableString),
            Err(MatrixError::UnsupportedFormat(_))
        ));
        assert_eq!(check_storage::<bool>(StorageType::Int32), Ok(4));
    }
}
