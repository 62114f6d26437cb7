//! Chunked-disk output
//!
//! Creates a new dataset at a target supplied by the [`DatasetNamer`], sized
//! `[ncol, nrow]` in disk axis order with the element's empty value as fill.
//! Finalizing produces a [`ChunkedDescriptor`] that carries enough metadata to
//! interpret the dataset without reopening it.

use std::path::PathBuf;

use log::{info, warn};
use matview_core::{
    DatasetHeader, ElementKind, InputMatrix, MatrixElement, MatrixError, OutputMatrix, Result,
    StorageType,
};
use serde::{Deserialize, Serialize};

use crate::chunked::{CellCodec, ChunkedMatrix, ChunkedStore, Dataset, Hyperslab};
use crate::config::OutputConfig;
use crate::naming::{CreationRecord, DatasetNamer, DumpTarget};

/// Persisted form of a chunked output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkedDescriptor<T> {
    /// Store directory
    pub path: PathBuf,
    /// Dataset name inside the store
    pub dataset: String,
    pub nrow: usize,
    pub ncol: usize,
    /// Element kind the dataset was written as
    pub kind: ElementKind,
    /// Physical cell type
    pub storage: StorageType,
    /// Value of cells never written
    pub fill_value: T,
    /// Value of cell `(0, 0)`, `None` when the matrix has no cells
    pub first_value: Option<T>,
}

impl<T: MatrixElement> ChunkedDescriptor<T> {
    /// Reopen the described dataset for reading
    pub fn open(&self) -> Result<ChunkedMatrix<T>> {
        ChunkedMatrix::open(&self.path, &self.dataset, self.nrow, self.ncol)
    }
}

/// Builder for [`ChunkedDescriptor`]; `build` fails on any unset field
#[derive(Debug, Clone)]
pub struct DescriptorBuilder<T> {
    path: Option<PathBuf>,
    dataset: Option<String>,
    dims: Option<(usize, usize)>,
    storage: Option<StorageType>,
    fill_value: Option<T>,
    first_value: Option<Option<T>>,
}

impl<T: MatrixElement> DescriptorBuilder<T> {
    pub fn new() -> Self {
        Self {
            path: None,
            dataset: None,
            dims: None,
            storage: None,
            fill_value: None,
            first_value: None,
        }
    }

    pub fn with_target(mut self, target: &DumpTarget) -> Self {
        self.path = Some(target.path.clone());
        self.dataset = Some(target.dataset.clone());
        self
    }

    pub fn with_dims(mut self, nrow: usize, ncol: usize) -> Self {
        self.dims = Some((nrow, ncol));
        self
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_fill_value(mut self, fill_value: T) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    pub fn with_first_value(mut self, first_value: Option<T>) -> Self {
        self.first_value = Some(first_value);
        self
    }

    pub fn build(self) -> Result<ChunkedDescriptor<T>> {
        let (nrow, ncol) = self.dims.ok_or(MatrixError::MissingMetadata("dims"))?;
        Ok(ChunkedDescriptor {
            path: self.path.ok_or(MatrixError::MissingMetadata("path"))?,
            dataset: self.dataset.ok_or(MatrixError::MissingMetadata("dataset"))?,
            nrow,
            ncol,
            kind: T::KIND,
            storage: self.storage.ok_or(MatrixError::MissingMetadata("storage"))?,
            fill_value: self
                .fill_value
                .ok_or(MatrixError::MissingMetadata("fill_value"))?,
            first_value: self
                .first_value
                .ok_or(MatrixError::MissingMetadata("first_value"))?,
        })
    }
}

impl<T: MatrixElement> Default for DescriptorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Output adapter writing straight into a new dataset
#[derive(Debug)]
pub struct ChunkedOutput<T> {
    dataset: Dataset,
    target: DumpTarget,
    nrow: usize,
    ncol: usize,
    codec: CellCodec<T>,
}

impl<T: MatrixElement> ChunkedOutput<T> {
    /// Create the dataset for an `nrow x ncol` output
    pub fn create(
        nrow: usize,
        ncol: usize,
        config: &OutputConfig,
        namer: &mut dyn DatasetNamer,
    ) -> Result<Self> {
        let storage = T::storage_type(config.string_width);
        let width = storage.element_width().ok_or_else(|| {
            MatrixError::UnsupportedFormat(format!("{storage} cells cannot be written"))
        })?;
        let mut fill = vec![0u8; width];
        T::empty().encode(&mut fill)?;

        let [chunk_rows, chunk_cols] = config.chunk_dims_for(nrow, ncol, width);
        let mut header = DatasetHeader::new(
            [ncol as u64, nrow as u64],
            [chunk_cols as u64, chunk_rows as u64],
            storage,
            fill,
        );
        if T::KIND == ElementKind::Logical {
            header = header.with_logical_tag(true);
        }

        let target = namer.next_target()?;
        let dataset = ChunkedStore::new(&target.path).create_dataset(&target.dataset, header)?;
        namer
            .on_created(&CreationRecord {
                path: target.path.clone(),
                dataset: target.dataset.clone(),
                nrow,
                ncol,
                kind: T::KIND,
            })
            .inspect_err(|e| {
                warn!(
                    "dataset {} left in {} after namer rejected it: {e}",
                    target.dataset,
                    target.path.display()
                )
            })?;

        Ok(Self {
            dataset,
            target,
            nrow,
            ncol,
            codec: CellCodec::new(width),
        })
    }

    /// Where the dataset was created
    pub fn target(&self) -> &DumpTarget {
        &self.target
    }

    fn first_value(&mut self) -> Result<Option<T>> {
        if self.nrow == 0 || self.ncol == 0 {
            return Ok(None);
        }
        self.codec
            .read_one(&self.dataset, &Hyperslab::cell(0, 0))
            .map(Some)
    }
}

impl<T: MatrixElement> InputMatrix<T> for ChunkedOutput<T> {
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

impl<T: MatrixElement> OutputMatrix<T> for ChunkedOutput<T> {
    type Finalized = ChunkedDescriptor<T>;

    fn store(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.codec.write(
            &mut self.dataset,
            &Hyperslab::cell(row, col),
            std::slice::from_ref(&value),
        )
    }

    fn store_row(&mut self, row: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        self.codec
            .write(&mut self.dataset, &Hyperslab::row(row, start, end), values)
    }

    fn store_col(&mut self, col: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        self.codec
            .write(&mut self.dataset, &Hyperslab::col(col, start, end), values)
    }

    fn finalize(mut self) -> Result<ChunkedDescriptor<T>> {
        let mut builder = DescriptorBuilder::new()
            .with_target(&self.target)
            .with_dims(self.nrow, self.ncol)
            .with_storage(self.dataset.header().storage)
            .with_fill_value(T::empty());
        match self.first_value() {
            Ok(first) => builder = builder.with_first_value(first),
            Err(e) => warn!(
                "cannot read first value of {}: {e}",
                self.dataset.dir().display()
            ),
        }
        let descriptor = builder.build()?;
        info!(
            "finalized {} dataset {} ({} x {})",
            descriptor.kind,
            self.dataset.dir().display(),
            descriptor.nrow,
            descriptor.ncol
        );
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::SequentialNamer;

    fn small_config() -> OutputConfig {
        OutputConfig::default().with_chunk_dims(2, 2)
    }

    #[test]
    fn test_write_finalize_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = SequentialNamer::new(dir.path(), "dump");
        let mut out = ChunkedOutput::<f64>::create(3, 4, &small_config(), &mut namer).unwrap();

        out.fill_row(0, &[1.0, 2.0, 3.0, 4.0], 0, 4).unwrap();
        out.fill_col(3, &[8.0, 9.0], 1, 3).unwrap();
        out.fill(2, 0, -1.5).unwrap();
        assert_eq!(out.get(2, 3).unwrap(), 9.0);
        assert_eq!(out.row_values(1).unwrap(), vec![0.0, 0.0, 0.0, 8.0]);

        let descriptor = out.finalize().unwrap();
        assert_eq!(descriptor.dataset, "dump1");
        assert_eq!(descriptor.first_value, Some(1.0));
        assert_eq!(descriptor.fill_value, 0.0);
        assert_eq!(descriptor.storage, StorageType::Float64);
        assert_eq!(namer.created().len(), 1);

        let mut input = descriptor.open().unwrap();
        assert_eq!(input.col_values(0).unwrap(), vec![1.0, 0.0, -1.5]);
        assert_eq!(input.row_values(0).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_logical_output_is_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = SequentialNamer::new(dir.path(), "flags");
        let mut out = ChunkedOutput::<bool>::create(2, 2, &small_config(), &mut namer).unwrap();
        out.fill(1, 1, true).unwrap();
        let descriptor = out.finalize().unwrap();
        assert_eq!(descriptor.kind, ElementKind::Logical);
        assert_eq!(descriptor.storage, StorageType::Int32);

        let input = descriptor.open().unwrap();
        assert!(input.is_logical());
        let mut as_int = ChunkedMatrix::<i32>::open(dir.path(), "flags1", 2, 2).unwrap();
        assert_eq!(as_int.get(1, 1).unwrap(), 1);
    }

    struct RejectingNamer(PathBuf);

    impl DatasetNamer for RejectingNamer {
        fn next_target(&mut self) -> Result<DumpTarget> {
            Ok(DumpTarget {
                path: self.0.clone(),
                dataset: "kept".into(),
            })
        }

        fn on_created(&mut self, _record: &CreationRecord) -> Result<()> {
            Err(MatrixError::Storage("creation log is read-only".into()))
        }
    }

    #[test]
    fn test_rejected_creation_leaves_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = RejectingNamer(dir.path().to_path_buf());
        assert!(matches!(
            ChunkedOutput::<f64>::create(2, 2, &small_config(), &mut namer),
            Err(MatrixError::Storage(_))
        ));
        assert!(ChunkedStore::new(dir.path()).contains("kept"));
    }

    #[test]
    fn test_empty_matrix_has_no_first_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = SequentialNamer::new(dir.path(), "e");
        let out = ChunkedOutput::<i32>::create(0, 5, &small_config(), &mut namer).unwrap();
        let descriptor = out.finalize().unwrap();
        assert_eq!(descriptor.first_value, None);
        assert_eq!((descriptor.nrow, descriptor.ncol), (0, 5));
    }

    #[test]
    fn test_strings_use_fixed_width() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = SequentialNamer::new(dir.path(), "s");
        let config = small_config().with_string_width(4);
        let mut out = ChunkedOutput::<String>::create(1, 2, &config, &mut namer).unwrap();
        out.fill(0, 1, "abcd".to_string()).unwrap();
        assert!(matches!(
            out.fill(0, 0, "abcde".to_string()),
            Err(MatrixError::MalformedInput(_))
        ));
        let descriptor = out.finalize().unwrap();
        assert_eq!(descriptor.first_value.as_deref(), Some(""));
        assert_eq!(descriptor.storage, StorageType::FixedString { width: 4 });
        let mut input = descriptor.open().unwrap();
        assert_eq!(input.row_values(0).unwrap(), vec!["", "abcd"]);
    }

    #[test]
    fn test_descriptor_builder_reports_missing_field() {
        let result = DescriptorBuilder::<f64>::new()
            .with_dims(1, 1)
            .with_storage(StorageType::Float64)
            .with_fill_value(0.0)
            .with_first_value(None)
            .build();
        assert_eq!(result, Err(MatrixError::MissingMetadata("path")));
    }
}
