//! Chunked dataset header definition
//!
//! A dataset is a two-dimensional array stored as a grid of equally sized
//! chunks. Its header records the extent in disk axis order, which for a
//! logical `nrow x ncol` matrix is `[ncol, nrow]`: disk axis 0 is indexed by
//! the logical column and disk axis 1 by the logical row. Within a chunk,
//! cells are laid out with disk axis 1 contiguous.

use alloc::format;
use alloc::vec::Vec;

use super::constants::{header, MAX_STRING_WIDTH};
use super::kinds::StorageType;
use crate::{MatrixError, Result};

/// Persisted description of a chunked dataset
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetHeader {
    /// Magic bytes: "MVDS"
    pub magic: [u8; 4],
    /// Header version
    pub version: u8,
    /// Extent in disk axis order
    pub shape: Vec<u64>,
    /// Chunk extent in disk axis order
    pub chunks: Vec<u64>,
    /// Physical cell type
    pub storage: StorageType,
    /// Encoded value of cells never written
    pub fill_value: Vec<u8>,
    /// Type tag marking integer storage as boolean
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub logical: Option<bool>,
}

impl DatasetHeader {
    /// Create a header for a two-dimensional dataset
    pub fn new(shape: [u64; 2], chunks: [u64; 2], storage: StorageType, fill_value: Vec<u8>) -> Self {
        Self {
            magic: header::MAGIC,
            version: header::VERSION,
            shape: shape.to_vec(),
            chunks: chunks.to_vec(),
            storage,
            fill_value,
            logical: None,
        }
    }

    /// Set the boolean type tag
    pub fn with_logical_tag(mut self, logical: bool) -> Self {
        self.logical = Some(logical);
        self
    }

    /// Check magic and version
    pub fn is_valid(&self) -> bool {
        self.magic == header::MAGIC && self.version <= header::VERSION
    }

    /// Validate the structural invariants of the header
    pub fn validate(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(MatrixError::UnsupportedFormat(format!(
                "unrecognised dataset header (version {})",
                self.version
            )));
        }
        if self.shape.len() != 2 {
            return Err(MatrixError::MalformedInput(format!(
                "dataset is not a two-dimensional array ({} dimensions)",
                self.shape.len()
            )));
        }
        if self.chunks.len() != 2 || self.chunks.iter().any(|&c| c == 0) {
            return Err(MatrixError::MalformedInput(
                "chunk extent must be two positive values".into(),
            ));
        }
        if let StorageType::FixedString { width } = self.storage {
            if width == 0 || width > MAX_STRING_WIDTH {
                return Err(MatrixError::MalformedInput(format!(
                    "fixed string width {width} outside [1, {MAX_STRING_WIDTH}]"
                )));
            }
        }
        let [d0, d1] = self.extent().unwrap_or([0, 0]);
        let [c0, c1] = self.chunk_dims();
        if c0 > d0.max(1) || c1 > d1.max(1) {
            return Err(MatrixError::MalformedInput(format!(
                "chunk extent [{c0}, {c1}] exceeds dataset extent [{d0}, {d1}]"
            )));
        }
        if let Some(width) = self.storage.element_width() {
            if self.fill_value.len() != width {
                return Err(MatrixError::MalformedInput(format!(
                    "fill value has {} bytes, expected {width}",
                    self.fill_value.len()
                )));
            }
            if self.chunk_bytes(width).is_none() {
                return Err(MatrixError::MalformedInput(format!(
                    "chunk extent [{c0}, {c1}] of {width}-byte cells is not addressable"
                )));
            }
        }
        Ok(())
    }

    /// Extent in disk axis order, if the dataset is two-dimensional
    pub fn extent(&self) -> Option<[u64; 2]> {
        match self.shape.as_slice() {
            [d0, d1] => Some([*d0, *d1]),
            _ => None,
        }
    }

    /// Chunk extent in disk axis order
    pub fn chunk_dims(&self) -> [u64; 2] {
        match self.chunks.as_slice() {
            [c0, c1] => [*c0, *c1],
            _ => [1, 1],
        }
    }

    /// Number of chunks along each disk axis
    pub fn chunk_grid(&self) -> [u64; 2] {
        let [c0, c1] = self.chunk_dims();
        let [d0, d1] = self.extent().unwrap_or([0, 0]);
        [d0.div_ceil(c0), d1.div_ceil(c1)]
    }

    /// Number of cells in one chunk, saturating for headers that fail validation
    pub fn chunk_cells(&self) -> usize {
        let [c0, c1] = self.chunk_dims();
        usize::try_from(c0.saturating_mul(c1)).unwrap_or(usize::MAX)
    }

    /// Bytes in one chunk of `width`-byte cells, `None` on overflow
    pub fn chunk_bytes(&self, width: usize) -> Option<usize> {
        let [c0, c1] = self.chunk_dims();
        let cells = usize::try_from(c0.checked_mul(c1)?).ok()?;
        cells.checked_mul(width)
    }

    /// Bytes per cell, `None` for variable-length strings
    pub fn element_width(&self) -> Option<usize> {
        self.storage.element_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn float_header() -> DatasetHeader {
        DatasetHeader::new([4, 10], [2, 4], StorageType::Float64, vec![0; 8])
    }

    #[test]
    fn test_valid_header() {
        let header = float_header();
        assert!(header.is_valid());
        assert_eq!(header.validate(), Ok(()));
        assert_eq!(header.extent(), Some([4, 10]));
        assert_eq!(header.chunk_grid(), [2, 3]);
        assert_eq!(header.chunk_cells(), 8);
    }

    #[test]
    fn test_rejects_non_2d() {
        let mut header = float_header();
        header.shape = vec![4, 10, 2];
        assert!(matches!(header.validate(), Err(MatrixError::MalformedInput(_))));
        assert_eq!(header.extent(), None);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut header = float_header();
        header.magic = *b"NOPE";
        assert!(matches!(header.validate(), Err(MatrixError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rejects_fill_width_mismatch() {
        let header = DatasetHeader::new([2, 2], [2, 2], StorageType::Int32, vec![0; 8]);
        assert!(matches!(header.validate(), Err(MatrixError::MalformedInput(_))));
    }

    #[test]
    fn test_oversized_chunks_rejected() {
        let header = DatasetHeader::new([2, 2], [1 << 32, 1 << 32], StorageType::Float64, vec![0; 8]);
        assert!(matches!(header.validate(), Err(MatrixError::MalformedInput(_))));
        assert_eq!(header.chunk_bytes(8), None);
        assert_eq!(header.chunk_cells(), usize::MAX);

        let header = DatasetHeader::new([2, 2], [3, 2], StorageType::Int32, vec![0; 4]);
        assert!(matches!(header.validate(), Err(MatrixError::MalformedInput(_))));

        // An empty axis still allows unit chunks.
        let header = DatasetHeader::new([0, 3], [1, 3], StorageType::Int32, vec![0; 4]);
        assert_eq!(header.validate(), Ok(()));
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let header = DatasetHeader::new([2, 2], [0, 2], StorageType::Int32, vec![0; 4]);
        assert!(header.validate().is_err());
    }
}
