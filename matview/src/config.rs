//! Output configuration
//!
//! Controls how the output dispatcher picks a representation and how new
//! chunked datasets are laid out.

use log::warn;
use matview_core::format::constants::{DEFAULT_CHUNK_BYTES, MAX_STRING_WIDTH};
use serde::{Deserialize, Serialize};

/// Cells above which an inferred simple output becomes chunked-disk
pub const DEFAULT_DENSE_CELL_LIMIT: usize = 1 << 26;

/// Density at or below which an inferred output may become sparse
pub const DEFAULT_SPARSITY_THRESHOLD: f64 = 0.1;

/// Byte width of fixed-width string datasets
pub const DEFAULT_STRING_WIDTH: u32 = 256;

/// Configuration for output representation and chunk layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Logical chunk shape `[rows, cols]`; derived from the matrix when unset
    pub chunk_dims: Option<[usize; 2]>,
    /// Largest inferred output kept as a dense in-memory buffer
    pub dense_cell_limit: usize,
    /// Density threshold for inferring a sparse output
    pub sparsity_threshold: f64,
    /// Byte width of each cell in a string dataset
    pub string_width: u32,
}

impl OutputConfig {
    /// Set an explicit logical chunk shape
    pub fn with_chunk_dims(mut self, rows: usize, cols: usize) -> Self {
        self.chunk_dims = Some([rows, cols]);
        self
    }

    /// Set the dense cell limit
    pub fn with_dense_cell_limit(mut self, cells: usize) -> Self {
        self.dense_cell_limit = cells;
        self
    }

    /// Set the sparsity threshold, clamped to `[0, 1]`
    pub fn with_sparsity_threshold(mut self, threshold: f64) -> Self {
        let clamped = if threshold.is_nan() {
            DEFAULT_SPARSITY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        if clamped != threshold {
            warn!("sparsity threshold {threshold} clamped to {clamped}");
        }
        self.sparsity_threshold = clamped;
        self
    }

    /// Set the string cell width, clamped to `[1, MAX_STRING_WIDTH]`
    pub fn with_string_width(mut self, width: u32) -> Self {
        let clamped = width.clamp(1, MAX_STRING_WIDTH);
        if clamped != width {
            warn!("string width {width} clamped to {clamped}");
        }
        self.string_width = clamped;
        self
    }

    /// Chunk shape for a chunk of whole columns of roughly
    /// `DEFAULT_CHUNK_BYTES`
    ///
    /// Returns logical `[rows, cols]`, each at least 1.
    pub fn optimal_chunk_dims(nrow: usize, ncol: usize, elem_size: usize) -> [usize; 2] {
        let target = (DEFAULT_CHUNK_BYTES / elem_size.max(1)).max(1);
        let rows = nrow.clamp(1, target);
        let cols = (target / rows).clamp(1, ncol.max(1));
        [rows, cols]
    }

    /// Logical chunk shape for a new `nrow x ncol` dataset
    ///
    /// Explicit dimensions are clamped to the matrix extent.
    pub fn chunk_dims_for(&self, nrow: usize, ncol: usize, elem_size: usize) -> [usize; 2] {
        match self.chunk_dims {
            Some([rows, cols]) => {
                let clamped = [rows.clamp(1, nrow.max(1)), cols.clamp(1, ncol.max(1))];
                if clamped != [rows, cols] {
                    warn!(
                        "chunk dims {:?} clamped to {:?} for a {nrow} x {ncol} matrix",
                        [rows, cols],
                        clamped
                    );
                }
                clamped
            }
            None => Self::optimal_chunk_dims(nrow, ncol, elem_size),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chunk_dims: None,
            dense_cell_limit: DEFAULT_DENSE_CELL_LIMIT,
            sparsity_threshold: DEFAULT_SPARSITY_THRESHOLD,
            string_width: DEFAULT_STRING_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_clamping() {
        let config = OutputConfig::default()
            .with_chunk_dims(10, 2)
            .with_dense_cell_limit(100)
            .with_sparsity_threshold(1.5)
            .with_string_width(0);
        assert_eq!(config.chunk_dims, Some([10, 2]));
        assert_eq!(config.dense_cell_limit, 100);
        assert_eq!(config.sparsity_threshold, 1.0);
        assert_eq!(config.string_width, 1);
    }

    #[test]
    fn test_chunk_dims() {
        let config = OutputConfig::default().with_chunk_dims(100, 100);
        assert_eq!(config.chunk_dims_for(10, 3, 8), [10, 3]);
        assert_eq!(config.chunk_dims_for(0, 0, 8), [1, 1]);

        let [rows, cols] = OutputConfig::optimal_chunk_dims(1000, 1000, 8);
        assert_eq!(rows, 1000);
        assert_eq!(cols, DEFAULT_CHUNK_BYTES / 8 / 1000);

        let [rows, cols] = OutputConfig::optimal_chunk_dims(10_000_000, 5, 8);
        assert_eq!(rows, DEFAULT_CHUNK_BYTES / 8);
        assert_eq!(cols, 1);
    }

    #[test]
    fn test_json_with_defaults() {
        let config: OutputConfig = serde_json::from_str(r#"{"string_width": 16}"#).unwrap();
        assert_eq!(config.string_width, 16);
        assert_eq!(config.dense_cell_limit, DEFAULT_DENSE_CELL_LIMIT);
        assert_eq!(config.chunk_dims, None);
    }
}
