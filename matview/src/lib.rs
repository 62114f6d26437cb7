//! matview - uniform access to heterogeneous matrix representations
//!
//! This library exposes cell, row and column access, whole or range-sliced,
//! over dense arrays, dense matrix objects, compressed sparse column and
//! coordinate matrices, packed symmetric matrices, run-length encoded
//! matrices and chunked disk-backed datasets. A mirrored write side picks an
//! output representation and finalizes it into a persisted form.
//!
//! ## Architecture
//!
//! - **matview-core**: element kinds, format tags, the read and write
//!   contracts and validation (no I/O)
//! - **matview**: concrete adapters, the chunked dataset store, dispatchers
//!   and configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use matview::{create_input, Backing, InputMatrix};
//!
//! fn example() -> matview::Result<()> {
//!     // 3 x 3 diagonal matrix in CSC form
//!     let offsets = [0, 1, 2, 3];
//!     let rows = [0, 1, 2];
//!     let values = [1.0, 2.0, 3.0];
//!     let mut matrix = create_input(Backing::SparseCsc {
//!         nrow: 3,
//!         ncol: 3,
//!         offsets: &offsets,
//!         rows: &rows,
//!         values: &values,
//!     })?;
//!
//!     assert_eq!(matrix.get(1, 1)?, 2.0);
//!     assert_eq!(matrix.row_values(0)?, vec![1.0, 0.0, 0.0]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): chunk files are memory-mapped for reading

// Re-export core abstractions and format definitions
pub use matview_core::{
    // Contracts
    InputMatrix, MatrixElement, OutputMatrix,
    // Format definitions
    DatasetHeader, ElementKind, InputFormat, OutputKind, StorageClass, StorageType,
    // Error handling
    ErrorCategory, MatrixError, Result,
};

pub mod chunked;
pub mod config;
mod cursor;
pub mod dense;
pub mod dispatch;
pub mod naming;
pub mod output;
pub mod packed;
pub mod rle;
pub mod sparse;

pub use chunked::{ChunkedMatrix, ChunkedStore, Dataset, Hyperslab};
pub use config::OutputConfig;
pub use dense::DenseMatrix;
pub use dispatch::{create_input, create_output, Backing, InputAdapter, OutputAdapter, OutputPolicy};
pub use naming::{CreationRecord, DatasetNamer, DumpTarget, SequentialNamer};
pub use output::{
    ChunkedDescriptor, ChunkedOutput, CscParts, DenseParts, DescriptorBuilder, Finalized,
    SimpleOutput, SparseOutput,
};
pub use packed::{PackedSymmetricMatrix, Triangle};
pub use rle::{CacheStats, RleMatrix};
pub use sparse::{CoordinateMatrix, CscMatrix};
