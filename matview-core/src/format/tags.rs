//! Closed enumerations of backing formats and output representations

use alloc::format;

use super::kinds::ElementKind;
use crate::MatrixError;

/// Backing format of an input matrix, resolved by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum InputFormat {
    /// Plain column-major array
    Simple = 0,
    /// Dense matrix object with a dimension slot
    DenseObject = 1,
    /// Compressed sparse column
    SparseCsc = 2,
    /// Unordered (row, col, value) triplets
    SparseCoordinate = 3,
    /// One packed triangle of a symmetric matrix
    SymmetricPacked = 4,
    /// Run-length encoded column-major values
    #[cfg_attr(feature = "serde", serde(rename = "run-length-encoded"))]
    RunLength = 5,
    /// Chunked dataset on disk
    ChunkedDisk = 6,
}

impl InputFormat {
    /// Convert from u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(InputFormat::Simple),
            1 => Some(InputFormat::DenseObject),
            2 => Some(InputFormat::SparseCsc),
            3 => Some(InputFormat::SparseCoordinate),
            4 => Some(InputFormat::SymmetricPacked),
            5 => Some(InputFormat::RunLength),
            6 => Some(InputFormat::ChunkedDisk),
            _ => None,
        }
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether this format can be read as the given element kind
    pub const fn supports(self, kind: ElementKind) -> bool {
        match self {
            InputFormat::Simple
            | InputFormat::DenseObject
            | InputFormat::RunLength
            | InputFormat::ChunkedDisk => true,
            InputFormat::SparseCsc | InputFormat::SymmetricPacked => {
                !matches!(kind, ElementKind::Character)
            }
            // Logical triplets must be converted to CSC by the caller.
            InputFormat::SparseCoordinate => {
                matches!(kind, ElementKind::Numeric | ElementKind::Integer)
            }
        }
    }

    /// Whether the format stores only non-empty cells
    pub const fn is_sparse(self) -> bool {
        matches!(self, InputFormat::SparseCsc | InputFormat::SparseCoordinate)
    }
}

impl core::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            InputFormat::Simple => "simple",
            InputFormat::DenseObject => "dense-object",
            InputFormat::SparseCsc => "sparse-csc",
            InputFormat::SparseCoordinate => "sparse-coordinate",
            InputFormat::SymmetricPacked => "symmetric-packed",
            InputFormat::RunLength => "run-length-encoded",
            InputFormat::ChunkedDisk => "chunked-disk",
        };
        write!(f, "{name}")
    }
}

impl core::str::FromStr for InputFormat {
    type Err = MatrixError;

    fn from_str(tag: &str) -> Result<Self, MatrixError> {
        match tag {
            "simple" => Ok(InputFormat::Simple),
            "dense-object" => Ok(InputFormat::DenseObject),
            "sparse-csc" => Ok(InputFormat::SparseCsc),
            "sparse-coordinate" => Ok(InputFormat::SparseCoordinate),
            "symmetric-packed" => Ok(InputFormat::SymmetricPacked),
            "run-length-encoded" => Ok(InputFormat::RunLength),
            "chunked-disk" => Ok(InputFormat::ChunkedDisk),
            other => Err(MatrixError::UnsupportedFormat(format!(
                "unrecognised format tag {other:?}"
            ))),
        }
    }
}

/// Representation chosen for an output matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputKind {
    /// Dense in-memory column-major buffer
    Simple,
    /// In-memory accumulator yielding CSC arrays
    Sparse,
    /// New chunked dataset on disk
    Chunked,
}

impl OutputKind {
    /// Whether this output can hold the given element kind
    pub const fn supports(self, kind: ElementKind) -> bool {
        match self {
            OutputKind::Simple | OutputKind::Chunked => true,
            OutputKind::Sparse => !matches!(kind, ElementKind::Character),
        }
    }

    /// Input format that reads back what this output produces
    pub const fn reader_format(self) -> InputFormat {
        match self {
            OutputKind::Simple => InputFormat::Simple,
            OutputKind::Sparse => InputFormat::SparseCsc,
            OutputKind::Chunked => InputFormat::ChunkedDisk,
        }
    }
}

impl core::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OutputKind::Simple => write!(f, "simple"),
            OutputKind::Sparse => write!(f, "sparse"),
            OutputKind::Chunked => write!(f, "chunked"),
        }
    }
}
