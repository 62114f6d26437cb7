//! Element kinds and on-disk storage types
//!
//! An [`ElementKind`] is what the caller asks for; a [`StorageType`] is what a
//! chunked dataset physically holds. [`StorageClass`] is the coarse family
//! used to check the two against each other.

/// Logical element kinds supported by the access layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum ElementKind {
    /// Double-precision floating point
    Numeric = 0,
    /// 32-bit signed integer
    Integer = 1,
    /// Boolean
    Logical = 2,
    /// Text
    Character = 3,
}

impl ElementKind {
    /// Convert from u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ElementKind::Numeric),
            1 => Some(ElementKind::Integer),
            2 => Some(ElementKind::Logical),
            3 => Some(ElementKind::Character),
            _ => None,
        }
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Storage class a dataset must have to be read as this kind.
    ///
    /// Logical values are persisted as integers.
    pub const fn storage_class(self) -> StorageClass {
        match self {
            ElementKind::Numeric => StorageClass::Float,
            ElementKind::Integer | ElementKind::Logical => StorageClass::Integer,
            ElementKind::Character => StorageClass::String,
        }
    }
}

impl core::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ElementKind::Numeric => write!(f, "numeric"),
            ElementKind::Integer => write!(f, "integer"),
            ElementKind::Logical => write!(f, "logical"),
            ElementKind::Character => write!(f, "character"),
        }
    }
}

/// Coarse storage family of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Float,
    Integer,
    String,
}

impl core::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageClass::Float => write!(f, "float"),
            StorageClass::Integer => write!(f, "integer"),
            StorageClass::String => write!(f, "string"),
        }
    }
}

/// Physical cell type of a chunked dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum StorageType {
    /// Little-endian IEEE 754 double
    Float64,
    /// Little-endian two's complement 32-bit integer
    Int32,
    /// NUL-padded byte strings of a fixed width
    FixedString { width: u32 },
    /// Variable-length strings; recognised so they can be rejected
    VariableString,
}

impl StorageType {
    /// Storage family of this type
    pub const fn class(self) -> StorageClass {
        match self {
            StorageType::Float64 => StorageClass::Float,
            StorageType::Int32 => StorageClass::Integer,
            StorageType::FixedString { .. } | StorageType::VariableString => StorageClass::String,
        }
    }

    /// Bytes per cell, `None` for variable-length strings
    pub const fn element_width(self) -> Option<usize> {
        match self {
            StorageType::Float64 => Some(8),
            StorageType::Int32 => Some(4),
            StorageType::FixedString { width } => Some(width as usize),
            StorageType::VariableString => None,
        }
    }
}

impl core::fmt::Display for StorageType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageType::Float64 => write!(f, "float64"),
            StorageType::Int32 => write!(f, "int32"),
            StorageType::FixedString { width } => write!(f, "string[{width}]"),
            StorageType::VariableString => write!(f, "vlen-string"),
        }
    }
}
