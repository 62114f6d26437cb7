//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be read
//! from or written to a matrix, and how each type is encoded in a chunked
//! dataset.

use alloc::format;
use alloc::string::String;

use crate::format::{ElementKind, StorageType};
use crate::{MatrixError, Result};

/// Trait for types that can be stored as matrix elements
///
/// Numeric encodings are little-endian and byte-exact, so a value written to
/// a dataset and read back compares equal bit for bit.
pub trait MatrixElement: Clone + PartialEq + core::fmt::Debug + 'static {
    /// Logical kind of this element type
    const KIND: ElementKind;

    /// Value reported for cells that sparse storage does not hold
    fn empty() -> Self;

    /// Default physical storage for a new dataset of this type
    ///
    /// `string_width` is only consulted by text elements.
    fn storage_type(string_width: u32) -> StorageType;

    /// Encode into exactly `out.len()` bytes
    fn encode(&self, out: &mut [u8]) -> Result<()>;

    /// Decode from one cell's worth of bytes
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// Whether this value equals [`MatrixElement::empty`]
    fn is_empty_value(&self) -> bool {
        *self == Self::empty()
    }
}

fn width_error(expected: usize, got: usize) -> MatrixError {
    MatrixError::Storage(format!("cell has {got} bytes, expected {expected}"))
}

fn read_pod<T: bytemuck::Pod>(bytes: &[u8]) -> Result<T> {
    let width = core::mem::size_of::<T>();
    if bytes.len() != width {
        return Err(width_error(width, bytes.len()));
    }
    // Chunk bytes carry no alignment guarantee.
    Ok(bytemuck::pod_read_unaligned(bytes))
}

fn write_pod<T: bytemuck::Pod>(value: T, out: &mut [u8]) -> Result<()> {
    let width = core::mem::size_of::<T>();
    if out.len() != width {
        return Err(width_error(width, out.len()));
    }
    out.copy_from_slice(bytemuck::bytes_of(&value));
    Ok(())
}

impl MatrixElement for f64 {
    const KIND: ElementKind = ElementKind::Numeric;

    fn empty() -> Self {
        0.0
    }

    fn storage_type(_string_width: u32) -> StorageType {
        StorageType::Float64
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        write_pod(self.to_bits().to_le(), out)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(f64::from_bits(u64::from_le(read_pod(bytes)?)))
    }

    // Bit comparison keeps -0.0 and NaN payloads stored explicitly.
    fn is_empty_value(&self) -> bool {
        self.to_bits() == 0
    }
}

impl MatrixElement for i32 {
    const KIND: ElementKind = ElementKind::Integer;

    fn empty() -> Self {
        0
    }

    fn storage_type(_string_width: u32) -> StorageType {
        StorageType::Int32
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        write_pod(self.to_le(), out)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i32::from_le(read_pod(bytes)?))
    }
}

impl MatrixElement for bool {
    const KIND: ElementKind = ElementKind::Logical;

    fn empty() -> Self {
        false
    }

    fn storage_type(_string_width: u32) -> StorageType {
        StorageType::Int32
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        write_pod(i32::from(*self).to_le(), out)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i32::from_le(read_pod::<i32>(bytes)?) != 0)
    }
}

impl MatrixElement for String {
    const KIND: ElementKind = ElementKind::Character;

    fn empty() -> Self {
        String::new()
    }

    fn storage_type(string_width: u32) -> StorageType {
        StorageType::FixedString {
            width: string_width,
        }
    }

    fn encode(&self, out: &mut [u8]) -> Result<()> {
        let bytes = self.as_bytes();
        if bytes.len() > out.len() {
            return Err(MatrixError::MalformedInput(format!(
                "string of {} bytes does not fit fixed width {}",
                bytes.len(),
                out.len()
            )));
        }
        if bytes.contains(&0) {
            return Err(MatrixError::MalformedInput(
                "fixed-width strings cannot contain NUL bytes".into(),
            ));
        }
        out[..bytes.len()].copy_from_slice(bytes);
        out[bytes.len()..].fill(0);
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        core::str::from_utf8(&bytes[..len])
            .map(String::from)
            .map_err(|_| MatrixError::Storage("fixed-width string is not valid UTF-8".into()))
    }
}
