//! Validation utilities
//!
//! Pure functions with no I/O: bound checks for the access contracts and
//! structural checks for raw backing arrays.

pub mod bounds;
pub mod structure;

pub use bounds::{check_buffer, check_disk_extent, check_index, check_slice, check_values};
pub use structure::{
    cell_count, packed_len, validate_coordinate, validate_csc, validate_dense, validate_dims,
    validate_packed, validate_rle,
};
