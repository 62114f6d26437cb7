#![no_std]

//! matview core - format definitions and access contracts
//!
//! This crate holds everything about the matrix access layer that does not
//! touch a file system: element kinds and format tags, the chunked dataset
//! header, the read and write contracts, and the validation shared by every
//! adapter. Concrete adapters live in the `matview` crate.

extern crate alloc;

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
