//! Format definitions shared by every adapter
//!
//! This module contains pure data definitions: element kinds, format tags and
//! the chunked dataset header. No I/O happens here.

pub mod constants;
pub mod dataset;
pub mod kinds;
pub mod tags;

pub use dataset::DatasetHeader;
pub use kinds::{ElementKind, StorageClass, StorageType};
pub use tags::{InputFormat, OutputKind};
