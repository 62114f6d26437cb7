//! Abstract interfaces for matrix access
//!
//! Traits are pure interfaces here; concrete adapters live in `matview`.

pub mod element;
pub mod matrix;

pub use element::MatrixElement;
pub use matrix::{InputMatrix, OutputMatrix};
