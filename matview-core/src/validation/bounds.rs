//! Index, range and buffer validation
//!
//! Pure checks shared by every adapter. They run before any access so a
//! rejected call has no side effects.

use crate::{MatrixError, Result};

/// Check that `index` lies in `[0, extent)`
#[inline]
pub fn check_index(what: &'static str, index: usize, extent: usize) -> Result<()> {
    if index >= extent {
        return Err(MatrixError::index(what, index, extent));
    }
    Ok(())
}

/// Check that `[start, end)` is a well-formed slice of `[0, extent)`
///
/// An empty slice (`start == end`) is accepted anywhere up to `extent`.
#[inline]
pub fn check_slice(what: &'static str, start: usize, end: usize, extent: usize) -> Result<()> {
    if start > end || end > extent {
        return Err(MatrixError::range(what, start, end, extent));
    }
    Ok(())
}

/// Borrow the first `needed` slots of an output buffer
pub fn check_buffer<T>(out: &mut [T], needed: usize) -> Result<&mut [T]> {
    let len = out.len();
    out.get_mut(..needed)
        .ok_or(MatrixError::range("output buffer", 0, needed, len))
}

/// Borrow the first `needed` values of an input buffer
pub fn check_values<T>(values: &[T], needed: usize) -> Result<&[T]> {
    values
        .get(..needed)
        .ok_or(MatrixError::range("value buffer", 0, needed, values.len()))
}

/// Check that a dataset extent, in disk axis order, matches a logical shape
///
/// Chunked datasets store a logical `nrow x ncol` matrix as `[ncol, nrow]`.
pub fn check_disk_extent(extent: [u64; 2], nrow: usize, ncol: usize) -> Result<()> {
    if extent != [ncol as u64, nrow as u64] {
        return Err(MatrixError::MalformedInput(alloc::format!(
            "dataset extent {:?} does not match a {nrow} x {ncol} matrix",
            extent
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index() {
        assert_eq!(check_index("row", 2, 3), Ok(()));
        assert_eq!(
            check_index("row", 3, 3),
            Err(MatrixError::OutOfRange {
                what: "row",
                start: 3,
                end: 4,
                extent: 3
            })
        );
        assert!(check_index("column", 0, 0).is_err());
    }

    #[test]
    fn test_check_slice() {
        assert_eq!(check_slice("row", 0, 5, 5), Ok(()));
        assert_eq!(check_slice("row", 5, 5, 5), Ok(()));
        assert!(check_slice("row", 3, 2, 5).is_err());
        assert!(check_slice("row", 0, 6, 5).is_err());
    }

    #[test]
    fn test_check_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(check_buffer(&mut buf, 3).unwrap().len(), 3);
        assert!(check_buffer(&mut buf, 5).is_err());
        assert_eq!(check_values(&buf, 4).unwrap().len(), 4);
        assert!(check_values(&buf[..1], 2).is_err());
    }

    #[test]
    fn test_disk_extent() {
        assert_eq!(check_disk_extent([5, 3], 3, 5), Ok(()));
        assert!(check_disk_extent([3, 5], 3, 5).is_err());
    }
}
