//! Rectangular selections in disk axis order
//!
//! A logical `nrow x ncol` matrix is stored with extent `[ncol, nrow]`. Every
//! constructor here takes logical coordinates and applies that transposition,
//! so no other code needs to know about it.

use matview_core::{MatrixError, Result};

/// Offset and count of a selection, both in disk axis order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hyperslab {
    pub offset: [u64; 2],
    pub count: [u64; 2],
}

impl Hyperslab {
    /// Columns `[start, end)` of logical row `row`
    pub fn row(row: usize, start: usize, end: usize) -> Self {
        Self {
            offset: [start as u64, row as u64],
            count: [(end - start) as u64, 1],
        }
    }

    /// Rows `[start, end)` of logical column `col`
    pub fn col(col: usize, start: usize, end: usize) -> Self {
        Self {
            offset: [col as u64, start as u64],
            count: [1, (end - start) as u64],
        }
    }

    /// The single logical cell `(row, col)`
    pub fn cell(row: usize, col: usize) -> Self {
        Self {
            offset: [col as u64, row as u64],
            count: [1, 1],
        }
    }

    /// Number of selected cells
    pub fn cells(&self) -> usize {
        (self.count[0] * self.count[1]) as usize
    }

    /// Exclusive end along each disk axis
    pub fn end(&self) -> [u64; 2] {
        [
            self.offset[0] + self.count[0],
            self.offset[1] + self.count[1],
        ]
    }

    /// Check that the selection lies inside a dataset extent
    pub fn check_within(&self, extent: [u64; 2]) -> Result<()> {
        let end = self.end();
        for axis in 0..2 {
            if end[axis] > extent[axis] {
                return Err(MatrixError::range(
                    "disk axis",
                    self.offset[axis] as usize,
                    end[axis] as usize,
                    extent[axis] as usize,
                ));
            }
        }
        Ok(())
    }

    /// Position of disk cell `(i0, i1)` in a buffer holding this selection
    ///
    /// Buffers are ordered with disk axis 1 contiguous.
    #[inline]
    pub fn buffer_index(&self, i0: u64, i1: u64) -> usize {
        ((i0 - self.offset[0]) * self.count[1] + (i1 - self.offset[1])) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_selections_are_transposed() {
        let row = Hyperslab::row(4, 1, 3);
        assert_eq!(row.offset, [1, 4]);
        assert_eq!(row.count, [2, 1]);
        // Consecutive columns of a row are consecutive in the buffer.
        assert_eq!(row.buffer_index(2, 4), 1);

        let col = Hyperslab::col(2, 5, 9);
        assert_eq!(col.offset, [2, 5]);
        assert_eq!(col.count, [1, 4]);
        assert_eq!(col.buffer_index(2, 8), 3);

        let cell = Hyperslab::cell(7, 3);
        assert_eq!(cell.offset, [3, 7]);
        assert_eq!(cell.cells(), 1);
    }

    #[test]
    fn test_extent_check() {
        // 10 x 4 logical matrix
        let extent = [4, 10];
        assert!(Hyperslab::row(9, 0, 4).check_within(extent).is_ok());
        assert!(Hyperslab::row(10, 0, 4).check_within(extent).is_err());
        assert!(Hyperslab::col(3, 0, 11).check_within(extent).is_err());
    }
}
