//! Compressed-sparse-column adapters
//!
//! Both sparse formats resolve cells through the same column index: an
//! `offsets` array of length `ncol + 1` and per-column strictly increasing row
//! indices. They differ only in how an index position maps to a value.

pub mod coordinate;
pub mod csc;

pub use coordinate::CoordinateMatrix;
pub use csc::CscMatrix;

use std::ops::Range;

use crate::cursor::{RowCursor, Seek};

/// Borrowed view of a column index
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnIndex<'a> {
    pub(crate) offsets: &'a [usize],
    pub(crate) rows: &'a [usize],
}

impl<'a> ColumnIndex<'a> {
    #[inline]
    pub(crate) fn column(&self, col: usize) -> &'a [usize] {
        &self.rows[self.offsets[col]..self.offsets[col + 1]]
    }

    /// Position of `(row, col)` in the row index array, if stored
    #[inline]
    pub(crate) fn find(&self, row: usize, col: usize) -> Option<usize> {
        self.column(col)
            .binary_search(&row)
            .ok()
            .map(|local| self.offsets[col] + local)
    }

    /// Positions of the stored entries of `col` with rows in `[start, end)`
    pub(crate) fn entries(&self, col: usize, start: usize, end: usize) -> Range<usize> {
        let keys = self.column(col);
        let lo = keys.partition_point(|&r| r < start);
        let hi = lo + keys[lo..].partition_point(|&r| r < end);
        self.offsets[col] + lo..self.offsets[col] + hi
    }

    /// Copy rows `[start, end)` of `col` into `out`, filling gaps with `empty`
    pub(crate) fn scatter_col<T: Clone>(
        &self,
        col: usize,
        out: &mut [T],
        start: usize,
        end: usize,
        empty: T,
        value: impl Fn(usize) -> T,
    ) {
        out.fill(empty);
        for k in self.entries(col, start, end) {
            out[self.rows[k] - start] = value(k);
        }
    }

    /// Gather columns `[start, end)` of `row` through a row cursor
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn gather_row<T: Clone>(
        &self,
        cursor: &mut RowCursor,
        row: usize,
        out: &mut [T],
        start: usize,
        end: usize,
        empty: T,
        value: impl Fn(usize) -> T,
    ) {
        let index = *self;
        let positions = cursor.advance(row, start, end, |c| index.column(c));
        for ((slot, &local), col) in out.iter_mut().zip(positions).zip(start..end) {
            let k = self.offsets[col] + local;
            *slot = if k < self.offsets[col + 1] && self.rows[k] == row {
                value(k)
            } else {
                empty.clone()
            };
        }
    }
}

pub(crate) fn row_cursor() -> RowCursor {
    RowCursor::new(Seek::AtOrAfter)
}
