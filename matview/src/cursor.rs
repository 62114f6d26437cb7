//! Sequential row-access cache for column-major index tables
//!
//! Column-major formats answer a row request by locating the row inside every
//! requested column. [`RowCursor`] remembers, per column, where the previous
//! row landed. When the next request is for the same row or an adjacent one,
//! each position moves by at most one step; any other request re-seeks every
//! column with a binary search.

use log::trace;

/// Which key a cursor position points at for a given row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Seek {
    /// First key `>= row`; used with sorted row indices
    AtOrAfter,
    /// First key `> row`; used with exclusive run ends
    After,
}

impl Seek {
    #[inline]
    fn reached(self, key: usize, row: usize) -> bool {
        match self {
            Seek::AtOrAfter => key >= row,
            Seek::After => key > row,
        }
    }

    #[inline]
    fn locate(self, keys: &[usize], row: usize) -> usize {
        keys.partition_point(|&key| !self.reached(key, row))
    }
}

/// Per-column positions for the most recent row request
#[derive(Debug, Clone)]
pub(crate) struct RowCursor {
    seek: Seek,
    row: Option<usize>,
    start: usize,
    end: usize,
    positions: Vec<usize>,
    reseeks: u64,
}

impl RowCursor {
    pub(crate) fn new(seek: Seek) -> Self {
        Self {
            seek,
            row: None,
            start: 0,
            end: 0,
            positions: Vec::new(),
            reseeks: 0,
        }
    }

    /// Position the cursor on `row` for columns `[start, end)`
    ///
    /// `column(c)` returns the sorted keys of column `c`. The returned slice
    /// holds one position per requested column, local to that column's keys.
    pub(crate) fn advance<'k, F>(&mut self, row: usize, start: usize, end: usize, column: F) -> &[usize]
    where
        F: Fn(usize) -> &'k [usize],
    {
        let same_span = self.start == start && self.end == end;
        match self.row {
            Some(prev) if same_span && prev == row => {}
            Some(prev) if same_span && prev + 1 == row => {
                for (pos, col) in self.positions.iter_mut().zip(start..end) {
                    let keys = column(col);
                    if *pos < keys.len() && !self.seek.reached(keys[*pos], row) {
                        *pos += 1;
                    }
                }
            }
            Some(prev) if same_span && row + 1 == prev => {
                for (pos, col) in self.positions.iter_mut().zip(start..end) {
                    let keys = column(col);
                    if *pos > 0 && self.seek.reached(keys[*pos - 1], row) {
                        *pos -= 1;
                    }
                }
            }
            _ => {
                if self.row.is_some() {
                    trace!("row cursor re-seek: row {row}, columns [{start}, {end})");
                }
                let seek = self.seek;
                self.positions.clear();
                self.positions
                    .extend((start..end).map(|col| seek.locate(column(col), row)));
                self.start = start;
                self.end = end;
                self.reseeks += 1;
            }
        }
        self.row = Some(row);
        &self.positions
    }

    /// Number of full binary-search re-seeks performed so far
    pub(crate) fn reseeks(&self) -> u64 {
        self.reseeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three columns of sorted row indices.
    const COLUMNS: [&[usize]; 3] = [&[0, 2, 4], &[1, 2], &[]];

    fn reference(seek: Seek, row: usize) -> Vec<usize> {
        COLUMNS.iter().map(|keys| seek.locate(keys, row)).collect()
    }

    #[test]
    fn test_sequential_scan_matches_fresh_seek() {
        for seek in [Seek::AtOrAfter, Seek::After] {
            let mut cursor = RowCursor::new(seek);
            for row in 0..6 {
                let got = cursor.advance(row, 0, 3, |c| COLUMNS[c]).to_vec();
                assert_eq!(got, reference(seek, row), "row {row} {seek:?}");
            }
            assert_eq!(cursor.reseeks(), 1);
        }
    }

    #[test]
    fn test_backward_scan_matches_fresh_seek() {
        let mut cursor = RowCursor::new(Seek::AtOrAfter);
        for row in (0..6).rev() {
            let got = cursor.advance(row, 0, 3, |c| COLUMNS[c]).to_vec();
            assert_eq!(got, reference(Seek::AtOrAfter, row));
        }
        assert_eq!(cursor.reseeks(), 1);
    }

    #[test]
    fn test_jump_or_span_change_reseeks() {
        let mut cursor = RowCursor::new(Seek::After);
        cursor.advance(0, 0, 3, |c| COLUMNS[c]);
        cursor.advance(4, 0, 3, |c| COLUMNS[c]);
        assert_eq!(cursor.reseeks(), 2);
        let got = cursor.advance(3, 1, 3, |c| COLUMNS[c]).to_vec();
        assert_eq!(got, reference(Seek::After, 3)[1..].to_vec());
        assert_eq!(cursor.reseeks(), 3);
    }
}
