//! Run-length encoded adapter
//!
//! The backing is a single sequence of runs over the column-major flattening
//! of the matrix. Runs may cross column boundaries; construction splits them
//! so every column gets its own table of exclusive run ends, built once and
//! read-only afterwards.
//!
//! Single-cell reads go through a last-run cache: a query that falls inside
//! the most recently resolved run of the same column skips the binary
//! search. Row reads use a [`RowCursor`] over the run-end tables.

use log::trace;
use matview_core::validation::validate_rle;
use matview_core::{InputMatrix, MatrixElement, Result};

use crate::cursor::{RowCursor, Seek};

/// Counters describing how often the last-run cache answered a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered from the cached run
    pub hits: u64,
    /// Queries that needed a fresh binary search
    pub lookups: u64,
}

#[derive(Debug, Clone, Copy)]
struct CachedRun {
    col: usize,
    start: usize,
    end: usize,
    run: usize,
}

/// Run-length encoded matrix over caller-owned run values
#[derive(Debug, Clone)]
pub struct RleMatrix<'a, T> {
    nrow: usize,
    ncol: usize,
    values: &'a [T],
    /// Start of each column's segment in `ends` / `runs`, length `ncol + 1`
    col_starts: Vec<usize>,
    /// Exclusive end row of each column segment
    ends: Vec<usize>,
    /// Run value index of each column segment
    runs: Vec<usize>,
    cache: Option<CachedRun>,
    stats: CacheStats,
    cursor: RowCursor,
}

impl<'a, T: MatrixElement> RleMatrix<'a, T> {
    /// Build run tables for an `nrow x ncol` matrix
    ///
    /// `values[k]` repeats `lengths[k]` times in column-major order. Lengths
    /// must be positive and sum to `nrow * ncol`.
    pub fn new(nrow: usize, ncol: usize, values: &'a [T], lengths: &[usize]) -> Result<Self> {
        validate_rle(nrow, ncol, lengths, values.len())?;

        let mut col_starts = Vec::with_capacity(ncol + 1);
        let mut ends = Vec::with_capacity(lengths.len() + ncol);
        let mut runs = Vec::with_capacity(lengths.len() + ncol);
        col_starts.push(0);

        let mut row = 0;
        for (run, &len) in lengths.iter().enumerate() {
            let mut remaining = len;
            while remaining > 0 {
                let take = remaining.min(nrow - row);
                row += take;
                remaining -= take;
                ends.push(row);
                runs.push(run);
                if row == nrow {
                    col_starts.push(ends.len());
                    row = 0;
                }
            }
        }
        // Zero-row matrices have no runs but still have columns.
        col_starts.resize(ncol + 1, ends.len());

        Ok(Self {
            nrow,
            ncol,
            values,
            col_starts,
            ends,
            runs,
            cache: None,
            stats: CacheStats::default(),
            cursor: RowCursor::new(Seek::After),
        })
    }

    /// Cache counters accumulated by single-cell reads
    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of column segments after splitting runs at column boundaries
    pub fn segment_count(&self) -> usize {
        self.ends.len()
    }

    #[inline]
    fn column_ends(&self, col: usize) -> &[usize] {
        &self.ends[self.col_starts[col]..self.col_starts[col + 1]]
    }

    /// Resolve the segment holding `(row, col)` with a binary search
    fn lookup(&self, row: usize, col: usize) -> CachedRun {
        let base = self.col_starts[col];
        let local = self.column_ends(col).partition_point(|&end| end <= row);
        let segment = base + local;
        CachedRun {
            col,
            start: if local == 0 { 0 } else { self.ends[segment - 1] },
            end: self.ends[segment],
            run: self.runs[segment],
        }
    }
}

impl<T: MatrixElement> InputMatrix<T> for RleMatrix<'_, T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        let run = match self.cache {
            Some(c) if c.col == col && c.start <= row && row < c.end => {
                self.stats.hits += 1;
                c.run
            }
            cached => {
                if let Some(c) = cached {
                    trace!(
                        "run cache miss: ({row}, {col}) outside column {} rows [{}, {})",
                        c.col,
                        c.start,
                        c.end
                    );
                }
                self.stats.lookups += 1;
                let resolved = self.lookup(row, col);
                self.cache = Some(resolved);
                resolved.run
            }
        };
        Ok(self.values[run].clone())
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let (col_starts, ends) = (&self.col_starts, &self.ends);
        let positions = self.cursor.advance(row, start, end, |c| {
            &ends[col_starts[c]..col_starts[c + 1]]
        });
        for ((slot, &local), col) in out.iter_mut().zip(positions).zip(start..end) {
            *slot = self.values[self.runs[self.col_starts[col] + local]].clone();
        }
        Ok(())
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let base = self.col_starts[col];
        let mut segment = base + self.column_ends(col).partition_point(|&e| e <= start);
        let mut row = start;
        while row < end {
            let stop = self.ends[segment].min(end);
            out[row - start..stop - start].fill(self.values[self.runs[segment]].clone());
            row = stop;
            segment += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matview_core::MatrixError;

    #[test]
    fn test_single_column_runs_and_cache() {
        let values = [5, 7];
        let mut m = RleMatrix::new(5, 1, &values, &[3, 2]).unwrap();

        let scanned: Vec<i32> = (0..5).map(|r| m.get(r, 0).unwrap()).collect();
        assert_eq!(scanned, vec![5, 5, 5, 7, 7]);
        // Fresh lookups at rows 0 and 3, hits on 1, 2 and 4.
        assert_eq!(m.cache_stats(), CacheStats { hits: 3, lookups: 2 });
    }

    #[test]
    fn test_runs_crossing_columns() {
        // 3 x 2 column-major: [1, 1, 1, 1, 2, 2]
        let values = [1.0, 2.0];
        let mut m = RleMatrix::new(3, 2, &values, &[4, 2]).unwrap();
        assert_eq!(m.segment_count(), 3);
        assert_eq!(m.col_values(0).unwrap(), vec![1.0, 1.0, 1.0]);
        assert_eq!(m.col_values(1).unwrap(), vec![1.0, 2.0, 2.0]);
        assert_eq!(m.row_values(0).unwrap(), vec![1.0, 1.0]);
        assert_eq!(m.row_values(2).unwrap(), vec![1.0, 2.0]);
        assert_eq!(m.get(1, 1).unwrap(), 2.0);
    }

    #[test]
    fn test_column_switch_invalidates_cache() {
        let values = [1, 2];
        let mut m = RleMatrix::new(2, 2, &values, &[2, 2]).unwrap();
        m.get(0, 0).unwrap();
        m.get(0, 1).unwrap();
        m.get(1, 1).unwrap();
        assert_eq!(m.cache_stats(), CacheStats { hits: 1, lookups: 2 });
    }

    #[test]
    fn test_sliced_column() {
        let values = [String::from("a"), String::from("b"), String::from("c")];
        let mut m = RleMatrix::new(6, 1, &values, &[2, 3, 1]).unwrap();
        let mut out = vec![String::new(); 3];
        m.get_col(0, &mut out, 1, 4).unwrap();
        assert_eq!(out, ["a", "b", "b"]);
    }

    #[test]
    fn test_zero_rows() {
        let values: [bool; 0] = [];
        let mut m = RleMatrix::new(0, 4, &values, &[]).unwrap();
        assert_eq!(m.col_values(3).unwrap(), Vec::<bool>::new());
    }

    #[test]
    fn test_rejects_bad_runs() {
        let values = [1, 2];
        assert!(matches!(
            RleMatrix::new(5, 1, &values, &[3, 0]),
            Err(MatrixError::MalformedInput(_))
        ));
        assert!(matches!(
            RleMatrix::new(5, 1, &values, &[3, 3]),
            Err(MatrixError::MalformedInput(_))
        ));
    }
}
