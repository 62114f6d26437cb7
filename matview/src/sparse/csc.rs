//! Borrowed compressed-sparse-column adapter

use matview_core::validation::validate_csc;
use matview_core::{InputMatrix, MatrixElement, Result};

use super::{row_cursor, ColumnIndex};
use crate::cursor::RowCursor;

/// CSC matrix over caller-owned arrays
///
/// Column access slices the column directly. Row access locates the row in
/// every requested column, which is the inherent asymmetry of column-major
/// sparse storage; sequential row scans are amortised by a row cursor.
#[derive(Debug, Clone)]
pub struct CscMatrix<'a, T> {
    nrow: usize,
    ncol: usize,
    index: ColumnIndex<'a>,
    values: &'a [T],
    cursor: RowCursor,
}

impl<'a, T: MatrixElement> CscMatrix<'a, T> {
    /// Validate and wrap CSC arrays
    pub fn new(
        nrow: usize,
        ncol: usize,
        offsets: &'a [usize],
        rows: &'a [usize],
        values: &'a [T],
    ) -> Result<Self> {
        validate_csc(nrow, ncol, offsets, rows, values.len())?;
        Ok(Self {
            nrow,
            ncol,
            index: ColumnIndex { offsets, rows },
            values,
            cursor: row_cursor(),
        })
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of full re-seeks performed by row access
    pub fn row_reseeks(&self) -> u64 {
        self.cursor.reseeks()
    }
}

impl<T: MatrixElement> InputMatrix<T> for CscMatrix<'_, T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        Ok(match self.index.find(row, col) {
            Some(k) => self.values[k].clone(),
            None => T::empty(),
        })
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let values = self.values;
        self.index.gather_row(
            &mut self.cursor,
            row,
            out,
            start,
            end,
            T::empty(),
            |k| values[k].clone(),
        );
        Ok(())
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let values = self.values;
        self.index
            .scatter_col(col, out, start, end, T::empty(), |k| values[k].clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matview_core::MatrixError;

    #[test]
    fn test_diagonal_example() {
        let offsets = [0, 1, 2, 3];
        let rows = [0, 1, 2];
        let values = [1.0, 2.0, 3.0];
        let mut m = CscMatrix::new(3, 3, &offsets, &rows, &values).unwrap();

        assert_eq!(m.get(1, 1).unwrap(), 2.0);
        assert_eq!(m.get(0, 1).unwrap(), 0.0);
        assert_eq!(m.row_values(0).unwrap(), vec![1.0, 0.0, 0.0]);
        assert_eq!(m.col_values(2).unwrap(), vec![0.0, 0.0, 3.0]);
        assert_eq!(m.nnz(), 3);
    }

    #[test]
    fn test_logical_empty_is_false() {
        let offsets = [0, 0, 1];
        let rows = [1];
        let values = [true];
        let mut m = CscMatrix::new(2, 2, &offsets, &rows, &values).unwrap();
        assert!(!m.get(0, 0).unwrap());
        assert!(m.get(1, 1).unwrap());
    }

    #[test]
    fn test_sliced_access() {
        // 4 x 2: column 0 has rows 1, 3; column 1 has row 0.
        let offsets = [0, 2, 3];
        let rows = [1, 3, 0];
        let values = [10, 30, 5];
        let mut m = CscMatrix::new(4, 2, &offsets, &rows, &values).unwrap();

        let mut out = [9; 3];
        m.get_col(0, &mut out, 1, 4).unwrap();
        assert_eq!(out, [10, 0, 30]);

        let mut out = [9; 1];
        m.get_row(0, &mut out, 1, 2).unwrap();
        assert_eq!(out, [5]);
    }

    #[test]
    fn test_sequential_rows_avoid_reseek() {
        let offsets = [0, 2, 3];
        let rows = [1, 3, 0];
        let values = [10, 30, 5];
        let mut m = CscMatrix::new(4, 2, &offsets, &rows, &values).unwrap();

        let expected = [[0, 5], [10, 0], [0, 0], [30, 0]];
        for (row, want) in expected.iter().enumerate() {
            assert_eq!(m.row_values(row).unwrap(), want.to_vec());
        }
        assert_eq!(m.row_reseeks(), 1);

        // A jump back to the start re-seeks.
        assert_eq!(m.row_values(0).unwrap(), vec![0, 5]);
        assert_eq!(m.row_reseeks(), 2);
    }

    #[test]
    fn test_rejects_malformed() {
        let values = [1.0, 2.0];
        assert!(matches!(
            CscMatrix::new(3, 1, &[0, 2], &[2, 1], &values),
            Err(MatrixError::MalformedInput(_))
        ));
        assert!(matches!(
            CscMatrix::new(3, 2, &[0, 2], &[0, 1], &values),
            Err(MatrixError::MalformedInput(_))
        ));
    }
}
