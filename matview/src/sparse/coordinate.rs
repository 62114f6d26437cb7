//! Coordinate (triplet) adapter
//!
//! Triplets arrive in arbitrary order. Construction buckets them by column,
//! sorts each bucket by row and keeps three owned arrays: column offsets, the
//! reordered row indices, and the permutation back into the caller's values.
//! The caller's arrays are never mutated. After construction every read goes
//! through the same column index as [`CscMatrix`](super::CscMatrix).

use matview_core::validation::{structure::validate_column_rows, validate_coordinate};
use matview_core::{InputMatrix, MatrixElement, MatrixError, Result};

use super::{row_cursor, ColumnIndex};
use crate::cursor::RowCursor;

/// Allocate an index array, reporting allocation failure as an error
fn index_array(len: usize) -> Result<Vec<usize>> {
    let mut array = Vec::new();
    array
        .try_reserve_exact(len)
        .map_err(|e| MatrixError::Storage(format!("cannot allocate {len} indices: {e}")))?;
    array.resize(len, 0);
    Ok(array)
}

/// Read-only sparse matrix built from unordered triplets
#[derive(Debug, Clone)]
pub struct CoordinateMatrix<'a, T> {
    nrow: usize,
    ncol: usize,
    offsets: Vec<usize>,
    rows: Vec<usize>,
    order: Vec<usize>,
    values: &'a [T],
    cursor: RowCursor,
}

impl<'a, T: MatrixElement> CoordinateMatrix<'a, T> {
    /// Validate triplets and build the column-sorted layout
    ///
    /// Two triplets addressing the same cell are rejected.
    pub fn new(
        nrow: usize,
        ncol: usize,
        rows: &[usize],
        cols: &[usize],
        values: &'a [T],
    ) -> Result<Self> {
        validate_coordinate(nrow, ncol, rows, cols, values.len())?;
        let nnz = values.len();

        let mut offsets = index_array(ncol + 1)?;
        for &col in cols {
            offsets[col + 1] += 1;
        }
        for col in 0..ncol {
            offsets[col + 1] += offsets[col];
        }

        let mut order = index_array(nnz)?;
        let mut next = index_array(ncol)?;
        next.copy_from_slice(&offsets[..ncol]);
        for (k, &col) in cols.iter().enumerate() {
            order[next[col]] = k;
            next[col] += 1;
        }
        drop(next);

        let mut sorted_rows = index_array(nnz)?;
        for col in 0..ncol {
            let bucket = offsets[col]..offsets[col + 1];
            order[bucket.clone()].sort_unstable_by_key(|&k| rows[k]);
            for i in bucket.clone() {
                sorted_rows[i] = rows[order[i]];
            }
            validate_column_rows(nrow, col, &sorted_rows[bucket])?;
        }

        Ok(Self {
            nrow,
            ncol,
            offsets,
            rows: sorted_rows,
            order,
            values,
            cursor: row_cursor(),
        })
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column offsets of the reordered layout
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Row indices of the reordered layout
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// Position of each reordered entry in the caller's value array
    pub fn permutation(&self) -> &[usize] {
        &self.order
    }

    fn index(&self) -> ColumnIndex<'_> {
        ColumnIndex {
            offsets: &self.offsets,
            rows: &self.rows,
        }
    }
}

impl<T: MatrixElement> InputMatrix<T> for CoordinateMatrix<'_, T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        Ok(match self.index().find(row, col) {
            Some(k) => self.values[self.order[k]].clone(),
            None => T::empty(),
        })
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let index = ColumnIndex {
            offsets: &self.offsets,
            rows: &self.rows,
        };
        let (order, values) = (&self.order, self.values);
        index.gather_row(
            &mut self.cursor,
            row,
            out,
            start,
            end,
            T::empty(),
            |k| values[order[k]].clone(),
        );
        Ok(())
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        let (order, values) = (&self.order, self.values);
        self.index()
            .scatter_col(col, out, start, end, T::empty(), |k| values[order[k]].clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::CscMatrix;

    #[test]
    fn test_builds_sorted_layout() {
        // 3 x 3 with entries (2,0)=3, (0,2)=5, (0,0)=1, (1,2)=4
        let rows = [2, 0, 0, 1];
        let cols = [0, 2, 0, 2];
        let values = [3.0, 5.0, 1.0, 4.0];
        let m = CoordinateMatrix::new(3, 3, &rows, &cols, &values).unwrap();

        assert_eq!(m.offsets(), &[0, 2, 2, 4]);
        assert_eq!(m.row_indices(), &[0, 2, 0, 1]);
        assert_eq!(m.permutation(), &[2, 0, 1, 3]);
    }

    #[test]
    fn test_matches_equivalent_csc() {
        let rows = [2, 0, 0, 1];
        let cols = [0, 2, 0, 2];
        let values = [3, 5, 1, 4];
        let mut coo = CoordinateMatrix::new(3, 3, &rows, &cols, &values).unwrap();

        let csc_values = [1, 3, 5, 4];
        let mut csc = CscMatrix::new(3, 3, &[0, 2, 2, 4], &[0, 2, 0, 1], &csc_values).unwrap();

        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(coo.get(r, c).unwrap(), csc.get(r, c).unwrap(), "({r}, {c})");
            }
            assert_eq!(coo.row_values(r).unwrap(), csc.row_values(r).unwrap());
        }
        assert_eq!(coo.col_values(2).unwrap(), vec![5, 4, 0]);
    }

    #[test]
    fn test_input_untouched() {
        let rows = vec![1, 0];
        let cols = vec![0, 0];
        let values = vec![2.0, 1.0];
        let _m = CoordinateMatrix::new(2, 1, &rows, &cols, &values).unwrap();
        assert_eq!(rows, vec![1, 0]);
        assert_eq!(values, vec![2.0, 1.0]);
    }

    #[test]
    fn test_rejects_duplicates_and_bad_indices() {
        let values = [1.0, 2.0];
        assert!(matches!(
            CoordinateMatrix::new(2, 2, &[1, 1], &[0, 0], &values),
            Err(MatrixError::MalformedInput(_))
        ));
        assert!(matches!(
            CoordinateMatrix::new(2, 2, &[0, 2], &[0, 0], &values),
            Err(MatrixError::MalformedInput(_))
        ));
        assert!(matches!(
            CoordinateMatrix::new(2, 2, &[0], &[0, 1], &values),
            Err(MatrixError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_empty_matrix() {
        let values: [f64; 0] = [];
        let mut m = CoordinateMatrix::new(0, 3, &[], &[], &values).unwrap();
        assert_eq!(m.col_values(1).unwrap(), Vec::<f64>::new());
        assert_eq!(m.offsets(), &[0, 0, 0, 0]);
    }
}
