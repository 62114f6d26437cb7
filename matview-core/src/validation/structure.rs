//! Structural validation of raw backing arrays
//!
//! Every check here runs at construction time, before an adapter exists, and
//! reports the first violated invariant as [`MatrixError::MalformedInput`].

use alloc::format;

use crate::{MatrixError, Result};

fn malformed(message: alloc::string::String) -> MatrixError {
    MatrixError::MalformedInput(message)
}

/// Number of cells in an `nrow x ncol` matrix, rejecting overflow
pub fn cell_count(nrow: usize, ncol: usize) -> Result<usize> {
    nrow.checked_mul(ncol)
        .ok_or_else(|| malformed(format!("{nrow} x {ncol} matrix overflows the address space")))
}

/// Validate a column-major buffer against explicit dimensions
pub fn validate_dense(len: usize, nrow: usize, ncol: usize) -> Result<()> {
    let cells = cell_count(nrow, ncol)?;
    if len != cells {
        return Err(malformed(format!(
            "dense buffer has {len} values, expected {nrow} x {ncol} = {cells}"
        )));
    }
    Ok(())
}

/// Validate a dimension slot and return it as (nrow, ncol)
pub fn validate_dims(dims: &[usize]) -> Result<(usize, usize)> {
    match *dims {
        [nrow, ncol] => Ok((nrow, ncol)),
        _ => Err(malformed(format!(
            "expected two dimensions, found {}",
            dims.len()
        ))),
    }
}

/// Validate compressed sparse column arrays
///
/// Checks the offsets shape, that offsets never decrease, that `rows` and the
/// value array agree with the nonzero count, and that each column's rows are
/// strictly increasing and inside `[0, nrow)`.
pub fn validate_csc(
    nrow: usize,
    ncol: usize,
    offsets: &[usize],
    rows: &[usize],
    nvalues: usize,
) -> Result<()> {
    if offsets.len() != ncol + 1 {
        return Err(malformed(format!(
            "column offsets have length {}, expected {}",
            offsets.len(),
            ncol + 1
        )));
    }
    if offsets[0] != 0 {
        return Err(malformed(format!(
            "first column offset is {}, expected 0",
            offsets[0]
        )));
    }
    let nnz = offsets[ncol];
    if rows.len() != nnz {
        return Err(malformed(format!(
            "row index array has length {}, expected {nnz}",
            rows.len()
        )));
    }
    if nvalues != nnz {
        return Err(malformed(format!(
            "value array has length {nvalues}, expected {nnz}"
        )));
    }

    for (col, window) in offsets.windows(2).enumerate() {
        let (start, end) = (window[0], window[1]);
        if start > end {
            return Err(malformed(format!(
                "column offsets decrease at column {col} ({start} > {end})"
            )));
        }
        if end > nnz {
            return Err(malformed(format!(
                "column offset {end} at column {} exceeds nonzero count {nnz}",
                col + 1
            )));
        }
        validate_column_rows(nrow, col, &rows[start..end])?;
    }
    Ok(())
}

/// Validate the row indices of one column
pub fn validate_column_rows(nrow: usize, col: usize, rows: &[usize]) -> Result<()> {
    let mut previous: Option<usize> = None;
    for &row in rows {
        if row >= nrow {
            return Err(malformed(format!(
                "row index {row} in column {col} is outside [0, {nrow})"
            )));
        }
        if let Some(prev) = previous {
            if row <= prev {
                return Err(malformed(format!(
                    "row indices in column {col} are not strictly increasing ({prev} then {row})"
                )));
            }
        }
        previous = Some(row);
    }
    Ok(())
}

/// Validate coordinate triplet arrays before reordering
pub fn validate_coordinate(
    nrow: usize,
    ncol: usize,
    rows: &[usize],
    cols: &[usize],
    nvalues: usize,
) -> Result<()> {
    if rows.len() != cols.len() || rows.len() != nvalues {
        return Err(malformed(format!(
            "triplet arrays disagree in length (rows {}, cols {}, values {nvalues})",
            rows.len(),
            cols.len()
        )));
    }
    if let Some(k) = rows.iter().position(|&r| r >= nrow) {
        return Err(malformed(format!(
            "triplet {k} has row {} outside [0, {nrow})",
            rows[k]
        )));
    }
    if let Some(k) = cols.iter().position(|&c| c >= ncol) {
        return Err(malformed(format!(
            "triplet {k} has column {} outside [0, {ncol})",
            cols[k]
        )));
    }
    Ok(())
}

/// Packed length of one triangle of an `n x n` matrix
pub fn packed_len(n: usize) -> Result<usize> {
    n.checked_add(1)
        .and_then(|n1| n.checked_mul(n1))
        .map(|cells| cells / 2)
        .ok_or_else(|| malformed(format!("packed order {n} overflows the address space")))
}

/// Validate a packed triangle buffer
pub fn validate_packed(n: usize, len: usize) -> Result<()> {
    let expected = packed_len(n)?;
    if len != expected {
        return Err(malformed(format!(
            "packed buffer has {len} values, expected {expected} for order {n}"
        )));
    }
    Ok(())
}

/// Validate run-length arrays covering a column-major `nrow x ncol` matrix
pub fn validate_rle(nrow: usize, ncol: usize, lengths: &[usize], nvalues: usize) -> Result<()> {
    if lengths.len() != nvalues {
        return Err(malformed(format!(
            "{} run lengths for {nvalues} run values",
            lengths.len()
        )));
    }
    if let Some(run) = lengths.iter().position(|&len| len == 0) {
        return Err(malformed(format!("run {run} has zero length")));
    }
    let cells = cell_count(nrow, ncol)?;
    let mut total = 0usize;
    for &len in lengths {
        total = total
            .checked_add(len)
            .ok_or_else(|| malformed("run lengths overflow the address space".into()))?;
    }
    if total != cells {
        return Err(malformed(format!(
            "runs cover {total} cells, expected {nrow} x {ncol} = {cells}"
        )));
    }
    Ok(())
}
