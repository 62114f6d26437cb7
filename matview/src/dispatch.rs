//! Input and output dispatch
//!
//! The caller resolves a backing format and hands over its raw arrays as a
//! [`Backing`]; [`create_input`] validates them and builds exactly one
//! adapter. On the write side, [`create_output`] turns an [`OutputPolicy`]
//! into one output adapter.

use std::path::Path;

use log::debug;
use matview_core::validation::cell_count;
use matview_core::{
    ElementKind, InputFormat, InputMatrix, MatrixElement, MatrixError, OutputKind, OutputMatrix,
    Result,
};

use crate::chunked::ChunkedMatrix;
use crate::config::OutputConfig;
use crate::dense::DenseMatrix;
use crate::naming::DatasetNamer;
use crate::output::{ChunkedOutput, Finalized, SimpleOutput, SparseOutput};
use crate::packed::{PackedSymmetricMatrix, Triangle};
use crate::rle::RleMatrix;
use crate::sparse::{CoordinateMatrix, CscMatrix};

/// Raw arrays of one backing format
#[derive(Debug, Clone, Copy)]
pub enum Backing<'a, T> {
    /// Column-major values with explicit dimensions
    Simple {
        data: &'a [T],
        nrow: usize,
        ncol: usize,
    },
    /// Column-major values with a dimension slot
    DenseObject { data: &'a [T], dims: &'a [usize] },
    /// Compressed sparse column arrays
    SparseCsc {
        nrow: usize,
        ncol: usize,
        offsets: &'a [usize],
        rows: &'a [usize],
        values: &'a [T],
    },
    /// Unordered (row, col, value) triplets
    SparseCoordinate {
        nrow: usize,
        ncol: usize,
        rows: &'a [usize],
        cols: &'a [usize],
        values: &'a [T],
    },
    /// One packed triangle of a symmetric `n x n` matrix
    SymmetricPacked {
        n: usize,
        triangle: Triangle,
        values: &'a [T],
    },
    /// Runs over the column-major flattening
    RunLength {
        nrow: usize,
        ncol: usize,
        values: &'a [T],
        lengths: &'a [usize],
    },
    /// Dataset `dataset` in the chunked store at `path`
    ChunkedDisk {
        path: &'a Path,
        dataset: &'a str,
        nrow: usize,
        ncol: usize,
    },
}

impl<T> Backing<'_, T> {
    /// Format tag of this backing
    pub fn format(&self) -> InputFormat {
        match self {
            Backing::Simple { .. } => InputFormat::Simple,
            Backing::DenseObject { .. } => InputFormat::DenseObject,
            Backing::SparseCsc { .. } => InputFormat::SparseCsc,
            Backing::SparseCoordinate { .. } => InputFormat::SparseCoordinate,
            Backing::SymmetricPacked { .. } => InputFormat::SymmetricPacked,
            Backing::RunLength { .. } => InputFormat::RunLength,
            Backing::ChunkedDisk { .. } => InputFormat::ChunkedDisk,
        }
    }
}

/// One concrete input adapter
#[derive(Debug)]
pub enum InputAdapter<'a, T> {
    Simple(DenseMatrix<'a, T>),
    DenseObject(DenseMatrix<'a, T>),
    Csc(CscMatrix<'a, T>),
    Coordinate(CoordinateMatrix<'a, T>),
    Packed(PackedSymmetricMatrix<'a, T>),
    Rle(RleMatrix<'a, T>),
    Chunked(ChunkedMatrix<T>),
}

impl<T> InputAdapter<'_, T> {
    /// Format tag the adapter was built from
    pub fn format(&self) -> InputFormat {
        match self {
            InputAdapter::Simple(_) => InputFormat::Simple,
            InputAdapter::DenseObject(_) => InputFormat::DenseObject,
            InputAdapter::Csc(_) => InputFormat::SparseCsc,
            InputAdapter::Coordinate(_) => InputFormat::SparseCoordinate,
            InputAdapter::Packed(_) => InputFormat::SymmetricPacked,
            InputAdapter::Rle(_) => InputFormat::RunLength,
            InputAdapter::Chunked(_) => InputFormat::ChunkedDisk,
        }
    }
}

macro_rules! delegate_input {
    ($self:ident, $m:ident => $body:expr) => {
        match $self {
            InputAdapter::Simple($m) | InputAdapter::DenseObject($m) => $body,
            InputAdapter::Csc($m) => $body,
            InputAdapter::Coordinate($m) => $body,
            InputAdapter::Packed($m) => $body,
            InputAdapter::Rle($m) => $body,
            InputAdapter::Chunked($m) => $body,
        }
    };
}

impl<T: MatrixElement> InputMatrix<T> for InputAdapter<'_, T> {
    fn nrow(&self) -> usize {
        delegate_input!(self, m => m.nrow())
    }

    fn ncol(&self) -> usize {
        delegate_input!(self, m => m.ncol())
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        delegate_input!(self, m => m.fetch(row, col))
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        delegate_input!(self, m => m.fetch_row(row, out, start, end))
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        delegate_input!(self, m => m.fetch_col(col, out, start, end))
    }
}

fn unsupported_input(format: InputFormat, kind: ElementKind) -> MatrixError {
    let hint = match (format, kind) {
        (InputFormat::SparseCoordinate, ElementKind::Logical) => "; convert to sparse-csc first",
        _ => "",
    };
    MatrixError::UnsupportedFormat(format!("{format} input cannot be read as {kind}{hint}"))
}

/// Validate a backing description and build its adapter
pub fn create_input<T: MatrixElement>(backing: Backing<'_, T>) -> Result<InputAdapter<'_, T>> {
    let format = backing.format();
    if !format.supports(T::KIND) {
        return Err(unsupported_input(format, T::KIND));
    }

    let adapter = match backing {
        Backing::Simple { data, nrow, ncol } => {
            InputAdapter::Simple(DenseMatrix::new(data, nrow, ncol)?)
        }
        Backing::DenseObject { data, dims } => {
            InputAdapter::DenseObject(DenseMatrix::from_dims(data, dims)?)
        }
        Backing::SparseCsc {
            nrow,
            ncol,
            offsets,
            rows,
            values,
        } => InputAdapter::Csc(CscMatrix::new(nrow, ncol, offsets, rows, values)?),
        Backing::SparseCoordinate {
            nrow,
            ncol,
            rows,
            cols,
            values,
        } => InputAdapter::Coordinate(CoordinateMatrix::new(nrow, ncol, rows, cols, values)?),
        Backing::SymmetricPacked {
            n,
            triangle,
            values,
        } => InputAdapter::Packed(PackedSymmetricMatrix::new(n, triangle, values)?),
        Backing::RunLength {
            nrow,
            ncol,
            values,
            lengths,
        } => InputAdapter::Rle(RleMatrix::new(nrow, ncol, values, lengths)?),
        Backing::ChunkedDisk {
            path,
            dataset,
            nrow,
            ncol,
        } => InputAdapter::Chunked(ChunkedMatrix::open(path, dataset, nrow, ncol)?),
    };

    debug!(
        "built {format} input adapter for a {} x {} {} matrix",
        adapter.nrow(),
        adapter.ncol(),
        T::KIND
    );
    Ok(adapter)
}

/// How the output representation is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputPolicy {
    /// Use exactly this representation
    Explicit(OutputKind),
    /// Derive the representation from the input being transformed
    Inferred {
        /// Format of the input the output is derived from
        source: InputFormat,
        /// Prefer in-memory results over keeping chunked inputs on disk
        simplify: bool,
        /// Allow a sparse result
        sparsify: bool,
        /// Fraction of non-empty cells, when known
        density: Option<f64>,
    },
}

impl OutputPolicy {
    /// Resolve to a concrete representation for an `nrow x ncol` output
    ///
    /// Inferred policies, in order: a chunked source stays chunked unless
    /// `simplify` is set; with `sparsify`, a sparse source or a density at or
    /// below the threshold gives a sparse output when the kind allows it;
    /// outputs larger than the dense cell limit go to disk; anything else is
    /// simple.
    pub fn resolve(
        &self,
        kind: ElementKind,
        nrow: usize,
        ncol: usize,
        config: &OutputConfig,
    ) -> OutputKind {
        match *self {
            OutputPolicy::Explicit(kind) => kind,
            OutputPolicy::Inferred {
                source,
                simplify,
                sparsify,
                density,
            } => {
                if source == InputFormat::ChunkedDisk && !simplify {
                    return OutputKind::Chunked;
                }
                let sparse_enough = source.is_sparse()
                    || density.is_some_and(|d| d <= config.sparsity_threshold);
                if sparsify && sparse_enough && OutputKind::Sparse.supports(kind) {
                    return OutputKind::Sparse;
                }
                if nrow.saturating_mul(ncol) > config.dense_cell_limit {
                    OutputKind::Chunked
                } else {
                    OutputKind::Simple
                }
            }
        }
    }
}

/// One concrete output adapter
#[derive(Debug)]
pub enum OutputAdapter<T> {
    Simple(SimpleOutput<T>),
    Sparse(SparseOutput<T>),
    Chunked(ChunkedOutput<T>),
}

impl<T> OutputAdapter<T> {
    /// Representation of this adapter
    pub fn kind(&self) -> OutputKind {
        match self {
            OutputAdapter::Simple(_) => OutputKind::Simple,
            OutputAdapter::Sparse(_) => OutputKind::Sparse,
            OutputAdapter::Chunked(_) => OutputKind::Chunked,
        }
    }
}

macro_rules! delegate_output {
    ($self:ident, $m:ident => $body:expr) => {
        match $self {
            OutputAdapter::Simple($m) => $body,
            OutputAdapter::Sparse($m) => $body,
            OutputAdapter::Chunked($m) => $body,
        }
    };
}

impl<T: MatrixElement> InputMatrix<T> for OutputAdapter<T> {
    fn nrow(&self) -> usize {
        delegate_output!(self, m => m.nrow())
    }

    fn ncol(&self) -> usize {
        delegate_output!(self, m => m.ncol())
    }

    fn fetch(&mut self, row: usize, col: usize) -> Result<T> {
        delegate_output!(self, m => m.fetch(row, col))
    }

    fn fetch_row(&mut self, row: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        delegate_output!(self, m => m.fetch_row(row, out, start, end))
    }

    fn fetch_col(&mut self, col: usize, out: &mut [T], start: usize, end: usize) -> Result<()> {
        delegate_output!(self, m => m.fetch_col(col, out, start, end))
    }
}

impl<T: MatrixElement> OutputMatrix<T> for OutputAdapter<T> {
    type Finalized = Finalized<T>;

    fn store(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        delegate_output!(self, m => m.store(row, col, value))
    }

    fn store_row(&mut self, row: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        delegate_output!(self, m => m.store_row(row, values, start, end))
    }

    fn store_col(&mut self, col: usize, values: &[T], start: usize, end: usize) -> Result<()> {
        delegate_output!(self, m => m.store_col(col, values, start, end))
    }

    fn finalize(self) -> Result<Finalized<T>> {
        Ok(match self {
            OutputAdapter::Simple(m) => Finalized::Simple(m.finalize()?),
            OutputAdapter::Sparse(m) => Finalized::Sparse(m.finalize()?),
            OutputAdapter::Chunked(m) => Finalized::Chunked(m.finalize()?),
        })
    }
}

/// Build the output adapter chosen by `policy`
///
/// `namer` is only consulted when the result is chunked-disk.
pub fn create_output<T: MatrixElement>(
    nrow: usize,
    ncol: usize,
    policy: &OutputPolicy,
    config: &OutputConfig,
    namer: &mut dyn DatasetNamer,
) -> Result<OutputAdapter<T>> {
    cell_count(nrow, ncol)?;
    let kind = policy.resolve(T::KIND, nrow, ncol, config);
    if !kind.supports(T::KIND) {
        return Err(MatrixError::UnsupportedFormat(format!(
            "{kind} output cannot hold {} values",
            T::KIND
        )));
    }
    debug!("building {kind} output for a {nrow} x {ncol} {} matrix", T::KIND);

    Ok(match kind {
        OutputKind::Simple => OutputAdapter::Simple(SimpleOutput::new(nrow, ncol)?),
        OutputKind::Sparse => OutputAdapter::Sparse(SparseOutput::new(nrow, ncol)?),
        OutputKind::Chunked => {
            OutputAdapter::Chunked(ChunkedOutput::create(nrow, ncol, config, namer)?)
        }
    })
}

impl<T: MatrixElement> Finalized<T> {
    /// Backing description that reads this result back
    pub fn backing(&self) -> Backing<'_, T> {
        match self {
            Finalized::Simple(p) => Backing::Simple {
                data: &p.data,
                nrow: p.nrow,
                ncol: p.ncol,
            },
            Finalized::Sparse(p) => Backing::SparseCsc {
                nrow: p.nrow,
                ncol: p.ncol,
                offsets: &p.offsets,
                rows: &p.rows,
                values: &p.values,
            },
            Finalized::Chunked(d) => Backing::ChunkedDisk {
                path: &d.path,
                dataset: &d.dataset,
                nrow: d.nrow,
                ncol: d.ncol,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::SequentialNamer;

    #[test]
    fn test_dispatch_builds_matching_adapter() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let dims = [2, 2];
        let adapter = create_input(Backing::DenseObject {
            data: &data,
            dims: &dims,
        })
        .unwrap();
        assert_eq!(adapter.format(), InputFormat::DenseObject);

        let lengths = [4];
        let mut adapter = create_input(Backing::RunLength {
            nrow: 2,
            ncol: 2,
            values: &data[..1],
            lengths: &lengths,
        })
        .unwrap();
        assert_eq!(adapter.format(), InputFormat::RunLength);
        assert_eq!(adapter.row_values(1).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_unsupported_kind_combinations() {
        let values = [true];
        let err = create_input(Backing::SparseCoordinate {
            nrow: 1,
            ncol: 1,
            rows: &[0],
            cols: &[0],
            values: &values,
        })
        .unwrap_err();
        assert!(matches!(err, MatrixError::UnsupportedFormat(ref m) if m.contains("sparse-csc")));

        let strings = [String::from("a")];
        assert!(matches!(
            create_input(Backing::SymmetricPacked {
                n: 1,
                triangle: Triangle::Upper,
                values: &strings,
            }),
            Err(MatrixError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_malformed_input_is_reported() {
        let data = [1, 2, 3];
        assert!(matches!(
            create_input(Backing::Simple {
                data: &data,
                nrow: 2,
                ncol: 2
            }),
            Err(MatrixError::MalformedInput(_))
        ));

        // An offset past the nonzero count must not reach the row slice.
        assert!(matches!(
            create_input(Backing::SparseCsc {
                nrow: 3,
                ncol: 2,
                offsets: &[0, 5, 2],
                rows: &[0, 1],
                values: &[1.0, 2.0],
            }),
            Err(MatrixError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_policy_resolution() {
        let config = OutputConfig::default().with_dense_cell_limit(100);
        let numeric = ElementKind::Numeric;
        let inferred = |source, simplify, sparsify, density| OutputPolicy::Inferred {
            source,
            simplify,
            sparsify,
            density,
        };

        let p = inferred(InputFormat::ChunkedDisk, false, false, None);
        assert_eq!(p.resolve(numeric, 2, 2, &config), OutputKind::Chunked);
        let p = inferred(InputFormat::ChunkedDisk, true, false, None);
        assert_eq!(p.resolve(numeric, 2, 2, &config), OutputKind::Simple);

        let p = inferred(InputFormat::SparseCsc, false, true, None);
        assert_eq!(p.resolve(numeric, 2, 2, &config), OutputKind::Sparse);
        assert_eq!(
            p.resolve(ElementKind::Character, 2, 2, &config),
            OutputKind::Simple
        );

        let p = inferred(InputFormat::Simple, false, true, Some(0.05));
        assert_eq!(p.resolve(numeric, 2, 2, &config), OutputKind::Sparse);
        let p = inferred(InputFormat::Simple, false, true, Some(0.5));
        assert_eq!(p.resolve(numeric, 2, 2, &config), OutputKind::Simple);
        assert_eq!(p.resolve(numeric, 20, 20, &config), OutputKind::Chunked);

        let p = OutputPolicy::Explicit(OutputKind::Sparse);
        assert_eq!(p.resolve(numeric, 1000, 1000, &config), OutputKind::Sparse);
    }

    #[test]
    fn test_explicit_unsupported_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = SequentialNamer::new(dir.path(), "x");
        let result = create_output::<String>(
            2,
            2,
            &OutputPolicy::Explicit(OutputKind::Sparse),
            &OutputConfig::default(),
            &mut namer,
        );
        assert!(matches!(result, Err(MatrixError::UnsupportedFormat(_))));
        assert!(namer.created().is_empty());
    }

    #[test]
    fn test_output_round_trip_through_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = SequentialNamer::new(dir.path(), "rt");
        let config = OutputConfig::default().with_chunk_dims(2, 2);

        for kind in [OutputKind::Simple, OutputKind::Sparse, OutputKind::Chunked] {
            let mut out = create_output::<i32>(
                3,
                2,
                &OutputPolicy::Explicit(kind),
                &config,
                &mut namer,
            )
            .unwrap();
            assert_eq!(out.kind(), kind);
            out.fill_col_full(0, &[1, 0, 3]).unwrap();
            out.fill_row(2, &[4], 1, 2).unwrap();

            let finalized = out.finalize().unwrap();
            assert_eq!(finalized.kind(), kind);
            let mut reader = create_input(finalized.backing()).unwrap();
            assert_eq!(reader.format(), kind.reader_format());
            assert_eq!(reader.col_values(0).unwrap(), vec![1, 0, 3]);
            assert_eq!(reader.col_values(1).unwrap(), vec![0, 0, 4]);
        }
    }
}
