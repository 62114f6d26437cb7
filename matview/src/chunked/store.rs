//! Chunked dataset store on the local file system
//!
//! A store is a directory. Each dataset is a subdirectory holding its JSON
//! header and a `chunks/` directory with one file per chunk, named
//! `<i>.<j>` after the chunk's grid position. Chunk files always hold a full
//! chunk of little-endian cells with disk axis 1 contiguous, edge chunks
//! included. A chunk that was never written reads as the fill value.

use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use log::{debug, info};
#[cfg(feature = "mmap")]
use memmap2::Mmap;
use matview_core::format::constants::{CHUNK_DIR_NAME, HEADER_FILE_NAME};
use matview_core::{DatasetHeader, MatrixError, Result};

use super::hyperslab::Hyperslab;

pub(crate) fn io_error(op: &str, path: &Path, err: io::Error) -> MatrixError {
    MatrixError::Storage(format!("{op} {}: {err}", path.display()))
}

/// Directory holding named datasets
#[derive(Debug, Clone)]
pub struct ChunkedStore {
    root: PathBuf,
}

impl ChunkedStore {
    /// Refer to a store rooted at `root`; nothing is touched until a dataset
    /// is created or opened
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the named dataset
    pub fn dataset_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether a dataset with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.dataset_dir(name).join(HEADER_FILE_NAME).is_file()
    }

    /// Create a new dataset; fails if the name is taken
    pub fn create_dataset(&self, name: &str, header: DatasetHeader) -> Result<Dataset> {
        header.validate()?;
        if name.is_empty() || name == "." || name == ".." || name.contains(|c: char| c == '/' || c == '\\') {
            return Err(MatrixError::MalformedInput(format!(
                "invalid dataset name {name:?}"
            )));
        }
        let dir = self.dataset_dir(name);
        if self.contains(name) {
            return Err(MatrixError::Storage(format!(
                "dataset {} already exists",
                dir.display()
            )));
        }

        let chunk_dir = dir.join(CHUNK_DIR_NAME);
        fs::create_dir_all(&chunk_dir).map_err(|e| io_error("create", &chunk_dir, e))?;
        let header_path = dir.join(HEADER_FILE_NAME);
        let json = serde_json::to_vec_pretty(&header)
            .map_err(|e| MatrixError::Storage(format!("encode dataset header: {e}")))?;
        fs::write(&header_path, json).map_err(|e| io_error("write", &header_path, e))?;

        info!(
            "created dataset {} with extent {:?}, chunks {:?}, {}",
            dir.display(),
            header.shape,
            header.chunks,
            header.storage
        );
        Dataset::from_header(dir, header)
    }

    /// Open an existing dataset and validate its header
    pub fn open_dataset(&self, name: &str) -> Result<Dataset> {
        let dir = self.dataset_dir(name);
        let header_path = dir.join(HEADER_FILE_NAME);
        let bytes = fs::read(&header_path).map_err(|e| io_error("read", &header_path, e))?;
        let header: DatasetHeader = serde_json::from_slice(&bytes).map_err(|e| {
            MatrixError::UnsupportedFormat(format!(
                "unrecognised dataset header {}: {e}",
                header_path.display()
            ))
        })?;
        header.validate()?;
        debug!("opened dataset {} ({})", dir.display(), header.storage);
        Dataset::from_header(dir, header)
    }
}

/// Bytes of one chunk, mapped or read into memory
enum ChunkBytes {
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
    #[cfg_attr(feature = "mmap", allow(dead_code))]
    Owned(Vec<u8>),
}

impl Deref for ChunkBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            ChunkBytes::Mapped(map) => &map[..],
            ChunkBytes::Owned(bytes) => bytes.as_slice(),
        }
    }
}

/// One open dataset
#[derive(Debug)]
pub struct Dataset {
    dir: PathBuf,
    header: DatasetHeader,
    extent: [u64; 2],
    chunks: [u64; 2],
}

impl Dataset {
    fn from_header(dir: PathBuf, header: DatasetHeader) -> Result<Self> {
        let extent = header.extent().ok_or_else(|| {
            MatrixError::MalformedInput("dataset is not a two-dimensional array".into())
        })?;
        let chunks = header.chunk_dims();
        Ok(Self {
            dir,
            header,
            extent,
            chunks,
        })
    }

    /// Dataset header
    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    /// Dataset directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Extent in disk axis order
    pub fn extent(&self) -> [u64; 2] {
        self.extent
    }

    fn width(&self) -> Result<usize> {
        self.header.element_width().ok_or_else(|| {
            MatrixError::UnsupportedFormat(format!(
                "{} cells have no fixed width",
                self.header.storage
            ))
        })
    }

    fn chunk_path(&self, i: u64, j: u64) -> PathBuf {
        self.dir.join(CHUNK_DIR_NAME).join(format!("{i}.{j}"))
    }

    fn chunk_bytes(&self, width: usize) -> usize {
        // Validated headers never overflow.
        self.header.chunk_bytes(width).unwrap_or(usize::MAX)
    }

    /// Chunk grid ranges intersecting a selection
    fn chunk_span(&self, slab: &Hyperslab) -> [std::ops::Range<u64>; 2] {
        let end = slab.end();
        [
            slab.offset[0] / self.chunks[0]..end[0].div_ceil(self.chunks[0]),
            slab.offset[1] / self.chunks[1]..end[1].div_ceil(self.chunks[1]),
        ]
    }

    /// Load one chunk, `None` if it was never written
    fn load_chunk(&self, i: u64, j: u64, width: usize) -> Result<Option<ChunkBytes>> {
        let path = self.chunk_path(i, j);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("open", &path, e)),
        };

        #[cfg(feature = "mmap")]
        let bytes = {
            // SAFETY: chunk files are replaced by rename in `store_chunk`, never
            // truncated in place, so the mapped file keeps its length while the
            // mapping is alive. The mapping is dropped before this call's
            // selection completes.
            let map = unsafe { Mmap::map(&file) }.map_err(|e| io_error("map", &path, e))?;
            ChunkBytes::Mapped(map)
        };
        #[cfg(not(feature = "mmap"))]
        let bytes = {
            use std::io::Read;
            let mut file = file;
            let mut buf = Vec::with_capacity(self.chunk_bytes(width));
            file.read_to_end(&mut buf)
                .map_err(|e| io_error("read", &path, e))?;
            ChunkBytes::Owned(buf)
        };

        if bytes.len() != self.chunk_bytes(width) {
            return Err(MatrixError::Storage(format!(
                "chunk {} has {} bytes, expected {}",
                path.display(),
                bytes.len(),
                self.chunk_bytes(width)
            )));
        }
        Ok(Some(bytes))
    }

    fn store_chunk(&self, i: u64, j: u64, bytes: &[u8]) -> Result<()> {
        let path = self.chunk_path(i, j);
        let staging = path.with_file_name(format!("{i}.{j}.tmp"));
        fs::write(&staging, bytes).map_err(|e| io_error("write", &staging, e))?;
        fs::rename(&staging, &path).map_err(|e| io_error("rename", &path, e))
    }

    /// Read a selection into `out`, ordered with disk axis 1 contiguous
    ///
    /// `out` must hold exactly `slab.cells()` cells.
    pub fn read_hyperslab(&self, slab: &Hyperslab, out: &mut [u8]) -> Result<()> {
        let width = self.width()?;
        self.check_selection(slab, out.len(), width)?;
        let [c0, c1] = self.chunks;
        let end = slab.end();
        let [span0, span1] = self.chunk_span(slab);

        for i in span0 {
            for j in span1.clone() {
                let chunk = self.load_chunk(i, j, width)?;
                let (a0, b0) = (slab.offset[0].max(i * c0), end[0].min((i + 1) * c0));
                let (a1, b1) = (slab.offset[1].max(j * c1), end[1].min((j + 1) * c1));
                let run = (b1 - a1) as usize * width;

                for i0 in a0..b0 {
                    let dst = slab.buffer_index(i0, a1) * width;
                    let dst = &mut out[dst..dst + run];
                    match &chunk {
                        Some(bytes) => {
                            let src = (((i0 - i * c0) * c1 + (a1 - j * c1)) as usize) * width;
                            dst.copy_from_slice(&bytes[src..src + run]);
                        }
                        None => {
                            for cell in dst.chunks_exact_mut(width) {
                                cell.copy_from_slice(&self.header.fill_value);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Write a selection from `data`, ordered with disk axis 1 contiguous
    ///
    /// Each touched chunk is read, patched and written back whole.
    pub fn write_hyperslab(&mut self, slab: &Hyperslab, data: &[u8]) -> Result<()> {
        let width = self.width()?;
        self.check_selection(slab, data.len(), width)?;
        let [c0, c1] = self.chunks;
        let end = slab.end();
        let [span0, span1] = self.chunk_span(slab);

        for i in span0 {
            for j in span1.clone() {
                let mut chunk = match self.load_chunk(i, j, width)? {
                    Some(bytes) => bytes.to_vec(),
                    None => self.header.fill_value.repeat(self.header.chunk_cells()),
                };
                let (a0, b0) = (slab.offset[0].max(i * c0), end[0].min((i + 1) * c0));
                let (a1, b1) = (slab.offset[1].max(j * c1), end[1].min((j + 1) * c1));
                let run = (b1 - a1) as usize * width;

                for i0 in a0..b0 {
                    let src = slab.buffer_index(i0, a1) * width;
                    let dst = (((i0 - i * c0) * c1 + (a1 - j * c1)) as usize) * width;
                    chunk[dst..dst + run].copy_from_slice(&data[src..src + run]);
                }
                self.store_chunk(i, j, &chunk)?;
            }
        }
        Ok(())
    }

    fn check_selection(&self, slab: &Hyperslab, len: usize, width: usize) -> Result<()> {
        slab.check_within(self.extent)?;
        let needed = slab.cells() * width;
        if len != needed {
            return Err(MatrixError::range("selection buffer", 0, needed, len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matview_core::StorageType;

    fn int_header(extent: [u64; 2], chunks: [u64; 2]) -> DatasetHeader {
        DatasetHeader::new(extent, chunks, StorageType::Int32, (-1i32).to_le_bytes().to_vec())
    }

    fn encode(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn decode(bytes: &[u8]) -> Vec<i32> {
        bytes
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_unwritten_chunks_read_fill_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        let ds = store.create_dataset("m", int_header([3, 5], [2, 2])).unwrap();

        let slab = Hyperslab::col(1, 0, 5);
        let mut out = vec![0u8; slab.cells() * 4];
        ds.read_hyperslab(&slab, &mut out).unwrap();
        assert_eq!(decode(&out), vec![-1; 5]);
    }

    #[test]
    fn test_write_then_read_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        // 5 x 3 logical matrix, 2 x 2 chunks so every selection spans chunks.
        let mut ds = store.create_dataset("m", int_header([3, 5], [2, 2])).unwrap();

        for col in 0..3 {
            let values: Vec<i32> = (0..5).map(|row| (10 * row + col) as i32).collect();
            ds.write_hyperslab(&Hyperslab::col(col, 0, 5), &encode(&values))
                .unwrap();
        }

        let slab = Hyperslab::row(3, 0, 3);
        let mut out = vec![0u8; 12];
        ds.read_hyperslab(&slab, &mut out).unwrap();
        assert_eq!(decode(&out), vec![30, 31, 32]);

        // Reopening sees the same data.
        let reopened = store.open_dataset("m").unwrap();
        let slab = Hyperslab::cell(4, 2);
        let mut out = vec![0u8; 4];
        reopened.read_hyperslab(&slab, &mut out).unwrap();
        assert_eq!(decode(&out), vec![42]);
    }

    #[test]
    fn test_partial_write_keeps_neighbours() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        let mut ds = store.create_dataset("m", int_header([2, 4], [2, 4])).unwrap();

        ds.write_hyperslab(&Hyperslab::cell(1, 0), &encode(&[7])).unwrap();
        let mut out = vec![0u8; 16];
        ds.read_hyperslab(&Hyperslab::col(0, 0, 4), &mut out).unwrap();
        assert_eq!(decode(&out), vec![-1, 7, -1, -1]);
    }

    #[test]
    fn test_create_and_open_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        store.create_dataset("m", int_header([1, 1], [1, 1])).unwrap();
        assert!(matches!(
            store.create_dataset("m", int_header([1, 1], [1, 1])),
            Err(MatrixError::Storage(_))
        ));
        assert!(matches!(
            store.open_dataset("missing"),
            Err(MatrixError::Storage(_))
        ));
        assert!(store
            .create_dataset("a/b", int_header([1, 1], [1, 1]))
            .is_err());
    }

    #[test]
    fn test_open_rejects_oversized_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        let mut ds = store.create_dataset("m", int_header([2, 2], [2, 2])).unwrap();
        ds.write_hyperslab(&Hyperslab::col(0, 0, 2), &encode(&[1, 2]))
            .unwrap();

        let header_path = ds.dir().join(HEADER_FILE_NAME);
        let mut header: serde_json::Value =
            serde_json::from_slice(&fs::read(&header_path).unwrap()).unwrap();
        header["chunks"] = serde_json::json!([1u64 << 32, 1u64 << 32]);
        fs::write(&header_path, serde_json::to_vec(&header).unwrap()).unwrap();

        assert!(matches!(
            store.open_dataset("m"),
            Err(MatrixError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_staging_files_are_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        let mut ds = store.create_dataset("m", int_header([1, 4], [1, 2])).unwrap();
        ds.write_hyperslab(&Hyperslab::col(0, 0, 4), &encode(&[1, 2, 3, 4]))
            .unwrap();

        let mut names: Vec<String> = fs::read_dir(ds.dir().join(CHUNK_DIR_NAME))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["0.0", "0.1"]);
    }

    #[test]
    fn test_selection_checks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkedStore::new(dir.path());
        let ds = store.create_dataset("m", int_header([2, 2], [1, 1])).unwrap();
        let mut out = vec![0u8; 8];
        assert!(matches!(
            ds.read_hyperslab(&Hyperslab::col(2, 0, 2), &mut out),
            Err(MatrixError::OutOfRange { .. })
        ));
        assert!(matches!(
            ds.read_hyperslab(&Hyperslab::col(0, 0, 1), &mut out),
            Err(MatrixError::OutOfRange { .. })
        ));
    }
}
