//! Format constants for chunked datasets

/// Directory-relative name of the dataset header
pub const HEADER_FILE_NAME: &str = "dataset.json";

/// Directory-relative name of the chunk directory
pub const CHUNK_DIR_NAME: &str = "chunks";

/// Target size of one chunk when none is configured (1MB)
pub const DEFAULT_CHUNK_BYTES: usize = 1 << 20;

/// Maximum accepted fixed string width (64KB)
pub const MAX_STRING_WIDTH: u32 = 65536;

/// Dataset header constants
pub mod header {
    /// Magic bytes: "MVDS"
    pub const MAGIC: [u8; 4] = *b"MVDS";

    /// Current header version
    pub const VERSION: u8 = 1;
}
