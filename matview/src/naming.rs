//! Naming of datasets created by chunked outputs
//!
//! The core never invents file locations itself. A [`DatasetNamer`] supplies
//! the store directory and dataset name for each new output and is told about
//! every dataset actually created.

use std::path::{Path, PathBuf};

use matview_core::{ElementKind, Result};

use crate::chunked::ChunkedStore;

/// Where a new dataset should be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpTarget {
    /// Store directory
    pub path: PathBuf,
    /// Dataset name inside the store
    pub dataset: String,
}

/// Record of a dataset created by an output adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRecord {
    pub path: PathBuf,
    pub dataset: String,
    pub nrow: usize,
    pub ncol: usize,
    pub kind: ElementKind,
}

/// Supplies targets for new datasets and observes their creation
pub trait DatasetNamer {
    /// Next (path, dataset-name) pair
    fn next_target(&mut self) -> Result<DumpTarget>;

    /// Called once a dataset has been created at a target
    ///
    /// An error here fails the output's construction but leaves the dataset
    /// on disk.
    fn on_created(&mut self, record: &CreationRecord) -> Result<()> {
        let _ = record;
        Ok(())
    }
}

/// Names datasets `<prefix><n>` inside one store directory
///
/// Names already present in the store are skipped. Every creation is kept in
/// an in-memory log.
#[derive(Debug, Clone)]
pub struct SequentialNamer {
    root: PathBuf,
    prefix: String,
    counter: u64,
    log: Vec<CreationRecord>,
}

impl SequentialNamer {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            counter: 1,
            log: Vec::new(),
        }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Datasets created so far, oldest first
    pub fn created(&self) -> &[CreationRecord] {
        &self.log
    }
}

impl DatasetNamer for SequentialNamer {
    fn next_target(&mut self) -> Result<DumpTarget> {
        let store = ChunkedStore::new(&self.root);
        loop {
            let dataset = format!("{}{}", self.prefix, self.counter);
            self.counter += 1;
            if !store.contains(&dataset) {
                return Ok(DumpTarget {
                    path: self.root.clone(),
                    dataset,
                });
            }
        }
    }

    fn on_created(&mut self, record: &CreationRecord) -> Result<()> {
        self.log.push(record.clone());
        Ok(())
    }
}
