//! Persisted vector store.
//!
//! Couples a [`VectorIndex`] with a [`MetadataTable`] kept the same length:
//! metadata entry `i` describes the vector at handle `i`. The store is
//! append-only. Mutations stay in memory until [`VectorIndexStore::save`],
//! which writes two artifacts into the store directory:
//!
//! - `index.<ext>`: backend-owned binary index
//! - `metadata.json`: JSON array of metadata objects
//!
//! A store is not internally synchronized. Callers that share one across
//! threads must serialize access themselves.

use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::VectorError;
use crate::flat::FlatIndex;
use crate::index::VectorIndex;
use crate::metadata::{Metadata, MetadataTable, METADATA_FILE};

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Handle of the matched vector
    pub handle: u64,
    /// Metadata stored alongside the matched vector
    pub metadata: Metadata,
    /// Squared L2 distance from the query
    pub distance: f32,
}

/// Store statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Number of vectors in the store
    pub vector_count: usize,
    /// Vector dimension
    pub dimension: usize,
    /// Whether there are mutations not yet saved
    pub dirty: bool,
    /// Index file size in bytes (0 if never saved)
    pub index_bytes: u64,
    /// Metadata file size in bytes (0 if never saved)
    pub metadata_bytes: u64,
}

/// Vector index plus positional metadata, bound to a directory.
pub struct VectorIndexStore<I: VectorIndex = FlatIndex> {
    path: PathBuf,
    dimension: usize,
    params: I::Params,
    index: I,
    metadata: MetadataTable,
    dirty: bool,
}

impl<I: VectorIndex> VectorIndexStore<I> {
    /// Open the store at `path`, restoring saved state if present.
    pub fn open(path: impl Into<PathBuf>, dimension: usize) -> Result<Self, VectorError> {
        Self::open_with_params(path, dimension, I::Params::default())
    }

    /// Open the store with explicit backend parameters.
    ///
    /// Creates the directory if needed. When both artifacts exist the store
    /// is restored from them. Metadata without this backend's index file is
    /// `CorruptStore`; an index without metadata starts empty.
    pub fn open_with_params(
        path: impl Into<PathBuf>,
        dimension: usize,
        params: I::Params,
    ) -> Result<Self, VectorError> {
        if dimension == 0 {
            return Err(VectorError::InvalidDimension(dimension));
        }

        let path = path.into();
        fs::create_dir_all(&path)?;

        let index = I::create(dimension, &params)?;
        let mut store = Self {
            path,
            dimension,
            params,
            index,
            metadata: MetadataTable::new(),
            dirty: false,
        };

        match (store.index_file().exists(), store.metadata_file().exists()) {
            (true, true) => store.restore()?,
            (false, false) => {
                info!(path = ?store.path, dim = dimension, "Creating new vector store");
            }
            (true, false) => {
                warn!(
                    path = ?store.path,
                    "Vector store has an index but no metadata, starting empty"
                );
            }
            // Saved by another backend, or its index was lost
            (false, true) => {
                return Err(VectorError::CorruptStore(format!(
                    "{} exists without {} in {}",
                    METADATA_FILE,
                    I::FILE_NAME,
                    store.path.display()
                )));
            }
        }

        Ok(store)
    }

    /// Path of the serialized index
    pub fn index_file(&self) -> PathBuf {
        self.path.join(I::FILE_NAME)
    }

    /// Path of the serialized metadata table
    pub fn metadata_file(&self) -> PathBuf {
        self.path.join(METADATA_FILE)
    }

    /// Directory the store is bound to
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors
    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether there are mutations not yet written by `save`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Metadata stored for `handle`
    pub fn metadata(&self, handle: u64) -> Option<&Metadata> {
        self.metadata.get(handle)
    }

    pub fn metadata_table(&self) -> &MetadataTable {
        &self.metadata
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Append a batch of vectors with their metadata.
    ///
    /// Vector `i` is paired with `metadata[i]`. The whole batch is rejected
    /// if any vector has the wrong length or the batch sizes differ.
    /// Returns the handles assigned to the batch.
    pub fn add_vectors<V: AsRef<[f32]>>(
        &mut self,
        vectors: &[V],
        metadata: Vec<Metadata>,
    ) -> Result<Range<u64>, VectorError> {
        if let Some(v) = vectors.iter().find(|v| v.as_ref().len() != self.dimension) {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: v.as_ref().len(),
            });
        }

        if vectors.len() != metadata.len() {
            return Err(VectorError::CountMismatch {
                vectors: vectors.len(),
                metadata: metadata.len(),
            });
        }

        let first = self.count() as u64;
        if vectors.is_empty() {
            return Ok(first..first);
        }

        let slices: Vec<&[f32]> = vectors.iter().map(|v| v.as_ref()).collect();
        self.index.add(&slices)?;
        self.metadata.extend(metadata);
        self.dirty = true;

        debug!(
            added = vectors.len(),
            total = self.count(),
            "Added vectors to store"
        );
        Ok(first..self.count() as u64)
    }

    /// Find the `top_k` stored vectors closest to `query`.
    ///
    /// An empty store yields no hits for any query.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, VectorError> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let k = top_k.min(self.count());
        let neighbors = self.index.search(query, k)?;

        let hits: Vec<SearchHit> = neighbors
            .into_iter()
            .filter_map(|n| match self.metadata.get(n.handle) {
                Some(metadata) => Some(SearchHit {
                    handle: n.handle,
                    metadata: metadata.clone(),
                    distance: n.distance,
                }),
                None => {
                    warn!(handle = n.handle, "No metadata for matched vector");
                    None
                }
            })
            .collect();

        debug!(k = top_k, found = hits.len(), "Store search complete");
        Ok(hits)
    }

    /// Write the index and metadata to the store directory.
    ///
    /// Each artifact goes to a temp file first and is renamed into place, so
    /// readers see either the old or the new file, never a partial one.
    pub fn save(&mut self) -> Result<(), VectorError> {
        let index_bytes = self.index.to_bytes()?;
        let metadata_bytes = self.metadata.to_bytes()?;

        fs::create_dir_all(&self.path)?;
        let index_tmp = write_temp(&self.path, &index_bytes)?;
        let metadata_tmp = write_temp(&self.path, &metadata_bytes)?;

        index_tmp
            .persist(self.index_file())
            .map_err(|e| VectorError::Io(e.error))?;
        metadata_tmp
            .persist(self.metadata_file())
            .map_err(|e| VectorError::Io(e.error))?;

        self.dirty = false;
        info!(path = ?self.path, vectors = self.count(), "Saved vector store");
        Ok(())
    }

    /// Replace in-memory state with the artifacts on disk.
    ///
    /// Fails with `CorruptStore` if either artifact is missing, unreadable,
    /// malformed, or if their lengths disagree. State is unchanged on error.
    pub fn restore(&mut self) -> Result<(), VectorError> {
        let index_bytes = read_artifact(&self.index_file())?;
        let metadata_bytes = read_artifact(&self.metadata_file())?;

        let index = I::from_bytes(self.dimension, &self.params, &index_bytes)?;
        let metadata = MetadataTable::from_bytes(&metadata_bytes)?;

        if index.len() != metadata.len() {
            return Err(VectorError::CorruptStore(format!(
                "index holds {} vectors but metadata holds {} entries",
                index.len(),
                metadata.len()
            )));
        }

        self.index = index;
        self.metadata = metadata;
        self.dirty = false;

        info!(path = ?self.path, vectors = self.count(), "Restored vector store");
        Ok(())
    }

    /// Drop all vectors and metadata. Disk is untouched until the next save.
    pub fn clear(&mut self) -> Result<(), VectorError> {
        self.index = I::create(self.dimension, &self.params)?;
        self.metadata.clear();
        self.dirty = true;
        info!(path = ?self.path, "Cleared vector store");
        Ok(())
    }

    pub fn stats(&self) -> StoreStats {
        let file_len = |p: PathBuf| fs::metadata(p).map(|m| m.len()).unwrap_or(0);
        StoreStats {
            vector_count: self.count(),
            dimension: self.dimension,
            dirty: self.dirty,
            index_bytes: file_len(self.index_file()),
            metadata_bytes: file_len(self.metadata_file()),
        }
    }
}

fn write_temp(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile, VectorError> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, VectorError> {
    fs::read(path)
        .map_err(|e| VectorError::CorruptStore(format!("cannot read {}: {}", path.display(), e)))
}
