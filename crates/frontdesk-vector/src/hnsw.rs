//! HNSW index implementation using usearch.
//!
//! Parameters tuned for quality over speed:
//! - M = 16 (connections per layer)
//! - ef_construction = 200 (build-time quality)
//! - ef_search = 100 (search-time quality)
//!
//! Uses the squared L2 metric so distances agree with [`crate::FlatIndex`].
//! Results are approximate and equal distances come back in library order.

use tracing::{debug, warn};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

use crate::error::VectorError;
use crate::index::{check_dimensions, Neighbor, VectorIndex};

/// HNSW tuning parameters
#[derive(Debug, Clone)]
pub struct HnswParams {
    /// Number of connections per layer (M parameter)
    pub connectivity: usize,
    /// Build-time search depth (ef_construction)
    pub expansion_add: usize,
    /// Query-time search depth (ef_search)
    pub expansion_search: usize,
    /// Capacity reserved for a fresh index
    pub initial_capacity: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            connectivity: 16,
            expansion_add: 200,
            expansion_search: 100,
            initial_capacity: 1024,
        }
    }
}

impl HnswParams {
    pub fn with_connectivity(mut self, m: usize) -> Self {
        self.connectivity = m;
        self
    }

    pub fn with_expansion(mut self, ef_add: usize, ef_search: usize) -> Self {
        self.expansion_add = ef_add;
        self.expansion_search = ef_search;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    fn options(&self, dimension: usize) -> IndexOptions {
        IndexOptions {
            dimensions: dimension,
            metric: MetricKind::L2sq,
            quantization: ScalarKind::F32,
            connectivity: self.connectivity,
            expansion_add: self.expansion_add,
            expansion_search: self.expansion_search,
            multi: false,
        }
    }
}

/// HNSW index wrapper around usearch. Keys are store handles.
pub struct HnswIndex {
    index: Index,
    dimension: usize,
}

impl HnswIndex {
    /// Grow capacity so that `additional` more vectors fit.
    fn ensure_capacity(&self, additional: usize) -> Result<(), VectorError> {
        let needed = self.index.size() + additional;
        if needed <= self.index.capacity() {
            return Ok(());
        }
        let target = needed.max(self.index.capacity() * 2);
        self.index
            .reserve(target)
            .map_err(|e| VectorError::Index(e.to_string()))?;
        debug!(capacity = target, "Reserved index capacity");
        Ok(())
    }
}

impl VectorIndex for HnswIndex {
    const FILE_NAME: &'static str = "index.usearch";

    type Params = HnswParams;

    fn create(dimension: usize, params: &HnswParams) -> Result<Self, VectorError> {
        if dimension == 0 {
            return Err(VectorError::InvalidDimension(dimension));
        }

        let index =
            Index::new(&params.options(dimension)).map_err(|e| VectorError::Index(e.to_string()))?;
        index
            .reserve(params.initial_capacity.max(1))
            .map_err(|e| VectorError::Index(e.to_string()))?;

        Ok(Self { index, dimension })
    }

    fn from_bytes(
        dimension: usize,
        params: &HnswParams,
        bytes: &[u8],
    ) -> Result<Self, VectorError> {
        if dimension == 0 {
            return Err(VectorError::InvalidDimension(dimension));
        }

        let index =
            Index::new(&params.options(dimension)).map_err(|e| VectorError::Index(e.to_string()))?;
        index
            .load_from_buffer(bytes)
            .map_err(|e| VectorError::CorruptStore(format!("Failed to load index: {}", e)))?;

        if index.dimensions() != dimension {
            return Err(VectorError::CorruptStore(format!(
                "index dimension {} does not match store dimension {}",
                index.dimensions(),
                dimension
            )));
        }

        Ok(Self { index, dimension })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, VectorError> {
        let mut buffer = vec![0u8; self.index.serialized_length()];
        self.index
            .save_to_buffer(&mut buffer)
            .map_err(|e| VectorError::Index(format!("Failed to save: {}", e)))?;
        Ok(buffer)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.index.size()
    }

    fn add(&mut self, vectors: &[&[f32]]) -> Result<(), VectorError> {
        check_dimensions(self.dimension, vectors)?;
        self.ensure_capacity(vectors.len())?;

        let first = self.index.size() as u64;
        for (offset, &v) in vectors.iter().enumerate() {
            let handle = first + offset as u64;
            if let Err(e) = self.index.add(handle, v) {
                // Roll back the part of the batch that made it in
                for added in first..handle {
                    if let Err(undo) = self.index.remove(added) {
                        warn!(handle = added, error = %undo, "Failed to roll back vector");
                    }
                }
                return Err(VectorError::Index(e.to_string()));
            }
        }

        debug!(added = vectors.len(), total = self.index.size(), "Added vectors");
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorError> {
        if query.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 || self.index.size() == 0 {
            return Ok(Vec::new());
        }

        let results = self
            .index
            .search(query, k)
            .map_err(|e| VectorError::Index(e.to_string()))?;

        let mut neighbors: Vec<Neighbor> = results
            .keys
            .iter()
            .zip(results.distances.iter())
            .map(|(&handle, &distance)| Neighbor::new(handle, distance.max(0.0)))
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        debug!(k = k, found = neighbors.len(), "Search complete");
        Ok(neighbors)
    }
}
