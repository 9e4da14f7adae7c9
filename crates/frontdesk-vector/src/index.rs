//! Vector index trait and types.
//!
//! Defines the nearest-neighbor capability a store is built on. Vectors are
//! addressed by handle: the 0-based position at which they were added.

use std::fmt::Debug;

use crate::error::VectorError;

/// A single nearest-neighbor match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion position of the matched vector
    pub handle: u64,
    /// Squared L2 distance from the query (0 = identical)
    pub distance: f32,
}

impl Neighbor {
    pub fn new(handle: u64, distance: f32) -> Self {
        Self { handle, distance }
    }
}

/// Trait for append-only vector indexes.
///
/// Implementations hold vectors of one fixed dimension and assign handles
/// `len()..len() + n` to each batch passed to [`VectorIndex::add`].
pub trait VectorIndex: Send + Sync + Sized {
    /// File name of the serialized index inside a store directory
    const FILE_NAME: &'static str;

    /// Backend-specific tuning parameters
    type Params: Clone + Debug + Default + Send + Sync;

    /// Create an empty index.
    fn create(dimension: usize, params: &Self::Params) -> Result<Self, VectorError>;

    /// Restore an index from bytes produced by [`VectorIndex::to_bytes`].
    fn from_bytes(
        dimension: usize,
        params: &Self::Params,
        bytes: &[u8],
    ) -> Result<Self, VectorError>;

    /// Serialize the full index.
    fn to_bytes(&self) -> Result<Vec<u8>, VectorError>;

    /// Get the vector dimension
    fn dimension(&self) -> usize;

    /// Get the number of vectors in the index
    fn len(&self) -> usize;

    /// Check if the index is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a batch of vectors.
    ///
    /// Callers validate dimensions first; implementations still reject a
    /// mismatched batch before adding anything.
    fn add(&mut self, vectors: &[&[f32]]) -> Result<(), VectorError>;

    /// Search for the `k` nearest neighbors, closest first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorError>;
}

/// Reject the batch if any vector has the wrong length.
pub(crate) fn check_dimensions(dimension: usize, vectors: &[&[f32]]) -> Result<(), VectorError> {
    match vectors.iter().find(|v| v.len() != dimension) {
        Some(v) => Err(VectorError::DimensionMismatch {
            expected: dimension,
            actual: v.len(),
        }),
        None => Ok(()),
    }
}

/// Squared Euclidean distance between equal-length slices.
pub(crate) fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
