//! Exact flat-scan L2 index.
//!
//! Stores vectors contiguously and answers queries with a brute-force scan.
//! Equal distances are ordered by ascending handle.
//!
//! Serialized layout (little-endian):
//! `FDFLAT01` | dimension: u32 | count: u64 | count * dimension f32 values

use tracing::debug;

use crate::error::VectorError;
use crate::index::{check_dimensions, l2_squared, Neighbor, VectorIndex};

const MAGIC: &[u8; 8] = b"FDFLAT01";
const HEADER_LEN: usize = 8 + 4 + 8;

/// Brute-force index over contiguous `f32` storage.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Get the stored vector at `handle`.
    pub fn vector(&self, handle: u64) -> Option<&[f32]> {
        let start = usize::try_from(handle).ok()?.checked_mul(self.dimension)?;
        self.data.get(start..start.checked_add(self.dimension)?)
    }
}

impl VectorIndex for FlatIndex {
    const FILE_NAME: &'static str = "index.flat";

    type Params = ();

    fn create(dimension: usize, _params: &()) -> Result<Self, VectorError> {
        if dimension == 0 {
            return Err(VectorError::InvalidDimension(dimension));
        }
        Ok(Self {
            dimension,
            data: Vec::new(),
        })
    }

    fn from_bytes(dimension: usize, _params: &(), bytes: &[u8]) -> Result<Self, VectorError> {
        if dimension == 0 {
            return Err(VectorError::InvalidDimension(dimension));
        }
        if bytes.len() < HEADER_LEN || &bytes[..8] != MAGIC {
            return Err(VectorError::CorruptStore(
                "flat index header missing or invalid".to_string(),
            ));
        }

        let stored_dim = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        if stored_dim != dimension {
            return Err(VectorError::CorruptStore(format!(
                "index dimension {} does not match store dimension {}",
                stored_dim, dimension
            )));
        }

        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&bytes[12..HEADER_LEN]);
        let count = u64::from_le_bytes(count_bytes);

        let body = &bytes[HEADER_LEN..];
        let expected_len = usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(dimension))
            .and_then(|n| n.checked_mul(4));
        if expected_len != Some(body.len()) {
            return Err(VectorError::CorruptStore(format!(
                "flat index body is {} bytes, header declares {} vectors of dimension {}",
                body.len(),
                count,
                dimension
            )));
        }

        let data = body
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self { dimension, data })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, VectorError> {
        let dimension = u32::try_from(self.dimension)
            .map_err(|_| VectorError::InvalidDimension(self.dimension))?;

        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&dimension.to_le_bytes());
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());
        for value in &self.data {
            out.extend_from_slice(&value.to_le_bytes());
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    fn add(&mut self, vectors: &[&[f32]]) -> Result<(), VectorError> {
        check_dimensions(self.dimension, vectors)?;

        self.data.reserve(vectors.len() * self.dimension);
        for v in vectors {
            self.data.extend_from_slice(v);
        }

        debug!(added = vectors.len(), total = self.len(), "Added vectors");
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorError> {
        if query.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(handle, v)| Neighbor::new(handle as u64, l2_squared(query, v)))
            .collect();

        // Stable sort keeps lower handles first among equal distances
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);

        debug!(k = k, found = neighbors.len(), "Search complete");
        Ok(neighbors)
    }
}
