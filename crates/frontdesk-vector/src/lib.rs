//! # frontdesk-vector
//!
//! Persisted similarity-search store for the Frontdesk assistant.
//!
//! A [`VectorIndexStore`] owns a nearest-neighbor index and a metadata table
//! aligned with it by position: the vector at handle `i` is described by
//! metadata entry `i`. Both are written to the store directory on
//! [`VectorIndexStore::save`] and restored when the store is opened again.
//!
//! ## Features
//! - Exact L2 flat-scan index (default) and usearch-powered HNSW index
//! - Append-only batches with all-or-nothing validation
//! - JSON metadata side-table, order and value preserving
//! - Sample fitness datasets for seeding demo stores

pub mod error;
pub mod flat;
pub mod hnsw;
pub mod index;
pub mod metadata;
pub mod sample;
pub mod store;

pub use error::VectorError;
pub use flat::FlatIndex;
pub use hnsw::{HnswIndex, HnswParams};
pub use index::{Neighbor, VectorIndex};
pub use metadata::{Metadata, MetadataTable, METADATA_FILE};
pub use sample::{random_vectors, seed_dataset, SampleDataset};
pub use store::{SearchHit, StoreStats, VectorIndexStore};
