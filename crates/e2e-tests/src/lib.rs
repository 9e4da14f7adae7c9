//! End-to-end test infrastructure for the Frontdesk vector stores.
//!
//! Provides a shared TestHarness and helpers for tests that exercise a
//! store through open, mutate, save and reopen cycles.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use frontdesk_types::Settings;
use frontdesk_vector::{random_vectors, Metadata};

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Root directory for named stores
    pub vector_index_path: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with an empty index root.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let vector_index_path = temp_dir.path().join("vector-index");
        std::fs::create_dir_all(&vector_index_path).expect("Failed to create vector index dir");

        Self {
            _temp_dir: temp_dir,
            vector_index_path,
        }
    }

    /// Directory for a named store under the index root.
    pub fn store_path(&self, name: &str) -> PathBuf {
        self.vector_index_path.join(name)
    }

    /// Settings pointing at this harness with the given dimension.
    pub fn settings(&self, dimension: usize) -> Settings {
        let mut settings = Settings {
            vector_index_path: self.vector_index_path.to_string_lossy().to_string(),
            ..Default::default()
        };
        settings.vector.dimension = dimension;
        settings
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic random vectors for a test.
pub fn test_vectors(seed: u64, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_vectors(&mut rng, count, dimension)
}

/// Metadata entry `i` of a test batch.
pub fn test_metadata(i: usize) -> Metadata {
    let value = json!({
        "doc_id": format!("doc-{}", i),
        "position": i,
        "tags": ["fitness", if i % 2 == 0 { "even" } else { "odd" }],
    });
    value.as_object().cloned().expect("metadata literal is an object")
}

/// Metadata entries `0..count`.
pub fn test_metadata_batch(count: usize) -> Vec<Metadata> {
    (0..count).map(test_metadata).collect()
}
