//! Command implementations for the frontdesk tool.
//!
//! Each command opens the named store under the configured index root with
//! the configured backend, does its work, and saves when it mutated the
//! store. Functions return data; printing is left to `main`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use frontdesk_types::{IndexBackend, Settings, VectorSettings};
use frontdesk_vector::{
    random_vectors, seed_dataset, FlatIndex, HnswIndex, HnswParams, Metadata, SampleDataset,
    SearchHit, StoreStats, VectorIndex, VectorIndexStore,
};

use crate::cli::Cli;

/// Run `$func::<Backend>(params, args...)` for the configured backend.
macro_rules! with_backend {
    ($settings:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $settings.vector.backend {
            IndexBackend::Flat => $func::<FlatIndex>((), $($arg),*),
            IndexBackend::Hnsw => $func::<HnswIndex>(hnsw_params(&$settings.vector), $($arg),*),
        }
    };
}

/// Load settings and apply CLI flag overrides (highest precedence).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(path) = &cli.index_path {
        settings.vector_index_path = path.clone();
    }
    if let Some(backend) = cli.backend {
        settings.vector.backend = backend;
    }
    if let Some(dimension) = cli.dimension {
        settings.vector.dimension = dimension;
    }
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }

    settings
        .vector
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid vector settings: {}", e))?;
    Ok(settings)
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn hnsw_params(vector: &VectorSettings) -> HnswParams {
    HnswParams::default()
        .with_connectivity(vector.connectivity)
        .with_expansion(vector.expansion_add, vector.expansion_search)
}

/// Resolve a store name to its directory, rejecting anything path-like.
fn store_path(settings: &Settings, name: &str) -> Result<PathBuf> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        bail!(
            "Invalid store name '{}': use letters, digits, '_' or '-'",
            name
        );
    }
    Ok(settings.expanded_vector_index_path().join(name))
}

fn open_store<I: VectorIndex>(
    params: I::Params,
    settings: &Settings,
    name: &str,
) -> Result<VectorIndexStore<I>> {
    let path = store_path(settings, name)?;
    VectorIndexStore::open_with_params(&path, settings.vector.dimension, params)
        .with_context(|| format!("Failed to open store at {:?}", path))
}

/// Open a store for reading without creating its directory.
fn open_existing_store<I: VectorIndex>(
    params: I::Params,
    settings: &Settings,
    name: &str,
) -> Result<VectorIndexStore<I>> {
    let path = store_path(settings, name)?;
    if !path.is_dir() {
        bail!("No store named '{}' at {:?}", name, path);
    }
    VectorIndexStore::open_with_params(&path, settings.vector.dimension, params)
        .with_context(|| format!("Failed to open store at {:?}", path))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Result of seeding one sample store
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub index: String,
    pub added: usize,
    pub total: usize,
}

/// Seed the sample stores (all datasets when `dataset` is None).
pub fn seed(
    settings: &Settings,
    dataset: Option<SampleDataset>,
    rng_seed: Option<u64>,
    append: bool,
) -> Result<Vec<SeedReport>> {
    let datasets = match dataset {
        Some(d) => vec![d],
        None => SampleDataset::ALL.to_vec(),
    };

    let mut rng = make_rng(rng_seed);
    let mut reports = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let report = with_backend!(settings, seed_one(settings, dataset, &mut rng, append))?;
        info!(index = %report.index, added = report.added, "Seeded sample store");
        reports.push(report);
    }
    Ok(reports)
}

fn seed_one<I: VectorIndex>(
    params: I::Params,
    settings: &Settings,
    dataset: SampleDataset,
    rng: &mut StdRng,
    append: bool,
) -> Result<SeedReport> {
    let mut store = open_store::<I>(params, settings, dataset.index_name())?;
    if !append {
        store.clear()?;
    }
    let added = seed_dataset(&mut store, dataset, rng)?;
    store.save()?;

    Ok(SeedReport {
        index: dataset.index_name().to_string(),
        added,
        total: store.count(),
    })
}

/// One entry of an `add` batch file
#[derive(Debug, Clone, Deserialize)]
struct BatchItem {
    vector: Vec<f32>,
    #[serde(default)]
    metadata: Metadata,
}

/// Append every item of a JSON batch file to the named store and save.
///
/// Returns the store's vector count afterwards.
pub fn add_from_file(settings: &Settings, name: &str, file: &Path) -> Result<usize> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
    let items: Vec<BatchItem> = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse batch file {:?}", file))?;

    let (vectors, metadata): (Vec<Vec<f32>>, Vec<Metadata>) =
        items.into_iter().map(|i| (i.vector, i.metadata)).unzip();

    with_backend!(settings, add_one(settings, name, &vectors, metadata))
}

fn add_one<I: VectorIndex>(
    params: I::Params,
    settings: &Settings,
    name: &str,
    vectors: &[Vec<f32>],
    metadata: Vec<Metadata>,
) -> Result<usize> {
    let mut store = open_store::<I>(params, settings, name)?;
    store.add_vectors(vectors, metadata)?;
    store.save()?;
    Ok(store.count())
}

/// Search query source
#[derive(Debug, Clone)]
pub enum Query {
    /// Explicit vector
    Vector(Vec<f32>),
    /// Random vector of the store dimension, optionally seeded
    Random(Option<u64>),
}

/// Parse a comma-separated list of floats.
pub fn parse_vector(text: &str) -> Result<Vec<f32>> {
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f32>()
                .with_context(|| format!("Invalid vector component '{}'", part))
        })
        .collect()
}

/// Search the named store.
pub fn search_store(
    settings: &Settings,
    name: &str,
    query: Query,
    top_k: usize,
) -> Result<Vec<SearchHit>> {
    let query = match query {
        Query::Vector(v) => v,
        Query::Random(seed) => {
            let mut rng = make_rng(seed);
            random_vectors(&mut rng, 1, settings.vector.dimension)
                .pop()
                .unwrap_or_default()
        }
    };
    with_backend!(settings, search_one(settings, name, &query, top_k))
}

fn search_one<I: VectorIndex>(
    params: I::Params,
    settings: &Settings,
    name: &str,
    query: &[f32],
    top_k: usize,
) -> Result<Vec<SearchHit>> {
    let store = open_existing_store::<I>(params, settings, name)?;
    Ok(store.search(query, top_k)?)
}

/// Statistics for the named store.
pub fn store_stats(settings: &Settings, name: &str) -> Result<StoreStats> {
    with_backend!(settings, stats_one(settings, name))
}

fn stats_one<I: VectorIndex>(
    params: I::Params,
    settings: &Settings,
    name: &str,
) -> Result<StoreStats> {
    let store = open_existing_store::<I>(params, settings, name)?;
    Ok(store.stats())
}

/// Clear the named store and save the empty state.
pub fn clear_store(settings: &Settings, name: &str) -> Result<()> {
    with_backend!(settings, clear_one(settings, name))
}

fn clear_one<I: VectorIndex>(params: I::Params, settings: &Settings, name: &str) -> Result<()> {
    let mut store = open_store::<I>(params, settings, name)?;
    store.clear()?;
    store.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_in(dir: &Path, dimension: usize) -> Settings {
        let mut settings = Settings {
            vector_index_path: dir.to_string_lossy().to_string(),
            ..Default::default()
        };
        settings.vector.dimension = dimension;
        settings
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("0.5, -1,2e-1").unwrap(), vec![0.5, -1.0, 0.2]);
        assert!(parse_vector("0.5,abc").is_err());
        assert!(parse_vector("").is_err());
    }

    #[test]
    fn test_store_path_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 4);
        assert!(store_path(&settings, "member_index").is_ok());
        assert!(store_path(&settings, "../etc").is_err());
        assert!(store_path(&settings, "a/b").is_err());
        assert!(store_path(&settings, "").is_err());
    }

    #[test]
    fn test_seed_all_datasets() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 32);

        let reports = seed(&settings, None, Some(1), false).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].index, "exercise_index");
        assert_eq!(reports[0].total, 8);
        assert_eq!(reports[1].index, "member_index");
        assert_eq!(reports[1].total, 5);

        let stats = store_stats(&settings, "exercise_index").unwrap();
        assert_eq!(stats.vector_count, 8);
    }

    #[test]
    fn test_seed_is_repeatable_unless_appending() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 8);

        seed(&settings, Some(SampleDataset::Members), Some(1), false).unwrap();
        let reports = seed(&settings, Some(SampleDataset::Members), Some(2), false).unwrap();
        assert_eq!(reports[0].total, 5);

        let reports = seed(&settings, Some(SampleDataset::Members), Some(3), true).unwrap();
        assert_eq!(reports[0].total, 10);
    }

    #[test]
    fn test_search_seeded_store() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 16);
        seed(&settings, Some(SampleDataset::Exercises), Some(5), false).unwrap();

        let query = Query::Random(Some(11));
        let hits = search_store(&settings, "exercise_index", query, 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits[0].distance <= hits[2].distance);
        assert!(hits[0].metadata.contains_key("title"));
    }

    #[test]
    fn test_read_commands_do_not_create_stores() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 4);

        let query = Query::Vector(vec![0.0; 4]);
        assert!(search_store(&settings, "nothing_here", query, 5).is_err());
        assert!(store_stats(&settings, "nothing_here").is_err());
        assert!(!settings
            .expanded_vector_index_path()
            .join("nothing_here")
            .exists());
    }

    #[test]
    fn test_search_empty_store_has_no_hits() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 4);
        clear_store(&settings, "empty").unwrap();

        let query = Query::Vector(vec![0.0; 4]);
        let hits = search_store(&settings, "empty", query, 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_add_from_file_and_clear() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 3);

        let batch = temp.path().join("batch.json");
        fs::write(
            &batch,
            r#"[
                {"vector": [0.0, 0.0, 1.0], "metadata": {"title": "Squat"}},
                {"vector": [1.0, 0.0, 0.0], "metadata": {"title": "Bench"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(add_from_file(&settings, "custom", &batch).unwrap(), 2);
        assert_eq!(add_from_file(&settings, "custom", &batch).unwrap(), 4);

        let hits =
            search_store(&settings, "custom", Query::Vector(vec![1.0, 0.0, 0.0]), 1).unwrap();
        assert_eq!(hits[0].handle, 1);
        assert_eq!(hits[0].metadata["title"], "Bench");

        clear_store(&settings, "custom").unwrap();
        assert_eq!(store_stats(&settings, "custom").unwrap().vector_count, 0);
    }

    #[test]
    fn test_add_from_file_rejects_wrong_dimension() {
        let temp = TempDir::new().unwrap();
        let settings = settings_in(temp.path(), 3);

        let batch = temp.path().join("batch.json");
        fs::write(&batch, r#"[{"vector": [0.0, 1.0], "metadata": {}}]"#).unwrap();

        assert!(add_from_file(&settings, "custom", &batch).is_err());
        assert_eq!(store_stats(&settings, "custom").unwrap().vector_count, 0);
    }

    #[test]
    fn test_hnsw_backend_commands() {
        let temp = TempDir::new().unwrap();
        let mut settings = settings_in(temp.path(), 8);
        settings.vector.backend = IndexBackend::Hnsw;

        seed(&settings, Some(SampleDataset::Members), Some(4), false).unwrap();
        assert!(temp.path().join("member_index").join("index.usearch").exists());

        let hits = search_store(&settings, "member_index", Query::Random(Some(8)), 2).unwrap();
        assert_eq!(hits.len(), 2);
    }
}
