//! CLI argument parsing for the frontdesk tool.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use frontdesk_types::IndexBackend;
use frontdesk_vector::SampleDataset;

/// Frontdesk vector store tool
///
/// Seeds, queries and maintains the similarity-search stores used by the
/// Frontdesk assistant.
#[derive(Parser, Debug)]
#[command(name = "frontdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/frontdesk/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the directory holding named stores
    #[arg(long, global = true)]
    pub index_path: Option<String>,

    /// Override the index backend (flat, hnsw)
    #[arg(long, global = true)]
    pub backend: Option<IndexBackend>,

    /// Override the vector dimension
    #[arg(long, global = true)]
    pub dimension: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Store commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Populate the sample stores with fitness demo data
    Seed {
        /// Seed only this dataset (exercises, members); default is all
        #[arg(short, long)]
        dataset: Option<SampleDataset>,

        /// RNG seed for reproducible vectors
        #[arg(long)]
        seed: Option<u64>,

        /// Keep existing vectors instead of starting from an empty store
        #[arg(long)]
        append: bool,
    },

    /// Append vectors from a JSON file of {"vector": [...], "metadata": {...}} items
    Add {
        /// Store name
        #[arg(short, long)]
        index: String,

        /// JSON batch file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Find the nearest stored vectors
    Search {
        /// Store name
        #[arg(short, long)]
        index: String,

        /// Comma-separated query vector
        #[arg(long, conflicts_with = "random", required_unless_present = "random")]
        vector: Option<String>,

        /// Query with a random vector
        #[arg(long)]
        random: bool,

        /// RNG seed for --random
        #[arg(long, requires = "random")]
        seed: Option<u64>,

        /// Maximum results
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Show store statistics
    Stats {
        /// Store name
        #[arg(short, long)]
        index: String,
    },

    /// Remove every vector from a store and save it
    Clear {
        /// Store name
        #[arg(short, long)]
        index: String,
    },
}
