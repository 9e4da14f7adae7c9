//! Frontdesk CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (seed, add, search, stats, clear)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    add_from_file, clear_store, init_logging, load_settings, parse_vector, search_store, seed,
    store_stats, Query, SeedReport,
};
