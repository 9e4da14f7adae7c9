//! Frontdesk vector store tool
//!
//! # Usage
//!
//! ```bash
//! frontdesk seed [--dataset exercises|members] [--seed N] [--append]
//! frontdesk add --index NAME --file batch.json
//! frontdesk search --index NAME (--vector "0.1,0.2,..." | --random) [-k 5]
//! frontdesk stats --index NAME
//! frontdesk clear --index NAME
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/frontdesk/config.toml)
//! 3. Environment variables (FRONTDESK_*)
//! 4. CLI flags

use anyhow::{Context, Result};
use clap::Parser;

use frontdesk_cli::{
    add_from_file, clear_store, init_logging, load_settings, parse_vector, search_store, seed,
    store_stats, Cli, Commands, Query,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::Seed {
            dataset,
            seed: rng_seed,
            append,
        } => {
            for report in seed(&settings, dataset, rng_seed, append)? {
                println!(
                    "Seeded {}: {} added, {} total",
                    report.index, report.added, report.total
                );
            }
        }
        Commands::Add { index, file } => {
            let total = add_from_file(&settings, &index, &file)?;
            println!("{}: {} vectors", index, total);
        }
        Commands::Search {
            index,
            vector,
            random,
            seed: rng_seed,
            top_k,
        } => {
            let query = match vector {
                Some(text) if !random => Query::Vector(parse_vector(&text)?),
                _ => Query::Random(rng_seed),
            };
            for hit in search_store(&settings, &index, query, top_k)? {
                println!(
                    "{}",
                    serde_json::to_string(&hit).context("Failed to encode search hit")?
                );
            }
        }
        Commands::Stats { index } => {
            let stats = store_stats(&settings, &index)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to encode stats")?
            );
        }
        Commands::Clear { index } => {
            clear_store(&settings, &index)?;
            println!("Cleared {}", index);
        }
    }

    Ok(())
}
