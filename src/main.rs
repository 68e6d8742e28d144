//! Gathers sentence-simplification test data for experiments.
//!
//! Two corpora are aggregated into uniform tab-separated files:
//!
//! - TURK (Xu et al. 2016): crowdsourced simplifications of Simple Wikipedia
//!   sentences, downloaded from the Hugging Face Hub and saved one file per
//!   split.
//! - Newsela (Xu et al. 2015): aligned sentences read from a local
//!   `newsela_articles_*.aligned.sents.txt` dump and aggregated one file per
//!   target level.

mod config;
mod data;
mod detok;

use anyhow::{Context, Result};
use std::fs;

use config::{Config, Dataset};
use data::{save_newsela_to_disk, save_turk_to_disk};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_arg_slice(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "usage: ats-data-prep --outpath <dir> [--datasets turk newsela] [--newsela-path <dir>]"
            );
            eprintln!("                     [--no-detok] [--src-level V0] [--levels V1 V2 V3 V4]");
            return Err(e);
        }
    };

    fs::create_dir_all(&config.outpath)
        .with_context(|| format!("create output directory {:?}", config.outpath))?;

    for dataset in &config.datasets {
        match dataset {
            Dataset::Turk => save_turk_to_disk(&config.outpath)?,
            Dataset::Newsela => save_newsela_to_disk(
                &config.newsela_path,
                &config.outpath,
                config.detok,
                &config.src_level,
                &config.tgt_levels,
            )?,
        }
    }
    Ok(())
}
