//! Sports subcommand - build `sports.json`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use seedline_core::ProgressContext;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct SportsArgs {
    /// Aggregate only the first N rows
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Output JSON path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Local CSV file or directory (skips the download)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Dataset slug (owner/name) to download instead of the configured one
    #[arg(long)]
    pub dataset: Option<String>,
}

fn build_config(args: SportsArgs, config: &Config) -> Result<seedline_sports::Config> {
    let slug = args.dataset.as_deref().unwrap_or(&config.sports.dataset);
    Ok(seedline_sports::Config {
        source: super::data_source(args.input, slug, &config.kaggle)?,
        output_path: args.output.unwrap_or_else(|| config.sports.output.clone()),
        limit: args.limit,
    })
}

pub fn run(args: SportsArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let sports_config = build_config(args, config)?;
    let (summary, sports) = seedline_sports::run(&sports_config, progress)?;
    seedline_sports::print_top_sports(&sports);
    log::info!(
        "{} rows counted, {} bytes written in {:.1}s",
        summary.counted_rows,
        summary.bytes,
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
