//! Colleges subcommand - build `colleges.json`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use seedline_colleges::Division;
use seedline_core::ProgressContext;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct CollegesArgs {
    /// Output JSON path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep only the first N records (applied after the division filter)
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// NCAA division to keep (1, 2 or 3)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub division: Option<u8>,

    /// Local CSV file or directory (skips the download)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Dataset slug (owner/name) to download instead of the configured one
    #[arg(long)]
    pub dataset: Option<String>,
}

fn build_config(args: CollegesArgs, config: &Config) -> Result<seedline_colleges::Config> {
    let division = args
        .division
        .map(Division::try_from)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let slug = args.dataset.as_deref().unwrap_or(&config.colleges.dataset);

    Ok(seedline_colleges::Config {
        source: super::data_source(args.input, slug, &config.kaggle)?,
        preferred_file: Some(config.colleges.file.clone()),
        output_path: args.output.unwrap_or_else(|| config.colleges.output.clone()),
        limit: args.limit,
        division,
    })
}

pub fn run(args: CollegesArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let colleges_config = build_config(args, config)?;
    let (summary, _) = seedline_colleges::run(&colleges_config, progress)?;
    seedline_colleges::print_summary(&colleges_config, &summary);
    Ok(())
}
