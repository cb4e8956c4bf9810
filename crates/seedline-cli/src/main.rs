//! seedline - seed data and dev tokens for the college sports backend
//!
//! Builds `colleges.json` and `sports.json` from public tabular datasets and
//! mints short-lived ES256 test tokens.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "seedline")]
#[command(about = "Seed data and dev tokens for the college sports backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./seedline.toml or ~/.config/seedline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Build colleges.json from the college division dataset
    Colleges(cmd::colleges::CollegesArgs),
    /// Build sports.json from the collegiate sports dataset
    Sports(cmd::sports::SportsArgs),
    /// Print a signed test token for a subject
    Token(cmd::token::TokenArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = seedline_core::ProgressContext::new();

    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    seedline_core::init_logging(
        seedline_core::Verbosity::for_terminal(is_tty, cli.debug),
        multi,
    );

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Colleges(args) => cmd::colleges::run(args, &config, &progress),
        Command::Sports(args) => cmd::sports::run(args, &config, &progress),
        Command::Token(args) => cmd::token::run(args, &config),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Kaggle base URL", &config.kaggle.base_url]);
            table.add_row(vec![
                "Kaggle credentials",
                if config.kaggle.credentials().is_some() {
                    "configured"
                } else {
                    "not set (anonymous)"
                },
            ]);
            table.add_row(vec![
                "Dataset cache",
                &config.kaggle.cache_dir().display().to_string(),
            ]);
            table.add_row(vec!["Colleges dataset", &config.colleges.dataset]);
            table.add_row(vec!["Colleges file", &config.colleges.file]);
            table.add_row(vec![
                "Colleges output",
                &config.colleges.output.display().to_string(),
            ]);
            table.add_row(vec!["Sports dataset", &config.sports.dataset]);
            table.add_row(vec![
                "Sports output",
                &config.sports.output.display().to_string(),
            ]);
            let key = match &config.token.key_file {
                Some(path) => path.display().to_string(),
                None if std::env::var_os(seedline_token::SIGNING_JWK_ENV).is_some() => {
                    seedline_token::SIGNING_JWK_ENV.to_string()
                }
                None => "not set".to_string(),
            };
            table.add_row(vec!["Signing key", &key]);
            table.add_row(vec!["Token email", &config.token.email]);
            table.add_row(vec![
                "Token TTL",
                &format!("{}m", config.token.ttl_minutes),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
