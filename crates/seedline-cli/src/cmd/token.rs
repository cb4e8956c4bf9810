//! Token subcommand - print a signed development JWT

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Args;

use seedline_token::{KeySource, TokenOptions, bearer_line, mint};

use crate::config::{Config, TokenConfig};

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Subject (user id) for the `sub` claim
    pub subject: String,

    /// Private EC P-256 JWK used for signing
    #[arg(short, long)]
    pub key_file: Option<PathBuf>,

    /// Token lifetime in minutes
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub ttl: Option<i64>,

    /// Email claim
    #[arg(long)]
    pub email: Option<String>,
}

fn token_options(args: &TokenArgs, token: &TokenConfig) -> TokenOptions {
    TokenOptions {
        email: args.email.clone().unwrap_or_else(|| token.email.clone()),
        ttl: Duration::minutes(args.ttl.unwrap_or(token.ttl_minutes)),
        ..TokenOptions::default()
    }
}

pub fn run(args: TokenArgs, config: &Config) -> Result<()> {
    let key = KeySource::resolve(args.key_file.clone(), config.token.key_file.clone())
        .and_then(|source| source.load())
        .context("Failed to load signing key")?;

    let opts = token_options(&args, &config.token);
    let token = mint(&args.subject, &key, &opts, Utc::now()).context("Failed to sign token")?;

    println!("{}", bearer_line(&token));
    Ok(())
}
