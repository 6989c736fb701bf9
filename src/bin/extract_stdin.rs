//! Read one page's HTML from stdin and print the extracted post as JSON.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wxr_migrate::{extract_post_with_options, Config};

#[derive(Debug, Parser)]
#[command(name = "extract-stdin", about = "Extract a post from HTML on stdin")]
struct Args {
    /// URL the page was fetched from.
    #[arg(long)]
    url: String,

    /// TOML options file; only the `[extraction]` table is used.
    #[arg(long, env = "WXR_MIGRATE_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut html = String::new();
    io::stdin()
        .read_to_string(&mut html)
        .context("failed to read from stdin")?;

    let post = extract_post_with_options(&html, &args.url, &config.extraction)?;
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}
