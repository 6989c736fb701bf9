//! Migrate a list of blog URLs into a WordPress import file.
//!
//! Reads a URL list (one per line, `#` comments allowed), fetches and
//! extracts every page in order, and writes the WXR document. Optionally
//! writes a JSON dump of the posts and the list of URLs that failed.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wxr_migrate::{parse_url_list, run_batch, to_wxr, Config, HttpFetcher};

#[derive(Debug, Parser)]
#[command(name = "wxr-migrate", version, about = "Convert blog pages into a WordPress WXR export")]
struct Args {
    /// File with one URL per line.
    #[arg(long)]
    urls: PathBuf,

    /// Where to write the WXR document.
    #[arg(long, default_value = "export.xml")]
    output: PathBuf,

    /// Also write the extracted posts as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write URLs that failed, one per line.
    #[arg(long)]
    failed: Option<PathBuf>,

    /// Seconds to wait between URLs (overrides the config file).
    #[arg(long, env = "WXR_MIGRATE_DELAY")]
    delay: Option<f64>,

    /// TOML file with `[extraction]`, `[fetch]` and `[channel]` tables.
    #[arg(long, env = "WXR_MIGRATE_CONFIG")]
    config: Option<PathBuf>,

    /// Site URL of the new blog, used for the channel link and base URLs.
    #[arg(long)]
    site_url: Option<String>,
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing()?;

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(delay) = args.delay {
        config.fetch.delay_secs = delay;
    }
    if let Some(site) = &args.site_url {
        config.channel.link.clone_from(site);
        config.channel.base_site_url.clone_from(site);
        config.channel.base_blog_url.clone_from(site);
    }

    let list = fs::read_to_string(&args.urls)
        .with_context(|| format!("failed to read URL list: {}", args.urls.display()))?;
    let urls = parse_url_list(&list);
    if urls.is_empty() {
        anyhow::bail!("no URLs in {}", args.urls.display());
    }
    tracing::info!(count = urls.len(), "loaded URL list");

    let fetcher = HttpFetcher::new(config.fetch.clone());
    let report = run_batch(&urls, &fetcher, &config.extraction, &config.fetch);

    let xml = to_wxr(&report.posts, &config.channel)?;
    fs::write(&args.output, xml)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), posts = report.posts.len(), "wrote WXR export");

    if let Some(path) = &args.json {
        fs::write(path, report.json_dump()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(path) = &args.failed {
        fs::write(path, report.failed_list())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    for failure in &report.failures {
        eprintln!("FAILED {}: {}", failure.url, failure.reason);
    }
    Ok(())
}
