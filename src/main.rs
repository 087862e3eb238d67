//! Pagesmith - watches a directory of markdown files and renders each to
//! styled PDF and static HTML.
//!
//! # Usage
//!
//! ```bash
//! pagesmith
//! pagesmith --once
//! pagesmith --input docs --pdf out/pdf --html out/html
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pagesmith::config::{Config, DEFAULT_STYLESHEET_URL};
use pagesmith::pipeline::Pipeline;
use pagesmith::style;
use pagesmith::watcher::WatchController;

/// Watches a directory of markdown files and renders each to styled PDF and static HTML
#[derive(Parser, Debug)]
#[command(name = "pagesmith", version, about, long_about = None)]
struct Cli {
    /// Directory scanned recursively for markdown documents
    #[arg(long, value_name = "DIR", default_value = "md")]
    input: PathBuf,

    /// Root directory for PDF output
    #[arg(long, value_name = "DIR", default_value = "pdf")]
    pdf: PathBuf,

    /// Root directory for HTML output
    #[arg(long, value_name = "DIR", default_value = "html")]
    html: PathBuf,

    /// Remote stylesheet fetched once at startup
    #[arg(long, value_name = "URL", default_value = DEFAULT_STYLESHEET_URL)]
    stylesheet_url: String,

    /// Local stylesheet appended after the remote one (absence is fine)
    #[arg(long, value_name = "PATH", default_value = "style.css")]
    local_stylesheet: PathBuf,

    /// Quiet period in milliseconds before a changed file is re-converted
    #[arg(long, value_name = "MS", default_value_t = 500)]
    debounce_ms: u64,

    /// Convert the current tree and exit instead of watching
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if !cli.input.is_dir() {
        anyhow::bail!("Input directory not found: {}", cli.input.display());
    }
    // Canonicalize so watch event paths and scan results agree on the root.
    let input_root = cli
        .input
        .canonicalize()
        .with_context(|| format!("Failed to resolve input directory {}", cli.input.display()))?;

    let config = Config {
        input_root,
        pdf_root: cli.pdf,
        html_root: cli.html,
        stylesheet_url: cli.stylesheet_url,
        local_stylesheet: cli.local_stylesheet,
        debounce: Duration::from_millis(cli.debounce_ms),
    };

    // One fetch for the process lifetime; a failed fetch is fatal before
    // any conversion runs.
    let stylesheet = style::load(&config)?;

    let pipeline = Pipeline::new(config.clone(), stylesheet);
    pipeline.convert_all()?;

    if cli.once {
        return Ok(());
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("Failed to install shutdown handler")?;
    }

    let mut watcher = WatchController::new(&config.input_root, config.debounce)
        .context("Failed to start watching the input directory")?;
    info!("Watching {} for changes", watcher.input_root().display());
    watcher.run(&stop, |path| pipeline.convert_file(path))?;

    info!("Shutting down");
    Ok(())
}
