//! Stylesheet bundle assembly.
//!
//! One network fetch at process start, combined with an optional local
//! override. The bundle is never re-fetched, even across watch-triggered
//! re-renders.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::config::Config;

/// Fetch the remote stylesheet and append the local override.
///
/// A non-success HTTP status is a fatal startup condition. A missing local
/// override is not an error and degrades to the remote content alone.
///
/// # Errors
/// Returns an error on a failed or non-success fetch, or if the local
/// override exists but cannot be read.
pub fn load(config: &Config) -> Result<String> {
    let url = &config.stylesheet_url;
    debug!("Fetching stylesheet from {url}");
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to fetch stylesheet from {url}"))?;
    if !response.status().is_success() {
        bail!("Stylesheet fetch from {url} returned HTTP {}", response.status());
    }
    let remote = response
        .text()
        .with_context(|| format!("Failed to read stylesheet body from {url}"))?;
    let local = read_local(&config.local_stylesheet)?;

    info!(
        "Stylesheet loaded ({} remote bytes, {} local bytes)",
        remote.len(),
        local.len()
    );
    Ok(combine(&remote, &local))
}

/// Read the local override, treating absence as empty content.
fn read_local(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read local stylesheet {}", path.display()))
        }
    }
}

/// Combine remote and local stylesheet content: remote first, exactly one
/// newline separator, local after. With no local content this degrades to
/// the remote text plus a trailing newline.
pub fn combine(remote: &str, local: &str) -> String {
    format!("{remote}\n{local}")
}
