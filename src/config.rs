//! Conversion settings threaded through the pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Default remote stylesheet fetched once at startup.
pub const DEFAULT_STYLESHEET_URL: &str = "https://style.roxcelic.love/styles.css";

/// Default quiet period before a changed file is re-converted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Immutable settings for a conversion run.
///
/// Built once in `main` and passed by reference everywhere; nothing in the
/// pipeline mutates it or closes over hidden state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory scanned (recursively) for markdown documents.
    pub input_root: PathBuf,
    /// Root under which PDF output mirrors the input tree.
    pub pdf_root: PathBuf,
    /// Root under which HTML output mirrors the input tree.
    pub html_root: PathBuf,
    /// Remote stylesheet fetched once at startup; non-success is fatal.
    pub stylesheet_url: String,
    /// Optional local stylesheet appended after the remote one.
    pub local_stylesheet: PathBuf,
    /// Quiet period for the watch controller's per-file debounce.
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("md"),
            pdf_root: PathBuf::from("pdf"),
            html_root: PathBuf::from("html"),
            stylesheet_url: DEFAULT_STYLESHEET_URL.to_string(),
            local_stylesheet: PathBuf::from("style.css"),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
