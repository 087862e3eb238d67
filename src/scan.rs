//! Recursive enumeration of markdown documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Extension (without the dot) that marks a file as a markdown document.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Returns true if the path has the markdown extension, compared
/// case-insensitively.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

/// List every markdown file anywhere beneath `root`.
///
/// Order is whatever the directory walk yields; hidden files are not
/// filtered here (the watch controller filters dotfiles, the batch does
/// not).
///
/// # Errors
/// Returns an error if `root` does not exist or a directory beneath it
/// cannot be read.
pub fn markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.with_context(|| format!("Failed to read input tree under {}", root.display()))?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
