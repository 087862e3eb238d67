//! Output artifact writers.
//!
//! Both exporters take a wrapped page and a destination path, creating
//! parent directories on demand and fully overwriting any previous
//! artifact.

mod html;
mod pdf;

pub use html::write_html;
pub use pdf::write_pdf;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Create the destination's parent directories if they are missing.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}
