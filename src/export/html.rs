//! Static HTML export.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::ensure_parent;

/// Write a wrapped page to `dest` as-is.
///
/// # Errors
/// Returns an error if the destination directory cannot be created or the
/// file cannot be written.
pub fn write_html(page: &str, dest: &Path) -> Result<()> {
    ensure_parent(dest)?;
    fs::write(dest, page).with_context(|| format!("Failed to write HTML to {}", dest.display()))?;
    info!("HTML written to {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_page_verbatim_and_creates_parents() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join("sub/deep/out.html");
        write_html("<!DOCTYPE html><html></html>", &dest).expect("export");
        let written = std::fs::read_to_string(&dest).expect("read");
        assert_eq!(written, "<!DOCTYPE html><html></html>");
    }

    #[test]
    fn test_overwrites_previous_artifact() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join("out.html");
        write_html("old", &dest).expect("export");
        write_html("new", &dest).expect("export");
        assert_eq!(std::fs::read_to_string(&dest).expect("read"), "new");
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let dir = tempdir().expect("tempdir");
        // A destination whose parent is a file, not a directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").expect("write");
        let dest = blocker.join("out.html");
        assert!(write_html("page", &dest).is_err());
    }
}
