//! The per-file conversion pipeline and the initial batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::{export, page, render, scan};

/// Runs markdown files through render → wrap → PDF export → HTML export.
///
/// Holds the configuration and the stylesheet bundle assembled at startup;
/// every render receives them explicitly rather than through captured
/// global state.
pub struct Pipeline {
    config: Config,
    stylesheet: String,
}

impl Pipeline {
    pub fn new(config: Config, stylesheet: String) -> Self {
        Self { config, stylesheet }
    }

    /// Convert every markdown file under the input root, strictly one file
    /// at a time. A failing file aborts the remaining batch.
    ///
    /// # Errors
    /// Returns the first enumeration or conversion error.
    pub fn convert_all(&self) -> Result<()> {
        let files = scan::markdown_files(&self.config.input_root)?;
        info!("Converting {} markdown file(s)", files.len());
        for file in &files {
            self.convert_file(file)?;
        }
        Ok(())
    }

    /// Convert a single markdown file to its PDF and HTML artifacts.
    ///
    /// The file is read in full at call time, so a debounced re-render
    /// always uses the latest content on disk.
    ///
    /// # Errors
    /// Returns an error if the input cannot be read, the path is not under
    /// the input root, or either export fails.
    pub fn convert_file(&self, input: &Path) -> Result<()> {
        info!("Converting {}", input.display());
        let wrapped = self.render_page(input)?;

        let pdf_dest = output_path(input, &self.config.input_root, &self.config.pdf_root, "pdf")?;
        export::write_pdf(&wrapped, &pdf_dest)?;

        let html_dest =
            output_path(input, &self.config.input_root, &self.config.html_root, "html")?;
        export::write_html(&wrapped, &html_dest)?;
        Ok(())
    }

    /// Render a file into its wrapped page without writing artifacts.
    ///
    /// # Errors
    /// Returns an error if the input cannot be read.
    pub fn render_page(&self, input: &Path) -> Result<String> {
        let source = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        Ok(page::wrap(&render::render_fragment(&source), &self.stylesheet))
    }
}

/// Map an input path to its output artifact path.
///
/// output = `output_root` + (input relative to `input_root`), with the
/// extension replaced.
///
/// # Errors
/// Returns an error if `input` is not beneath `input_root`.
pub fn output_path(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    extension: &str,
) -> Result<PathBuf> {
    let relative = input.strip_prefix(input_root).with_context(|| {
        format!(
            "{} is not under the input root {}",
            input.display(),
            input_root.display()
        )
    })?;
    Ok(output_root.join(relative).with_extension(extension))
}
