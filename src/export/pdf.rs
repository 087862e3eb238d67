//! PDF export through a headless browser.
//!
//! Each call launches its own Chromium instance, loads the wrapped page,
//! and prints it to an A4 PDF. The `Browser` handle kills its child
//! process on drop, so teardown happens on every exit path including
//! print failures.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use headless_chrome::protocol::cdp::Emulation;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

/// A4 paper size in inches.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Rasterize a wrapped page to a PDF file at `dest`.
///
/// The page is loaded as a data: URL, navigation and web-font loading are
/// awaited, and screen (not print) media is emulated so screen-targeted
/// styles apply. Backgrounds are printed and a CSS-declared page size
/// takes precedence over A4.
///
/// # Errors
/// Returns an error if the browser cannot launch, the page fails to
/// settle, or the destination cannot be created or written.
pub fn write_pdf(page: &str, dest: &Path) -> Result<()> {
    super::ensure_parent(dest)?;

    debug!("Launching headless browser");
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .args(vec![
            OsStr::new("--disable-gpu"),
            OsStr::new("--disable-software-rasterizer"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-background-timer-throttling"),
            OsStr::new("--disable-renderer-backgrounding"),
            OsStr::new("--disable-backgrounding-occluded-windows"),
        ])
        .build()
        .map_err(|err| anyhow!("Failed to assemble browser launch options: {err}"))?;
    let browser = Browser::new(launch_options).context("Failed to launch headless browser")?;

    let tab = browser.new_tab().context("Failed to open browser tab")?;
    let url = format!("data:text/html;base64,{}", STANDARD.encode(page));
    tab.navigate_to(&url).context("Failed to load page")?;
    tab.wait_until_navigated().context("Page failed to settle")?;
    // Wait out the web-font import; it is the page's only network activity.
    tab.evaluate("document.fonts.ready.then(() => true)", true)
        .context("Fonts failed to settle")?;
    tab.call_method(Emulation::SetEmulatedMedia {
        media: Some("screen".to_string()),
        features: None,
    })
    .context("Failed to emulate screen media")?;

    let pdf = tab
        .print_to_pdf(Some(PrintToPdfOptions {
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            ..PrintToPdfOptions::default()
        }))
        .context("Failed to print page to PDF")?;

    fs::write(dest, pdf).with_context(|| format!("Failed to write PDF to {}", dest.display()))?;
    info!("PDF written to {}", dest.display());
    Ok(())
}
