// Transitive dependency version mismatches we can't control.
#![allow(clippy::multiple_crate_versions)]

//! # Pagesmith
//!
//! Watches a directory of markdown files and renders each to a styled PDF
//! and a static HTML page, re-rendering on change.
//!
//! The pipeline per file: render markdown to an HTML fragment, wrap the
//! fragment with the stylesheet bundle into a standalone page, rasterize
//! the page to an A4 PDF with a headless browser, and write the page out
//! as static HTML. A remote stylesheet is fetched once at startup and
//! combined with an optional local override; the bundle is threaded
//! explicitly through every render for the process lifetime.
//!
//! ## Modules
//!
//! - [`config`]: Paths, URL and debounce settings
//! - [`scan`]: Recursive markdown file enumeration
//! - [`style`]: Stylesheet fetch and combination
//! - [`render`]: Markdown to HTML-fragment conversion
//! - [`page`]: Standalone page wrapping
//! - [`export`]: PDF and HTML exporters
//! - [`pipeline`]: Per-file conversion and the initial batch
//! - [`watcher`]: Debounced change watching

pub mod config;
pub mod export;
pub mod page;
pub mod pipeline;
pub mod render;
pub mod scan;
pub mod style;
pub mod watcher;
