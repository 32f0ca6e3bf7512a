//! # edgequake-pdfbanner
//!
//! Replace the first page of a PDF with a full-page banner image.
//!
//! The banner is scaled to fit the original first page (aspect ratio kept,
//! centered, never cropped), placed on a fresh page of exactly the same size,
//! and spliced in front of the untouched pages 2..N. Retained pages are
//! deep-copied object by object: their content streams keep their original
//! bytes, so text stays selectable and vector art stays vector.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF + image
//!  │
//!  ├─ 1. Input    resolve local file or download from URL; decode image
//!  ├─ 2. Measure  first-page MediaBox (or CropBox), inheritance-aware
//!  ├─ 3. Fit      contain-fit the image into the page, centered
//!  ├─ 4. Render   resample at the configured DPI, build a one-page document
//!  ├─ 5. Splice   banner page + deep copies of source pages 2..N
//!  └─ 6. Output   serialise; atomic write when targeting a file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfbanner::{replace_first_page_to_file, SpliceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SpliceConfig::default();
//!     let stats = replace_first_page_to_file(
//!         "report.pdf",
//!         "banner.png",
//!         "report_banner.pdf",
//!         &config,
//!     )
//!     .await?;
//!     eprintln!("{} pages, {} bytes", stats.output_pages, stats.output_bytes);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfbanner` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdfbanner = { version = "0.1", default-features = false }
//! ```
//!
//! ## Chat front ends
//!
//! [`dispatch::Dispatcher`] implements the `/setbanner`, `/removebanner`,
//! `/status` and `/process` conversation on top of per-session banner
//! storage, independent of any messaging transport.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod banner;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod replace;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use banner::BannerStore;
pub use config::{PageBox, ResampleFilter, SpliceConfig, SpliceConfigBuilder, StorageConfig};
pub use dispatch::{Attachment, Dispatcher, Event, Reply};
pub use error::BannerError;
pub use output::{BatchResult, DocumentInfo, SpliceOutput, SpliceStats};
pub use pipeline::fit::{fit, FitResult};
pub use pipeline::geometry::{first_page_size, PageSize};
pub use pipeline::render::{render_image_page, RenderedPage};
pub use pipeline::splice::splice;
pub use progress::{NoopProgressCallback, ProgressCallback, SpliceProgressCallback, SpliceStage};
pub use replace::{
    default_output_path, inspect, replace_first_page, replace_first_page_from_bytes,
    replace_first_page_sync, replace_first_page_to_file, replace_many, splice_document,
};
pub use session::{SessionId, SessionState, SessionStore};
