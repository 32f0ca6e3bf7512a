//! Result types returned by the top-level API.

use crate::pipeline::fit::FitResult;
use crate::pipeline::geometry::PageSize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A finished splice: the output PDF plus statistics about how it was built.
#[derive(Clone)]
pub struct SpliceOutput {
    /// Serialised output document.
    pub pdf: Vec<u8>,
    pub stats: SpliceStats,
}

impl fmt::Debug for SpliceOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpliceOutput")
            .field("pdf", &format_args!("<{} bytes>", self.pdf.len()))
            .field("stats", &self.stats)
            .finish()
    }
}

/// Statistics for one spliced document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpliceStats {
    /// Pages in the source document.
    pub source_pages: usize,
    /// Pages in the output (always equal to `source_pages`).
    pub output_pages: usize,
    /// Size of the source first page, which the banner page reproduces.
    pub page_size: PageSize,
    /// Placement of the banner image on its page.
    pub fit: FitResult,
    /// Raster size of the embedded banner.
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Size of the serialised output PDF.
    pub output_bytes: usize,
    pub render_duration_ms: u64,
    pub splice_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Document metadata reported by [`crate::inspect`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub pdf_version: String,
    /// First-page MediaBox size, if the document has pages and it is valid.
    pub media_box: Option<PageSize>,
    /// First-page CropBox size (MediaBox when absent).
    pub crop_box: Option<PageSize>,
    /// First-page `/Rotate` in degrees (0, 90, 180, 270).
    pub rotation: i64,
    pub is_encrypted: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub producer: Option<String>,
}

/// Per-document outcome of [`crate::replace_many`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Input path or URL as given.
    pub input: String,
    /// Destination path (written only on success).
    pub output: PathBuf,
    /// Present on success.
    pub stats: Option<SpliceStats>,
    /// Present on failure.
    pub error: Option<String>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
