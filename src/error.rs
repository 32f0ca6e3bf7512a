//! Error types for the edgequake-pdfbanner library.
//!
//! Every failure is fatal for the document being processed: the splice either
//! produces a complete, valid PDF or returns a [`BannerError`] and leaves no
//! output artifact behind. There is no per-page partial success because only
//! one page is ever rewritten.
//!
//! The first five variants are the core pipeline errors (fitting, geometry,
//! image, document, storage). The rest describe the input/output plumbing
//! around the core and carry enough context to print a useful CLI message.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-pdfbanner library.
#[derive(Debug, Error)]
pub enum BannerError {
    // ── Core pipeline errors ──────────────────────────────────────────────
    /// A width or height handed to the fitter was zero, negative or not finite.
    #[error("Invalid dimension: {what} = {value} (must be finite and > 0)")]
    InvalidDimension { what: &'static str, value: f64 },

    /// The document has no pages, so there is no first page to measure or replace.
    #[error("Document has no pages")]
    EmptyDocument,

    /// The page bounding box is missing, unparsable, or has zero area.
    #[error("Malformed page geometry: {detail}")]
    MalformedGeometry { detail: String },

    /// The banner image could not be decoded or normalised to RGBA.
    #[error("Unsupported image: {detail}")]
    UnsupportedImage { detail: String },

    /// Reading or writing a document or image failed at the storage boundary.
    #[error("I/O failure on '{path}': {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create, write or persist the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BannerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BannerError::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn geometry(detail: impl Into<String>) -> Self {
        BannerError::MalformedGeometry {
            detail: detail.into(),
        }
    }

    pub(crate) fn image(detail: impl std::fmt::Display) -> Self {
        BannerError::UnsupportedImage {
            detail: detail.to_string(),
        }
    }
}

impl From<image::ImageError> for BannerError {
    fn from(err: image::ImageError) -> Self {
        BannerError::image(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BannerError>;
