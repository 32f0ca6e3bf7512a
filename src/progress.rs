//! Progress-callback trait for splice events.
//!
//! Inject an [`Arc<dyn SpliceProgressCallback>`] via
//! [`crate::config::SpliceConfigBuilder::progress_callback`] to receive
//! events as each document moves through the pipeline. Batch runs process
//! several documents at once, so every event carries the input it refers to.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfbanner::{SpliceConfig, SpliceProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl SpliceProgressCallback for CountingCallback {
//!     fn on_splice_complete(&self, input: &str, output_pages: usize) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{input}: {output_pages} pages");
//!     }
//! }
//!
//! let config = SpliceConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pipeline stage reported through [`SpliceProgressCallback::on_stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpliceStage {
    /// Source PDF and banner image are being read and decoded.
    Load,
    /// First-page geometry is being extracted.
    Measure,
    /// The banner page is being resampled and encoded.
    Render,
    /// Retained pages are being copied into the output document.
    Splice,
    /// The output PDF is being serialised.
    Write,
}

impl fmt::Display for SpliceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpliceStage::Load => "load",
            SpliceStage::Measure => "measure",
            SpliceStage::Render => "render",
            SpliceStage::Splice => "splice",
            SpliceStage::Write => "write",
        };
        f.write_str(s)
    }
}

/// Called by the pipeline as it processes a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`: batch runs
/// call them concurrently from several tasks.
pub trait SpliceProgressCallback: Send + Sync {
    /// Called once before the document is loaded.
    fn on_splice_start(&self, input: &str) {
        let _ = input;
    }

    /// Called when the document enters a new stage.
    fn on_stage(&self, input: &str, stage: SpliceStage) {
        let _ = (input, stage);
    }

    /// Called after the output PDF has been produced.
    fn on_splice_complete(&self, input: &str, output_pages: usize) {
        let _ = (input, output_pages);
    }

    /// Called when the document fails; no output exists for it.
    fn on_splice_error(&self, input: &str, error: &str) {
        let _ = (input, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SpliceProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SpliceConfig`].
pub type ProgressCallback = Arc<dyn SpliceProgressCallback>;
