//! Pipeline stages for first-page banner replacement.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable against in-memory documents.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ geometry ──▶ fit ──▶ render ──▶ splice
//! (path/URL)  (page 1 box)  (scale)  (banner page)  (new document)
//!                                  │
//!                                  └─ encode (RGB + SMask XObjects)
//! ```
//!
//! 1. [`input`]    — resolve paths/URLs, parse the PDF, decode the image
//! 2. [`geometry`] — read the first page's box (inheritance-aware)
//! 3. [`fit`]      — aspect-preserving contain-fit and centering
//! 4. [`render`]   — resample the image and build a one-page banner document
//! 5. [`encode`]   — split RGBA into Flate-compressed image streams
//! 6. [`splice`]   — banner page + deep copies of source pages 2..N
//!
//! All stages are synchronous; the async entry points in
//! [`crate::replace`] run them inside `spawn_blocking`.

pub mod encode;
pub mod fit;
pub mod geometry;
pub mod input;
pub mod render;
pub mod splice;

#[cfg(test)]
pub(crate) mod testutil;
