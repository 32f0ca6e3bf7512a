//! On-disk banner storage, one image per session.
//!
//! Layout: `<root>/<session id>/banner.png`. Whatever format the user
//! uploads, the stored file is always an RGBA PNG, so loading it back never
//! depends on the original encoder or EXIF orientation.

use crate::error::{BannerError, Result};
use crate::pipeline::input;
use crate::replace::write_atomic;
use crate::session::SessionId;
use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BANNER_FILE: &str = "banner.png";

#[derive(Debug, Clone)]
pub struct BannerStore {
    root: PathBuf,
}

impl BannerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the banner for `session` lives (whether or not it exists yet).
    pub fn path_for(&self, session: SessionId) -> PathBuf {
        self.root.join(session.to_string()).join(BANNER_FILE)
    }

    pub fn exists(&self, session: SessionId) -> bool {
        self.path_for(session).is_file()
    }

    /// Load the stored banner.
    ///
    /// # Errors
    /// [`BannerError::FileNotFound`] if no banner is set for the session.
    pub fn load(&self, session: SessionId) -> Result<DynamicImage> {
        input::load_image(&self.path_for(session), false)
    }

    /// Decode `bytes` (PNG or JPEG), normalise to RGBA and store as PNG.
    ///
    /// Replaces any previous banner atomically; on error the previous banner
    /// (if any) is left in place.
    pub fn save(&self, session: SessionId, bytes: &[u8]) -> Result<PathBuf> {
        let img = input::decode_image(bytes, true)?;
        let rgba = DynamicImage::ImageRgba8(img.to_rgba8());

        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let path = self.path_for(session);
        write_atomic(&path, &png)?;
        info!(
            "Saved {}x{} banner for session {} ({} bytes)",
            rgba.width(),
            rgba.height(),
            session,
            png.len()
        );
        Ok(path)
    }

    /// Delete the banner. Returns whether one existed.
    pub fn remove(&self, session: SessionId) -> Result<bool> {
        let path = self.path_for(session);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed banner {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BannerError::io(path, e)),
        }
    }
}
