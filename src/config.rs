//! Configuration types for banner splicing.
//!
//! All pipeline behaviour is controlled through [`SpliceConfig`], built via
//! [`SpliceConfigBuilder`]. Storage locations used by the session/dispatch
//! layer live in the separate [`StorageConfig`] because the splice core never
//! touches the filesystem on its own.

use crate::error::BannerError;
use crate::progress::ProgressCallback;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for a first-page replacement.
///
/// # Example
/// ```rust
/// use edgequake_pdfbanner::{PageBox, ResampleFilter, SpliceConfig};
///
/// let config = SpliceConfig::builder()
///     .dpi(200)
///     .filter(ResampleFilter::CatmullRom)
///     .page_box(PageBox::CropBox)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 200);
/// ```
#[derive(Clone)]
pub struct SpliceConfig {
    /// Raster density of the banner image inside the new page. Range: 72–600. Default: 150.
    ///
    /// The banner is resampled to `points × dpi / 72` pixels. 72 gives one
    /// pixel per point; 150 keeps photos crisp on screen and in print
    /// previews without bloating the output file.
    pub dpi: u32,

    /// Longest edge of the embedded banner raster in pixels. Default: 8000.
    ///
    /// Caps memory independently of DPI: a poster-sized first page at
    /// 600 DPI would otherwise need a multi-gigabyte pixel buffer. When the
    /// fitted draw size at `dpi` exceeds the cap, the raster is scaled down
    /// (aspect ratio kept) so its longest edge equals `max_raster_edge`.
    pub max_raster_edge: u32,

    /// Resampling filter used when scaling the banner. Default: Lanczos3.
    pub filter: ResampleFilter,

    /// Which page box of the source's first page defines the banner page size.
    /// Default: [`PageBox::MediaBox`].
    pub page_box: PageBox,

    /// Apply the EXIF orientation tag when decoding images. Default: true.
    pub honor_orientation: bool,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Documents processed in parallel by [`crate::replace_many`]. Default: 4.
    pub concurrency: usize,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            max_raster_edge: 8000,
            filter: ResampleFilter::default(),
            page_box: PageBox::default(),
            honor_orientation: true,
            download_timeout_secs: 120,
            concurrency: 4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SpliceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpliceConfig")
            .field("dpi", &self.dpi)
            .field("max_raster_edge", &self.max_raster_edge)
            .field("filter", &self.filter)
            .field("page_box", &self.page_box)
            .field("honor_orientation", &self.honor_orientation)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SpliceProgressCallback>"),
            )
            .finish()
    }
}

impl SpliceConfig {
    /// Create a new builder for `SpliceConfig`.
    pub fn builder() -> SpliceConfigBuilder {
        SpliceConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SpliceConfig`].
#[derive(Debug)]
pub struct SpliceConfigBuilder {
    config: SpliceConfig,
}

impl SpliceConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_raster_edge(mut self, px: u32) -> Self {
        self.config.max_raster_edge = px.max(100);
        self
    }

    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn page_box(mut self, page_box: PageBox) -> Self {
        self.config.page_box = page_box;
        self
    }

    pub fn honor_orientation(mut self, v: bool) -> Self {
        self.config.honor_orientation = v;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SpliceConfig, BannerError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(BannerError::InvalidConfig(
                "Download timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Resampling filter applied when the banner is scaled to its draw size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    /// Windowed sinc, the sharpest option for downscaling photos. (default)
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(f: ResampleFilter) -> Self {
        match f {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Page boundary used as the banner's target geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageBox {
    /// The physical medium (`/MediaBox`). (default)
    #[default]
    MediaBox,
    /// The visible region (`/CropBox`), falling back to the MediaBox when absent.
    CropBox,
}

// ── Storage ──────────────────────────────────────────────────────────────

/// Filesystem layout for the session/dispatch layer.
///
/// Banners live in `<data_dir>/banners/<session>/banner.png`; per-request
/// artifacts live in `<data_dir>/tmp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl StorageConfig {
    /// Environment variable naming the data directory.
    pub const DATA_DIR_ENV: &'static str = "DATA_DIR";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Read `DATA_DIR` from the environment; unset or empty means `.`.
    pub fn from_env() -> Self {
        match std::env::var(Self::DATA_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    pub fn banner_dir(&self) -> PathBuf {
        self.data_dir.join("banners")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.data_dir.join("tmp")
    }

    /// Create the banner and tmp directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> Result<(), BannerError> {
        for dir in [self.banner_dir(), self.tmp_dir()] {
            create_dir(&dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<(), BannerError> {
    std::fs::create_dir_all(dir).map_err(|e| BannerError::io(dir, e))
}
