//! Chat-style command dispatch over the splice pipeline.
//!
//! A front end (chat bot, CLI) turns incoming messages into [`Event`]s and
//! sends the returned [`Reply`] back to the user. The dispatcher owns no
//! transport: attachments arrive as bytes and the processed PDF is handed
//! back as a path in `tmp_dir` (`<session>_<message>_out.pdf`), which the
//! caller sends and then deletes.
//!
//! ```text
//!            SetBanner                 Image (ok or failed)
//!   Idle ───────────────▶ AwaitingBanner ──────────────────▶ Idle
//! ```
//!
//! Documents are processed in any state as long as a banner is stored.

use crate::banner::BannerStore;
use crate::config::{SpliceConfig, StorageConfig};
use crate::error::{BannerError, Result};
use crate::replace::{blocking, replace_first_page_from_bytes, write_atomic};
use crate::session::{SessionId, SessionStore};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PDF_MIME: &str = "application/pdf";

/// A file attached to a message.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Id of the carrying message; used to name temporary files.
    pub message_id: i64,
    pub bytes: Vec<u8>,
    /// Declared MIME type. `None` for chat photos, which are always images.
    pub mime: Option<String>,
}

impl Attachment {
    fn is_image(&self) -> bool {
        self.mime.as_deref().map_or(true, |m| m.starts_with("image/"))
    }

    fn is_pdf(&self) -> bool {
        self.mime.as_deref() == Some(PDF_MIME)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Start,
    SetBanner,
    RemoveBanner,
    Status,
    /// A photo or image-like attachment.
    Image(Attachment),
    /// A file attachment of any type.
    Document(Attachment),
    /// Explicit request to process the document the message replies to.
    Process { replied: Option<Attachment> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Greeting,
    AwaitingBanner,
    BannerSaved,
    BannerSaveFailed(String),
    /// An attachment arrived while awaiting a banner but is not an image.
    ImageRequired,
    BannerRemoved,
    NoBannerToRemove,
    RemoveFailed(String),
    BannerSet,
    NoBanner,
    /// A PDF arrived but the session has no banner yet.
    BannerRequired,
    Processed { path: PathBuf },
    ProcessFailed(String),
    ProcessUsage,
    /// Nothing to say (e.g. an image nobody asked for).
    Ignored,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Greeting => f.write_str(
                "Hello! Send /setbanner to upload a banner, then send a PDF to replace its first page with that banner.",
            ),
            Reply::AwaitingBanner => f.write_str(
                "Okay, send the banner image now as a photo or image file. I will save it for this chat.",
            ),
            Reply::BannerSaved => f.write_str("Banner saved for this chat."),
            Reply::BannerSaveFailed(e) => write!(f, "Failed to save banner: {e}"),
            Reply::ImageRequired => f.write_str("Please send a PNG or JPG image."),
            Reply::BannerRemoved => f.write_str("Banner removed for this chat."),
            Reply::NoBannerToRemove => f.write_str("No banner was set for this chat."),
            Reply::RemoveFailed(e) => write!(f, "Failed to remove banner: {e}"),
            Reply::BannerSet => f.write_str("Banner is set for this chat."),
            Reply::NoBanner => f.write_str("No banner set. Use /setbanner to upload one."),
            Reply::BannerRequired => f.write_str(
                "No banner set for this chat. Use /setbanner to upload a banner first.",
            ),
            Reply::Processed { .. } => {
                f.write_str("Here is your edited PDF (first page replaced with banner).")
            }
            Reply::ProcessFailed(e) => write!(f, "Failed to process PDF: {e}"),
            Reply::ProcessUsage => {
                f.write_str("Reply to a PDF message with /process to replace its first page.")
            }
            Reply::Ignored => Ok(()),
        }
    }
}

/// Routes events to the session store, banner store and splice pipeline.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sessions: Arc<SessionStore>,
    banners: BannerStore,
    tmp_dir: PathBuf,
    config: SpliceConfig,
}

impl Dispatcher {
    pub fn new(
        sessions: Arc<SessionStore>,
        banners: BannerStore,
        tmp_dir: impl Into<PathBuf>,
        config: SpliceConfig,
    ) -> Self {
        Self {
            sessions,
            banners,
            tmp_dir: tmp_dir.into(),
            config,
        }
    }

    /// Build a dispatcher over the storage layout, creating its directories.
    pub fn from_storage(storage: &StorageConfig, config: SpliceConfig) -> Result<Self> {
        storage.ensure_dirs()?;
        Ok(Self::new(
            Arc::new(SessionStore::new()),
            BannerStore::new(storage.banner_dir()),
            storage.tmp_dir(),
            config,
        ))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn banners(&self) -> &BannerStore {
        &self.banners
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    pub async fn handle(&self, session: SessionId, event: Event) -> Reply {
        debug!("Session {}: {:?}", session, EventKind(&event));
        match event {
            Event::Start => Reply::Greeting,
            Event::SetBanner => {
                self.sessions.begin_awaiting(session);
                Reply::AwaitingBanner
            }
            Event::RemoveBanner => match self.banners.remove(session) {
                Ok(true) => Reply::BannerRemoved,
                Ok(false) => Reply::NoBannerToRemove,
                Err(e) => {
                    warn!("Session {}: removing banner failed: {}", session, e);
                    Reply::RemoveFailed(e.to_string())
                }
            },
            Event::Status => {
                if self.banners.exists(session) {
                    Reply::BannerSet
                } else {
                    Reply::NoBanner
                }
            }
            Event::Image(att) => self.receive_image(session, att).await,
            Event::Document(att) if att.is_pdf() => self.process_pdf(session, att).await,
            Event::Document(att) => self.receive_image(session, att).await,
            Event::Process { replied: Some(att) } => self.process_pdf(session, att).await,
            Event::Process { replied: None } => Reply::ProcessUsage,
        }
    }

    async fn receive_image(&self, session: SessionId, att: Attachment) -> Reply {
        if !self.sessions.is_awaiting(session) {
            return Reply::Ignored;
        }
        if !att.is_image() {
            return Reply::ImageRequired;
        }

        let banners = self.banners.clone();
        let bytes = att.bytes;
        let saved = blocking(move || banners.save(session, &bytes)).await;
        self.sessions.reset(session);
        match saved {
            Ok(path) => {
                info!("Session {}: banner stored at {}", session, path.display());
                Reply::BannerSaved
            }
            Err(e) => {
                warn!("Session {}: banner rejected: {}", session, e);
                Reply::BannerSaveFailed(e.to_string())
            }
        }
    }

    async fn process_pdf(&self, session: SessionId, att: Attachment) -> Reply {
        if !self.banners.exists(session) {
            return Reply::BannerRequired;
        }

        let out = self.output_path(session, att.message_id);
        match self.splice_to(&out, session, att.bytes).await {
            Ok(()) => {
                info!("Session {}: processed → {}", session, out.display());
                Reply::Processed { path: out }
            }
            Err(e) => {
                warn!("Session {}: processing failed: {}", session, e);
                Reply::ProcessFailed(e.to_string())
            }
        }
    }

    /// `<session>_<message>_out.pdf` in `tmp_dir`. Message ids are only
    /// unique within one chat, so the session is part of the name.
    fn output_path(&self, session: SessionId, message_id: i64) -> PathBuf {
        self.tmp_dir.join(format!("{session}_{message_id}_out.pdf"))
    }

    async fn splice_to(&self, out: &Path, session: SessionId, pdf: Vec<u8>) -> Result<()> {
        let banner_path = self.banners.path_for(session);
        let banner = tokio::fs::read(&banner_path)
            .await
            .map_err(|e| BannerError::io(&banner_path, e))?;
        let spliced = replace_first_page_from_bytes(&pdf, &banner, &self.config).await?;

        let out = out.to_path_buf();
        blocking(move || write_atomic(&out, &spliced.pdf)).await
    }
}

/// Debug view of an event without attachment bytes.
struct EventKind<'a>(&'a Event);

impl fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |name: &str, att: &Attachment| {
            format!(
                "{name}(message {}, {} bytes, {})",
                att.message_id,
                att.bytes.len(),
                att.mime.as_deref().unwrap_or("photo")
            )
        };
        match self.0 {
            Event::Image(att) => f.write_str(&describe("Image", att)),
            Event::Document(att) => f.write_str(&describe("Document", att)),
            Event::Process { replied: Some(att) } => f.write_str(&describe("Process", att)),
            other => write!(f, "{other:?}"),
        }
    }
}
