//! Input resolution: turn a user-supplied path, URL or byte buffer into a
//! parsed [`Document`] or decoded banner image.
//!
//! URLs are downloaded into a `TempDir` that lives as long as the returned
//! [`ResolvedInput`], so the file is cleaned up even if processing fails
//! part-way. The `%PDF` magic is checked before parsing so a stray HTML error
//! page or image produces [`BannerError::NotAPdf`] rather than a parser error.

use crate::error::{BannerError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::Document;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// The resolved input: either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the PDF lives in a temp directory kept alive here.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// URLs are downloaded; local paths are checked for existence, read
/// permission and the `%PDF` magic.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput> {
    if input.trim().is_empty() {
        return Err(BannerError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

fn resolve_local(path_str: &str) -> Result<ResolvedInput> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(BannerError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != PDF_MAGIC {
                return Err(BannerError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(BannerError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(BannerError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput> {
    info!("Downloading PDF from: {}", url);

    let parsed = reqwest::Url::parse(url).map_err(|_| BannerError::InvalidInput {
        input: url.to_string(),
    })?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| BannerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let failed = |e: reqwest::Error| {
        if e.is_timeout() {
            BannerError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            BannerError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(parsed.clone()).send().await.map_err(failed)?;
    if !response.status().is_success() {
        return Err(BannerError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    let bytes = response.bytes().await.map_err(failed)?;

    let temp_dir = TempDir::new().map_err(|e| BannerError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename_from_url(&parsed));

    check_magic(&bytes, &file_path)?;
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| BannerError::io(&file_path, e))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL if it looks like a file name.
fn filename_from_url(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty() && last.contains('.'))
        .map(str::to_string)
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}

fn check_magic(bytes: &[u8], origin: &Path) -> Result<()> {
    if bytes.len() >= 4 && &bytes[..4] == PDF_MAGIC {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    Err(BannerError::NotAPdf {
        path: origin.to_path_buf(),
        magic,
    })
}

/// Read a whole file, mapping the common failure kinds to specific errors.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BannerError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => BannerError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => BannerError::io(path, e),
    })
}

/// Parse an in-memory PDF. `origin` is only used in error messages.
///
/// # Errors
/// * [`BannerError::NotAPdf`] — the buffer does not start with `%PDF`.
/// * [`BannerError::CorruptPdf`] — lopdf could not parse the document.
pub fn parse_pdf(bytes: &[u8], origin: &Path) -> Result<Document> {
    check_magic(bytes, origin)?;
    let doc = Document::load_mem(bytes).map_err(|e| BannerError::CorruptPdf {
        detail: format!("{}: {e}", origin.display()),
    })?;
    debug!(
        "Parsed {} (PDF {}, {} objects)",
        origin.display(),
        doc.version,
        doc.objects.len()
    );
    Ok(doc)
}

/// Read and parse a local PDF.
pub fn open_pdf(path: &Path) -> Result<Document> {
    let bytes = read_file(path)?;
    parse_pdf(&bytes, path)
}

/// Decode an image whose format is guessed from its content.
///
/// With `honor_orientation`, an EXIF orientation tag (phone photos) is
/// applied so the banner appears upright.
pub fn decode_image(bytes: &[u8], honor_orientation: bool) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BannerError::image)?;
    if reader.format().is_none() {
        return Err(BannerError::image("unrecognised image format"));
    }

    let mut decoder = reader.into_decoder()?;
    let orientation = if honor_orientation {
        decoder.orientation().ok()
    } else {
        None
    };
    let mut img = DynamicImage::from_decoder(decoder)?;
    if let Some(orientation) = orientation {
        img.apply_orientation(orientation);
    }

    if img.width() == 0 || img.height() == 0 {
        return Err(BannerError::image("image has no pixels"));
    }
    debug!("Decoded banner image {}x{}", img.width(), img.height());
    Ok(img)
}

/// Read and decode a banner image from disk.
pub fn load_image(path: &Path, honor_orientation: bool) -> Result<DynamicImage> {
    let bytes = read_file(path)?;
    decode_image(&bytes, honor_orientation).map_err(|e| match e {
        BannerError::UnsupportedImage { detail } => BannerError::UnsupportedImage {
            detail: format!("{}: {detail}", path.display()),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testutil::{sample_document, two_tone_image};
    use image::ImageFormat;

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn pdf_bytes(pages: usize) -> Vec<u8> {
        let mut doc = sample_document(pages);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn filename_from_url_uses_last_segment() {
        let url = reqwest::Url::parse("https://example.com/a/report.pdf?x=1").unwrap();
        assert_eq!(filename_from_url(&url), "report.pdf");
        let url = reqwest::Url::parse("https://example.com/download/").unwrap();
        assert_eq!(filename_from_url(&url), "downloaded.pdf");
    }

    #[tokio::test]
    async fn missing_local_file() {
        let err = resolve_input("/definitely/not/here.pdf", 5).await.unwrap_err();
        assert!(matches!(err, BannerError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn empty_input_is_invalid() {
        let err = resolve_input("  ", 5).await.unwrap_err();
        assert!(matches!(err, BannerError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn local_non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"<html>oops</html>").unwrap();
        let err = resolve_input(path.to_str().unwrap(), 5).await.unwrap_err();
        match err {
            BannerError::NotAPdf { magic, .. } => assert_eq!(&magic, b"<htm"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn local_pdf_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, pdf_bytes(1)).unwrap();
        let resolved = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.path(), path.as_path());
    }

    #[test]
    fn parse_pdf_roundtrip_and_errors() {
        let doc = parse_pdf(&pdf_bytes(2), Path::new("mem.pdf")).unwrap();
        assert_eq!(doc.get_pages().len(), 2);

        let err = parse_pdf(b"%P", Path::new("short.pdf")).unwrap_err();
        assert!(matches!(err, BannerError::NotAPdf { .. }));

        let err = parse_pdf(b"%PDF-1.7\ngarbage", Path::new("bad.pdf")).unwrap_err();
        assert!(matches!(err, BannerError::CorruptPdf { .. }), "{err}");
    }

    #[test]
    fn open_pdf_missing_file() {
        let err = open_pdf(Path::new("/nope/missing.pdf")).unwrap_err();
        assert!(matches!(err, BannerError::FileNotFound { .. }));
    }

    #[test]
    fn decode_png() {
        let img = decode_image(&png_bytes(&two_tone_image(12, 7)), true).unwrap();
        assert_eq!((img.width(), img.height()), (12, 7));
    }

    #[test]
    fn decode_garbage_is_unsupported() {
        let err = decode_image(b"definitely not an image", true).unwrap_err();
        assert!(matches!(err, BannerError::UnsupportedImage { .. }));

        // Valid PNG signature with a truncated body.
        let mut bytes = png_bytes(&two_tone_image(4, 4));
        bytes.truncate(20);
        let err = decode_image(&bytes, true).unwrap_err();
        assert!(matches!(err, BannerError::UnsupportedImage { .. }));
    }

    #[test]
    fn load_image_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.png");
        std::fs::write(&path, b"nope").unwrap();
        let err = load_image(&path, false).unwrap_err();
        assert!(err.to_string().contains("banner.png"), "{err}");
    }

    /// A `width`x`height` JPEG whose EXIF block says "rotate 90° clockwise"
    /// (Orientation = 6), as phone cameras write it.
    fn jpeg_with_orientation_6(width: u32, height: u32) -> Vec<u8> {
        let mut plain = Vec::new();
        DynamicImage::ImageRgb8(two_tone_image(width, height).to_rgb8())
            .write_to(&mut Cursor::new(&mut plain), ImageFormat::Jpeg)
            .unwrap();
        assert_eq!(&plain[..2], &[0xFF, 0xD8]);

        #[rustfmt::skip]
        let tiff: [u8; 26] = [
            b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, // big-endian, IFD0 at 8
            0x00, 0x01,                                     // one entry
            0x01, 0x12, 0x00, 0x03,                         // Orientation, SHORT
            0x00, 0x00, 0x00, 0x01,                         // count 1
            0x00, 0x06, 0x00, 0x00,                         // value 6
            0x00, 0x00, 0x00, 0x00,                         // no next IFD
        ];
        let payload_len = (2 + 6 + tiff.len()) as u16;

        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
        out.extend_from_slice(&payload_len.to_be_bytes());
        out.extend_from_slice(b"Exif\0\0");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&plain[2..]);
        out
    }

    #[test]
    fn exif_orientation_is_applied_when_honored() {
        let bytes = jpeg_with_orientation_6(8, 4);
        let img = decode_image(&bytes, true).unwrap();
        assert_eq!((img.width(), img.height()), (4, 8));
    }

    #[test]
    fn exif_orientation_is_ignored_when_disabled() {
        let bytes = jpeg_with_orientation_6(8, 4);
        let img = decode_image(&bytes, false).unwrap();
        assert_eq!((img.width(), img.height()), (8, 4));
    }
}
