//! Top-level entry points: replace the first page of one or many PDFs.
//!
//! All PDF and image work is CPU-bound and runs inside
//! [`tokio::task::spawn_blocking`]; the async functions here only resolve
//! inputs, download URLs and fan out batch work.
//!
//! Outputs written to disk go through [`write_atomic`]: the PDF is staged in
//! a temp file next to the destination and renamed into place only once it
//! is complete, so a failed run never leaves a truncated file behind.

use crate::config::{PageBox, SpliceConfig};
use crate::error::{BannerError, Result};
use crate::output::{BatchResult, DocumentInfo, SpliceOutput, SpliceStats};
use crate::pipeline::geometry;
use crate::pipeline::{input, render, splice};
use crate::progress::SpliceStage;
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use lopdf::{Document, Object};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Label used in progress events for in-memory inputs.
const MEMORY_LABEL: &str = "<memory>";

/// Suffix appended to the input's file stem for default output names.
pub const OUTPUT_SUFFIX: &str = "_banner";

/// Replace the first page of a PDF (path or URL) with a banner image.
///
/// # Errors
/// Input errors (`FileNotFound`, `NotAPdf`, `Download*`), `CorruptPdf`,
/// `UnsupportedImage` for the banner, plus every pipeline error:
/// `EmptyDocument`, `MalformedGeometry`, `InvalidDimension`.
pub async fn replace_first_page(
    input_str: impl AsRef<str>,
    banner_path: impl AsRef<Path>,
    config: &SpliceConfig,
) -> Result<SpliceOutput> {
    let input_str = input_str.as_ref();
    let banner = Banner::Path(banner_path.as_ref().to_path_buf());
    tracked(input_str, config, run(input_str, banner, config)).await
}

/// Replace the first page and write the result to `output_path` atomically.
pub async fn replace_first_page_to_file(
    input_str: impl AsRef<str>,
    banner_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &SpliceConfig,
) -> Result<SpliceStats> {
    let output = replace_first_page(input_str, banner_path, config).await?;
    persist(output, output_path.as_ref()).await
}

/// Replace the first page of an in-memory PDF with an in-memory image.
///
/// This is the API used by the dispatch layer, where both files arrive as
/// message attachments.
pub async fn replace_first_page_from_bytes(
    pdf_bytes: &[u8],
    image_bytes: &[u8],
    config: &SpliceConfig,
) -> Result<SpliceOutput> {
    let pdf = pdf_bytes.to_vec();
    let image = image_bytes.to_vec();
    let cfg = config.clone();
    let job = blocking(move || {
        stage(&cfg, MEMORY_LABEL, SpliceStage::Load);
        let started = Instant::now();
        let source = input::parse_pdf(&pdf, Path::new(MEMORY_LABEL))?;
        let banner = input::decode_image(&image, cfg.honor_orientation)?;
        splice_labelled(MEMORY_LABEL, &source, &banner, &cfg, started)
    });
    tracked(MEMORY_LABEL, config, job).await
}

/// Synchronous wrapper around [`replace_first_page`].
///
/// Creates a temporary tokio runtime internally.
pub fn replace_first_page_sync(
    input_str: impl AsRef<str>,
    banner_path: impl AsRef<Path>,
    config: &SpliceConfig,
) -> Result<SpliceOutput> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BannerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(replace_first_page(input_str, banner_path, config))
}

/// Replace the first page of many documents with the same banner.
///
/// Documents are processed concurrently (`config.concurrency` at a time) and
/// each is written to `out_dir/<stem>_banner.pdf`. One failing document does
/// not stop the others; inspect [`BatchResult::error`]. Results are returned
/// in input order.
pub async fn replace_many(
    inputs: &[String],
    banner_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &SpliceConfig,
) -> Vec<BatchResult> {
    let out_dir = out_dir.as_ref();
    let outputs = batch_output_paths(inputs, out_dir);

    let banner_path = banner_path.as_ref().to_path_buf();
    let honor = config.honor_orientation;
    let image = match blocking(move || input::load_image(&banner_path, honor)).await {
        Ok(img) => Arc::new(img),
        Err(e) => {
            warn!("Banner could not be loaded, skipping batch: {}", e);
            let msg = e.to_string();
            return inputs
                .iter()
                .zip(outputs)
                .map(|(input, output)| BatchResult {
                    input: input.clone(),
                    output,
                    stats: None,
                    error: Some(msg.clone()),
                })
                .collect();
        }
    };

    info!(
        "Batch: {} documents → {} (concurrency {})",
        inputs.len(),
        out_dir.display(),
        config.concurrency
    );

    let mut results: Vec<(usize, BatchResult)> =
        stream::iter(inputs.iter().zip(outputs).enumerate().map(|(idx, (input, output))| {
            let banner = Banner::Image(Arc::clone(&image));
            async move {
                let job = async {
                    let spliced = run(input, banner, config).await?;
                    persist(spliced, &output).await
                };
                let result = tracked_stats(input, config, job).await;
                let batch = match result {
                    Ok(stats) => BatchResult {
                        input: input.clone(),
                        output,
                        stats: Some(stats),
                        error: None,
                    },
                    Err(e) => BatchResult {
                        input: input.clone(),
                        output,
                        stats: None,
                        error: Some(e.to_string()),
                    },
                };
                (idx, batch)
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    results.sort_by_key(|(idx, _)| *idx);
    let results: Vec<BatchResult> = results.into_iter().map(|(_, r)| r).collect();
    let failed = results.iter().filter(|r| !r.is_ok()).count();
    info!(
        "Batch complete: {}/{} succeeded",
        results.len() - failed,
        results.len()
    );
    results
}

/// Report page count, version and first-page geometry without splicing.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentInfo> {
    let resolved =
        input::resolve_input(input_str.as_ref(), SpliceConfig::default().download_timeout_secs)
            .await?;
    let path = resolved.path().to_path_buf();
    let info = blocking(move || input::open_pdf(&path).map(|doc| document_info(&doc))).await?;
    drop(resolved);
    Ok(info)
}

/// Blocking core: measure the first page, render the banner, splice, serialise.
///
/// `source` is not modified.
pub fn splice_document(
    source: &Document,
    banner: &DynamicImage,
    config: &SpliceConfig,
) -> Result<SpliceOutput> {
    splice_labelled(MEMORY_LABEL, source, banner, config, Instant::now())
}

/// File name `<stem>_banner.pdf` for an input path or URL.
pub fn output_file_name(input_str: &str) -> String {
    let last = if input::is_url(input_str) {
        reqwest::Url::parse(input_str)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut s| s.next_back())
                    .map(str::to_string)
            })
            .unwrap_or_default()
    } else {
        input_str.to_string()
    };
    let stem = Path::new(&last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string());
    format!("{stem}{OUTPUT_SUFFIX}.pdf")
}

/// Default output path for a single input: next to a local file, or in the
/// current directory for URLs.
pub fn default_output_path(input_str: &str) -> PathBuf {
    let name = output_file_name(input_str);
    if input::is_url(input_str) {
        return PathBuf::from(name);
    }
    match Path::new(input_str).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}

/// Write `bytes` to `path` via a sibling temp file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let failed = |source: std::io::Error| BannerError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(failed)?;
    tmp.write_all(bytes).map_err(failed)?;
    tmp.as_file().sync_all().map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

enum Banner {
    Path(PathBuf),
    Image(Arc<DynamicImage>),
}

async fn run(input_str: &str, banner: Banner, config: &SpliceConfig) -> Result<SpliceOutput> {
    stage(config, input_str, SpliceStage::Load);
    let started = Instant::now();
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    let label = input_str.to_string();
    let cfg = config.clone();
    let output = blocking(move || {
        let source = input::open_pdf(&pdf_path)?;
        let image = match banner {
            Banner::Path(path) => Arc::new(input::load_image(&path, cfg.honor_orientation)?),
            Banner::Image(img) => img,
        };
        splice_labelled(&label, &source, &image, &cfg, started)
    })
    .await;

    // The downloaded temp file must outlive the blocking task.
    drop(resolved);
    output
}

fn splice_labelled(
    label: &str,
    source: &Document,
    banner: &DynamicImage,
    config: &SpliceConfig,
    started: Instant,
) -> Result<SpliceOutput> {
    stage(config, label, SpliceStage::Measure);
    let source_pages = geometry::page_count(source);
    let page_size = geometry::first_page_size(source, config.page_box)?;
    info!(
        "{}: {} pages, first page {:.2} x {:.2} pt",
        label, source_pages, page_size.width, page_size.height
    );

    stage(config, label, SpliceStage::Render);
    let render_start = Instant::now();
    let page = render::render_image_page(banner, page_size, config)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    stage(config, label, SpliceStage::Splice);
    let splice_start = Instant::now();
    let mut doc = splice::splice(source, &page)?;
    let splice_duration_ms = splice_start.elapsed().as_millis() as u64;

    stage(config, label, SpliceStage::Write);
    let output_pages = geometry::page_count(&doc);
    let mut pdf = Vec::new();
    doc.save_to(&mut pdf)
        .map_err(|e| BannerError::Internal(format!("failed to serialise output: {e}")))?;

    let stats = SpliceStats {
        source_pages,
        output_pages,
        page_size,
        fit: page.fit,
        pixel_width: page.pixel_width,
        pixel_height: page.pixel_height,
        output_bytes: pdf.len(),
        render_duration_ms,
        splice_duration_ms,
        total_duration_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "{}: spliced {} pages, {} bytes in {}ms",
        label, stats.output_pages, stats.output_bytes, stats.total_duration_ms
    );
    Ok(SpliceOutput { pdf, stats })
}

async fn persist(output: SpliceOutput, path: &Path) -> Result<SpliceStats> {
    let path = path.to_path_buf();
    let SpliceOutput { pdf, stats } = output;
    blocking(move || write_atomic(&path, &pdf)).await?;
    Ok(stats)
}

pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BannerError::Internal(format!("blocking task failed: {e}")))?
}

/// Wrap a splice job with start/complete/error progress events.
async fn tracked(
    label: &str,
    config: &SpliceConfig,
    job: impl std::future::Future<Output = Result<SpliceOutput>>,
) -> Result<SpliceOutput> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_splice_start(label);
    }
    let result = job.await;
    if let Some(ref cb) = config.progress_callback {
        match &result {
            Ok(out) => cb.on_splice_complete(label, out.stats.output_pages),
            Err(e) => cb.on_splice_error(label, &e.to_string()),
        }
    }
    result
}

async fn tracked_stats(
    label: &str,
    config: &SpliceConfig,
    job: impl std::future::Future<Output = Result<SpliceStats>>,
) -> Result<SpliceStats> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_splice_start(label);
    }
    let result = job.await;
    if let Some(ref cb) = config.progress_callback {
        match &result {
            Ok(stats) => cb.on_splice_complete(label, stats.output_pages),
            Err(e) => cb.on_splice_error(label, &e.to_string()),
        }
    }
    result
}

fn stage(config: &SpliceConfig, label: &str, stage: SpliceStage) {
    debug!("{}: {}", label, stage);
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(label, stage);
    }
}

/// Output path per input; colliding stems get `_2`, `_3`, … appended.
fn batch_output_paths(inputs: &[String], out_dir: &Path) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let name = output_file_name(input);
            let mut candidate = name.clone();
            let mut n = 2;
            while !seen.insert(candidate.clone()) {
                let stem = name.trim_end_matches(".pdf");
                candidate = format!("{stem}_{n}.pdf");
                n += 1;
            }
            out_dir.join(candidate)
        })
        .collect()
}

fn document_info(doc: &Document) -> DocumentInfo {
    let first = geometry::first_page_id(doc).ok();
    let size_of = |page_box: PageBox| first.and_then(|id| geometry::page_size(doc, id, page_box).ok());
    let info_dict = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|o| match o {
            Object::Reference(id) => doc.get_dictionary(*id).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        });
    let text = |key: &[u8]| {
        info_dict
            .and_then(|d| d.get(key).ok())
            .and_then(|o| match o {
                Object::String(bytes, _) => Some(decode_text_string(bytes)),
                _ => None,
            })
            .filter(|s| !s.is_empty())
    };

    DocumentInfo {
        page_count: geometry::page_count(doc),
        pdf_version: doc.version.clone(),
        media_box: size_of(PageBox::MediaBox),
        crop_box: size_of(PageBox::CropBox),
        rotation: first
            .map(|id| geometry::page_rotation(doc, id))
            .unwrap_or(0),
        is_encrypted: doc.trailer.get(b"Encrypt").is_ok(),
        title: text(b"Title"),
        author: text(b"Author"),
        producer: text(b"Producer"),
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise byte-per-char.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::splice::raw_page_contents;
    use crate::pipeline::testutil::{sample_document, two_tone_image};
    use crate::progress::SpliceProgressCallback;
    use image::ImageFormat;
    use std::io::Cursor;
    use std::sync::Mutex;

    fn pdf_bytes(pages: usize) -> Vec<u8> {
        let mut doc = sample_document(pages);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn png_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        two_tone_image(40, 20)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn fixture_dir(pages: usize) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.pdf");
        let png = dir.path().join("banner.png");
        std::fs::write(&pdf, pdf_bytes(pages)).unwrap();
        std::fs::write(&png, png_bytes()).unwrap();
        (dir, pdf, png)
    }

    fn config() -> SpliceConfig {
        SpliceConfig::builder().dpi(72).build().unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SpliceProgressCallback for Recorder {
        fn on_splice_start(&self, _input: &str) {
            self.events.lock().unwrap().push("start".into());
        }
        fn on_stage(&self, _input: &str, stage: SpliceStage) {
            self.events.lock().unwrap().push(stage.to_string());
        }
        fn on_splice_complete(&self, _input: &str, output_pages: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete:{output_pages}"));
        }
        fn on_splice_error(&self, _input: &str, _error: &str) {
            self.events.lock().unwrap().push("error".into());
        }
    }

    #[test]
    fn splice_document_keeps_page_count() {
        let source = sample_document(3);
        let out = splice_document(&source, &two_tone_image(100, 50), &config()).unwrap();
        assert_eq!(out.stats.source_pages, 3);
        assert_eq!(out.stats.output_pages, 3);
        assert_eq!(out.stats.output_bytes, out.pdf.len());

        let reloaded = Document::load_mem(&out.pdf).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);

        let src_pages: Vec<_> = source.get_pages().into_values().collect();
        let out_pages: Vec<_> = reloaded.get_pages().into_values().collect();
        assert_eq!(
            raw_page_contents(&source, src_pages[2]).unwrap(),
            raw_page_contents(&reloaded, out_pages[2]).unwrap()
        );
    }

    #[test]
    fn splice_document_reports_fit() {
        let source = sample_document(1);
        let out = splice_document(&source, &two_tone_image(100, 50), &config()).unwrap();
        // 100x50 on 595x842: width-limited.
        assert!((out.stats.fit.draw_width - 595.0).abs() < 1e-9);
        assert!((out.stats.fit.draw_height - 297.5).abs() < 1e-9);
        assert_eq!((out.stats.pixel_width, out.stats.pixel_height), (595, 298));
    }

    #[tokio::test]
    async fn from_bytes_roundtrip() {
        let out = replace_first_page_from_bytes(&pdf_bytes(2), &png_bytes(), &config())
            .await
            .unwrap();
        assert!(out.pdf.starts_with(b"%PDF"));
        assert_eq!(out.stats.output_pages, 2);
    }

    #[tokio::test]
    async fn from_bytes_rejects_bad_image() {
        let err = replace_first_page_from_bytes(&pdf_bytes(2), b"not an image", &config())
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::UnsupportedImage { .. }));
    }

    #[tokio::test]
    async fn progress_events_in_order() {
        let (_dir, pdf, png) = fixture_dir(2);
        let recorder = Arc::new(Recorder::default());
        let config = SpliceConfig::builder()
            .dpi(72)
            .progress_callback(recorder.clone())
            .build()
            .unwrap();
        replace_first_page(pdf.to_str().unwrap(), &png, &config)
            .await
            .unwrap();
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["start", "load", "measure", "render", "splice", "write", "complete:2"]
        );
    }

    #[tokio::test]
    async fn error_event_on_missing_banner() {
        let (dir, pdf, _png) = fixture_dir(2);
        let recorder = Arc::new(Recorder::default());
        let config = SpliceConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();
        let err = replace_first_page(pdf.to_str().unwrap(), dir.path().join("nope.png"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::FileNotFound { .. }));
        assert_eq!(recorder.events.lock().unwrap().last().unwrap(), "error");
    }

    #[tokio::test]
    async fn to_file_is_atomic_and_complete() {
        let (dir, pdf, png) = fixture_dir(3);
        let out = dir.path().join("nested").join("out.pdf");
        let stats = replace_first_page_to_file(pdf.to_str().unwrap(), &png, &out, &config())
            .await
            .unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(bytes.len(), stats.output_bytes);
        // No staging files remain next to the output.
        let leftovers = std::fs::read_dir(out.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn failure_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.pdf");
        let mut doc = crate::pipeline::testutil::document_with_boxes(&[]);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        std::fs::write(&empty, buf).unwrap();
        let png = dir.path().join("banner.png");
        std::fs::write(&png, png_bytes()).unwrap();

        let out = dir.path().join("out.pdf");
        let err = replace_first_page_to_file(empty.to_str().unwrap(), &png, &out, &config())
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::EmptyDocument));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn batch_processes_each_document() {
        let (dir, pdf, png) = fixture_dir(2);
        let missing = dir.path().join("missing.pdf");
        let inputs = vec![
            pdf.to_string_lossy().into_owned(),
            missing.to_string_lossy().into_owned(),
        ];
        let out_dir = dir.path().join("out");
        let results = replace_many(&inputs, &png, &out_dir, &config()).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[0].output, out_dir.join("report_banner.pdf"));
        assert!(results[0].output.exists());
        assert!(!results[1].is_ok());
        assert!(!results[1].output.exists());
    }

    #[tokio::test]
    async fn batch_with_bad_banner_fails_every_document() {
        let (dir, pdf, _png) = fixture_dir(1);
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"garbage").unwrap();
        let inputs = vec![pdf.to_string_lossy().into_owned()];
        let results = replace_many(&inputs, &bad, dir.path(), &config()).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].error.as_ref().unwrap().contains("Unsupported image"));
    }

    #[tokio::test]
    async fn inspect_reports_geometry() {
        let (_dir, pdf, _png) = fixture_dir(4);
        let info = inspect(pdf.to_str().unwrap()).await.unwrap();
        assert_eq!(info.page_count, 4);
        let media = info.media_box.unwrap();
        assert_eq!((media.width, media.height), (595.0, 842.0));
        assert_eq!(info.crop_box.unwrap().width, 595.0);
        assert_eq!(info.rotation, 0);
        assert!(!info.is_encrypted);
    }

    #[test]
    fn output_names() {
        assert_eq!(output_file_name("/tmp/a/report.pdf"), "report_banner.pdf");
        assert_eq!(
            output_file_name("https://example.com/x/paper.pdf?dl=1"),
            "paper_banner.pdf"
        );
        assert_eq!(output_file_name("https://example.com/"), "document_banner.pdf");
        assert_eq!(
            default_output_path("/tmp/a/report.pdf"),
            PathBuf::from("/tmp/a/report_banner.pdf")
        );
        assert_eq!(default_output_path("report.pdf"), PathBuf::from("report_banner.pdf"));
    }

    #[test]
    fn batch_names_do_not_collide() {
        let inputs = vec!["a/doc.pdf".to_string(), "b/doc.pdf".to_string(), "c/doc.pdf".to_string()];
        let paths = batch_output_paths(&inputs, Path::new("out"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/doc_banner.pdf"),
                PathBuf::from("out/doc_banner_2.pdf"),
                PathBuf::from("out/doc_banner_3.pdf"),
            ]
        );
    }

    #[test]
    fn text_strings_decode() {
        assert_eq!(decode_text_string(b"Plain"), "Plain");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }
}
