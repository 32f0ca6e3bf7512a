//! CLI binary for edgequake-pdfbanner.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SpliceConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use edgequake_pdfbanner::{
    default_output_path, inspect, replace_first_page_to_file, replace_many, Attachment,
    Dispatcher, Event, PageBox, ProgressCallback, Reply, ResampleFilter, SessionId,
    SpliceConfig, SpliceProgressCallback, StorageConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Batch progress callback using indicatif ──────────────────────────────────

/// One bar tick per finished document; documents complete out of order.
struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    fn new(total: usize) -> Arc<Self> {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Splicing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SpliceProgressCallback for BatchProgress {
    fn on_splice_start(&self, input: &str) {
        self.bar.set_message(input.to_string());
    }

    fn on_splice_complete(&self, input: &str, output_pages: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            input,
            dim(&format!("{output_pages} pages"))
        ));
        self.bar.inc(1);
    }

    fn on_splice_error(&self, input: &str, error: &str) {
        let msg = error.lines().next().unwrap_or(error);
        self.bar
            .println(format!("  {} {}  {}", red("✗"), input, red(msg)));
        self.bar.inc(1);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Replace the cover of a report (writes report_banner.pdf)
  pdfbanner replace report.pdf --banner banner.png

  # Explicit output, higher banner resolution
  pdfbanner replace report.pdf --banner banner.jpg --dpi 300 -o out.pdf

  # Use the CropBox (visible area) instead of the MediaBox
  pdfbanner replace scan.pdf --banner banner.png --page-box crop-box

  # Many documents at once
  pdfbanner batch *.pdf --banner banner.png --out-dir branded/

  # Page count and first-page geometry
  pdfbanner inspect report.pdf --json

  # Per-session banners (same storage the chat front end uses)
  pdfbanner banner set --session 42 banner.png
  pdfbanner process report.pdf --session 42

ENVIRONMENT VARIABLES:
  DATA_DIR                  Root for banners/ and tmp/ (default: .)
  PDFBANNER_DPI             Banner raster density
  PDFBANNER_CONCURRENCY     Documents processed in parallel by `batch`
  RUST_LOG                  Log filter (overrides --verbose/--quiet)
"#;

/// Replace the first page of PDF files with a banner image.
#[derive(Parser, Debug)]
#[command(
    name = "pdfbanner",
    version,
    about = "Replace the first page of PDF files with a banner image",
    long_about = "Replace the first page of PDF documents (local files or URLs) with a full-page \
banner image. The banner is scaled to fit the original first page without cropping, and all \
other pages are carried over unchanged.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFBANNER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFBANNER_QUIET")]
    quiet: bool,

    /// Root directory for stored banners and temporary files.
    #[arg(long, global = true, env = "DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the first page of one PDF.
    Replace {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Banner image (PNG or JPEG).
        #[arg(short, long)]
        banner: PathBuf,

        /// Output file (default: <stem>_banner.pdf next to the input).
        #[arg(short, long, env = "PDFBANNER_OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        splice: SpliceArgs,
    },

    /// Replace the first page of many PDFs with the same banner.
    Batch {
        /// Local PDF paths or URLs.
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Banner image (PNG or JPEG).
        #[arg(short, long)]
        banner: PathBuf,

        /// Directory for <stem>_banner.pdf outputs.
        #[arg(long)]
        out_dir: PathBuf,

        /// Documents processed in parallel.
        #[arg(short, long, env = "PDFBANNER_CONCURRENCY", default_value_t = 4)]
        concurrency: usize,

        /// Disable progress bar.
        #[arg(long, env = "PDFBANNER_NO_PROGRESS")]
        no_progress: bool,

        #[command(flatten)]
        splice: SpliceArgs,
    },

    /// Print page count and first-page geometry.
    Inspect {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Manage the stored banner of a session.
    Banner {
        #[command(subcommand)]
        action: BannerAction,
    },

    /// Replace the first page using a session's stored banner.
    Process {
        /// Local PDF file.
        input: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        session: SessionId,

        /// Output file (default: <stem>_banner.pdf next to the input).
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        splice: SpliceArgs,
    },
}

#[derive(Subcommand, Debug)]
enum BannerAction {
    /// Store an image as the session's banner.
    Set {
        #[arg(long, allow_hyphen_values = true)]
        session: SessionId,
        /// PNG or JPEG image.
        image: PathBuf,
    },
    /// Delete the session's banner.
    Remove {
        #[arg(long, allow_hyphen_values = true)]
        session: SessionId,
    },
    /// Show whether the session has a banner.
    Status {
        #[arg(long, allow_hyphen_values = true)]
        session: SessionId,
    },
}

#[derive(Args, Debug)]
struct SpliceArgs {
    /// Banner raster density in DPI (72–600).
    #[arg(long, env = "PDFBANNER_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Longest edge of the banner raster in pixels; larger rasters are scaled down.
    #[arg(long, env = "PDFBANNER_MAX_RASTER_EDGE", default_value_t = 8000)]
    max_raster_edge: u32,

    /// Resampling filter used to scale the banner.
    #[arg(long, env = "PDFBANNER_FILTER", value_enum, default_value = "lanczos3")]
    filter: FilterArg,

    /// Page box that defines the banner page size.
    #[arg(long, env = "PDFBANNER_PAGE_BOX", value_enum, default_value = "media-box")]
    page_box: PageBoxArg,

    /// Ignore EXIF orientation in the banner image.
    #[arg(long, env = "PDFBANNER_IGNORE_ORIENTATION")]
    ignore_orientation: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFBANNER_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FilterArg {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterArg> for ResampleFilter {
    fn from(v: FilterArg) -> Self {
        match v {
            FilterArg::Nearest => ResampleFilter::Nearest,
            FilterArg::Triangle => ResampleFilter::Triangle,
            FilterArg::CatmullRom => ResampleFilter::CatmullRom,
            FilterArg::Gaussian => ResampleFilter::Gaussian,
            FilterArg::Lanczos3 => ResampleFilter::Lanczos3,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PageBoxArg {
    MediaBox,
    CropBox,
}

impl From<PageBoxArg> for PageBox {
    fn from(v: PageBoxArg) -> Self {
        match v {
            PageBoxArg::MediaBox => PageBox::MediaBox,
            PageBoxArg::CropBox => PageBox::CropBox,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The batch progress bar replaces INFO logs unless --verbose is given.
    let batch_bar = matches!(cli.command, Command::Batch { no_progress: false, .. });
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || batch_bar {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let storage = StorageConfig::new(&cli.data_dir);

    match cli.command {
        Command::Replace {
            ref input,
            ref banner,
            ref output,
            ref splice,
        } => {
            let config = build_config(splice, 1, None)?;
            let output = output.clone().unwrap_or_else(|| default_output_path(input));
            let stats = replace_first_page_to_file(input, banner, &output, &config)
                .await
                .context("Failed to replace first page")?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} pages  {:.0}x{:.0} pt  {}ms  →  {}",
                    green("✔"),
                    stats.output_pages,
                    stats.page_size.width,
                    stats.page_size.height,
                    stats.total_duration_ms,
                    bold(&output.display().to_string()),
                );
            }
        }

        Command::Batch {
            ref inputs,
            ref banner,
            ref out_dir,
            concurrency,
            no_progress,
            ref splice,
        } => {
            let progress = (!cli.quiet && !no_progress).then(|| BatchProgress::new(inputs.len()));
            let callback = progress
                .clone()
                .map(|p| p as Arc<dyn SpliceProgressCallback>);
            let config = build_config(splice, concurrency, callback)?;

            let results = replace_many(inputs, banner, out_dir, &config).await;
            if let Some(ref p) = progress {
                p.bar.finish_and_clear();
            }

            let failed: Vec<_> = results.iter().filter(|r| !r.is_ok()).collect();
            if !cli.quiet {
                eprintln!(
                    "{} {}/{} documents  →  {}",
                    if failed.is_empty() { green("✔") } else { red("✘") },
                    bold(&(results.len() - failed.len()).to_string()),
                    results.len(),
                    bold(&out_dir.display().to_string()),
                );
            }
            for r in &failed {
                eprintln!(
                    "  {} {}: {}",
                    red("✗"),
                    r.input,
                    r.error.as_deref().unwrap_or("unknown error")
                );
            }
            if !failed.is_empty() {
                bail!("{} of {} documents failed", failed.len(), results.len());
            }
        }

        Command::Inspect { ref input, json } => {
            let info = inspect(input).await.context("Failed to inspect PDF")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info).context("Failed to serialize metadata")?
                );
            } else {
                println!("File:         {}", input);
                println!("Pages:        {}", info.page_count);
                println!("PDF Version:  {}", info.pdf_version);
                match info.media_box {
                    Some(s) => println!("MediaBox:     {:.2} x {:.2} pt", s.width, s.height),
                    None => println!("MediaBox:     {}", dim("n/a")),
                }
                if let Some(s) = info.crop_box {
                    println!("CropBox:      {:.2} x {:.2} pt", s.width, s.height);
                }
                println!("Rotation:     {}°", info.rotation);
                println!("Encrypted:    {}", info.is_encrypted);
                if let Some(ref t) = info.title {
                    println!("Title:        {}", t);
                }
                if let Some(ref a) = info.author {
                    println!("Author:       {}", a);
                }
                if let Some(ref p) = info.producer {
                    println!("Producer:     {}", p);
                }
            }
        }

        Command::Banner { ref action } => {
            let dispatcher = Dispatcher::from_storage(&storage, SpliceConfig::default())
                .context("Failed to prepare data directory")?;
            let reply = match action {
                BannerAction::Set { session, image } => {
                    let bytes = tokio::fs::read(image)
                        .await
                        .with_context(|| format!("Failed to read banner image {:?}", image))?;
                    dispatcher.handle(*session, Event::SetBanner).await;
                    let attachment = Attachment {
                        message_id: message_id(),
                        bytes,
                        mime: None,
                    };
                    let reply = dispatcher.handle(*session, Event::Image(attachment)).await;
                    if reply != Reply::BannerSaved {
                        bail!("{reply}");
                    }
                    reply
                }
                BannerAction::Remove { session } => {
                    let reply = dispatcher.handle(*session, Event::RemoveBanner).await;
                    if let Reply::RemoveFailed(_) = reply {
                        bail!("{reply}");
                    }
                    reply
                }
                BannerAction::Status { session } => dispatcher.handle(*session, Event::Status).await,
            };
            if !cli.quiet {
                println!("{reply}");
            }
        }

        Command::Process {
            ref input,
            session,
            ref output,
            ref splice,
        } => {
            let config = build_config(splice, 1, None)?;
            let dispatcher = Dispatcher::from_storage(&storage, config)
                .context("Failed to prepare data directory")?;
            let bytes = tokio::fs::read(input)
                .await
                .with_context(|| format!("Failed to read {:?}", input))?;
            let attachment = Attachment {
                message_id: message_id(),
                bytes,
                mime: Some("application/pdf".to_string()),
            };
            let reply = dispatcher
                .handle(session, Event::Process { replied: Some(attachment) })
                .await;
            let Reply::Processed { path } = reply else {
                bail!("{reply}");
            };

            let output = output
                .clone()
                .unwrap_or_else(|| default_output_path(&input.to_string_lossy()));
            move_file(&path, &output).await?;
            if !cli.quiet {
                eprintln!("{}  {}", green("✔"), bold(&output.display().to_string()));
            }
        }
    }

    Ok(())
}

/// Map CLI args to `SpliceConfig`.
fn build_config(
    args: &SpliceArgs,
    concurrency: usize,
    progress: Option<ProgressCallback>,
) -> Result<SpliceConfig> {
    let mut builder = SpliceConfig::builder()
        .dpi(args.dpi)
        .max_raster_edge(args.max_raster_edge)
        .filter(args.filter.into())
        .page_box(args.page_box.into())
        .honor_orientation(!args.ignore_orientation)
        .download_timeout_secs(args.download_timeout)
        .concurrency(concurrency);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

/// Unique-enough id for temp files of a single CLI invocation.
fn message_id() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    millis ^ i64::from(std::process::id())
}

/// Rename, falling back to copy + delete across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    let (src, dst) = (from.to_path_buf(), to.to_path_buf());
    tokio::task::spawn_blocking(move || copy_atomic(&src, &dst))
        .await
        .context("Copy task panicked")??;
    tokio::fs::remove_file(from).await.ok();
    Ok(())
}

/// Copy `from` into a temp file next to `to`, then rename it into place.
fn copy_atomic(from: &Path, to: &Path) -> Result<()> {
    let dir = to
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    let mut src =
        std::fs::File::open(from).with_context(|| format!("Failed to open {:?}", from))?;
    io::copy(&mut src, &mut tmp).with_context(|| format!("Failed to write {:?}", to))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to write {:?}", to))?;
    tmp.persist(to)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {:?}", to))?;
    Ok(())
}
