//! Command-line front end: extract images from Office documents.
//!
//! ```bash
//! office-image-extractor report.docx slides.pptx --output images/
//! office-image-extractor data.xlsx --format json --compress
//! ```

use clap::Parser;
use office_image_extractor::images::save_all;
use office_image_extractor::{BatchReport, ExtractConfig, ImageExtractor};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "office-image-extractor")]
#[command(about = "Extract embedded images from .docx, .xlsx and .pptx files")]
#[command(version)]
struct Cli {
    /// Documents to extract from
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON file with extraction settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save every extracted image under this directory (one subdirectory per document)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Re-encode full-size images as JPEG
    #[arg(long)]
    compress: bool,

    /// Thumbnail bounding box in pixels
    #[arg(long)]
    thumbnail_size: Option<u32>,

    /// Width/height above which images are flagged as oversized
    #[arg(long)]
    max_dimension: Option<u32>,

    /// JPEG quality for thumbnails and compressed images (1-100)
    #[arg(long)]
    quality: Option<u8>,

    /// Number of documents processed at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    fn extract_config(&self) -> Result<ExtractConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_slice(&std::fs::read(path)?)?,
            None => ExtractConfig::default(),
        };

        if self.compress {
            config.compress = true;
        }
        if let Some(size) = self.thumbnail_size {
            config.thumbnail_size = size;
        }
        if let Some(max) = self.max_dimension {
            config.max_dimension = max;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        Ok(config)
    }
}

/// Write each successful document's images to `<dir>/<file stem>/`.
fn save_report(report: &BatchReport, dir: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let mut saved = 0;
    for result in report.results.iter().filter(|r| r.success && !r.images.is_empty()) {
        let stem = Path::new(&result.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| result.file_name.clone());
        let paths = save_all(&result.images, dir.join(stem))?;
        saved += paths.len();
    }
    Ok(saved)
}

fn print_text(report: &BatchReport) {
    for result in &report.results {
        match &result.error {
            None => {
                println!("{}: {} images", result.file_name, result.images.len());
                for image in &result.images {
                    let dims = image
                        .dimensions()
                        .map(|(w, h)| format!("{}x{}", w, h))
                        .unwrap_or_else(|| "?".to_string());
                    let note = image.error.as_deref().map(|e| format!(" [{}]", e)).unwrap_or_default();
                    println!("  {} {} {} {} bytes{}", image.name, image.format, dims, image.size, note);
                }
            },
            Some(e) => println!("{}: failed: {}", result.file_name, e),
        }
    }
    println!(
        "{} succeeded, {} failed, {} images",
        report.succeeded, report.failed, report.image_count
    );
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.extract_config()?;
    debug!("Using configuration {:?}", config);

    let extractor = ImageExtractor::new(config)
        .with_progress(|p| debug!("{}: {}/{}", p.file, p.processed, p.total));

    info!("Extracting images from {} files", cli.files.len());
    let report = extractor.extract_batch(&cli.files).await;

    if let Some(dir) = &cli.output {
        let saved = save_report(&report, dir)?;
        info!("Saved {} images to {}", saved, dir.display());
    }

    match cli.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    for result in report.results.iter().filter(|r| !r.success) {
        warn!("{}: {}", result.file_path.display(), result.error.as_deref().unwrap_or("unknown error"));
    }

    Ok(report.all_succeeded())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
