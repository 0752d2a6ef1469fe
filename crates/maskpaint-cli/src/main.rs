//! maskpaint-cli: apply a painting session to an image without a browser.
//!
//! Reads an image and a JSON stroke file, replays the strokes through the
//! same editor the web app uses, and writes the resulting mask PNG.
//!
//! # Usage
//!
//! ```text
//! maskpaint-cli photo.jpg --strokes strokes.json --output mask.png [--binary]
//! ```
//!
//! Set `RUST_LOG=debug` for progress detail.

#![allow(clippy::print_stderr)]

mod strokes;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use maskpaint_core::{
    BrushRadius, IngestOutcome, MaskEditor, MaskError, SourceFormat, compositor, ingest,
};

use crate::strokes::StrokeFile;

/// Paint an inpainting mask from a stroke file.
///
/// The mask has the image's dimensions: opaque black where the image is
/// kept, transparent where strokes cut it out.
#[derive(Parser)]
#[command(name = "maskpaint-cli", version)]
struct Cli {
    /// Path to the input image (JPEG or PNG).
    image: PathBuf,

    /// JSON stroke file.
    #[arg(long)]
    strokes: PathBuf,

    /// Where to write the mask PNG.
    #[arg(long, short)]
    output: PathBuf,

    /// Also copy the original image here, unmodified.
    #[arg(long)]
    original: Option<PathBuf>,

    /// Write a single-channel mask, white where cut out, black elsewhere.
    #[arg(long)]
    binary: bool,

    /// Radius for strokes that do not specify one.
    #[arg(
        long,
        default_value_t = BrushRadius::DEFAULT.get(),
        value_parser = clap::builder::RangedU64ValueParser::<u32>::new()
            .range(u64::from(BrushRadius::MIN)..=u64::from(BrushRadius::MAX)),
    )]
    brush_radius: u32,
}

/// The image's format: by extension, else by content.
fn image_format(path: &Path, bytes: &[u8]) -> Result<SourceFormat, MaskError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(SourceFormat::from_file_name)
        .map_or_else(|| ingest::sniff_format(bytes), Ok)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let image_bytes = std::fs::read(&cli.image)
        .map_err(|e| format!("reading {}: {e}", cli.image.display()))?;
    let stroke_json = std::fs::read_to_string(&cli.strokes)
        .map_err(|e| format!("reading {}: {e}", cli.strokes.display()))?;
    let stroke_file = StrokeFile::from_json(&stroke_json)
        .map_err(|e| format!("parsing {}: {e}", cli.strokes.display()))?;

    let format = image_format(&cli.image, &image_bytes)?;
    let mut editor = MaskEditor::default();
    match editor.ingest(format.mime(), &image_bytes)? {
        IngestOutcome::Loaded(dims) => {
            log::info!("{}: {}x{}", cli.image.display(), dims.width, dims.height);
        }
        IngestOutcome::Ignored | IngestOutcome::Stale => {
            return Err(MaskError::UnsupportedFormat(format.mime().into()).into());
        }
    }

    let painted = stroke_file.replay(&mut editor, BrushRadius::new(cli.brush_radius));
    log::info!("replayed {painted} strokes");

    let Some(mask) = editor.generate_mask()? else {
        return Err("no image loaded".into());
    };
    let png = if cli.binary {
        compositor::encode_gray_png(&mask.to_binary())?
    } else {
        mask.png().to_vec()
    };
    log::info!("{} pixels masked", mask.masked_area());
    std::fs::write(&cli.output, &png)
        .map_err(|e| format!("writing {}: {e}", cli.output.display()))?;
    log::info!("mask written to {} ({} bytes)", cli.output.display(), png.len());

    if let Some(ref path) = cli.original
        && let Some(original) = editor.export_original()
    {
        std::fs::write(path, original.bytes)
            .map_err(|e| format!("writing {}: {e}", path.display()))?;
        log::info!("original written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
