//! Cut the individual drawings out of a sticker sheet
//!
//! A sheet is a raster image with several independently drawn characters on
//! a near-white background. [`process_sticker_sheet`] finds every drawing
//! without knowing how many there are or whether they touch, and returns each
//! one as a tightly cropped, die-cut sticker with a white outline.
//!
//! ```no_run
//! use sticker_sheet::{Detection, SheetConfig, process_sticker_sheet};
//!
//! let sheet = image::open("sheet.png")?.to_rgba8();
//! let detection = process_sticker_sheet(&sheet, &SheetConfig::default(), |stage| {
//!     println!("{stage}");
//! })?;
//! match detection {
//!     Detection::Stickers(stickers) => println!("found {}", stickers.len()),
//!     Detection::NothingDetected => println!("try a cleaner background"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::error::{Error, Result};
pub use self::pipeline::{Detection, SheetConfig, extract_stickers, process_sticker_sheet};
pub use self::segmentation::{Segmentation, SegmentationConfig, Stage, segment_sheet};
pub use self::sticker::{
    ExtractionConfig, StickerSegment, extract_sticker_from_rect, extract_sticker_from_region,
};

use std::path::PathBuf;

use clap::Parser;
use image::Rgba;
use tracing_subscriber::EnvFilter;
use wild::ArgsOs;

use processor::SheetProcessor;

pub mod geometry;
pub mod pipeline;
pub mod segmentation;
pub mod sticker;

mod arg_validators;
mod encoding;
mod error;
mod processor;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input sticker sheet images
    #[arg(required(true))]
    files: Vec<PathBuf>,
    /// Background threshold for the coarse mask (0-255, higher keeps more off-white)
    #[arg(short('t'), long, default_value_t = segmentation::LENIENT_THRESHOLD)]
    threshold: u8,
    /// Background threshold for the die-cut of each sticker
    #[arg(short('T'), long, default_value_t = segmentation::STRICT_THRESHOLD)]
    strict_threshold: u8,
    /// Dilation radius that closes small gaps before erosion (pixels, 0 disables)
    #[arg(short('c'), long, default_value_t = 2)]
    closing_radius: u8,
    /// Erosion passes used to separate touching stickers
    #[arg(short('e'), long, default_value_t = 4, value_parser = arg_validators::validate_erosion_passes)]
    erosion_passes: u32,
    /// Merge sticker cores closer than this (pixels)
    #[arg(short('m'), long, default_value_t = 30)]
    seed_merge_distance: u32,
    /// Maximum growth beyond a sticker core (pixels)
    #[arg(long, default_value_t = 16)]
    growth_margin: u32,
    /// Grid layout used when too few stickers are found (COLUMNSxROWS)
    #[arg(short('g'), long, default_value = "4x4", value_parser = arg_validators::validate_grid)]
    grid: (u32, u32),
    /// Margin trimmed from each grid cell (pixels)
    #[arg(long, default_value_t = 12)]
    grid_margin: u32,
    /// Use the grid when fewer stickers than this are found
    #[arg(long, default_value_t = 10)]
    grid_trigger: usize,
    /// Never fall back to the grid layout
    #[arg(long, default_value_t = false)]
    no_grid_fallback: bool,
    /// Transparent border around each sticker (pixels)
    #[arg(short('p'), long, default_value_t = 16)]
    padding: u32,
    /// Outline width (pixels)
    #[arg(short('w'), long, default_value_t = 8)]
    stroke_width: u32,
    /// Number of stamped copies forming the outline
    #[arg(long, default_value_t = 24)]
    stroke_steps: u32,
    /// Outline color
    #[arg(short('C'), long, default_value = "#FFFFFF", value_parser = arg_validators::validate_stroke_color)]
    stroke_color: Rgba<u8>,
    /// Output image pixel density in inches
    #[arg(short('d'), long, default_value_t = 150)]
    dpi: u32,
    /// Save intermediary images
    #[arg(short('s'), long, default_value_t = false)]
    save_intermediary_images: bool,
    /// Verbose messages
    #[arg(short('v'), long, default_value_t = false)]
    verbose: bool,
}

pub fn run(args: ArgsOs) -> Result<()> {
    let args = Args::parse_from(args);
    init_logging(args.verbose);
    for file in &args.files {
        let sheet_processor = SheetProcessor::new(file.to_owned(), &args);
        sheet_processor.process()?;
        println!();
    }
    Ok(())
}

/// Log to stderr, `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
