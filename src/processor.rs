use std::path::PathBuf;

use tracing::info;

use crate::pipeline::{self, Detection, SheetConfig};
use crate::segmentation::{self, GridFallback, SegmentationConfig, Stage};
use crate::sticker::ExtractionConfig;
use crate::{Args, Result};

pub use self::dpi::Dpi;
use self::io::ImageSaver;

mod dpi;
mod io;

/// Cuts the stickers out of one sheet file and saves them next to it
pub struct SheetProcessor {
    file: PathBuf,
    base_path: PathBuf,
    config: SheetConfig,
    dpi: Dpi,
    save_intermediary_images: bool,
    verbose: bool,
}

impl SheetProcessor {
    pub fn new(file: PathBuf, args: &Args) -> Self {
        let base_path = file.with_extension("");
        Self {
            file,
            base_path,
            config: sheet_config(args),
            dpi: Dpi::new(args.dpi),
            save_intermediary_images: args.save_intermediary_images,
            verbose: args.verbose,
        }
    }

    /// Process the sheet, returns the number of saved stickers
    pub fn process(self) -> Result<usize> {
        let image = image::open(&self.file)?.to_rgba8();
        println!("{}: {}x{}", self.file.display(), image.width(), image.height());
        let saver = ImageSaver::new(&self.base_path, self.dpi, self.save_intermediary_images);

        let segmentation =
            segmentation::segment_sheet(&image, &self.config.segmentation, |stage| {
                self.report(stage)
            });
        saver.save_debug_luma_image_as(segmentation.original_mask.as_image(), "a-mask")?;
        saver.save_debug_luma_image_as(segmentation.working_mask.as_image(), "b-working-mask")?;
        saver.save_debug_luma_image_as(&segmentation.claimed.to_image(), "c-claimed")?;

        let detection = pipeline::extract_stickers(
            &image,
            &segmentation,
            &self.config.extraction,
            |stage| self.report(stage),
        )?;
        self.save_stickers(&saver, detection)
    }

    /// Print pipeline transitions, the grid fallback warning is always shown
    fn report(&self, stage: Stage) {
        if self.verbose || stage == Stage::GridFallback {
            println!("{}: {stage}", self.file.display());
        }
        info!(file = %self.file.display(), %stage, "stage");
    }

    fn save_stickers(&self, saver: &ImageSaver, detection: Detection) -> Result<usize> {
        let stickers = match detection {
            Detection::NothingDetected => {
                println!(
                    "{}: nothing detected, try again with a clearer, whiter background",
                    self.file.display()
                );
                return Ok(0);
            }
            Detection::Stickers(stickers) => stickers,
        };
        println!("{}: found {} stickers", self.file.display(), stickers.len());
        for (index, sticker) in stickers.iter().enumerate() {
            saver.save_rgba_image_as(sticker.image(), &format!("{}", index + 1))?;
            if self.verbose {
                println!(
                    "{}: {} cut from {:?}",
                    self.file.display(),
                    sticker.display_name(),
                    sticker.content()
                );
            }
        }
        Ok(stickers.len())
    }
}

/// Map command line options onto the pipeline configuration
fn sheet_config(args: &Args) -> SheetConfig {
    let (columns, rows) = args.grid;
    let grid_fallback = (!args.no_grid_fallback).then_some(GridFallback {
        columns,
        rows,
        margin: args.grid_margin,
        min_regions: args.grid_trigger,
        ..GridFallback::default()
    });
    SheetConfig {
        segmentation: SegmentationConfig {
            mask_threshold: args.threshold,
            closing_radius: args.closing_radius,
            erosion_passes: args.erosion_passes,
            seed_merge_distance: args.seed_merge_distance,
            growth_margin: args.growth_margin,
            edge_threshold: args.strict_threshold,
            grid_fallback,
            ..SegmentationConfig::default()
        },
        extraction: ExtractionConfig {
            strict_threshold: args.strict_threshold,
            sticker_padding: args.padding,
            stroke_width: args.stroke_width,
            stroke_steps: args.stroke_steps,
            stroke_color: args.stroke_color,
            ..ExtractionConfig::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_defaults_match_library_defaults() {
        let args = Args::parse_from(["sticker-sheet", "sheet.png"]);
        assert_eq!(sheet_config(&args), SheetConfig::default());
    }

    #[test]
    fn test_options_reach_the_config() {
        let args = Args::parse_from([
            "sticker-sheet",
            "--grid",
            "5x3",
            "--erosion-passes",
            "6",
            "--stroke-color",
            "#000000",
            "sheet.png",
        ]);
        let config = sheet_config(&args);
        let grid = config.segmentation.grid_fallback.unwrap();
        assert_eq!((grid.columns, grid.rows), (5, 3));
        assert_eq!(config.segmentation.erosion_passes, 6);
        assert_eq!(config.extraction.stroke_color.0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_strict_threshold_drives_edges_and_die_cut() {
        let args = Args::parse_from(["sticker-sheet", "-T", "250", "sheet.png"]);
        let config = sheet_config(&args);
        assert_eq!(config.segmentation.edge_threshold, 250);
        assert_eq!(config.extraction.strict_threshold, 250);
    }

    #[test]
    fn test_grid_fallback_can_be_disabled() {
        let args = Args::parse_from(["sticker-sheet", "--no-grid-fallback", "sheet.png"]);
        assert_eq!(sheet_config(&args).segmentation.grid_fallback, None);
    }

    #[test]
    fn test_base_path_drops_extension() {
        let args = Args::parse_from(["sticker-sheet", "sheet.png"]);
        let processor = SheetProcessor::new(PathBuf::from("/tmp/cats.sheet.png"), &args);
        assert_eq!(processor.base_path, PathBuf::from("/tmp/cats.sheet"));
    }
}
