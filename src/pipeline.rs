//! Whole-sheet entry point: segmentation followed by per-region extraction

use image::RgbaImage;
use tracing::debug;

use crate::Result;
use crate::segmentation::{self, Segmentation, SegmentationConfig, Stage};
use crate::sticker::{self, ExtractionConfig, StickerSegment};

/// Configuration for [`process_sticker_sheet`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetConfig {
    pub segmentation: SegmentationConfig,
    pub extraction: ExtractionConfig,
}

/// Outcome of processing a sheet
#[derive(Debug, Clone)]
pub enum Detection {
    /// Stickers in region order, never empty
    Stickers(Vec<StickerSegment>),
    /// Nothing could be separated from the background
    NothingDetected,
}

impl Detection {
    pub fn is_nothing_detected(&self) -> bool {
        matches!(self, Detection::NothingDetected)
    }

    pub fn len(&self) -> usize {
        match self {
            Detection::Stickers(stickers) => stickers.len(),
            Detection::NothingDetected => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_segments(self) -> Vec<StickerSegment> {
        match self {
            Detection::Stickers(stickers) => stickers,
            Detection::NothingDetected => Vec::new(),
        }
    }
}

impl From<Vec<StickerSegment>> for Detection {
    fn from(stickers: Vec<StickerSegment>) -> Self {
        if stickers.is_empty() {
            Detection::NothingDetected
        } else {
            Detection::Stickers(stickers)
        }
    }
}

/// Cut every sticker out of a sheet
///
/// `progress` is told about each stage as it starts. Boxes that contain
/// nothing but background are skipped, the only error is a failure to
/// allocate a drawing surface.
pub fn process_sticker_sheet(
    image: &RgbaImage,
    config: &SheetConfig,
    mut progress: impl FnMut(Stage),
) -> Result<Detection> {
    let segmentation = segmentation::segment_sheet(image, &config.segmentation, &mut progress);
    extract_stickers(image, &segmentation, &config.extraction, &mut progress)
}

/// Extract one sticker per segmented region
///
/// Stickers are named `Sticker 1`, `Sticker 2`, ... in output order.
pub fn extract_stickers(
    image: &RgbaImage,
    segmentation: &Segmentation,
    config: &ExtractionConfig,
    mut progress: impl FnMut(Stage),
) -> Result<Detection> {
    progress(Stage::Finalizing);
    let mut stickers = Vec::with_capacity(segmentation.regions.len());
    for region in &segmentation.regions {
        let name = format!("Sticker {}", stickers.len() + 1);
        let extracted = sticker::extract_sticker_from_region(
            image,
            region,
            &segmentation.claimed,
            &name,
            config,
        )?;
        match extracted {
            Some(sticker) => stickers.push(sticker),
            None => debug!(rect = ?region.rect, "skipping empty region"),
        }
    }
    debug!(
        regions = segmentation.regions.len(),
        stickers = stickers.len(),
        "finalized stickers"
    );
    Ok(stickers.into())
}
