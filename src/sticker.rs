//! Turn a bounding box on the sheet into a finished, outlined sticker

use image::Rgba;
use image::RgbaImage;
use image::imageops;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;
use crate::encoding;
use crate::geometry::{Point, Rect};
use crate::segmentation::{ClaimedMap, Region, STRICT_THRESHOLD};

mod alpha_channel;
mod outline;
mod surface;

/// Tuning for sticker extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Pixels added around the box before the second background pass
    pub crop_padding: u32,
    /// Strict background threshold for the die-cut
    pub strict_threshold: u8,
    /// Transparent border added around the tight content box
    pub sticker_padding: u32,
    pub stroke_width: u32,
    /// Number of stamped silhouette copies forming the outline
    pub stroke_steps: u32,
    pub stroke_color: Rgba<u8>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            crop_padding: 10,
            strict_threshold: STRICT_THRESHOLD,
            sticker_padding: 16,
            stroke_width: 8,
            stroke_steps: 24,
            stroke_color: Rgba([255, 255, 255, 255]),
        }
    }
}

/// A single extracted sticker
///
/// Only the display name and the naming flag change after creation.
#[derive(Debug, Clone)]
pub struct StickerSegment {
    id: Uuid,
    image: RgbaImage,
    source_x: u32,
    source_y: u32,
    content: Rect,
    display_name: String,
    naming_in_progress: bool,
}

impl StickerSegment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Composited sticker with outline and transparent background
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Top-left corner of the crop this sticker was cut from, in sheet coordinates
    pub fn source_x(&self) -> u32 {
        self.source_x
    }

    pub fn source_y(&self) -> u32 {
        self.source_y
    }

    /// Tight box of the sticker content, in sheet coordinates
    pub fn content(&self) -> Rect {
        self.content
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn naming_in_progress(&self) -> bool {
        self.naming_in_progress
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
        self.naming_in_progress = false;
    }

    pub fn set_naming_in_progress(&mut self, in_progress: bool) {
        self.naming_in_progress = in_progress;
    }

    /// Encode the sticker image as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        encoding::write_rgba_png(&self.image, &mut bytes, None)?;
        Ok(bytes)
    }
}

/// Cut the content of `rect` out of the sheet and outline it
///
/// Returns `Ok(None)` when the box holds nothing but background. Only a
/// failure to allocate a drawing surface is an error.
pub fn extract_sticker_from_rect(
    source: &RgbaImage,
    rect: Rect,
    default_name: &str,
    config: &ExtractionConfig,
) -> Result<Option<StickerSegment>> {
    extract(source, rect, default_name, config, |_| false)
}

/// Same as [`extract_sticker_from_rect`], restricted to the pixels the region owns
///
/// Everything inside the crop that the claimed map does not assign to the
/// region is cut away, so stickers never share sheet pixels. Regions without
/// a label keep the whole crop.
pub fn extract_sticker_from_region(
    source: &RgbaImage,
    region: &Region,
    claimed: &ClaimedMap,
    default_name: &str,
    config: &ExtractionConfig,
) -> Result<Option<StickerSegment>> {
    match region.label {
        Some(label) => extract(source, region.rect, default_name, config, |point| {
            claimed.owner(point) != Some(label)
        }),
        None => extract(source, region.rect, default_name, config, |_| false),
    }
}

fn extract(
    source: &RgbaImage,
    rect: Rect,
    default_name: &str,
    config: &ExtractionConfig,
    foreign: impl Fn(Point) -> bool,
) -> Result<Option<StickerSegment>> {
    // Clamp and pad into the sheet
    let Some(crop_rect) = rect.padded_within(config.crop_padding, source.width(), source.height())
    else {
        debug!(?rect, "box lies outside the sheet");
        return Ok(None);
    };

    // Copy the crop into its own surface
    let mut crop = surface::new_surface(crop_rect.width(), crop_rect.height())?;
    imageops::replace(
        &mut crop,
        &*imageops::crop_imm(
            source,
            crop_rect.min_x(),
            crop_rect.min_y(),
            crop_rect.width(),
            crop_rect.height(),
        ),
        0,
        0,
    );

    // Second, stricter background pass
    let origin = Point::new(crop_rect.min_x(), crop_rect.min_y());
    alpha_channel::remove_background(&mut crop, config.strict_threshold, origin, foreign);

    let Some(content) = alpha_channel::content_bounds(&crop) else {
        debug!(?rect, "no foreground left after background removal");
        return Ok(None);
    };

    // Re-center the tight content with a uniform border
    let padding = config.sticker_padding;
    let mut art = surface::new_surface(
        content.width().saturating_add(padding.saturating_mul(2)),
        content.height().saturating_add(padding.saturating_mul(2)),
    )?;
    imageops::replace(
        &mut art,
        &*imageops::crop_imm(
            &crop,
            content.min_x(),
            content.min_y(),
            content.width(),
            content.height(),
        ),
        padding as i64,
        padding as i64,
    );

    if config.stroke_width > 0 && config.stroke_steps == 0 {
        warn!(
            stroke_width = config.stroke_width,
            "stroke steps is 0, drawing sticker without outline"
        );
    }
    let image = outline::composite_with_stroke(
        &art,
        config.stroke_color,
        config.stroke_width,
        config.stroke_steps,
    )?;

    let content_in_sheet = content.translated(origin.x, origin.y);
    debug!(
        name = default_name,
        content = ?content_in_sheet,
        width = image.width(),
        height = image.height(),
        "extracted sticker"
    );
    Ok(Some(StickerSegment {
        id: Uuid::new_v4(),
        image,
        source_x: crop_rect.min_x(),
        source_y: crop_rect.min_y(),
        content: content_in_sheet,
        display_name: default_name.to_owned(),
        naming_in_progress: false,
    }))
}
