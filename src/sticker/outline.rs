use std::f64::consts::TAU;

use image::Rgba;
use image::RgbaImage;
use image::imageops;

use super::alpha_channel;
use super::surface;
use crate::Result;

/// Offsets of the stroke copies, `steps` points evenly spread on a circle of radius `width`
pub(crate) fn stroke_offsets(width: u32, steps: u32) -> Vec<(i64, i64)> {
    let radius = width as f64;
    (0..steps)
        .map(|step| {
            let angle = TAU * step as f64 / steps as f64;
            (
                (angle.cos() * radius).round() as i64,
                (angle.sin() * radius).round() as i64,
            )
        })
        .collect()
}

/// Draw the artwork on top of a rounded outline of `width` pixels
///
/// The outline is the silhouette stamped at every stroke offset plus once in
/// the middle. The returned image is `2 * width` larger than the artwork on
/// both axes, with the artwork centered.
pub(crate) fn composite_with_stroke(
    art: &RgbaImage,
    color: Rgba<u8>,
    width: u32,
    steps: u32,
) -> Result<RgbaImage> {
    let grow = width.saturating_mul(2);
    let mut canvas = surface::new_surface(
        art.width().saturating_add(grow),
        art.height().saturating_add(grow),
    )?;
    let center = width as i64;
    if width > 0 && steps > 0 {
        let shape = alpha_channel::silhouette(art, color)?;
        for (dx, dy) in stroke_offsets(width, steps) {
            imageops::overlay(&mut canvas, &shape, center + dx, center + dy);
        }
        imageops::overlay(&mut canvas, &shape, center, center);
    }
    imageops::overlay(&mut canvas, art, center, center);
    Ok(canvas)
}
