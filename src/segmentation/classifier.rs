use image::Rgba;

/// Pixels with alpha below this are treated as transparent background
pub const TRANSPARENT_ALPHA_CUTOFF: u8 = 20;

/// Threshold used when building the coarse foreground mask
pub const LENIENT_THRESHOLD: u8 = 230;

/// Threshold used for the second background pass inside extraction
pub const STRICT_THRESHOLD: u8 = 245;

/// Decide if a pixel belongs to the background
///
/// A pixel is background when it is (nearly) transparent or when every color
/// channel is brighter than `threshold`.
pub fn is_background(r: u8, g: u8, b: u8, a: u8, threshold: u8) -> bool {
    a < TRANSPARENT_ALPHA_CUTOFF || (r > threshold && g > threshold && b > threshold)
}

/// Same as [`is_background`] for an `image` pixel
pub fn is_background_pixel(pixel: &Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, a] = pixel.0;
    is_background(r, g, b, a, threshold)
}
