use image::RgbaImage;

use crate::{Error, Result};

/// Allocate a transparent RGBA drawing surface
///
/// Unlike `RgbaImage::new` this reports a size overflow or a failed
/// allocation as [`Error::Surface`] instead of aborting.
pub(crate) fn new_surface(width: u32, height: u32) -> Result<RgbaImage> {
    let surface_error = || Error::Surface { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(surface_error)?;
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| surface_error())?;
    buffer.resize(len, 0);
    RgbaImage::from_raw(width, height, buffer).ok_or_else(surface_error)
}
