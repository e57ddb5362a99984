use std::io::Write;

use image::RgbaImage;

use crate::Result;

/// Write an RGBA image as 8-bit PNG, with an optional pixel density header
pub fn write_rgba_png<W: Write>(
    image: &RgbaImage,
    writer: W,
    pixel_dims: Option<png::PixelDimensions>,
) -> Result<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    // https://www.w3.org/TR/2003/REC-PNG-20031110/#11pHYs
    encoder.set_pixel_dims(pixel_dims);
    encoder.write_header()?.write_image_data(image.as_raw())?;
    Ok(())
}
