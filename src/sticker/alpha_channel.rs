use image::GrayImage;
use image::Luma;
use image::Rgba;
use image::RgbaImage;

use super::surface;
use crate::Result;
use crate::geometry::{Point, Rect};
use crate::segmentation::classifier;

/// Extract the alpha channel of a color image into a grayscale image
pub(crate) fn extract(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[3]])
    })
}

/// Replace the alpha channel of the specified color image with the specified grayscale image
pub(crate) fn replace(image: &mut RgbaImage, gray_image: &GrayImage) {
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let gray_pixel = gray_image.get_pixel(x, y);
        *pixel = Rgba([pixel[0], pixel[1], pixel[2], gray_pixel[0]]);
    }
}

/// Make background pixels fully transparent (die-cut)
///
/// `origin` is the position of `image` inside the source sheet, `foreign`
/// is asked about every pixel in sheet coordinates and clears pixels that
/// belong to another sticker.
pub(crate) fn remove_background(
    image: &mut RgbaImage,
    threshold: u8,
    origin: Point,
    foreign: impl Fn(Point) -> bool,
) {
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let sheet_point = Point::new(origin.x + x, origin.y + y);
        if classifier::is_background_pixel(pixel, threshold) || foreign(sheet_point) {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

/// Compute the bounding box of every pixel that is not fully transparent
pub(crate) fn content_bounds(image: &RgbaImage) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        // Transparent pixels are skipped
        if pixel[3] == 0 {
            continue;
        }
        let point = Point::new(x, y);
        match bounds.as_mut() {
            Some(rect) => rect.include(point),
            None => bounds = Some(Rect::from_point(point)),
        }
    }
    bounds
}

/// Solid shape of the image in a single color, keeping its alpha channel
pub(crate) fn silhouette(image: &RgbaImage, color: Rgba<u8>) -> Result<RgbaImage> {
    let mut shape = surface::new_surface(image.width(), image.height())?;
    for pixel in shape.pixels_mut() {
        *pixel = Rgba([color[0], color[1], color[2], 0]);
    }
    replace(&mut shape, &extract(image));
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_cut_out() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([250, 250, 250, 255]));
        image.put_pixel(1, 2, Rgba([240, 240, 240, 255]));
        image.put_pixel(2, 2, Rgba([10, 10, 10, 255]));
        remove_background(&mut image, classifier::STRICT_THRESHOLD, Point::new(0, 0), |_| {
            false
        });
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(1, 2).0, [240, 240, 240, 255]);
        assert_eq!(
            content_bounds(&image),
            Some(Rect::new(1, 2, 2, 2).unwrap())
        );
    }

    #[test]
    fn test_foreign_pixels_use_sheet_coordinates() {
        let mut image = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 0, 255]));
        remove_background(&mut image, classifier::STRICT_THRESHOLD, Point::new(10, 5), |p| {
            p == Point::new(12, 5)
        });
        assert_eq!(image.get_pixel(1, 0)[3], 255);
        assert_eq!(image.get_pixel(2, 0)[3], 0);
    }

    #[test]
    fn test_fully_transparent_image_has_no_content() {
        let image = RgbaImage::new(5, 5);
        assert_eq!(content_bounds(&image), None);
    }

    #[test]
    fn test_silhouette_keeps_alpha() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([10, 20, 30, 128]));
        let shape = silhouette(&image, Rgba([255, 255, 255, 255])).unwrap();
        assert_eq!(shape.get_pixel(0, 0).0, [255, 255, 255, 128]);
        assert_eq!(shape.get_pixel(1, 0).0, [255, 255, 255, 0]);
    }
}
