use image::GrayImage;
use image::Luma;
use image::RgbaImage;

use super::classifier;
use crate::geometry::Point;

/// Luma value stored for foreground pixels
pub(crate) const FOREGROUND: u8 = 255;
/// Luma value stored for background pixels
pub(crate) const BACKGROUND: u8 = 0;

/// One flag per pixel marking foreground, aligned with the source image
///
/// Backed by a grayscale image holding 0 or 255 so it can be handed to
/// `imageproc` and saved as-is for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    /// Empty mask, every pixel is background
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Set every pixel that is not background according to the classifier
    pub fn from_image(image: &RgbaImage, threshold: u8) -> Self {
        let mut mask = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if !classifier::is_background_pixel(pixel, threshold) {
                mask.image.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width() && point.y < self.height()
    }

    /// True for foreground, false for background and out of bounds
    pub fn is_set(&self, point: Point) -> bool {
        self.contains(point) && self.image.get_pixel(point.x, point.y)[0] != BACKGROUND
    }

    pub fn set(&mut self, point: Point, foreground: bool) {
        let value = if foreground { FOREGROUND } else { BACKGROUND };
        self.image.put_pixel(point.x, point.y, Luma([value]));
    }

    /// Number of foreground pixels
    pub fn count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] != BACKGROUND).count()
    }

    /// Overwrite this mask with another one of the same geometry, reusing the allocation
    pub fn copy_from(&mut self, other: &BinaryMask) {
        debug_assert_eq!(self.image.dimensions(), other.image.dimensions());
        self.image.copy_from_slice(other.image.as_raw());
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub(crate) fn as_image_mut(&mut self) -> &mut GrayImage {
        &mut self.image
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn test_mask_marks_non_background_pixels() {
        let mut image = RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(2, 1, Rgba([200, 250, 250, 255]));
        image.put_pixel(3, 2, Rgba([0, 0, 0, 10]));
        let mask = BinaryMask::from_image(&image, classifier::LENIENT_THRESHOLD);
        assert_eq!(mask.count(), 2);
        assert!(mask.is_set(Point::new(1, 1)));
        assert!(mask.is_set(Point::new(2, 1)));
        assert!(!mask.is_set(Point::new(3, 2)));
        assert!(!mask.is_set(Point::new(40, 2)));
    }

    #[test]
    fn test_mask_is_deterministic() {
        let mut image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        image.put_pixel(3, 4, Rgba([10, 20, 30, 255]));
        let a = BinaryMask::from_image(&image, classifier::LENIENT_THRESHOLD);
        let b = BinaryMask::from_image(&image, classifier::LENIENT_THRESHOLD);
        assert_eq!(a, b);
    }
}
