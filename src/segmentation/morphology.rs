use imageproc::distance_transform::Norm;

use super::mask::{BACKGROUND, BinaryMask};

/// Upper bound on erosion passes, thin connectors do not survive beyond this
pub const MAX_EROSION_PASSES: u32 = 6;

/// Erode the foreground with 4-neighbour connectivity, one generation per pass
///
/// Every pass reads the previous generation and writes into `scratch`, the two
/// buffers are then swapped. Pixels on the outer rows and columns are never
/// scanned and keep their value.
pub fn erode(mask: &mut BinaryMask, scratch: &mut BinaryMask, passes: u32) {
    let (width, height) = (mask.width() as usize, mask.height() as usize);
    if width < 3 || height < 3 {
        return;
    }
    for _ in 0..passes {
        scratch.copy_from(mask);
        let current = mask.as_image().as_raw();
        let next: &mut [u8] = scratch.as_image_mut();
        let mut changed = false;
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let i = y * width + x;
                if current[i] == BACKGROUND {
                    continue;
                }
                let exposed = current[i - 1] == BACKGROUND
                    || current[i + 1] == BACKGROUND
                    || current[i - width] == BACKGROUND
                    || current[i + width] == BACKGROUND;
                if exposed {
                    next[i] = BACKGROUND;
                    changed = true;
                }
            }
        }
        std::mem::swap(mask, scratch);
        if !changed {
            break;
        }
    }
}

/// Set every pixel within `radius` (chessboard distance) of a foreground pixel
///
/// Bridges one or two pixel gaps such as eyes or mouth strokes, so a face
/// is not split into several pieces by the following erosion.
pub fn dilate(mask: &mut BinaryMask, radius: u8) {
    if radius == 0 {
        return;
    }
    imageproc::morphology::dilate_mut(mask.as_image_mut(), Norm::LInf, radius);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};

    fn mask_with(width: u32, height: u32, rects: &[Rect]) -> BinaryMask {
        let mut mask = BinaryMask::new(width, height);
        for rect in rects {
            for point in rect.points() {
                mask.set(point, true);
            }
        }
        mask
    }

    #[test]
    fn test_erosion_shrinks_one_pixel_per_pass() {
        let mut mask = mask_with(20, 20, &[Rect::new(5, 14, 5, 14).unwrap()]);
        let mut scratch = BinaryMask::new(20, 20);
        erode(&mut mask, &mut scratch, 2);
        assert_eq!(mask, mask_with(20, 20, &[Rect::new(7, 12, 7, 12).unwrap()]));
    }

    #[test]
    fn test_erosion_is_order_independent() {
        // An in-place pass would also strip (3, 3) right after clearing (2, 3)
        let mut mask = mask_with(
            10,
            10,
            &[
                Rect::new(2, 6, 2, 4).unwrap(),
                Rect::new(4, 8, 4, 6).unwrap(),
            ],
        );
        let mut scratch = BinaryMask::new(10, 10);
        erode(&mut mask, &mut scratch, 1);
        assert!(mask.is_set(Point::new(3, 3)));
        assert!(mask.is_set(Point::new(5, 5)));
        assert!(mask.is_set(Point::new(7, 5)));
        assert!(!mask.is_set(Point::new(2, 3)));
    }

    #[test]
    fn test_erosion_leaves_border_pixels() {
        let mut mask = mask_with(6, 6, &[Rect::new(0, 5, 0, 5).unwrap()]);
        let mut scratch = BinaryMask::new(6, 6);
        erode(&mut mask, &mut scratch, 1);
        // Interior pixels only have foreground neighbours, border pixels are not scanned
        assert_eq!(mask.count(), 36);
    }

    #[test]
    fn test_erosion_separates_thin_bridge() {
        let mut mask = mask_with(
            40,
            20,
            &[
                Rect::new(2, 15, 2, 17).unwrap(),
                Rect::new(16, 23, 9, 10).unwrap(),
                Rect::new(24, 37, 2, 17).unwrap(),
            ],
        );
        let mut scratch = BinaryMask::new(40, 20);
        erode(&mut mask, &mut scratch, 1);
        assert!(!mask.is_set(Point::new(19, 9)));
        assert!(!mask.is_set(Point::new(19, 10)));
        assert!(mask.is_set(Point::new(8, 9)));
        assert!(mask.is_set(Point::new(30, 9)));
    }

    #[test]
    fn test_dilation_closes_small_gaps() {
        let mut mask = mask_with(
            20,
            10,
            &[
                Rect::new(2, 7, 2, 7).unwrap(),
                Rect::new(10, 15, 2, 7).unwrap(),
            ],
        );
        dilate(&mut mask, 2);
        for x in 8..=9 {
            assert!(mask.is_set(Point::new(x, 4)));
        }
        assert!(mask.is_set(Point::new(0, 0)));
        assert!(!mask.is_set(Point::new(18, 4)));
    }
}
