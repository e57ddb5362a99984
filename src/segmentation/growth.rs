use image::GrayImage;
use image::Luma;
use imageproc::region_labelling::Connectivity;
use tracing::debug;

use super::labelling::{self, Component};
use super::mask::BinaryMask;
use crate::geometry::{Point, Rect};

/// Owner label per pixel, 0 means unclaimed
///
/// A pixel is claimed by at most one region, [`ClaimedMap::claim`] only
/// succeeds on unclaimed pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedMap {
    width: u32,
    height: u32,
    owners: Vec<u32>,
}

impl ClaimedMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            owners: vec![0; width as usize * height as usize],
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x >= self.width || point.y >= self.height {
            return None;
        }
        Some(point.y as usize * self.width as usize + point.x as usize)
    }

    /// Label of the region owning the pixel
    pub fn owner(&self, point: Point) -> Option<u32> {
        let index = self.index(point)?;
        match self.owners[index] {
            0 => None,
            label => Some(label),
        }
    }

    pub fn is_claimed(&self, point: Point) -> bool {
        self.owner(point).is_some()
    }

    /// Assign the pixel to `label` unless it already has an owner
    pub fn claim(&mut self, point: Point, label: u32) -> bool {
        debug_assert_ne!(label, 0, "label 0 is reserved for unclaimed pixels");
        match self.index(point) {
            Some(index) if self.owners[index] == 0 => {
                self.owners[index] = label;
                true
            }
            _ => false,
        }
    }

    /// Number of pixels owned by `label`
    pub fn count_owned(&self, label: u32) -> usize {
        self.owners.iter().filter(|&&owner| owner == label).count()
    }

    /// Number of pixels owned by any region
    pub fn count_claimed(&self) -> usize {
        self.owners.iter().filter(|&&owner| owner != 0).count()
    }

    /// Grayscale rendering where every owner gets its own shade
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            match self.owner(Point::new(x, y)) {
                None => Luma([0u8]),
                // Spread labels over the visible range, never back to black
                Some(label) => Luma([64 + (label.wrapping_mul(37) % 192) as u8]),
            }
        })
    }
}

/// A grown region, `label` refers to its owner label in the claimed map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub rect: Rect,
    pub pixel_count: usize,
    pub label: Option<u32>,
}

/// Re-expand every seed over the original mask
///
/// Seeds are processed in the given order and claim pixels first come first
/// served, so regions never overlap. Growth starts from every pixel of `cores`
/// inside the seed box, so all fragments of a merged seed come back under one
/// label. It uses 8-connectivity and stays within the seed box expanded by
/// `margin`.
pub fn grow_regions(
    original: &BinaryMask,
    cores: &BinaryMask,
    seeds: &[Component],
    claimed: &mut ClaimedMap,
    margin: u32,
    stack: &mut Vec<Point>,
) -> Vec<Region> {
    let mut regions = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let Some(bounds) = seed
            .rect
            .padded_within(margin, original.width(), original.height())
        else {
            continue;
        };
        let usable = |point: &Point| original.is_set(*point) && !claimed.is_claimed(*point);
        stack.clear();
        stack.extend(
            seed.rect
                .points()
                .filter(|point| cores.is_set(*point) && usable(point)),
        );
        if stack.is_empty() {
            let Some(start) = find_start(original, claimed, &seed.rect) else {
                debug!(seed = ?seed.rect, "skipping seed without unclaimed foreground");
                continue;
            };
            stack.push(start);
        }
        let label = regions.len() as u32 + 1;
        let grown = labelling::fill(bounds, Connectivity::Eight, stack, |point| {
            original.is_set(point) && claimed.claim(point, label)
        });
        if let Some(component) = grown {
            debug!(seed = ?seed.rect, region = ?component.rect, pixels = component.pixel_count, "grew region");
            regions.push(Region {
                rect: component.rect,
                pixel_count: component.pixel_count,
                label: Some(label),
            });
        }
    }
    regions
}

/// Extend every labelled region over the unclaimed pixels of `mask` it touches
///
/// Regions are extended one after the other, so a pixel reachable from two
/// regions goes to the earlier one. With a `margin` each extension stays
/// within the region box expanded by that much, without one it may reach
/// anywhere on the image.
pub fn extend_regions(
    mask: &BinaryMask,
    regions: &mut [Region],
    claimed: &mut ClaimedMap,
    margin: Option<u32>,
    stack: &mut Vec<Point>,
) {
    for region in regions.iter_mut() {
        let Some(label) = region.label else {
            continue;
        };
        let bounds = match margin {
            Some(margin) => region
                .rect
                .padded_within(margin, mask.width(), mask.height()),
            None => labelling::full_bounds(mask),
        };
        let Some(bounds) = bounds else {
            continue;
        };
        stack.clear();
        for point in region.rect.points() {
            if claimed.owner(point) != Some(label) {
                continue;
            }
            stack.extend(
                labelling::neighbours(point, bounds, Connectivity::Eight)
                    .filter(|next| mask.is_set(*next) && !claimed.is_claimed(*next)),
            );
        }
        let extended = labelling::fill(bounds, Connectivity::Eight, stack, |point| {
            mask.is_set(point) && claimed.claim(point, label)
        });
        if let Some(component) = extended {
            debug!(region = ?region.rect, added = ?component.rect, pixels = component.pixel_count, "extended region");
            region.rect = region.rect.union(&component.rect);
            region.pixel_count += component.pixel_count;
        }
    }
}

/// Seed centroid if it is usable, otherwise the closest usable pixel inside the seed box
fn find_start(original: &BinaryMask, claimed: &ClaimedMap, rect: &Rect) -> Option<Point> {
    let usable = |point: &Point| original.is_set(*point) && !claimed.is_claimed(*point);
    let centroid = rect.centroid();
    if usable(&centroid) {
        return Some(centroid);
    }
    rect.points().filter(usable).min_by_key(|point| {
        let dx = point.x as i64 - centroid.x as i64;
        let dy = point.y as i64 - centroid.y as i64;
        dx * dx + dy * dy
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(width: u32, height: u32, rects: &[Rect]) -> BinaryMask {
        let mut mask = BinaryMask::new(width, height);
        for rect in rects {
            for point in rect.points() {
                mask.set(point, true);
            }
        }
        mask
    }

    /// Core mask covering the seed boxes
    fn cores_of(width: u32, height: u32, seeds: &[Component]) -> BinaryMask {
        let rects: Vec<Rect> = seeds.iter().map(|seed| seed.rect).collect();
        mask_with(width, height, &rects)
    }

    fn grow(original: &BinaryMask, seeds: &[Component], margin: u32) -> (Vec<Region>, ClaimedMap) {
        let mut claimed = ClaimedMap::new(original.width(), original.height());
        let cores = cores_of(original.width(), original.height(), seeds);
        let regions = grow_regions(
            original,
            &cores,
            seeds,
            &mut claimed,
            margin,
            &mut Vec::new(),
        );
        (regions, claimed)
    }

    fn seed(min_x: u32, max_x: u32, min_y: u32, max_y: u32) -> Component {
        let rect = Rect::new(min_x, max_x, min_y, max_y).unwrap();
        Component {
            rect,
            pixel_count: rect.area() as usize,
        }
    }

    #[test]
    fn test_growth_restores_eroded_boundary() {
        let original = mask_with(60, 60, &[Rect::new(10, 39, 10, 39).unwrap()]);
        let (regions, claimed) = grow(&original, &[seed(14, 35, 14, 35)], 16);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].rect, Rect::new(10, 39, 10, 39).unwrap());
        assert_eq!(regions[0].pixel_count, 900);
        assert_eq!(claimed.count_owned(1), 900);
    }

    #[test]
    fn test_regions_never_share_pixels() {
        // Two squares joined along a shared edge, the first seed wins the contest
        let original = mask_with(
            80,
            40,
            &[
                Rect::new(5, 34, 5, 34).unwrap(),
                Rect::new(35, 64, 5, 34).unwrap(),
            ],
        );
        let (regions, claimed) = grow(&original, &[seed(9, 30, 9, 30), seed(39, 60, 9, 30)], 16);
        assert_eq!(regions.len(), 2);
        let total: usize = regions.iter().map(|r| r.pixel_count).sum();
        assert_eq!(total, claimed.count_claimed());
        assert_eq!(total, original.count());
        for region in &regions {
            let label = region.label.unwrap();
            assert_eq!(claimed.count_owned(label), region.pixel_count);
        }
    }

    #[test]
    fn test_growth_is_bounded_by_margin() {
        // A long thin bridge must not let the first region swallow the second blob
        let original = mask_with(
            140,
            40,
            &[
                Rect::new(5, 34, 5, 34).unwrap(),
                Rect::new(35, 104, 19, 20).unwrap(),
                Rect::new(105, 134, 5, 34).unwrap(),
            ],
        );
        let (regions, _) = grow(&original, &[seed(9, 30, 9, 30), seed(109, 130, 9, 30)], 16);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].rect, Rect::new(5, 46, 5, 34).unwrap());
        assert_eq!(regions[1].rect, Rect::new(93, 134, 5, 34).unwrap());
    }

    #[test]
    fn test_start_moves_off_a_hollow_centroid() {
        // Ring shaped object, the centroid sits in the hole
        let mut original = mask_with(40, 40, &[Rect::new(5, 34, 5, 34).unwrap()]);
        for point in Rect::new(12, 27, 12, 27).unwrap().points() {
            original.set(point, false);
        }
        let (regions, _) = grow(&original, &[seed(5, 34, 5, 34)], 4);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixel_count, 900 - 256);
    }

    #[test]
    fn test_seed_without_foreground_is_skipped() {
        let original = BinaryMask::new(20, 20);
        let (regions, claimed) = grow(&original, &[seed(2, 10, 2, 10)], 4);
        assert!(regions.is_empty());
        assert_eq!(claimed.count_claimed(), 0);
    }

    #[test]
    fn test_merged_seed_restores_every_fragment() {
        // Two squares apart in the mask, merged into one seed by proximity
        let original = mask_with(
            120,
            40,
            &[
                Rect::new(5, 34, 5, 34).unwrap(),
                Rect::new(55, 84, 5, 34).unwrap(),
            ],
        );
        let fragments = [seed(9, 30, 9, 30), seed(59, 80, 9, 30)];
        let mut claimed = ClaimedMap::new(120, 40);
        let cores = cores_of(120, 40, &fragments);
        let regions = grow_regions(
            &original,
            &cores,
            &[seed(9, 80, 9, 30)],
            &mut claimed,
            16,
            &mut Vec::new(),
        );
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].rect, Rect::new(5, 84, 5, 34).unwrap());
        assert_eq!(regions[0].pixel_count, 2 * 900);
    }

    #[test]
    fn test_extension_follows_a_long_limb() {
        let original = mask_with(
            140,
            40,
            &[
                Rect::new(5, 34, 5, 34).unwrap(),
                Rect::new(35, 129, 19, 20).unwrap(),
            ],
        );
        let (mut regions, mut claimed) = grow(&original, &[seed(9, 30, 9, 30)], 16);
        assert_eq!(regions[0].rect, Rect::new(5, 46, 5, 34).unwrap());
        extend_regions(&original, &mut regions, &mut claimed, None, &mut Vec::new());
        assert_eq!(regions[0].rect, Rect::new(5, 129, 5, 34).unwrap());
        assert_eq!(regions[0].pixel_count, original.count());
        assert_eq!(claimed.count_owned(1), original.count());
    }

    #[test]
    fn test_extension_keeps_a_bridge_split() {
        let original = mask_with(
            140,
            40,
            &[
                Rect::new(5, 34, 5, 34).unwrap(),
                Rect::new(35, 104, 19, 20).unwrap(),
                Rect::new(105, 134, 5, 34).unwrap(),
            ],
        );
        let (mut regions, mut claimed) =
            grow(&original, &[seed(9, 30, 9, 30), seed(109, 130, 9, 30)], 16);
        extend_regions(&original, &mut regions, &mut claimed, None, &mut Vec::new());
        // the earlier region takes the unreached middle of the bridge, the blob stays apart
        assert_eq!(regions[0].rect, Rect::new(5, 92, 5, 34).unwrap());
        assert_eq!(regions[1].rect, Rect::new(93, 134, 5, 34).unwrap());
        assert_eq!(claimed.count_claimed(), original.count());
    }

    #[test]
    fn test_extension_margin_limits_reach() {
        let original = mask_with(100, 20, &[Rect::new(0, 99, 5, 6).unwrap()]);
        let mut claimed = ClaimedMap::new(100, 20);
        for point in Rect::new(0, 9, 5, 6).unwrap().points() {
            claimed.claim(point, 1);
        }
        let mut regions = vec![Region {
            rect: Rect::new(0, 9, 5, 6).unwrap(),
            pixel_count: 20,
            label: Some(1),
        }];
        extend_regions(&original, &mut regions, &mut claimed, Some(5), &mut Vec::new());
        assert_eq!(regions[0].rect, Rect::new(0, 14, 5, 6).unwrap());
        assert_eq!(regions[0].pixel_count, 30);
    }
}
