use imageproc::region_labelling::Connectivity;
use itertools::Itertools; // for cartesian_product()

use super::growth::{ClaimedMap, Region};
use super::labelling::{self, Component, ComponentFilter};
use super::mask::BinaryMask;
use super::merge;
use crate::geometry::{Point, Rect};

/// Fixed layout imposed when organic segmentation finds too few regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFallback {
    pub columns: u32,
    pub rows: u32,
    /// Pixels trimmed from every side of a cell
    pub margin: u32,
    /// Fall back when fewer regions than this were found
    pub min_regions: usize,
    /// Shrink every cell to its largest foreground group
    pub refine: bool,
}

impl Default for GridFallback {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
            margin: 12,
            min_regions: 10,
            refine: true,
        }
    }
}

impl GridFallback {
    pub fn should_trigger(&self, region_count: usize) -> bool {
        region_count < self.min_regions
    }
}

/// Cell rectangles in row-major order, each shrunk by the margin
///
/// Only depends on the image size and the grid, cells too small to survive
/// the margin are left out.
pub fn grid_cells(width: u32, height: u32, grid: &GridFallback) -> Vec<Rect> {
    if grid.columns == 0 || grid.rows == 0 {
        return Vec::new();
    }
    let edges = |index: u32, count: u32, length: u32| {
        let start = (index as u64 * length as u64 / count as u64) as u32;
        let end = ((index as u64 + 1) * length as u64 / count as u64) as u32;
        (start, end.checked_sub(1))
    };
    (0..grid.rows)
        .cartesian_product(0..grid.columns)
        .filter_map(|(row, column)| {
            let (min_x, max_x) = edges(column, grid.columns, width);
            let (min_y, max_y) = edges(row, grid.rows, height);
            Rect::new(min_x, max_x?, min_y, max_y?)?.shrunk(grid.margin)
        })
        .collect()
}

/// Narrow every cell down to its largest connected foreground group
///
/// Components inside a cell that lie within `merge_distance` of each other form a
/// group, so a character with a detached accessory stays whole while bleed from a
/// neighbouring cell is dropped. The kept group is claimed in `claimed`. Cells
/// without any foreground are left out.
pub fn refine_cells(
    original: &BinaryMask,
    cells: &[Rect],
    claimed: &mut ClaimedMap,
    filter: ComponentFilter,
    merge_distance: u32,
    stack: &mut Vec<Point>,
) -> Vec<Region> {
    let mut regions = Vec::with_capacity(cells.len());
    for cell in cells {
        let components =
            labelling::label_components(original, *cell, Connectivity::Four, filter, stack);
        let largest = merge::merge_nearby(components, merge_distance)
            .into_iter()
            .reduce(|best, group| {
                if group.pixel_count > best.pixel_count {
                    group
                } else {
                    best
                }
            });
        let Some(Component { rect, .. }) = largest else {
            continue;
        };
        let label = regions.len() as u32 + 1;
        let pixel_count = rect
            .points()
            .filter(|point| original.is_set(*point) && claimed.claim(*point, label))
            .count();
        regions.push(Region {
            rect,
            pixel_count,
            label: Some(label),
        });
    }
    regions
}
