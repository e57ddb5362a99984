use imageproc::region_labelling::Connectivity;

use super::mask::BinaryMask;
use crate::geometry::{Point, Rect};

const FOUR_NEIGHBOURS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const EIGHT_NEIGHBOURS: [(i64, i64); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// A connected foreground region found by flood fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub rect: Rect,
    pub pixel_count: usize,
}

/// Size requirements a component must satisfy to be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentFilter {
    pub min_pixels: usize,
    pub min_side: u32,
}

impl ComponentFilter {
    pub fn accepts(&self, component: &Component) -> bool {
        component.pixel_count >= self.min_pixels
            && component.rect.width() >= self.min_side
            && component.rect.height() >= self.min_side
    }
}

/// Flood fill from `start` without recursion, staying inside `bounds`
///
/// `claim` is asked once for every reached pixel and returns true when the
/// pixel belongs to the region (it is expected to mark the pixel as visited).
/// The stack is borrowed so a single allocation serves a whole segmentation run.
pub(crate) fn flood_fill(
    start: Point,
    bounds: Rect,
    connectivity: Connectivity,
    stack: &mut Vec<Point>,
    claim: impl FnMut(Point) -> bool,
) -> Option<Component> {
    stack.clear();
    stack.push(start);
    fill(bounds, connectivity, stack, claim)
}

/// Flood fill from every point already on `stack`
///
/// Same rules as [`flood_fill`]. The result covers the newly claimed pixels only.
pub(crate) fn fill(
    bounds: Rect,
    connectivity: Connectivity,
    stack: &mut Vec<Point>,
    mut claim: impl FnMut(Point) -> bool,
) -> Option<Component> {
    let mut component: Option<Component> = None;
    while let Some(point) = stack.pop() {
        if !bounds.contains(point) || !claim(point) {
            continue;
        }
        match component.as_mut() {
            Some(c) => {
                c.rect.include(point);
                c.pixel_count += 1;
            }
            None => {
                component = Some(Component {
                    rect: Rect::from_point(point),
                    pixel_count: 1,
                })
            }
        }
        stack.extend(neighbours(point, bounds, connectivity));
    }
    component
}

/// Neighbours of `point` that lie inside `bounds`
pub(crate) fn neighbours(
    point: Point,
    bounds: Rect,
    connectivity: Connectivity,
) -> impl Iterator<Item = Point> {
    let offsets: &'static [(i64, i64)] = match connectivity {
        Connectivity::Four => &FOUR_NEIGHBOURS,
        Connectivity::Eight => &EIGHT_NEIGHBOURS,
    };
    offsets.iter().filter_map(move |(dx, dy)| {
        let x = point.x as i64 + dx;
        let y = point.y as i64 + dy;
        if x < bounds.min_x() as i64
            || x > bounds.max_x() as i64
            || y < bounds.min_y() as i64
            || y > bounds.max_y() as i64
        {
            return None;
        }
        Some(Point::new(x as u32, y as u32))
    })
}

/// Label the connected foreground components of `mask` inside `bounds`
///
/// Components are returned in row-major discovery order (the position of
/// their top-most, left-most pixel), which keeps every later stage
/// deterministic. Components rejected by `filter` are dropped.
pub fn label_components(
    mask: &BinaryMask,
    bounds: Rect,
    connectivity: Connectivity,
    filter: ComponentFilter,
    stack: &mut Vec<Point>,
) -> Vec<Component> {
    let scope_width = bounds.width() as usize;
    let mut visited = vec![false; scope_width * bounds.height() as usize];
    let local_index = |point: Point| {
        (point.y - bounds.min_y()) as usize * scope_width + (point.x - bounds.min_x()) as usize
    };
    let mut components = Vec::new();
    for start in bounds.points() {
        if visited[local_index(start)] || !mask.is_set(start) {
            continue;
        }
        let found = flood_fill(start, bounds, connectivity, stack, |point| {
            let index = local_index(point);
            if visited[index] || !mask.is_set(point) {
                return false;
            }
            visited[index] = true;
            true
        });
        if let Some(component) = found.filter(|c| filter.accepts(c)) {
            components.push(component);
        }
    }
    components
}

/// Whole-image scope for [`label_components`], `None` for an empty mask
pub fn full_bounds(mask: &BinaryMask) -> Option<Rect> {
    Rect::from_origin_and_size(0, 0, mask.width(), mask.height())
}
