//! Split a sticker sheet into one bounding box per drawing
//!
//! The sheet is turned into a foreground mask, the mask is closed and eroded
//! until touching drawings come apart, the surviving cores are labelled and
//! merged, and every core is grown back over the untouched mask. When that
//! finds too few drawings a fixed grid is imposed instead.

use derive_more::Display;
use image::RgbaImage;
use imageproc::region_labelling::Connectivity;
use tracing::{debug, warn};

pub use self::classifier::{
    LENIENT_THRESHOLD, STRICT_THRESHOLD, TRANSPARENT_ALPHA_CUTOFF, is_background,
    is_background_pixel,
};
pub use self::grid::GridFallback;
pub use self::growth::{ClaimedMap, Region};
pub use self::labelling::{Component, ComponentFilter};
pub use self::mask::BinaryMask;
pub use self::morphology::MAX_EROSION_PASSES;

pub mod classifier;
pub mod grid;
pub mod growth;
pub mod labelling;
pub mod mask;
pub mod merge;
pub mod morphology;

/// Pipeline transitions reported through the progress callback
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    #[display("Preprocessing image")]
    Preprocessing,
    #[display("Solidifying shapes")]
    Solidifying,
    #[display("Separating touching stickers")]
    Separating,
    #[display("Locating sticker cores")]
    LocatingCores,
    #[display("Restoring sticker edges")]
    Restoring,
    #[display("Few stickers found, falling back to grid layout")]
    GridFallback,
    #[display("Finalizing stickers")]
    Finalizing,
}

/// Tuning for [`segment_sheet`]
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Lenient background threshold for the coarse mask
    pub mask_threshold: u8,
    /// Dilation radius applied before erosion, 0 disables it
    pub closing_radius: u8,
    /// Erosion passes, clamped to [`MAX_EROSION_PASSES`]
    pub erosion_passes: u32,
    /// Noise filter for cores found on the eroded mask
    pub seed_filter: ComponentFilter,
    /// Cores closer than this are considered fragments of one drawing
    pub seed_merge_distance: u32,
    /// How far growth may reach beyond the box of its core
    pub growth_margin: u32,
    /// Grown regions smaller than this are dropped
    pub region_filter: ComponentFilter,
    /// Background threshold for the faint edge pixels added to finished regions
    pub edge_threshold: u8,
    /// How far faint edges may reach beyond a region box
    pub edge_margin: u32,
    /// Components closer than this are grouped during grid cell refinement
    pub cell_merge_distance: u32,
    pub grid_fallback: Option<GridFallback>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            mask_threshold: LENIENT_THRESHOLD,
            closing_radius: 2,
            erosion_passes: 4,
            seed_filter: ComponentFilter {
                min_pixels: 50,
                min_side: 1,
            },
            seed_merge_distance: 30,
            growth_margin: 16,
            region_filter: ComponentFilter {
                min_pixels: 100,
                min_side: 20,
            },
            edge_threshold: STRICT_THRESHOLD,
            edge_margin: 10,
            cell_merge_distance: 5,
            grid_fallback: Some(GridFallback::default()),
        }
    }
}

impl SegmentationConfig {
    /// Defaults without the grid fallback, for images not laid out on the sheet grid
    pub fn organic() -> Self {
        Self {
            grid_fallback: None,
            ..Self::default()
        }
    }
}

/// Everything produced by one segmentation run
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub regions: Vec<Region>,
    /// Foreground mask of the untouched image
    pub original_mask: BinaryMask,
    /// Mask after closing and erosion, the one cores were found on
    pub working_mask: BinaryMask,
    /// Owner of every pixel claimed by a region
    pub claimed: ClaimedMap,
    pub used_grid_fallback: bool,
}

/// Find the bounding box of every drawing on the sheet
///
/// Regions come out in the row-major discovery order of their cores (or grid
/// order after a fallback). The masks and claim map live only for this call.
pub fn segment_sheet(
    image: &RgbaImage,
    config: &SegmentationConfig,
    mut progress: impl FnMut(Stage),
) -> Segmentation {
    let (width, height) = image.dimensions();
    let mut stack = Vec::new();

    progress(Stage::Preprocessing);
    let original_mask = BinaryMask::from_image(image, config.mask_threshold);
    debug!(
        width,
        height,
        foreground = original_mask.count(),
        "built foreground mask"
    );

    progress(Stage::Solidifying);
    let mut working_mask = original_mask.clone();
    morphology::dilate(&mut working_mask, config.closing_radius);

    progress(Stage::Separating);
    let passes = if config.erosion_passes > MAX_EROSION_PASSES {
        warn!(
            requested = config.erosion_passes,
            max = MAX_EROSION_PASSES,
            "clamping erosion passes"
        );
        MAX_EROSION_PASSES
    } else {
        config.erosion_passes
    };
    let mut scratch = BinaryMask::new(width, height);
    morphology::erode(&mut working_mask, &mut scratch, passes);
    drop(scratch);

    let mut claimed = ClaimedMap::new(width, height);
    let Some(bounds) = labelling::full_bounds(&original_mask) else {
        return Segmentation {
            regions: Vec::new(),
            original_mask,
            working_mask,
            claimed,
            used_grid_fallback: false,
        };
    };

    progress(Stage::LocatingCores);
    let seeds = labelling::label_components(
        &working_mask,
        bounds,
        Connectivity::Four,
        config.seed_filter,
        &mut stack,
    );
    let seed_count = seeds.len();
    let seeds = merge::merge_nearby(seeds, config.seed_merge_distance);
    debug!(found = seed_count, merged = seeds.len(), "located cores");

    progress(Stage::Restoring);
    let mut regions = growth::grow_regions(
        &original_mask,
        &working_mask,
        &seeds,
        &mut claimed,
        config.growth_margin,
        &mut stack,
    );
    // Limbs thinner than the erosion reach past the growth margin
    growth::extend_regions(&original_mask, &mut regions, &mut claimed, None, &mut stack);
    regions.retain(|region| {
        config.region_filter.accepts(&Component {
            rect: region.rect,
            pixel_count: region.pixel_count,
        })
    });
    debug!(regions = regions.len(), "restored regions");

    let mut used_grid_fallback = false;
    if let Some(grid) = config.grid_fallback.filter(|g| g.should_trigger(regions.len())) {
        progress(Stage::GridFallback);
        warn!(
            regions = regions.len(),
            min_regions = grid.min_regions,
            columns = grid.columns,
            rows = grid.rows,
            "too few regions, using grid layout"
        );
        claimed = ClaimedMap::new(width, height);
        let cells = grid::grid_cells(width, height, &grid);
        regions = if grid.refine {
            grid::refine_cells(
                &original_mask,
                &cells,
                &mut claimed,
                config.seed_filter,
                config.cell_merge_distance,
                &mut stack,
            )
        } else {
            cells
                .into_iter()
                .map(|rect| Region {
                    rect,
                    pixel_count: 0,
                    label: None,
                })
                .collect()
        };
        used_grid_fallback = true;
    }

    // Faint edges only pass the stricter threshold, hand each one to a single region
    let edge_mask = BinaryMask::from_image(image, config.edge_threshold);
    growth::extend_regions(
        &edge_mask,
        &mut regions,
        &mut claimed,
        Some(config.edge_margin),
        &mut stack,
    );

    Segmentation {
        regions,
        original_mask,
        working_mask,
        claimed,
        used_grid_fallback,
    }
}
