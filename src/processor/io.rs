use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

use image::GrayImage;
use image::RgbaImage;

use super::dpi::Dpi;
use crate::Result;
use crate::encoding;

/// Helper to avoid having to specify common information for saving images over and over again
pub struct ImageSaver {
    base_path: PathBuf,
    dpi: Dpi,
    is_debugging: bool,
}

impl ImageSaver {
    /// Construct a new ImageSaver with the specified base path and DPI
    pub fn new(base_path: &Path, dpi: Dpi, is_debugging: bool) -> Self {
        Self {
            base_path: base_path.to_owned(),
            dpi,
            is_debugging,
        }
    }

    /// Save RGBA image to PNG file with suffix appended before extension (includes pixel density header)
    pub fn save_rgba_image_as(&self, img: &RgbaImage, suffix: &str) -> Result<PathBuf> {
        let filename = self.compute_path(suffix);
        let file = File::create(&filename)?;
        encoding::write_rgba_png(img, BufWriter::new(file), Some((&self.dpi).into()))?;
        println!("{}: saved", filename.display());
        Ok(filename)
    }

    /// Save grayscale image to file with suffix appended before extension
    pub fn save_luma_image_as(&self, img: &GrayImage, suffix: &str) -> Result<PathBuf> {
        let filename = self.compute_path(suffix);
        img.save(&filename)?;
        println!("{}: saved", filename.display());
        Ok(filename)
    }

    /// Save grayscale image only when intermediary images were requested
    pub fn save_debug_luma_image_as(&self, img: &GrayImage, suffix: &str) -> Result<()> {
        if self.is_debugging {
            self.save_luma_image_as(img, suffix)?;
        }
        Ok(())
    }

    /// Compute full file path from base path and suffix
    pub fn compute_path(&self, suffix: &str) -> PathBuf {
        format!("{}-{suffix}.png", self.base_path.display()).into()
    }
}
