/// Pixel density in inches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dpi {
    pub(crate) x: u32,
    pub(crate) y: u32,
}

impl Dpi {
    /// Create instance from single value in inches
    pub fn new<T: Copy + Into<u32>>(v: T) -> Dpi {
        Dpi {
            x: v.into(),
            y: v.into(),
        }
    }

    /// Horizontal resolution in pixels per meter
    pub fn x_in_meters(&self) -> u32 {
        // 1 inch = 0.0254 m
        (self.x as f64 / 0.0254).round() as u32
    }
    /// Vertical resolution in pixels per meter
    pub fn y_in_meters(&self) -> u32 {
        (self.y as f64 / 0.0254).round() as u32
    }
}

impl From<&Dpi> for png::PixelDimensions {
    fn from(dpi: &Dpi) -> Self {
        png::PixelDimensions {
            xppu: dpi.x_in_meters(),
            yppu: dpi.y_in_meters(),
            unit: png::Unit::Meter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_in_meters() {
        let dpi = Dpi::new(300u32);
        let dims: png::PixelDimensions = (&dpi).into();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
    }
}
