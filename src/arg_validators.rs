use color::{AlphaColor, ParseError};
use image::Rgba;

use crate::segmentation::MAX_EROSION_PASSES;

pub(crate) fn validate_stroke_color(value: &str) -> Result<Rgba<u8>, String> {
    match parse_color(value) {
        Ok(color) => Ok(color),
        Err(e) => Err(e.to_string()),
    }
}

pub(crate) fn validate_erosion_passes(value: &str) -> Result<u32, String> {
    let passes = value
        .parse::<u32>()
        .map_err(|_| "Not a valid whole number".to_string())?;
    if passes > MAX_EROSION_PASSES {
        return Err(format!("Number must be at most {MAX_EROSION_PASSES}"));
    }
    Ok(passes)
}

/// Parse grid dimensions written as COLUMNSxROWS, like 4x4
pub(crate) fn validate_grid(value: &str) -> Result<(u32, u32), String> {
    let (columns, rows) = value
        .to_lowercase()
        .split_once('x')
        .map(|(c, r)| (c.trim().parse::<u32>(), r.trim().parse::<u32>()))
        .ok_or_else(|| "Expected COLUMNSxROWS, like 4x4".to_string())?;
    match (columns, rows) {
        (Ok(columns), Ok(rows)) if columns > 0 && rows > 0 => Ok((columns, rows)),
        (Ok(_), Ok(_)) => Err("Columns and rows must be greater than 0".to_string()),
        _ => Err("Columns and rows must be whole numbers".to_string()),
    }
}

/// Parse a string into a color, with format like this #RRGGBB
fn parse_color(color: &str) -> Result<Rgba<u8>, ParseError> {
    let color = color::parse_color(color)?;
    let color: AlphaColor<color::Srgb> = color.to_alpha_color();
    let color = color.to_rgba8();
    let color = Rgba(color.to_u8_array());
    Ok(color)
}
