//! Fit-and-center: uniform scale of an image into a target rectangle.
//!
//! The scale is the smaller of the two axis ratios, so the image touches the
//! target on one axis and is letterboxed (centered) on the other. Nothing is
//! ever cropped and the aspect ratio is preserved exactly.

use crate::error::{BannerError, Result};
use serde::{Deserialize, Serialize};

/// Placement of a scaled image inside a target rectangle.
///
/// Offsets are measured from the rectangle's lower-left corner, which for a
/// PDF page built at `[0 0 w h]` is the page origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub scale: f64,
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Compute the largest uniform scale that fits the image inside the target,
/// and the offsets that center it.
///
/// # Errors
/// [`BannerError::InvalidDimension`] if any input is zero, negative or not finite.
pub fn fit(
    image_width: f64,
    image_height: f64,
    target_width: f64,
    target_height: f64,
) -> Result<FitResult> {
    check("image_width", image_width)?;
    check("image_height", image_height)?;
    check("target_width", target_width)?;
    check("target_height", target_height)?;

    let scale = (target_width / image_width).min(target_height / image_height);
    // Pin the limiting axis to the target so rounding never pushes it past.
    let draw_width = (image_width * scale).min(target_width);
    let draw_height = (image_height * scale).min(target_height);

    Ok(FitResult {
        scale,
        draw_width,
        draw_height,
        offset_x: (target_width - draw_width) / 2.0,
        offset_y: (target_height - draw_height) / 2.0,
    })
}

fn check(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BannerError::InvalidDimension { what, value })
    }
}
