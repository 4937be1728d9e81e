//! Non-maximum suppression: thin the gradient field to single-pixel
//! ridges.
//!
//! Each interior pixel keeps its magnitude only when it is the maximum
//! of itself and its two neighbors along the quantized orientation.
//! Tied plateaus keep exactly one pixel (see
//! [`Orientation::neighbor_offsets`]), so a perfect step edge thins to
//! a one-pixel line instead of a symmetric pair. Border pixels, which
//! lack two full neighbors, are zeroed.

use crate::gradient::{GradientField, Orientation};
use crate::types::Dimensions;

/// Gradient magnitudes after non-maximum suppression.
///
/// This is the single cached artifact that both thresholding and
/// hysteresis consume; it does not depend on the threshold fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct SuppressedField {
    width: u32,
    height: u32,
    magnitudes: Vec<f32>,
}

impl SuppressedField {
    pub(crate) fn from_raw(width: u32, height: u32, magnitudes: Vec<f32>) -> Self {
        Self {
            width,
            height,
            magnitudes,
        }
    }

    /// Grid width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width and height together.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Suppressed magnitude at `(x, y)`.
    #[must_use]
    pub fn magnitude(&self, x: u32, y: u32) -> f32 {
        self.magnitudes[y as usize * self.width as usize + x as usize]
    }

    /// All suppressed magnitudes, row-major.
    #[must_use]
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }
}

/// Suppress non-maximal magnitudes along their quantized orientation.
///
/// Pure and deterministic; the output has the same dimensions as the
/// input field.
#[must_use = "returns the suppressed field"]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn suppress(field: &GradientField) -> SuppressedField {
    let (width, height) = (field.width(), field.height());
    let mut magnitudes = vec![0.0f32; width as usize * height as usize];

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let magnitude = field.magnitude(x, y);
            let [first, second] = neighbor_magnitudes(field, x, y, field.orientation(x, y));
            if magnitude >= first && magnitude > second {
                magnitudes[y as usize * width as usize + x as usize] = magnitude;
            }
        }
    }

    SuppressedField::from_raw(width, height, magnitudes)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn neighbor_magnitudes(
    field: &GradientField,
    x: u32,
    y: u32,
    orientation: Orientation,
) -> [f32; 2] {
    orientation.neighbor_offsets().map(|(dx, dy)| {
        // Interior-only iteration keeps these in bounds.
        let nx = (i64::from(x) + dx) as u32;
        let ny = (i64::from(y) + dy) as u32;
        field.magnitude(nx, ny)
    })
}
