//! Per-pixel gradient magnitude and quantized orientation.
//!
//! Horizontal and vertical derivatives come from the 3x3 Sobel kernel
//! pair, computed per channel with clamp-to-edge sampling. Multi-channel
//! estimates collapse to one magnitude and orientation per pixel via a
//! [`ChannelReduction`] policy. Magnitudes are scaled by the maximum
//! possible Sobel response so they stay in `0.0..=1.0`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::raster::PixelBuffer;
use crate::types::Dimensions;

/// Largest magnitude the Sobel pair can produce for unit-range
/// samples: hypot(4, 4) = 4 * sqrt(2).
const MAX_SOBEL_RESPONSE: f32 = 5.656_854_2;

const SOBEL_HORIZONTAL: [[f32; 3]; 3] = [
    [-1.0, 0.0, 1.0],
    [-2.0, 0.0, 2.0],
    [-1.0, 0.0, 1.0],
];

const SOBEL_VERTICAL: [[f32; 3]; 3] = [
    [-1.0, -2.0, -1.0],
    [0.0, 0.0, 0.0],
    [1.0, 2.0, 1.0],
];

/// How multi-channel gradient estimates collapse to one per pixel.
///
/// A closed strategy set: adding a policy means adding a variant here
/// and an arm in [`compute`], nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelReduction {
    /// Take magnitude and orientation from whichever channel produced
    /// the largest magnitude. A strong edge in a single channel (a
    /// red/green boundary at equal luminance, say) is not diluted by
    /// the quiet channels. Ties keep the lowest channel index.
    MaxAbs,
}

impl Default for ChannelReduction {
    fn default() -> Self {
        Self::MaxAbs
    }
}

impl fmt::Display for ChannelReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxAbs => write!(f, "max-abs"),
        }
    }
}

/// Gradient orientation quantized to four buckets.
///
/// The bucket names the axis the gradient points along; non-maximum
/// suppression compares against the two neighbors on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Gradient along x (a vertical edge). Neighbors left and right.
    Horizontal,
    /// Gradient at 45 degrees. Neighbors down-right and up-left.
    DiagonalUp,
    /// Gradient along y (a horizontal edge). Neighbors above and below.
    Vertical,
    /// Gradient at 135 degrees. Neighbors down-left and up-right.
    DiagonalDown,
}

impl Orientation {
    /// Quantize a derivative pair to the nearest bucket using the
    /// 22.5-degree boundaries.
    fn from_derivatives(dx: f32, dy: f32) -> Self {
        let mut angle = dy.atan2(dx).to_degrees();
        if angle < 0.0 {
            angle += 180.0;
        }
        if !(22.5..157.5).contains(&angle) {
            Self::Horizontal
        } else if (22.5..67.5).contains(&angle) {
            Self::DiagonalUp
        } else if (67.5..112.5).contains(&angle) {
            Self::Vertical
        } else {
            Self::DiagonalDown
        }
    }

    /// The two neighbor offsets along this orientation, as `(dx, dy)`.
    ///
    /// The ordering is load-bearing for suppression's tie handling:
    /// a pixel survives when its magnitude is `>=` the first neighbor
    /// and `>` the second, so exactly one pixel of a tied pair is kept.
    pub(crate) const fn neighbor_offsets(self) -> [(i64, i64); 2] {
        match self {
            Self::Horizontal => [(-1, 0), (1, 0)],
            Self::DiagonalUp => [(1, 1), (-1, -1)],
            Self::Vertical => [(0, -1), (0, 1)],
            Self::DiagonalDown => [(-1, 1), (1, -1)],
        }
    }
}

/// Per-pixel gradient magnitude and quantized orientation for a single
/// logical grid matching the source image.
#[derive(Debug, Clone)]
pub struct GradientField {
    width: u32,
    height: u32,
    magnitudes: Vec<f32>,
    orientations: Vec<Orientation>,
}

impl GradientField {
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

    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Normalized gradient magnitude at `(x, y)`.
    #[must_use]
    pub fn magnitude(&self, x: u32, y: u32) -> f32 {
        self.magnitudes[self.index(x, y)]
    }

    /// Quantized orientation at `(x, y)`.
    #[must_use]
    pub fn orientation(&self, x: u32, y: u32) -> Orientation {
        self.orientations[self.index(x, y)]
    }

    /// All magnitudes, row-major.
    #[must_use]
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }
}

/// Compute the gradient field of a (possibly pre-blurred) buffer.
///
/// Every pixel of every channel gets a Sobel derivative pair with
/// clamp-to-edge sampling; `reduction` collapses the channels.
#[must_use = "returns the computed gradient field"]
pub fn compute(image: &PixelBuffer, reduction: ChannelReduction) -> GradientField {
    let (width, height) = (image.width(), image.height());
    let pixel_count = width as usize * height as usize;
    let mut magnitudes = Vec::with_capacity(pixel_count);
    let mut orientations = Vec::with_capacity(pixel_count);

    for y in 0..height {
        for x in 0..width {
            let (dx, dy) = match reduction {
                ChannelReduction::MaxAbs => strongest_channel_derivatives(image, x, y),
            };
            magnitudes.push(dx.hypot(dy) / MAX_SOBEL_RESPONSE);
            orientations.push(Orientation::from_derivatives(dx, dy));
        }
    }

    GradientField {
        width,
        height,
        magnitudes,
        orientations,
    }
}

/// Sobel derivative pair of the channel with the largest magnitude at
/// `(x, y)`. Compared on squared magnitude; strict comparison keeps the
/// lowest channel index on ties, so the result does not depend on
/// evaluation order.
fn strongest_channel_derivatives(image: &PixelBuffer, x: u32, y: u32) -> (f32, f32) {
    let mut best = (0.0f32, 0.0f32);
    let mut best_squared = -1.0f32;

    for channel in 0..image.channel_count() {
        let (dx, dy) = sobel_at(image, x, y, channel);
        let squared = dx.mul_add(dx, dy * dy);
        if squared > best_squared {
            best_squared = squared;
            best = (dx, dy);
        }
    }

    best
}

fn sobel_at(image: &PixelBuffer, x: u32, y: u32, channel: u32) -> (f32, f32) {
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    for (ky, row) in SOBEL_HORIZONTAL.iter().enumerate() {
        for (kx, &weight_x) in row.iter().enumerate() {
            let sx = i64::from(x) + kx as i64 - 1;
            let sy = i64::from(y) + ky as i64 - 1;
            let sample = image.sample_clamped(sx, sy, channel);
            dx += weight_x * sample;
            dy += SOBEL_VERTICAL[ky][kx] * sample;
        }
    }
    (dx, dy)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::raster::tests::{gray_png_from_fn, png_from_fn};

    const EPSILON: f32 = 1e-5;

    fn gray_buffer(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PixelBuffer {
        let png = gray_png_from_fn(width, height, |x, y| image::Luma([f(x, y)]));
        PixelBuffer::decode(&png).unwrap()
    }

    #[test]
    fn uniform_image_has_zero_gradients() {
        let img = gray_buffer(5, 5, |_, _| 128);
        let field = compute(&img, ChannelReduction::MaxAbs);
        for &m in field.magnitudes() {
            assert!(m.abs() < EPSILON, "expected zero magnitude, got {m}");
        }
    }

    #[test]
    fn vertical_step_edge_exact_magnitude() {
        // Columns 0 then 255: interior pixels next to the boundary see
        // dx = 4 * (1.0 - 0.0) = 4, dy = 0, so the normalized magnitude
        // is 4 / (4 * sqrt(2)) = 1 / sqrt(2).
        let img = gray_buffer(4, 4, |x, _| if x < 2 { 0 } else { 255 });
        let field = compute(&img, ChannelReduction::MaxAbs);
        let expected = 1.0 / 2.0f32.sqrt();
        assert!(
            (field.magnitude(1, 1) - expected).abs() < EPSILON,
            "expected {expected}, got {}",
            field.magnitude(1, 1),
        );
        assert!(
            (field.magnitude(2, 2) - expected).abs() < EPSILON,
            "expected {expected}, got {}",
            field.magnitude(2, 2),
        );
        assert_eq!(field.orientation(1, 1), Orientation::Horizontal);
    }

    #[test]
    fn horizontal_step_edge_is_vertical_orientation() {
        let img = gray_buffer(4, 4, |_, y| if y < 2 { 0 } else { 255 });
        let field = compute(&img, ChannelReduction::MaxAbs);
        let expected = 1.0 / 2.0f32.sqrt();
        assert!((field.magnitude(1, 1) - expected).abs() < EPSILON);
        assert_eq!(field.orientation(1, 1), Orientation::Vertical);
    }

    #[test]
    fn diagonal_plane_exact_magnitude_and_orientation() {
        // f(x, y) = (x + y) * 31 / 255 is a plane with equal x and y
        // slope a = 31/255 per pixel. Sobel responds with dx = dy = 4a,
        // magnitude = hypot(4a, 4a) / (4 * sqrt(2)) = a.
        let img = gray_buffer(5, 5, |x, y| ((x + y) * 31) as u8);
        let field = compute(&img, ChannelReduction::MaxAbs);
        let expected = 31.0 / 255.0;
        assert!(
            (field.magnitude(2, 2) - expected).abs() < 1e-4,
            "expected {expected}, got {}",
            field.magnitude(2, 2),
        );
        assert_eq!(field.orientation(2, 2), Orientation::DiagonalUp);
    }

    #[test]
    fn clamped_border_of_uniform_columns_has_no_vertical_response() {
        // Columns vary, rows are constant: clamp-to-edge means the top
        // and bottom border rows still see dy = 0 everywhere.
        let img = gray_buffer(6, 4, |x, _| (x * 40) as u8);
        let field = compute(&img, ChannelReduction::MaxAbs);
        for x in 1..5 {
            assert_eq!(
                field.orientation(x, 0),
                Orientation::Horizontal,
                "border pixel ({x},0) should keep a pure horizontal gradient",
            );
        }
    }

    #[test]
    fn max_abs_picks_strongest_channel() {
        // Red fades left-to-right gently; blue steps hard at x=2. The
        // blue channel must win even though red also varies.
        let png = png_from_fn(5, 5, |x, _| {
            let red = (x * 10) as u8;
            let blue = if x < 2 { 0 } else { 255 };
            image::Rgba([red, 0, blue, 255])
        });
        let img = PixelBuffer::decode(&png).unwrap();
        let field = compute(&img, ChannelReduction::MaxAbs);

        // Blue alone: dx = 4 at the step, normalized 1/sqrt(2). The red
        // ramp contributes at most 4 * 10/255. Max-abs must report the
        // blue step, not an average dragged down by red and green.
        let expected = 1.0 / 2.0f32.sqrt();
        assert!(
            (field.magnitude(2, 2) - expected).abs() < EPSILON,
            "expected the blue step magnitude {expected}, got {}",
            field.magnitude(2, 2),
        );
    }

    #[test]
    fn equal_luminance_color_edge_is_not_diluted() {
        // A red/green boundary: each channel sees a full-range step.
        let png = png_from_fn(6, 6, |x, _| {
            if x < 3 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 255, 0, 255])
            }
        });
        let img = PixelBuffer::decode(&png).unwrap();
        let field = compute(&img, ChannelReduction::MaxAbs);
        let expected = 1.0 / 2.0f32.sqrt();
        assert!(
            (field.magnitude(3, 3) - expected).abs() < EPSILON,
            "expected full step magnitude {expected}, got {}",
            field.magnitude(3, 3),
        );
    }

    #[test]
    fn orientation_quantization_boundaries() {
        assert_eq!(
            Orientation::from_derivatives(1.0, 0.0),
            Orientation::Horizontal,
        );
        assert_eq!(
            Orientation::from_derivatives(1.0, 1.0),
            Orientation::DiagonalUp,
        );
        assert_eq!(
            Orientation::from_derivatives(0.0, 1.0),
            Orientation::Vertical,
        );
        assert_eq!(
            Orientation::from_derivatives(-1.0, 1.0),
            Orientation::DiagonalDown,
        );
        // Negative-dy gradients fold into the same 0..180 range.
        assert_eq!(
            Orientation::from_derivatives(0.0, -1.0),
            Orientation::Vertical,
        );
        assert_eq!(
            Orientation::from_derivatives(1.0, -1.0),
            Orientation::DiagonalDown,
        );
    }

    #[test]
    fn magnitudes_stay_normalized() {
        // Checkerboard maximizes Sobel response; magnitudes must not
        // exceed 1.0.
        let img = gray_buffer(8, 8, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
        let field = compute(&img, ChannelReduction::MaxAbs);
        for &m in field.magnitudes() {
            assert!((0.0..=1.0).contains(&m), "magnitude {m} out of range");
        }
    }

    #[test]
    fn channel_reduction_serde_round_trip() {
        let json = serde_json::to_string(&ChannelReduction::MaxAbs).unwrap();
        let deserialized: ChannelReduction = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ChannelReduction::MaxAbs);
    }
}
