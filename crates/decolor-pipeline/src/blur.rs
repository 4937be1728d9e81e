//! Pre-blur for noise reduction before gradient computation.
//!
//! Smoothing is a separable Gaussian convolution applied to each
//! channel independently with clamp-to-edge borders, so image edges
//! produce no spurious gradients. The blur strength is a closed
//! setting, not a free sigma: the application exposes exactly three
//! choices.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::raster::PixelBuffer;

/// Pre-blur strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlurSetting {
    /// Disabled: the input buffer passes through untouched.
    None,
    /// One Gaussian pass with sigma 1.4.
    Normal,
    /// One stronger Gaussian pass with sigma 2.0.
    Extra,
}

impl Default for BlurSetting {
    fn default() -> Self {
        Self::Normal
    }
}

impl BlurSetting {
    /// Gaussian sigma for this setting, or `None` when disabled.
    const fn sigma(self) -> Option<f32> {
        match self {
            Self::None => None,
            Self::Normal => Some(1.4),
            Self::Extra => Some(2.0),
        }
    }
}

impl fmt::Display for BlurSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Normal => "normal",
            Self::Extra => "extra",
        };
        write!(f, "{name}")
    }
}

/// Apply the configured pre-blur to a buffer.
///
/// [`BlurSetting::None`] borrows the input unchanged; the other
/// settings produce a new buffer. Same input and setting always yield
/// bit-identical output.
#[must_use = "returns the blurred buffer"]
pub fn apply(image: &PixelBuffer, setting: BlurSetting) -> Cow<'_, PixelBuffer> {
    match setting.sigma() {
        None => Cow::Borrowed(image),
        Some(sigma) => {
            let weights = gaussian_weights(sigma);
            let horizontal = convolve_rows(image, &weights);
            Cow::Owned(convolve_columns(&horizontal, &weights))
        }
    }
}

/// Normalized 1-D Gaussian kernel with radius `ceil(2.5 * sigma)`.
#[allow(clippy::cast_possible_truncation)]
fn gaussian_weights(sigma: f32) -> Vec<f32> {
    let radius = (2.5 * sigma).ceil() as i64;
    let two_sigma_squared = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|offset| {
            let distance = offset as f32;
            (-(distance * distance) / two_sigma_squared).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

fn convolve_rows(image: &PixelBuffer, weights: &[f32]) -> PixelBuffer {
    convolve(image, weights, |x, y, offset| (x + offset, y))
}

fn convolve_columns(image: &PixelBuffer, weights: &[f32]) -> PixelBuffer {
    convolve(image, weights, |x, y, offset| (x, y + offset))
}

#[allow(clippy::cast_possible_wrap)]
fn convolve(
    image: &PixelBuffer,
    weights: &[f32],
    tap: impl Fn(i64, i64, i64) -> (i64, i64),
) -> PixelBuffer {
    let (width, height, channels) = (image.width(), image.height(), image.channel_count());
    let radius = (weights.len() / 2) as i64;
    let mut samples = Vec::with_capacity(width as usize * height as usize * channels as usize);

    for y in 0..height {
        for x in 0..width {
            for channel in 0..channels {
                let mut accumulated = 0.0f32;
                for (i, &weight) in weights.iter().enumerate() {
                    let offset = i as i64 - radius;
                    let (sx, sy) = tap(i64::from(x), i64::from(y), offset);
                    accumulated += weight * image.sample_clamped(sx, sy, channel);
                }
                samples.push(accumulated);
            }
        }
    }

    PixelBuffer::from_raw(width, height, channels, samples)
}
