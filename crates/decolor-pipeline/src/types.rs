//! Shared types for the decolor edge-detection pipeline.

use serde::{Deserialize, Serialize};

use crate::blur::BlurSetting;
use crate::gradient::ChannelReduction;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Configuration for a full edge-finding run.
///
/// Defaults mirror the application's startup state: a small strong
/// quantile, a wider weak quantile, black lines, and normal blur.
///
/// # Threshold fraction invariants
///
/// Both fractions are quantile fractions in `[0.0, 1.0]`: the fraction
/// of non-zero suppressed gradient magnitudes that end up at or above
/// the derived cutoff. A *smaller* fraction therefore means a stricter
/// cutoff. Out-of-range values are clamped inside
/// [`threshold::quantile_cutoffs`](crate::threshold::quantile_cutoffs),
/// and a `low_fraction` stricter than `high_fraction` is clamped so the
/// low cutoff never exceeds the high cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Quantile fraction for the strong (seed) cutoff.
    pub high_fraction: f32,

    /// Quantile fraction for the weak cutoff. Weak pixels only become
    /// edges when connected to a strong pixel.
    pub low_fraction: f32,

    /// Keep the suppressed gradient magnitude as the edge value instead
    /// of a full-strength marker. The magnitudes read as grayscale line
    /// intensity.
    pub keep_grayscale: bool,

    /// Pre-blur applied before gradient computation.
    pub blur: BlurSetting,

    /// How multi-channel gradients collapse to one value per pixel.
    pub reduction: ChannelReduction,
}

impl FinderConfig {
    /// Default strong quantile fraction (top 10 % of magnitudes).
    pub const DEFAULT_HIGH_FRACTION: f32 = 0.1;
    /// Default weak quantile fraction (top 30 % of magnitudes).
    pub const DEFAULT_LOW_FRACTION: f32 = 0.3;
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            high_fraction: Self::DEFAULT_HIGH_FRACTION,
            low_fraction: Self::DEFAULT_LOW_FRACTION,
            keep_grayscale: false,
            blur: BlurSetting::default(),
            reduction: ChannelReduction::default(),
        }
    }
}

/// Errors that can occur in the edge-detection pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded image has a zero dimension.
    #[error("decoded image has invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// A stage was invoked before any image was loaded.
    #[error("no image loaded")]
    NoImage,

    /// Thresholding was invoked before gradients were computed.
    #[error("gradients have not been computed for the current image")]
    NoGradients,
}
