//! decolor-pipeline: Pure edge-detection pipeline (sans-IO).
//!
//! Turns a decoded raster image into a line image through:
//! decode -> optional blur -> Sobel gradients with channel reduction ->
//! non-maximum suppression -> quantile double thresholds ->
//! hysteresis tracing.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns owned buffers. File reading and PNG writing
//! live with the callers (`decolor-cli`, `decolor-export`).
//!
//! The interactive entry point is [`EdgeFinder`], which caches the
//! suppressed gradient field so threshold changes re-run only the
//! cheap ranking and tracing stages. [`find_edges`] is the one-shot
//! convenience for callers that need a single result.

pub mod blur;
pub mod finder;
pub mod gradient;
pub mod hysteresis;
pub mod raster;
pub mod suppress;
pub mod threshold;
pub mod types;

pub use blur::BlurSetting;
pub use finder::EdgeFinder;
pub use gradient::{ChannelReduction, GradientField, Orientation};
pub use hysteresis::EdgeMap;
pub use raster::PixelBuffer;
pub use suppress::SuppressedField;
pub use threshold::Cutoffs;
pub use types::{Dimensions, FinderConfig, PipelineError};

/// Run the full edge-finding pipeline once.
///
/// Takes raw image bytes (PNG or JPEG) and a configuration, and
/// produces the final [`EdgeMap`]. Callers that adjust thresholds
/// interactively should hold an [`EdgeFinder`] instead, so the
/// gradient work is not repeated per adjustment.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty and
/// [`PipelineError::Decode`] if the image format is unrecognized or
/// the data corrupt.
pub fn find_edges(image_bytes: &[u8], config: &FinderConfig) -> Result<EdgeMap, PipelineError> {
    let mut finder = EdgeFinder::new();
    finder.load_image(image_bytes)?;
    finder.compute_gradients(config.reduction, config.blur)?;
    finder.trace_edges(
        config.high_fraction,
        config.low_fraction,
        config.keep_grayscale,
    )?;
    finder.into_lines().ok_or(PipelineError::NoGradients)
}
