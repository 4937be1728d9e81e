//! The [`EdgeFinder`]: stage orchestration and intermediate caching.
//!
//! The finder owns every buffer in the pipeline and replaces them
//! wholesale as stages re-run. The split between
//! [`compute_gradients`](EdgeFinder::compute_gradients) and
//! [`trace_edges`](EdgeFinder::trace_edges) is what makes interactive
//! threshold adjustment cheap: blur, Sobel, and suppression run once
//! per blur-setting change, while threshold changes re-rank and
//! re-trace against the cached suppressed field only.
//!
//! `&mut self` on every stage serializes calls; a finder is a
//! single-image, single-threaded state machine.

use crate::blur::{self, BlurSetting};
use crate::gradient::{self, ChannelReduction};
use crate::hysteresis::{self, EdgeMap};
use crate::raster::PixelBuffer;
use crate::suppress::{self, SuppressedField};
use crate::threshold;
use crate::types::PipelineError;

/// Interactive edge-detection session over one image.
#[derive(Debug, Default)]
pub struct EdgeFinder {
    image: Option<PixelBuffer>,
    suppressed: Option<SuppressedField>,
    lines: Option<EdgeMap>,
}

impl EdgeFinder {
    /// A finder with no image loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and make the result the current image.
    ///
    /// On success the previous image and every cached downstream
    /// buffer are discarded (they describe the old image). On failure
    /// all previous state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`], [`PipelineError::Decode`],
    /// or [`PipelineError::InvalidDimensions`] as surfaced by
    /// [`PixelBuffer::decode`].
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), PipelineError> {
        let decoded = PixelBuffer::decode(bytes)?;
        self.image = Some(decoded);
        self.suppressed = None;
        self.lines = None;
        Ok(())
    }

    /// Run blur, Sobel gradients, and non-maximum suppression, caching
    /// the suppressed magnitude field.
    ///
    /// Must be re-run whenever the blur setting or reduction policy
    /// changes; threshold-only changes do not need it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoImage`] when no image has been
    /// loaded.
    pub fn compute_gradients(
        &mut self,
        reduction: ChannelReduction,
        blur_setting: BlurSetting,
    ) -> Result<(), PipelineError> {
        let image = self.image.as_ref().ok_or(PipelineError::NoImage)?;
        let blurred = blur::apply(image, blur_setting);
        let field = gradient::compute(&blurred, reduction);
        self.suppressed = Some(suppress::suppress(&field));
        self.lines = None;
        Ok(())
    }

    /// Derive quantile cutoffs and trace the edge map against the
    /// cached suppressed field.
    ///
    /// Cheap relative to [`compute_gradients`](Self::compute_gradients);
    /// safe to call on every threshold-slider change.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoGradients`] when no suppressed field
    /// is cached for the current image.
    pub fn trace_edges(
        &mut self,
        high_fraction: f32,
        low_fraction: f32,
        keep_grayscale: bool,
    ) -> Result<&EdgeMap, PipelineError> {
        let field = self.suppressed.as_ref().ok_or(PipelineError::NoGradients)?;
        let cutoffs = threshold::quantile_cutoffs(field, high_fraction, low_fraction);
        Ok(self.lines.insert(hysteresis::trace(field, cutoffs, keep_grayscale)))
    }

    /// The currently loaded image, if any.
    #[must_use]
    pub const fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    /// The cached suppressed magnitude field, if any.
    #[must_use]
    pub const fn suppressed(&self) -> Option<&SuppressedField> {
        self.suppressed.as_ref()
    }

    /// The current edge map, if any.
    #[must_use]
    pub const fn lines(&self) -> Option<&EdgeMap> {
        self.lines.as_ref()
    }

    /// Consume the finder, returning the edge map if one was traced.
    #[must_use]
    pub fn into_lines(self) -> Option<EdgeMap> {
        self.lines
    }
}
