//! Decoded raster storage: the [`PixelBuffer`].
//!
//! A `PixelBuffer` owns a decoded image as normalized `f32` samples in
//! `0.0..=1.0`, stored row-major as `width × height × channels`. The
//! channel count follows the decoded color type: 1 for grayscale, 3 for
//! RGB, 4 for anything carrying alpha.
//!
//! All later stages read pixels through [`PixelBuffer::sample`] or the
//! clamp-to-edge [`PixelBuffer::sample_clamped`], so no stage does its
//! own offset arithmetic at image borders.

use image::DynamicImage;

use crate::types::{Dimensions, PipelineError};

/// A decoded image as normalized `f32` samples.
///
/// Invariant: `samples.len() == width × height × channels` at all
/// times. Buffers are only created whole; no in-place resizing.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u32,
    samples: Vec<f32>,
}

impl PixelBuffer {
    /// Build a buffer from raw parts. Callers guarantee the length
    /// invariant; every constructor in this crate goes through here.
    pub(crate) fn from_raw(width: u32, height: u32, channels: u32, samples: Vec<f32>) -> Self {
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Decode raw image bytes (PNG or JPEG) into a normalized buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if `bytes` is empty,
    /// [`PipelineError::Decode`] if the data is corrupt or the format
    /// unrecognized, and [`PipelineError::InvalidDimensions`] if the
    /// decoded image has a zero dimension.
    pub fn decode(bytes: &[u8]) -> Result<Self, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions { width, height });
        }

        let (channels, raw) = match &decoded {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => {
                (1, decoded.to_luma8().into_raw())
            }
            img if img.color().has_alpha() => (4, decoded.to_rgba8().into_raw()),
            _ => (3, decoded.to_rgb8().into_raw()),
        };

        let samples = raw.iter().map(|&b| f32::from(b) / 255.0).collect();
        Ok(Self::from_raw(width, height, channels, samples))
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels per pixel (1, 3, or 4).
    #[must_use]
    pub const fn channel_count(&self) -> u32 {
        self.channels
    }

    /// Width and height together.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// The raw normalized samples, row-major, channel-interleaved.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    const fn index(&self, x: u32, y: u32, channel: u32) -> usize {
        ((y as usize * self.width as usize) + x as usize) * self.channels as usize
            + channel as usize
    }

    /// Sample at `(x, y)` in `channel`, or `None` when out of bounds.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32, channel: u32) -> Option<f32> {
        if x < self.width && y < self.height && channel < self.channels {
            Some(self.samples[self.index(x, y, channel)])
        } else {
            None
        }
    }

    /// Sample with clamp-to-edge extension: coordinates outside the
    /// image read the nearest edge pixel. Used by the blur and gradient
    /// kernels so borders produce no spurious gradients.
    ///
    /// `channel` must be a valid channel index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample_clamped(&self, x: i64, y: i64, channel: u32) -> f32 {
        let cx = x.clamp(0, i64::from(self.width) - 1) as u32;
        let cy = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.samples[self.index(cx, cy, channel)]
    }

    /// Quantize all samples to bytes (round, saturate).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_uint8(&self) -> Vec<u8> {
        self.samples
            .iter()
            .map(|&s| (s * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Encode an RGBA image built by `f` as an in-memory PNG.
    pub(crate) fn png_from_fn(
        width: u32,
        height: u32,
        f: impl Fn(u32, u32) -> image::Rgba<u8>,
    ) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, f);
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    /// Encode a single-channel image built by `f` as an in-memory PNG.
    pub(crate) fn gray_png_from_fn(
        width: u32,
        height: u32,
        f: impl Fn(u32, u32) -> image::Luma<u8>,
    ) -> Vec<u8> {
        let img = image::GrayImage::from_fn(width, height, f);
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::L8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn empty_input_returns_error() {
        let result = PixelBuffer::decode(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_return_decode_error() {
        let result = PixelBuffer::decode(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn rgba_png_decodes_to_four_channels() {
        let png = png_from_fn(3, 2, |_, _| image::Rgba([255, 128, 0, 255]));
        let buffer = PixelBuffer::decode(&png).unwrap();
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.channel_count(), 4);
        assert_eq!(buffer.samples().len(), 3 * 2 * 4);
    }

    #[test]
    fn gray_png_decodes_to_one_channel() {
        let png = gray_png_from_fn(4, 4, |_, _| image::Luma([200]));
        let buffer = PixelBuffer::decode(&png).unwrap();
        assert_eq!(buffer.channel_count(), 1);
        assert!((buffer.sample(0, 0, 0).unwrap() - 200.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn samples_are_normalized() {
        let png = png_from_fn(1, 1, |_, _| image::Rgba([0, 51, 255, 255]));
        let buffer = PixelBuffer::decode(&png).unwrap();
        assert!((buffer.sample(0, 0, 0).unwrap() - 0.0).abs() < 1e-6);
        assert!((buffer.sample(0, 0, 1).unwrap() - 0.2).abs() < 1e-3);
        assert!((buffer.sample(0, 0, 2).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sample_out_of_bounds_is_none() {
        let png = gray_png_from_fn(2, 2, |_, _| image::Luma([10]));
        let buffer = PixelBuffer::decode(&png).unwrap();
        assert!(buffer.sample(2, 0, 0).is_none());
        assert!(buffer.sample(0, 2, 0).is_none());
        assert!(buffer.sample(0, 0, 1).is_none());
    }

    #[test]
    fn sample_clamped_extends_edges() {
        let png = gray_png_from_fn(2, 1, |x, _| image::Luma([if x == 0 { 0 } else { 255 }]));
        let buffer = PixelBuffer::decode(&png).unwrap();
        assert!((buffer.sample_clamped(-5, 0, 0) - 0.0).abs() < 1e-6);
        assert!((buffer.sample_clamped(7, 0, 0) - 1.0).abs() < 1e-6);
        assert!((buffer.sample_clamped(0, -3, 0) - 0.0).abs() < 1e-6);
        assert!((buffer.sample_clamped(1, 9, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn to_uint8_round_trips_decoded_bytes() {
        let png = gray_png_from_fn(3, 3, |x, y| image::Luma([(x * 40 + y * 13) as u8]));
        let buffer = PixelBuffer::decode(&png).unwrap();
        let bytes = buffer.to_uint8();
        for y in 0..3u32 {
            for x in 0..3u32 {
                let expected = (x * 40 + y * 13) as u8;
                assert_eq!(bytes[(y * 3 + x) as usize], expected, "at ({x},{y})");
            }
        }
    }
}
