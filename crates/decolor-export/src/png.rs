//! PNG export serializer.
//!
//! Encodes an edge map as a single-channel PNG with the display
//! inversion applied, so downloaded files show dark lines on a light
//! background just like the on-screen rendering.

use decolor_pipeline::EdgeMap;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::display::invert;

/// Errors that can occur while serializing an edge map.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode an edge map as inverted single-channel PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the underlying PNG encoder
/// rejects the buffer.
pub fn edge_map_to_png(map: &EdgeMap) -> Result<Vec<u8>, ExportError> {
    let inverted: Vec<u8> = map.to_uint8().into_iter().map(invert).collect();

    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    encoder.write_image(&inverted, map.width(), map.height(), ExtendedColorType::L8)?;
    Ok(bytes)
}

/// File name for a downloaded line image: `decolorized-<stamp>.png`.
///
/// The stamp is caller-supplied (typically a timestamp or the source
/// file stem) so this crate stays clock-free.
#[must_use]
pub fn download_file_name(stamp: &str) -> String {
    format!("decolorized-{stamp}.png")
}
