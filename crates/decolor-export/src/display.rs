//! Display-buffer expansion for edge maps.
//!
//! Edge maps are single-channel with bright values on edges. Rendering
//! surfaces want 4-channel data showing dark lines on a light
//! background, so the display transform inverts each byte and
//! replicates it into all four RGBA channels.

use decolor_pipeline::EdgeMap;

/// Invert a display byte: `value -> max - value`.
///
/// Self-inverse: `invert(invert(v)) == v`.
#[must_use]
pub const fn invert(value: u8) -> u8 {
    u8::MAX - value
}

/// Expand an edge map into an inverted 4-channel RGBA buffer suitable
/// for upload to a rendering surface.
///
/// Every channel of a pixel, alpha included, carries the inverted edge
/// byte, matching the application's texture fill.
#[must_use = "returns the display buffer"]
pub fn to_display_rgba(map: &EdgeMap) -> Vec<u8> {
    let bytes = map.to_uint8();
    let mut display = Vec::with_capacity(bytes.len() * 4);
    for byte in bytes {
        let inverted = invert(byte);
        display.extend_from_slice(&[inverted; 4]);
    }
    display
}
