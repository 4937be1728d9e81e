//! Hysteresis tracing: two-tier classification with connectivity
//! propagation.
//!
//! Pixels at or above the high cutoff are strong seeds and always part
//! of the edge map. Pixels between the cutoffs are weak and join only
//! when an 8-connected path links them to a seed. Propagation is an
//! iterative breadth-first traversal over an explicit queue with a
//! per-pixel visited buffer, so memory and time stay linear in the
//! pixel count on any image size.

use std::collections::VecDeque;

use crate::suppress::SuppressedField;
use crate::threshold::Cutoffs;
use crate::types::Dimensions;

/// Marker value for edge pixels when grayscale is not preserved.
const EDGE_MARKER: f32 = 1.0;

/// The final single-channel edge classification.
///
/// Edge pixels hold either the full-strength marker or, with grayscale
/// preservation, their suppressed gradient magnitude. Non-edge pixels
/// are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl EdgeMap {
    /// Map width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in pixels.
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

    /// Edge value at `(x, y)`: zero for non-edges.
    #[must_use]
    pub fn value(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// Whether `(x, y)` is classified as an edge.
    #[must_use]
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.value(x, y) > 0.0
    }

    /// All edge values, row-major.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of edge pixels.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }

    /// Quantize the map to bytes (round, saturate).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_uint8(&self) -> Vec<u8> {
        self.values
            .iter()
            .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect()
    }
}

/// Classify the suppressed field against the cutoffs and propagate
/// edge membership from strong seeds through weak neighbors.
///
/// Zero-magnitude pixels are never edges regardless of the cutoffs, so
/// a uniform image stays empty even when both cutoffs are zero.
#[must_use = "returns the traced edge map"]
pub fn trace(field: &SuppressedField, cutoffs: Cutoffs, keep_grayscale: bool) -> EdgeMap {
    let (width, height) = (field.width(), field.height());
    let pixel_count = width as usize * height as usize;

    let mut values = vec![0.0f32; pixel_count];
    let mut visited = vec![false; pixel_count];
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

    let edge_value = |magnitude: f32| {
        if keep_grayscale {
            magnitude
        } else {
            EDGE_MARKER
        }
    };

    // Seed from every strong pixel.
    for y in 0..height {
        for x in 0..width {
            let magnitude = field.magnitude(x, y);
            if magnitude > 0.0 && magnitude >= cutoffs.high {
                let index = y as usize * width as usize + x as usize;
                visited[index] = true;
                values[index] = edge_value(magnitude);
                queue.push_back((x, y));
            }
        }
    }

    // Promote weak neighbors breadth-first. `visited` bounds the
    // traversal: each pixel enters the queue at most once.
    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (nx, ny) = (nx as u32, ny as u32);
            let index = ny as usize * width as usize + nx as usize;
            if visited[index] {
                continue;
            }
            let magnitude = field.magnitude(nx, ny);
            if magnitude > 0.0 && magnitude >= cutoffs.low {
                visited[index] = true;
                values[index] = edge_value(magnitude);
                queue.push_back((nx, ny));
            } else {
                // Below the weak cutoff: mark visited so the pixel is
                // not re-examined from every adjacent edge.
                visited[index] = true;
            }
        }
    }

    EdgeMap {
        width,
        height,
        values,
    }
}

/// All eight cardinal and diagonal neighbor offsets.
const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
