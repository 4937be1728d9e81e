//! Quantile-based double thresholds.
//!
//! The two user-facing parameters are *fractions*, not absolute
//! magnitudes: a fraction `f` asks for the cutoff below which exactly
//! the top `f` share of non-zero suppressed magnitudes remains at or
//! above. Zero-magnitude pixels can never be edges, so they are
//! excluded from the ranking population.

use crate::suppress::SuppressedField;

/// Absolute magnitude cutoffs derived from the quantile fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoffs {
    /// Strong cutoff: pixels at or above are seed edges.
    pub high: f32,
    /// Weak cutoff: pixels at or above may join an edge through
    /// connectivity. Never exceeds `high`.
    pub low: f32,
}

/// Derive absolute cutoffs from quantile fractions over the non-zero
/// suppressed magnitudes.
///
/// Fractions are clamped to `[0.0, 1.0]`. A fraction whose rank rounds
/// to zero yields an infinite cutoff (no pixel qualifies). When the
/// supplied fractions would put the low cutoff above the high one, the
/// low cutoff is clamped down to equal it.
///
/// A field with no non-zero magnitudes (a uniform image) yields both
/// cutoffs zero; downstream classification still produces an empty
/// edge map because zero-magnitude pixels are never edges.
#[must_use = "returns the derived cutoffs"]
pub fn quantile_cutoffs(field: &SuppressedField, high_fraction: f32, low_fraction: f32) -> Cutoffs {
    let mut ranked: Vec<f32> = field
        .magnitudes()
        .iter()
        .copied()
        .filter(|&m| m > 0.0)
        .collect();

    if ranked.is_empty() {
        return Cutoffs {
            high: 0.0,
            low: 0.0,
        };
    }

    ranked.sort_unstable_by(|a, b| b.total_cmp(a));

    let high = cutoff_at(&ranked, high_fraction.clamp(0.0, 1.0));
    let low = cutoff_at(&ranked, low_fraction.clamp(0.0, 1.0)).min(high);
    Cutoffs { high, low }
}

/// The magnitude at rank `ceil(fraction * n)` of a descending-sorted
/// list, so exactly the top `fraction` share sits at or above it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn cutoff_at(ranked_descending: &[f32], fraction: f32) -> f32 {
    let population = ranked_descending.len();
    let rank = (fraction * population as f32).ceil() as usize;
    if rank == 0 {
        return f32::INFINITY;
    }
    ranked_descending[rank.min(population) - 1]
}
