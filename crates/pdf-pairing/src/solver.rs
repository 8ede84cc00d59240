//! Scale search for two documents sharing one page
//!
//! Both documents are scaled uniformly and independently. The search walks
//! the scale grid from the largest value down and keeps the short
//! document's scale as large as possible first, then the long document's.

use crate::options::ScaleRange;
use crate::types::SourceDocument;

/// Find the scales that let `long` and `short` stack on one canvas.
///
/// Returns `(long_scale, short_scale)` for the first combination whose
/// scaled heights sum to at most `canvas_height`, preferring the largest
/// short scale and, among those, the largest long scale. Returns `None`
/// when no combination in `range` fits.
pub fn find_optimal_scales(
    long: &SourceDocument,
    short: &SourceDocument,
    canvas_height: f32,
    range: &ScaleRange,
) -> Option<(f32, f32)> {
    find_scales_for_heights(long.height, short.height, canvas_height, range)
}

/// Height-only variant of [`find_optimal_scales`].
pub fn find_scales_for_heights(
    long_height: f32,
    short_height: f32,
    canvas_height: f32,
    range: &ScaleRange,
) -> Option<(f32, f32)> {
    let candidates = range.values();

    for short_scale in candidates.clone() {
        let scaled_short = short_height * short_scale;
        for long_scale in candidates.clone() {
            if long_height * long_scale + scaled_short <= canvas_height {
                return Some((long_scale, short_scale));
            }
        }
    }

    None
}

/// Whether the pair cannot fit even at the smallest scale
pub fn is_infeasible(
    long_height: f32,
    short_height: f32,
    canvas_height: f32,
    range: &ScaleRange,
) -> bool {
    (long_height + short_height) * range.min > canvas_height
}
