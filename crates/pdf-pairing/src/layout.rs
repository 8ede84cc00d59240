//! Placement of documents on the output canvas
//!
//! Every document is centered horizontally. Vertically it is either
//! pushed against the top edge or flush with the bottom edge.

use crate::options::PairingOptions;
use crate::types::{Canvas, PlacementTransform, PlannedJob, Slot, SourceDocument};

/// Compute the transform placing `document` at `scale` into `slot`.
pub fn place(
    document: &SourceDocument,
    scale: f32,
    slot: Slot,
    canvas: &Canvas,
) -> PlacementTransform {
    let scaled_width = document.width * scale;
    let scaled_height = document.height * scale;

    let x = (canvas.width - scaled_width) / 2.0;
    let y = match slot {
        Slot::Top => canvas.height - scaled_height,
        Slot::Bottom => 0.0,
    };

    PlacementTransform { scale, x, y }
}

/// Placement for a document printed alone: fixed scale, top slot.
pub fn place_standalone(
    document: &SourceDocument,
    options: &PairingOptions,
    canvas: &Canvas,
) -> PlacementTransform {
    place(document, options.standalone_scale, Slot::Top, canvas)
}

/// All placements for one planned job, top slot first.
pub fn job_placements<'a>(
    job: &'a PlannedJob,
    options: &PairingOptions,
    canvas: &Canvas,
) -> Vec<(&'a SourceDocument, PlacementTransform)> {
    match job {
        PlannedJob::Merged {
            long,
            short,
            long_scale,
            short_scale,
        } => vec![
            (long, place(long, *long_scale, Slot::Top, canvas)),
            (short, place(short, *short_scale, Slot::Bottom, canvas)),
        ],
        PlannedJob::Standalone { document, .. } => {
            vec![(document, place_standalone(document, options, canvas))]
        }
    }
}
