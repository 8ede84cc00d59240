//! Shared constants for document pairing
//!
//! Unit conversion and the default tuning values used when no
//! configuration file overrides them.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Canvas
// =============================================================================

/// A4 portrait width in points
pub const A4_WIDTH_PT: f32 = 595.28;

/// A4 portrait height in points
pub const A4_HEIGHT_PT: f32 = 841.89;

// =============================================================================
// Scale Search
// =============================================================================

/// Smallest scale the solver will try
pub const DEFAULT_SCALE_MIN: f32 = 0.70;

/// Largest scale the solver will try (no upscaling)
pub const DEFAULT_SCALE_MAX: f32 = 1.00;

/// Distance between two neighbouring scale candidates
pub const DEFAULT_SCALE_STEP: f32 = 0.01;

/// Scale applied to documents that end up alone on a page
pub const DEFAULT_STANDALONE_SCALE: f32 = 0.70;

// =============================================================================
// Printing
// =============================================================================

/// Delay between two print submissions (milliseconds)
pub const DEFAULT_PRINT_PACING_MS: u64 = 500;

/// Upper bound on how long a single print command may run (seconds)
pub const DEFAULT_PRINT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Output Naming
// =============================================================================

/// File name prefix for the odd-count tallest document
pub const SINGLE_PREFIX: &str = "single_";

/// File name prefix for a long document that found no partner
pub const SINGLE_LONG_PREFIX: &str = "single_long_";

/// File name prefix for the document left over after pairing
pub const SINGLE_REMAINDER_PREFIX: &str = "single_rem_";
