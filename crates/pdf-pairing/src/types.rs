use crate::constants::{
    A4_HEIGHT_PT, A4_WIDTH_PT, SINGLE_LONG_PREFIX, SINGLE_PREFIX, SINGLE_REMAINDER_PREFIX,
    mm_to_pt,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PairError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Cannot read page size of '{}': {reason}", path.display())]
    MetricsUnavailable { path: PathBuf, reason: String },
    #[error("Invalid page geometry: {0}")]
    PageGeometry(String),
    #[error("Composition failed: {0}")]
    Composition(String),
    #[error("Print submission failed: {0}")]
    Dispatch(String),
    #[error("Input directory '{}' does not exist", .0.display())]
    InputDirectory(PathBuf),
    #[error("Cannot prepare output directory '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No readable PDF documents to process")]
    NoDocuments,
}

pub type Result<T> = std::result::Result<T, PairError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions in millimeters (portrait)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get base dimensions in points (portrait)
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (A4_WIDTH_PT, A4_HEIGHT_PT),
            other => {
                let (w, h) = other.dimensions_mm();
                (mm_to_pt(w), mm_to_pt(h))
            }
        }
    }
}

/// The fixed-size output page every job is composed onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_paper(paper: PaperSize, orientation: Orientation) -> Self {
        let (w, h) = paper.dimensions_pt();
        match orientation {
            Orientation::Portrait => Self::new(w, h),
            Orientation::Landscape => Self::new(h, w),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(A4_WIDTH_PT, A4_HEIGHT_PT)
    }
}

/// Vertical position of a document on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Content's top edge sits on the canvas top edge
    Top,
    /// Content sits flush with the canvas bottom edge
    Bottom,
}

/// Uniform scale plus translation for one placed document.
///
/// `x`/`y` locate the lower-left corner of the scaled content box in
/// canvas coordinates (PDF user space, origin at the bottom left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementTransform {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

/// A loaded input document: where it came from and its first page's size.
///
/// Geometry is read once at load time and never re-queried.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Position in the enumeration order of the input directory
    pub id: usize,
    pub path: PathBuf,
    /// Content width in points
    pub width: f32,
    /// Content height in points
    pub height: f32,
}

impl SourceDocument {
    pub fn new(id: usize, path: impl Into<PathBuf>, width: f32, height: f32) -> Self {
        Self {
            id,
            path: path.into(),
            width,
            height,
        }
    }

    /// File name without extension, used to build output names
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("document{}", self.id))
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.stem())
    }
}

/// Why a document was placed alone on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandaloneReason {
    /// Odd input count: the tallest document is set aside before pairing
    OddCount,
    /// No scale combination let it share a page with the shortest document
    Unpaired,
    /// Left over once the pairing loop finished
    Remainder,
}

/// One output page decided by the scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedJob {
    Merged {
        long: SourceDocument,
        short: SourceDocument,
        long_scale: f32,
        short_scale: f32,
    },
    Standalone {
        document: SourceDocument,
        reason: StandaloneReason,
    },
}

impl PlannedJob {
    /// Documents consumed by this job, top slot first
    pub fn documents(&self) -> Vec<&SourceDocument> {
        match self {
            PlannedJob::Merged { long, short, .. } => vec![long, short],
            PlannedJob::Standalone { document, .. } => vec![document],
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, PlannedJob::Merged { .. })
    }

    /// Output file name for this job
    pub fn output_file_name(&self) -> String {
        match self {
            PlannedJob::Merged { long, short, .. } => {
                format!("{}_{}.pdf", long.stem(), short.stem())
            }
            PlannedJob::Standalone { document, reason } => {
                let prefix = match reason {
                    StandaloneReason::OddCount => SINGLE_PREFIX,
                    StandaloneReason::Unpaired => SINGLE_LONG_PREFIX,
                    StandaloneReason::Remainder => SINGLE_REMAINDER_PREFIX,
                };
                format!("{}{}.pdf", prefix, document.stem())
            }
        }
    }

    /// Human-readable summary used in logs and the CLI plan listing
    pub fn describe(&self) -> String {
        match self {
            PlannedJob::Merged {
                long,
                short,
                long_scale,
                short_scale,
            } => format!(
                "[L] {} @ {:.0}% + [S] {} @ {:.0}%",
                long.file_name(),
                long_scale * 100.0,
                short.file_name(),
                short_scale * 100.0
            ),
            PlannedJob::Standalone { document, reason } => {
                format!("[SA] {} ({:?})", document.file_name(), reason)
            }
        }
    }
}

/// A composed output file ready to be sent to a printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub path: PathBuf,
    /// `None` prints to the system default printer
    pub printer: Option<String>,
}

impl PrintJob {
    pub fn new(path: impl AsRef<Path>, printer: Option<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            printer,
        }
    }
}

/// Statistics about a pairing plan
#[derive(Debug, Clone, PartialEq)]
pub struct PairingStatistics {
    /// Documents that entered the scheduler
    pub source_documents: usize,
    /// Pages carrying two documents
    pub merged_pairs: usize,
    /// Documents placed on a merged page (always `merged_pairs * 2`)
    pub merged_documents: usize,
    /// Documents placed alone on a page
    pub standalone_documents: usize,
    /// Output pages (one file per page)
    pub output_pages: usize,
    /// Sheets saved compared to printing every document on its own page
    pub pages_saved: usize,
}
