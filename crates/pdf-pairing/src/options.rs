use crate::constants::*;
use crate::types::*;
use std::path::{Component, Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Discrete grid of scale factors searched by the solver, from `max` down
/// to `min` in decrements of `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_SCALE_MIN,
            max: DEFAULT_SCALE_MAX,
            step: DEFAULT_SCALE_STEP,
        }
    }
}

impl ScaleRange {
    /// Number of decrements between `max` and the smallest candidate
    pub fn steps(&self) -> usize {
        if self.step <= 0.0 || self.max < self.min {
            return 0;
        }
        ((self.max - self.min) / self.step + 1e-4).floor() as usize
    }

    /// Candidates in descending order. Always within `[min, max]`.
    pub fn values(&self) -> impl Iterator<Item = f32> + Clone + use<> {
        let ScaleRange { min, max, step } = *self;
        (0..=self.steps()).map(move |i| (max - i as f32 * step).max(min))
    }

    pub fn contains(&self, scale: f32) -> bool {
        scale >= self.min && scale <= self.max
    }
}

/// How print jobs reach the printer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrintBackend {
    /// CUPS `lp` command
    Lp,
    /// SumatraPDF command-line printing
    Sumatra { executable: PathBuf },
}

impl Default for PrintBackend {
    fn default() -> Self {
        if cfg!(windows) {
            PrintBackend::Sumatra {
                executable: PathBuf::from("SumatraPDF.exe"),
            }
        } else {
            PrintBackend::Lp
        }
    }
}

/// Print dispatch settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintOptions {
    /// Target printer; `None` uses the system default
    pub printer_name: Option<String>,
    pub backend: PrintBackend,
    /// Pause between submissions so the spooler is not flooded
    pub pacing_ms: u64,
    /// Maximum time a single print command may take
    pub timeout_secs: u64,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            printer_name: None,
            backend: PrintBackend::default(),
            pacing_ms: DEFAULT_PRINT_PACING_MS,
            timeout_secs: DEFAULT_PRINT_TIMEOUT_SECS,
        }
    }
}

/// Pairing configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PairingOptions {
    // Directories
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    // Output canvas
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Scaling
    pub scale_range: ScaleRange,
    pub standalone_scale: f32,

    // Printing
    pub print: PrintOptions,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("source_pdf"),
            output_dir: PathBuf::from("processed_pdf"),
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            scale_range: ScaleRange::default(),
            standalone_scale: DEFAULT_STANDALONE_SCALE,
            print: PrintOptions::default(),
        }
    }
}

impl PairingOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| PairError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PairError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// The output page every job is composed onto
    pub fn canvas(&self) -> Canvas {
        Canvas::from_paper(self.paper_size, self.orientation)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let range = &self.scale_range;
        if !(range.min > 0.0) {
            return Err(PairError::Config(
                "Minimum scale must be greater than 0".to_string(),
            ));
        }
        if range.min > range.max {
            return Err(PairError::Config(format!(
                "Minimum scale {} is larger than maximum scale {}",
                range.min, range.max
            )));
        }
        if !(range.step > 0.0) {
            return Err(PairError::Config(
                "Scale step must be greater than 0".to_string(),
            ));
        }

        if !(self.standalone_scale > 0.0) {
            return Err(PairError::Config(
                "Standalone scale must be greater than 0".to_string(),
            ));
        }

        let canvas = self.canvas();
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(PairError::Config(format!(
                "Paper size {:?} has no printable area",
                self.paper_size
            )));
        }

        // The output directory is wiped before every run
        let input = resolve_dir(&self.input_dir);
        let output = resolve_dir(&self.output_dir);
        if input.starts_with(&output) {
            return Err(PairError::Config(format!(
                "Output directory '{}' must not be or contain the input directory '{}'",
                self.output_dir.display(),
                self.input_dir.display()
            )));
        }

        Ok(())
    }
}

/// Absolute, normalized form of `path` with symlinks resolved in the part
/// that exists.
fn resolve_dir(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    for ancestor in normalized.ancestors() {
        if let (Ok(canonical), Ok(rest)) = (
            std::fs::canonicalize(ancestor),
            normalized.strip_prefix(ancestor),
        ) {
            return canonical.join(rest);
        }
    }
    normalized
}
