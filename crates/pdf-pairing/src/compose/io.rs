//! Document I/O for batch pairing

use crate::render::{first_page_id, page_metrics};
use crate::types::*;
use log::{debug, warn};
use lopdf::Document;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A parsed input file together with its cached geometry
pub struct LoadedSource {
    pub document: SourceDocument,
    pub pdf: Document,
}

/// Every readable input of a run, parsed once
#[derive(Default)]
pub struct LoadedBatch {
    /// Readable documents in enumeration order
    pub documents: Vec<SourceDocument>,
    /// Files that could not be read, with the reason
    pub skipped: Vec<(PathBuf, String)>,
    pdfs: HashMap<usize, Arc<Document>>,
}

impl LoadedBatch {
    pub fn insert(&mut self, source: LoadedSource) {
        self.pdfs.insert(source.document.id, Arc::new(source.pdf));
        self.documents.push(source.document);
    }

    /// Parsed PDF for a document ID
    pub fn pdf(&self, id: usize) -> Option<Arc<Document>> {
        self.pdfs.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save a composed document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, PairError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Load a document and read its first page's size.
///
/// Any failure is reported as [`PairError::MetricsUnavailable`].
pub async fn load_source(id: usize, path: impl AsRef<Path>) -> Result<LoadedSource> {
    let path = path.as_ref().to_owned();
    let unavailable = |reason: String| PairError::MetricsUnavailable {
        path: path.clone(),
        reason,
    };

    let pdf = load_pdf(&path).await.map_err(|e| unavailable(e.to_string()))?;
    let page_id =
        first_page_id(&pdf).ok_or_else(|| unavailable("document has no pages".to_string()))?;
    let metrics = page_metrics(&pdf, page_id).map_err(|e| unavailable(e.to_string()))?;

    debug!(
        "{}: {:.2} x {:.2} pt",
        path.display(),
        metrics.width,
        metrics.height
    );

    Ok(LoadedSource {
        document: SourceDocument::new(id, path.clone(), metrics.width, metrics.height),
        pdf,
    })
}

/// Load every path, skipping (and logging) the ones that cannot be read.
pub async fn load_batch(paths: &[impl AsRef<Path>]) -> LoadedBatch {
    let mut batch = LoadedBatch::default();
    for (id, path) in paths.iter().enumerate() {
        match load_source(id, path).await {
            Ok(source) => batch.insert(source),
            Err(e) => {
                warn!("Skipping {}", e);
                batch
                    .skipped
                    .push((path.as_ref().to_path_buf(), e.to_string()));
            }
        }
    }
    batch
}

/// List the PDF files directly inside `dir`, sorted by file name.
pub async fn list_pdf_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(PairError::InputDirectory(dir.to_path_buf())),
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Delete `dir` (if present) and recreate it empty.
pub async fn prepare_output_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    let to_error = |source: std::io::Error| PairError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    };

    if tokio::fs::try_exists(dir).await.map_err(to_error)? {
        debug!("Clearing previous output in {}", dir.display());
        tokio::fs::remove_dir_all(dir).await.map_err(to_error)?;
    }
    tokio::fs::create_dir_all(dir).await.map_err(to_error)?;
    Ok(())
}
