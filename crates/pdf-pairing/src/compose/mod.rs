//! Batch composition
//!
//! This module turns a pairing plan into files on disk:
//! 1. Look up the parsed source of every document in a job
//! 2. Compute placements and render the output page
//! 3. Save it into the output directory and record a print job
//!
//! A job that fails is logged and skipped; the rest of the batch continues.

mod io;

pub use io::{
    LoadedBatch, LoadedSource, list_pdf_files, load_batch, load_pdf, load_source,
    prepare_output_dir, save_pdf,
};

use crate::layout::job_placements;
use crate::options::PairingOptions;
use crate::render::{PagePlacement, compose_page};
use crate::schedule::BatchPlan;
use crate::types::*;
use log::{error, info};
use lopdf::Document;
use std::path::Path;

/// A planned job whose output could not be produced
#[derive(Debug, Clone)]
pub struct FailedJob {
    pub job: PlannedJob,
    pub error: String,
}

/// Outcome of composing a whole plan
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Merged pages written successfully
    pub merged_pairs: usize,
    /// Standalone pages written successfully
    pub standalone_documents: usize,
    /// Written files, in plan order
    pub print_jobs: Vec<PrintJob>,
    pub failures: Vec<FailedJob>,
}

impl BatchReport {
    /// Documents that ended up on a shared page
    pub fn merged_documents(&self) -> usize {
        self.merged_pairs * 2
    }
}

/// Render one planned job into a new document.
pub async fn compose_job(
    batch: &LoadedBatch,
    job: &PlannedJob,
    options: &PairingOptions,
) -> Result<Document> {
    let canvas = options.canvas();

    let mut inputs = Vec::new();
    for (document, transform) in job_placements(job, options, &canvas) {
        let pdf = batch.pdf(document.id).ok_or_else(|| {
            PairError::Composition(format!("{} was not loaded", document.file_name()))
        })?;
        inputs.push((pdf, transform));
    }

    tokio::task::spawn_blocking(move || {
        let placements: Vec<PagePlacement<'_>> = inputs
            .iter()
            .map(|(pdf, transform)| PagePlacement {
                source: pdf.as_ref(),
                transform: *transform,
            })
            .collect();
        compose_page(&placements, &canvas)
    })
    .await?
}

async fn write_job(
    batch: &LoadedBatch,
    job: &PlannedJob,
    options: &PairingOptions,
    output_path: &Path,
) -> Result<()> {
    let doc = compose_job(batch, job, options).await?;
    save_pdf(doc, output_path).await
}

/// Compose and save every job of `plan` into `options.output_dir`.
pub async fn run_batch(
    batch: &LoadedBatch,
    plan: &BatchPlan,
    options: &PairingOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (job, file_name) in plan.jobs.iter().zip(plan.output_file_names()) {
        let output_path = options.output_dir.join(file_name);

        match write_job(batch, job, options, &output_path).await {
            Ok(()) => {
                info!("{} -> {}", job.describe(), output_path.display());
                if job.is_merged() {
                    report.merged_pairs += 1;
                } else {
                    report.standalone_documents += 1;
                }
                report.print_jobs.push(PrintJob::new(
                    &output_path,
                    options.print.printer_name.clone(),
                ));
            }
            Err(e) => {
                error!("Failed to compose {}: {}", job.describe(), e);
                report.failures.push(FailedJob {
                    job: job.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}
