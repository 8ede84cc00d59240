//! Print dispatch
//!
//! Composed files are handed to an OS print command one at a time, with a
//! pause between submissions so the spooler is not flooded.

use crate::options::{PrintBackend, PrintOptions};
use crate::types::{PairError, PrintJob, Result};
use log::{info, warn};
use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Something that can send a composed file to a printer
pub trait PrintDispatcher {
    fn submit(&self, job: &PrintJob) -> impl Future<Output = Result<()>> + Send;
}

/// Prints by running `lp` or SumatraPDF
#[derive(Debug, Clone)]
pub struct SystemPrinter {
    backend: PrintBackend,
    timeout: Duration,
}

impl SystemPrinter {
    pub fn new(options: &PrintOptions) -> Self {
        Self {
            backend: options.backend.clone(),
            timeout: Duration::from_secs(options.timeout_secs),
        }
    }

    /// Program and arguments used to print `job`
    pub fn command_line(&self, job: &PrintJob) -> (PathBuf, Vec<OsString>) {
        let mut args: Vec<OsString> = Vec::new();
        let program = match &self.backend {
            PrintBackend::Lp => {
                if let Some(printer) = &job.printer {
                    args.push("-d".into());
                    args.push(printer.into());
                }
                PathBuf::from("lp")
            }
            PrintBackend::Sumatra { executable } => {
                match &job.printer {
                    Some(printer) => {
                        args.push("-print-to".into());
                        args.push(printer.into());
                    }
                    None => args.push("-print-to-default".into()),
                }
                args.push("-silent".into());
                executable.clone()
            }
        };
        args.push(job.path.clone().into_os_string());
        (program, args)
    }
}

impl PrintDispatcher for SystemPrinter {
    async fn submit(&self, job: &PrintJob) -> Result<()> {
        let (program, args) = self.command_line(job);
        let printer = job.printer.as_deref().unwrap_or("default printer");
        info!("Sending {} -> {}", job.path.display(), printer);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                PairError::Dispatch(format!("cannot run {}: {}", program.display(), e))
            })?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(PairError::Dispatch(format!(
                "{} exited with {}",
                program.display(),
                status
            ))),
            Ok(Err(e)) => Err(PairError::Dispatch(format!(
                "waiting for {}: {}",
                program.display(),
                e
            ))),
            Err(_) => {
                // The spooler may still be working; leave it running
                warn!(
                    "{} still running after {}s, continuing",
                    program.display(),
                    self.timeout.as_secs()
                );
                Ok(())
            }
        }
    }
}

/// Result of sending a list of jobs
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub submitted: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// Submit every job in order, pausing `pacing` between submissions.
///
/// A failed submission is logged and does not stop the remaining jobs.
pub async fn dispatch_jobs<D: PrintDispatcher>(
    dispatcher: &D,
    jobs: &[PrintJob],
    pacing: Duration,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (idx, job) in jobs.iter().enumerate() {
        if idx > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        match dispatcher.submit(job).await {
            Ok(()) => report.submitted += 1,
            Err(e) => {
                warn!("Print failed for {}: {}", job.path.display(), e);
                report.failed.push((job.path.clone(), e.to_string()));
            }
        }
    }

    report
}
