use pdf_pairing::*;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Records submissions and fails for paths containing "jam"
#[derive(Default)]
struct RecordingDispatcher {
    submitted: Mutex<Vec<PathBuf>>,
}

impl PrintDispatcher for RecordingDispatcher {
    async fn submit(&self, job: &PrintJob) -> Result<()> {
        self.submitted.lock().unwrap().push(job.path.clone());
        if job.path.to_string_lossy().contains("jam") {
            return Err(PairError::Dispatch("paper jam".to_string()));
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_dispatch_all_jobs_in_order() {
    let dispatcher = RecordingDispatcher::default();
    let jobs = vec![
        PrintJob::new("out/a_b.pdf", None),
        PrintJob::new("out/single_c.pdf", None),
    ];

    let report = dispatch_jobs(&dispatcher, &jobs, Duration::ZERO).await;

    assert_eq!(report.submitted, 2);
    assert!(report.failed.is_empty());
    assert_eq!(
        *dispatcher.submitted.lock().unwrap(),
        vec![PathBuf::from("out/a_b.pdf"), PathBuf::from("out/single_c.pdf")]
    );
}

#[tokio::test]
async fn test_dispatch_failure_does_not_stop_batch() {
    let dispatcher = RecordingDispatcher::default();
    let jobs = vec![
        PrintJob::new("first.pdf", None),
        PrintJob::new("jam.pdf", Some("Office".to_string())),
        PrintJob::new("last.pdf", None),
    ];

    let report = dispatch_jobs(&dispatcher, &jobs, Duration::from_millis(1)).await;

    assert_eq!(report.submitted, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, PathBuf::from("jam.pdf"));
    assert!(report.failed[0].1.contains("paper jam"));
    assert_eq!(dispatcher.submitted.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_system_printer_reports_missing_program() {
    let printer = SystemPrinter::new(&PrintOptions {
        backend: PrintBackend::Sumatra {
            executable: PathBuf::from("/nonexistent/path/to/SumatraPDF.exe"),
        },
        ..Default::default()
    });

    let result = printer.submit(&PrintJob::new("a.pdf", None)).await;
    assert!(matches!(result, Err(PairError::Dispatch(_))));
}
