mod logger;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use pdf_pairing::constants::pt_to_mm;
use pdf_pairing::{PairError, PairingOptions, PrintBackend};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use logger::ConsoleLogger;

#[derive(Parser)]
#[command(name = "pdfpair", about = "Pair short PDF documents onto shared pages and print them", version)]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair, compose and print every PDF in the input directory
    Run {
        #[command(flatten)]
        pairing: PairingArgs,

        /// Compose the output files but do not print them
        #[arg(long)]
        no_print: bool,

        /// Print without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the pairing plan without writing anything
    Plan {
        #[command(flatten)]
        pairing: PairingArgs,
    },

    /// Write a configuration file with the effective settings
    InitConfig {
        /// Destination JSON file
        path: PathBuf,

        #[command(flatten)]
        pairing: PairingArgs,
    },
}

#[derive(Args)]
struct PairingArgs {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with the source PDFs
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for the composed PDFs (cleared before each run)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Smallest scale the solver may use
    #[arg(long)]
    min_scale: Option<f32>,

    /// Largest scale the solver may use
    #[arg(long)]
    max_scale: Option<f32>,

    /// Scale search step
    #[arg(long)]
    scale_step: Option<f32>,

    /// Scale for documents printed alone
    #[arg(long)]
    standalone_scale: Option<f32>,

    /// Printer name (system default when omitted)
    #[arg(long)]
    printer: Option<String>,

    /// Print backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// SumatraPDF executable (implies --backend sumatra)
    #[arg(long)]
    sumatra_path: Option<PathBuf>,

    /// Pause between print submissions in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Timeout for one print command in seconds
    #[arg(long)]
    print_timeout: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Lp,
    Sumatra,
}

impl From<PaperArg> for pdf_pairing::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<OrientationArg> for pdf_pairing::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl PairingArgs {
    /// Load the configuration file (or defaults) and apply flag overrides
    async fn into_options(self) -> Result<PairingOptions> {
        let mut options = match &self.config {
            Some(path) => PairingOptions::load(path)
                .await
                .with_context(|| format!("Loading config {}", path.display()))?,
            None => PairingOptions::default(),
        };

        if let Some(input) = self.input {
            options.input_dir = input;
        }
        if let Some(output) = self.output {
            options.output_dir = output;
        }
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(min) = self.min_scale {
            options.scale_range.min = min;
        }
        if let Some(max) = self.max_scale {
            options.scale_range.max = max;
        }
        if let Some(step) = self.scale_step {
            options.scale_range.step = step;
        }
        if let Some(scale) = self.standalone_scale {
            options.standalone_scale = scale;
        }
        if self.printer.is_some() {
            options.print.printer_name = self.printer;
        }

        match (self.backend, self.sumatra_path) {
            (_, Some(executable)) => options.print.backend = PrintBackend::Sumatra { executable },
            (Some(BackendArg::Lp), None) => options.print.backend = PrintBackend::Lp,
            (Some(BackendArg::Sumatra), None) => {
                if !matches!(options.print.backend, PrintBackend::Sumatra { .. }) {
                    options.print.backend = PrintBackend::Sumatra {
                        executable: PathBuf::from("SumatraPDF.exe"),
                    };
                }
            }
            (None, None) => {}
        }

        if let Some(pacing) = self.pacing_ms {
            options.print.pacing_ms = pacing;
        }
        if let Some(timeout) = self.print_timeout {
            options.print.timeout_secs = timeout;
        }

        options.validate()?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ConsoleLogger::new(ConsoleLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Installing logger")?;

    match cli.command {
        Commands::Run {
            pairing,
            no_print,
            yes,
        } => {
            let options = pairing.into_options().await?;
            run(&options, no_print, yes).await?;
        }

        Commands::Plan { pairing } => {
            let options = pairing.into_options().await?;
            let Some(files) = list_inputs(&options).await? else {
                return Ok(());
            };
            let Some(batch) = load_inputs(&files).await else {
                return Ok(());
            };
            show_plan(&pdf_pairing::plan_batch(&batch.documents, &options), &options);
        }

        Commands::InitConfig { path, pairing } => {
            let options = pairing.into_options().await?;
            options.save(&path).await?;
            println!("Configuration written → {}", path.display());
        }
    }

    Ok(())
}

/// PDF files of the input directory. `None` when there are none.
async fn list_inputs(options: &PairingOptions) -> Result<Option<Vec<PathBuf>>> {
    let files = pdf_pairing::list_pdf_files(&options.input_dir).await?;
    if files.is_empty() {
        info!("No PDF files found in {}", options.input_dir.display());
        return Ok(None);
    }
    info!(
        "Found {} PDF files in {}",
        files.len(),
        options.input_dir.display()
    );
    Ok(Some(files))
}

/// Parse the listed files. `None` when none of them is readable.
async fn load_inputs(files: &[PathBuf]) -> Option<pdf_pairing::LoadedBatch> {
    let batch = pdf_pairing::load_batch(files).await;
    for (path, reason) in &batch.skipped {
        warn!("Skipped {}: {}", path.display(), reason);
    }
    if batch.is_empty() {
        warn!("{}", PairError::NoDocuments);
        return None;
    }
    Some(batch)
}

fn show_plan(plan: &pdf_pairing::BatchPlan, options: &PairingOptions) {
    let canvas = options.canvas();
    println!(
        "Canvas: {:.0} x {:.0} mm ({:?}, {:?})",
        pt_to_mm(canvas.width),
        pt_to_mm(canvas.height),
        options.paper_size,
        options.orientation
    );

    println!("Pairing Plan:");
    let file_names = plan.output_file_names();
    for (idx, (job, file_name)) in plan.jobs.iter().zip(&file_names).enumerate() {
        println!("  {:>3}. {} → {}", idx + 1, job.describe(), file_name);
    }

    let stats = pdf_pairing::calculate_statistics(plan);
    println!("Pairing Statistics:");
    println!("  Source documents: {}", stats.source_documents);
    println!("  Merged pairs: {}", stats.merged_pairs);
    println!("  Standalone documents: {}", stats.standalone_documents);
    println!("  Output pages: {}", stats.output_pages);
    println!("  Pages saved: {}", stats.pages_saved);
}

async fn run(options: &PairingOptions, no_print: bool, yes: bool) -> Result<()> {
    // Only clear the previous output once the input is known to be there
    let Some(files) = list_inputs(options).await? else {
        return Ok(());
    };
    pdf_pairing::prepare_output_dir(&options.output_dir).await?;

    let Some(batch) = load_inputs(&files).await else {
        return Ok(());
    };

    let plan = pdf_pairing::plan_batch(&batch.documents, options);
    show_plan(&plan, options);

    let report = pdf_pairing::run_batch(&batch, &plan, options).await;
    println!("Summary:");
    println!("  Merged documents: {}", report.merged_documents());
    println!("  Standalone documents: {}", report.standalone_documents);
    println!("  Output files: {}", report.print_jobs.len());
    if !report.failures.is_empty() {
        println!("  Failed: {}", report.failures.len());
        for failure in &report.failures {
            println!("    {}: {}", failure.job.describe(), failure.error);
        }
    }

    if report.print_jobs.is_empty() {
        info!("Nothing to print");
        return Ok(());
    }

    if no_print {
        info!("Output saved in {}", options.output_dir.display());
        return Ok(());
    }

    if !yes && !confirm(&format!("Print {} documents?", report.print_jobs.len())).await? {
        info!(
            "Printing skipped. Processed files are in {}",
            options.output_dir.display()
        );
        return Ok(());
    }

    let printer = pdf_pairing::SystemPrinter::new(&options.print);
    let dispatch = pdf_pairing::dispatch_jobs(
        &printer,
        &report.print_jobs,
        Duration::from_millis(options.print.pacing_ms),
    )
    .await;

    info!("Sent {} print jobs", dispatch.submitted);
    if !dispatch.failed.is_empty() {
        warn!("{} print jobs failed", dispatch.failed.len());
    }

    Ok(())
}

async fn confirm(question: &str) -> Result<bool> {
    print!("{} (y/n) ", question);
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;

    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options_in(dir: &TempDir, input: &str) -> PairingOptions {
        PairingOptions {
            input_dir: dir.path().join(input),
            output_dir: dir.path().join("processed_pdf"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_input_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir, "no_such_dir");
        std::fs::create_dir(&options.output_dir).unwrap();
        let previous = options.output_dir.join("a_b.pdf");
        std::fs::write(&previous, b"last run").unwrap();

        let result = run(&options, true, true).await;

        match result {
            Err(e) => assert!(matches!(
                e.downcast_ref::<PairError>(),
                Some(PairError::InputDirectory(_))
            )),
            Ok(()) => panic!("Expected InputDirectory error"),
        }
        assert!(previous.exists());
    }

    #[tokio::test]
    async fn test_empty_input_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir, "source_pdf");
        std::fs::create_dir(&options.input_dir).unwrap();
        std::fs::create_dir(&options.output_dir).unwrap();
        let previous = options.output_dir.join("a_b.pdf");
        std::fs::write(&previous, b"last run").unwrap();

        run(&options, true, true).await.unwrap();
        assert!(previous.exists());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "pdfpair", "plan", "-i", "in", "-o", "out", "--paper", "letter", "--min-scale", "0.6",
        ]);
        let Commands::Plan { pairing } = cli.command else {
            panic!("Expected plan command");
        };
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let options = runtime.block_on(pairing.into_options()).unwrap();

        assert_eq!(options.input_dir, PathBuf::from("in"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.paper_size, pdf_pairing::PaperSize::Letter);
        assert_eq!(options.scale_range.min, 0.6);
    }
}
