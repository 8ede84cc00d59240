pub mod compose;
pub mod constants;
pub mod layout;
mod options;
pub mod print;
pub mod render;
pub mod schedule;
pub mod solver;
mod stats;
mod types;

pub use compose::{
    BatchReport, FailedJob, LoadedBatch, LoadedSource, compose_job, list_pdf_files, load_batch, load_pdf,
    load_source, prepare_output_dir, run_batch, save_pdf,
};
pub use options::*;
pub use print::{DispatchReport, PrintDispatcher, SystemPrinter, dispatch_jobs};
pub use schedule::{BatchPlan, plan_batch};
pub use solver::find_optimal_scales;
pub use stats::calculate_statistics;
pub use types::*;
