use crate::schedule::BatchPlan;
use crate::types::*;

/// Calculate statistics for a pairing plan
pub fn calculate_statistics(plan: &BatchPlan) -> PairingStatistics {
    let merged_pairs = plan.merged_pairs();
    let standalone_documents = plan.standalone_count();
    let source_documents = merged_pairs * 2 + standalone_documents;
    let output_pages = plan.jobs.len();

    PairingStatistics {
        source_documents,
        merged_pairs,
        merged_documents: merged_pairs * 2,
        standalone_documents,
        output_pages,
        pages_saved: source_documents - output_pages,
    }
}
