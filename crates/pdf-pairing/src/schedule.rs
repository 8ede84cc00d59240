//! Greedy pairing of documents onto shared pages
//!
//! Documents are kept sorted tallest first. Each round takes the tallest
//! and the shortest remaining document and asks the solver whether they
//! fit on one page. When they do not, the tall one is printed alone and
//! the short one goes back into the queue for the next round.

use crate::options::PairingOptions;
use crate::solver::{find_optimal_scales, is_infeasible};
use crate::types::{PlannedJob, SourceDocument, StandaloneReason};
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

/// Ordered list of output pages produced by the scheduler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchPlan {
    pub jobs: Vec<PlannedJob>,
}

impl BatchPlan {
    /// Pages carrying two documents
    pub fn merged_pairs(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_merged()).count()
    }

    /// Documents placed alone on a page
    pub fn standalone_count(&self) -> usize {
        self.jobs.len() - self.merged_pairs()
    }

    /// Total documents consumed by the plan
    pub fn document_count(&self) -> usize {
        self.merged_pairs() * 2 + self.standalone_count()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Output file name of every job, in plan order.
    ///
    /// Stems joined with `_` can repeat (`a_b` + `c` and `a` + `b_c`), and
    /// some file systems ignore case, so a name already taken gets a `-2`,
    /// `-3`, ... suffix.
    pub fn output_file_names(&self) -> Vec<String> {
        let mut taken = HashSet::new();
        self.jobs
            .iter()
            .map(|job| {
                let name = job.output_file_name();
                let base = name.strip_suffix(".pdf").unwrap_or(&name).to_string();
                let mut candidate = name;
                let mut counter = 2;
                while !taken.insert(candidate.to_lowercase()) {
                    candidate = format!("{}-{}.pdf", base, counter);
                    counter += 1;
                }
                candidate
            })
            .collect()
    }
}

/// Tallest first; equal heights keep enumeration order.
fn tallest_first(a: &SourceDocument, b: &SourceDocument) -> Ordering {
    b.height.total_cmp(&a.height).then(a.id.cmp(&b.id))
}

/// Decide which documents share a page and at which scales.
pub fn plan_batch(documents: &[SourceDocument], options: &PairingOptions) -> BatchPlan {
    let canvas = options.canvas();
    let range = &options.scale_range;

    let mut sorted = documents.to_vec();
    sorted.sort_by(tallest_first);
    let mut queue: VecDeque<SourceDocument> = sorted.into();
    let mut plan = BatchPlan::default();

    // Odd count: the tallest document is set aside before any pairing
    if queue.len() % 2 != 0 {
        if let Some(tallest) = queue.pop_front() {
            info!(
                "Odd number of documents, printing the tallest alone: {}",
                tallest.file_name()
            );
            plan.jobs.push(PlannedJob::Standalone {
                document: tallest,
                reason: StandaloneReason::OddCount,
            });
        }
    }

    while queue.len() >= 2 {
        let (Some(long), Some(short)) = (queue.pop_front(), queue.pop_back()) else {
            break;
        };
        debug!(
            "Trying pair [L] {} ({:.1}pt) / [S] {} ({:.1}pt)",
            long.file_name(),
            long.height,
            short.file_name(),
            short.height
        );

        match find_optimal_scales(&long, &short, canvas.height, range) {
            Some((long_scale, short_scale)) => {
                info!(
                    "Paired {} @ {:.0}% with {} @ {:.0}%",
                    long.file_name(),
                    long_scale * 100.0,
                    short.file_name(),
                    short_scale * 100.0
                );
                plan.jobs.push(PlannedJob::Merged {
                    long,
                    short,
                    long_scale,
                    short_scale,
                });
            }
            None => {
                if is_infeasible(long.height, short.height, canvas.height, range) {
                    debug!("Pair overflows the page even at {:.0}%", range.min * 100.0);
                }
                info!(
                    "No partner for {}, printing it alone; {} goes back in the queue",
                    long.file_name(),
                    short.file_name()
                );
                plan.jobs.push(PlannedJob::Standalone {
                    document: long,
                    reason: StandaloneReason::Unpaired,
                });
                queue.push_back(short);
                queue.make_contiguous().sort_by(tallest_first);
            }
        }
    }

    if let Some(remaining) = queue.pop_front() {
        info!("Printing remaining document alone: {}", remaining.file_name());
        plan.jobs.push(PlannedJob::Standalone {
            document: remaining,
            reason: StandaloneReason::Remainder,
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn docs(heights: &[f32]) -> Vec<SourceDocument> {
        heights
            .iter()
            .enumerate()
            .map(|(id, &h)| SourceDocument::new(id, format!("doc{id}.pdf"), 500.0, h))
            .collect()
    }

    fn assert_each_document_once(plan: &BatchPlan, count: usize) {
        let mut seen = HashSet::new();
        for job in &plan.jobs {
            for document in job.documents() {
                assert!(seen.insert(document.id), "document {} used twice", document.id);
            }
        }
        assert_eq!(seen.len(), count);
        assert_eq!(plan.document_count(), count);
    }

    #[test]
    fn test_empty_batch() {
        let plan = plan_batch(&[], &PairingOptions::default());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_single_document_is_standalone() {
        let plan = plan_batch(&docs(&[300.0]), &PairingOptions::default());
        assert_eq!(plan.jobs.len(), 1);
        assert!(matches!(
            plan.jobs[0],
            PlannedJob::Standalone {
                reason: StandaloneReason::OddCount,
                ..
            }
        ));
    }

    #[test]
    fn test_odd_count_isolates_tallest_first() {
        let plan = plan_batch(&docs(&[300.0, 500.0, 200.0]), &PairingOptions::default());

        assert_eq!(plan.jobs.len(), 2);
        match &plan.jobs[0] {
            PlannedJob::Standalone { document, reason } => {
                assert_eq!(document.height, 500.0);
                assert_eq!(*reason, StandaloneReason::OddCount);
            }
            other => panic!("Expected standalone job, got {:?}", other),
        }
        match &plan.jobs[1] {
            PlannedJob::Merged {
                long,
                short,
                long_scale,
                short_scale,
            } => {
                assert_eq!(long.height, 300.0);
                assert_eq!(short.height, 200.0);
                assert_eq!((*long_scale, *short_scale), (1.0, 1.0));
            }
            other => panic!("Expected merged job, got {:?}", other),
        }
        assert_each_document_once(&plan, 3);
    }

    #[test]
    fn test_longest_pairs_with_shortest() {
        let plan = plan_batch(
            &docs(&[400.0, 100.0, 300.0, 200.0]),
            &PairingOptions::default(),
        );

        let pairs: Vec<(f32, f32)> = plan
            .jobs
            .iter()
            .map(|job| match job {
                PlannedJob::Merged { long, short, .. } => (long.height, short.height),
                other => panic!("Expected merged job, got {:?}", other),
            })
            .collect();
        assert_eq!(pairs, vec![(400.0, 100.0), (300.0, 200.0)]);
    }

    #[test]
    fn test_unpairable_long_is_isolated_and_short_requeued() {
        let plan = plan_batch(&docs(&[1300.0, 600.0]), &PairingOptions::default());

        assert_eq!(plan.jobs.len(), 2);
        match &plan.jobs[0] {
            PlannedJob::Standalone { document, reason } => {
                assert_eq!(document.height, 1300.0);
                assert_eq!(*reason, StandaloneReason::Unpaired);
            }
            other => panic!("Expected standalone job, got {:?}", other),
        }
        match &plan.jobs[1] {
            PlannedJob::Standalone { document, reason } => {
                assert_eq!(document.height, 600.0);
                assert_eq!(*reason, StandaloneReason::Remainder);
            }
            other => panic!("Expected standalone job, got {:?}", other),
        }
        assert_eq!(plan.merged_pairs(), 0);
        assert_eq!(plan.standalone_count(), 2);
    }

    #[test]
    fn test_requeued_short_pairs_with_next_long() {
        // 1300 cannot pair with 100; the 100 then pairs with 700,
        // and 500 is left over.
        let plan = plan_batch(
            &docs(&[1300.0, 700.0, 500.0, 100.0]),
            &PairingOptions::default(),
        );

        assert_eq!(plan.jobs.len(), 3);
        assert!(matches!(
            &plan.jobs[0],
            PlannedJob::Standalone { document, reason: StandaloneReason::Unpaired }
                if document.height == 1300.0
        ));
        assert!(matches!(
            &plan.jobs[1],
            PlannedJob::Merged { long, short, .. }
                if long.height == 700.0 && short.height == 100.0
        ));
        assert!(matches!(
            &plan.jobs[2],
            PlannedJob::Standalone { document, reason: StandaloneReason::Remainder }
                if document.height == 500.0
        ));
        assert_each_document_once(&plan, 4);
    }

    #[test]
    fn test_equal_heights_keep_enumeration_order() {
        let plan = plan_batch(&docs(&[400.0, 400.0, 400.0, 400.0]), &PairingOptions::default());

        let ids: Vec<(usize, usize)> = plan
            .jobs
            .iter()
            .map(|job| match job {
                PlannedJob::Merged { long, short, .. } => (long.id, short.id),
                other => panic!("Expected merged job, got {:?}", other),
            })
            .collect();
        assert_eq!(ids, vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn test_colliding_output_names_are_made_unique() {
        let documents = vec![
            SourceDocument::new(0, "a_b.pdf", 500.0, 700.0),
            SourceDocument::new(1, "a.pdf", 500.0, 600.0),
            SourceDocument::new(2, "b_c.pdf", 500.0, 150.0),
            SourceDocument::new(3, "c.pdf", 500.0, 100.0),
        ];
        let plan = plan_batch(&documents, &PairingOptions::default());

        assert_eq!(plan.merged_pairs(), 2);
        assert_eq!(plan.jobs[0].output_file_name(), plan.jobs[1].output_file_name());
        assert_eq!(plan.output_file_names(), vec!["a_b_c.pdf", "a_b_c-2.pdf"]);
    }

    #[test]
    fn test_output_names_differing_only_in_case_are_made_unique() {
        let plan = BatchPlan {
            jobs: vec![
                PlannedJob::Standalone {
                    document: SourceDocument::new(0, "Report.pdf", 500.0, 300.0),
                    reason: StandaloneReason::Remainder,
                },
                PlannedJob::Standalone {
                    document: SourceDocument::new(1, "report.PDF", 500.0, 300.0),
                    reason: StandaloneReason::Remainder,
                },
            ],
        };
        assert_eq!(
            plan.output_file_names(),
            vec!["single_rem_Report.pdf", "single_rem_report-2.pdf"]
        );
    }

    #[test]
    fn test_every_document_used_once_in_mixed_batch() {
        let heights = [
            1250.0, 1180.0, 990.0, 842.0, 760.0, 640.0, 512.0, 480.0, 333.0, 290.0, 150.0,
        ];
        let options = PairingOptions::default();
        let plan = plan_batch(&docs(&heights), &options);

        assert_each_document_once(&plan, heights.len());
        for job in &plan.jobs {
            if let PlannedJob::Merged {
                long,
                short,
                long_scale,
                short_scale,
            } = job
            {
                assert!(long.height >= short.height);
                assert!(long.height * long_scale + short.height * short_scale <= 841.89);
                assert!(options.scale_range.contains(*long_scale));
                assert!(options.scale_range.contains(*short_scale));
            }
        }
    }
}
