use pdf_pairing::*;

fn docs(heights: &[f32]) -> Vec<SourceDocument> {
    heights
        .iter()
        .enumerate()
        .map(|(id, &h)| SourceDocument::new(id, format!("invoice-{id}.pdf"), 595.0, h))
        .collect()
}

#[test]
fn test_stats_empty_plan() {
    let stats = calculate_statistics(&BatchPlan::default());
    assert_eq!(stats.source_documents, 0);
    assert_eq!(stats.output_pages, 0);
    assert_eq!(stats.pages_saved, 0);
}

#[test]
fn test_stats_all_pairable() {
    let plan = plan_batch(&docs(&[400.0, 380.0, 300.0, 250.0]), &PairingOptions::default());
    let stats = calculate_statistics(&plan);

    assert_eq!(stats.source_documents, 4);
    assert_eq!(stats.merged_pairs, 2);
    assert_eq!(stats.merged_documents, 4);
    assert_eq!(stats.standalone_documents, 0);
    assert_eq!(stats.output_pages, 2);
    assert_eq!(stats.pages_saved, 2);
}

#[test]
fn test_stats_odd_batch() {
    // Tallest goes alone first, then [300, 200] share a page
    let plan = plan_batch(&docs(&[500.0, 300.0, 200.0]), &PairingOptions::default());
    let stats = calculate_statistics(&plan);

    assert_eq!(stats.source_documents, 3);
    assert_eq!(stats.merged_pairs, 1);
    assert_eq!(stats.standalone_documents, 1);
    assert_eq!(stats.output_pages, 2);
    assert_eq!(stats.pages_saved, 1);
}

#[test]
fn test_stats_nothing_pairs() {
    let plan = plan_batch(&docs(&[1300.0, 1250.0, 1200.0, 1210.0]), &PairingOptions::default());
    let stats = calculate_statistics(&plan);

    assert_eq!(stats.source_documents, 4);
    assert_eq!(stats.merged_pairs, 0);
    assert_eq!(stats.standalone_documents, 4);
    assert_eq!(stats.output_pages, 4);
    assert_eq!(stats.pages_saved, 0);
}

#[test]
fn test_plan_output_names() {
    let plan = plan_batch(&docs(&[1300.0, 700.0, 500.0, 100.0]), &PairingOptions::default());
    let names: Vec<String> = plan.jobs.iter().map(|job| job.output_file_name()).collect();
    assert_eq!(
        names,
        vec![
            "single_long_invoice-0.pdf",
            "invoice-1_invoice-3.pdf",
            "single_rem_invoice-2.pdf",
        ]
    );
}
