#![no_main]

use libfuzzer_sys::fuzz_target;
use sociogram_analysis::analyze_snapshot;
use sociogram_core::{AnalysisConfig, CancellationFlag, ResponseRecord, Student};

// Arbitrary record payloads against a fixed roster: the run must never fail
// and every exported edge must connect two distinct roster students.
fuzz_target!(|data: &[u8]| {
    let Ok(records) = serde_json::from_slice::<Vec<ResponseRecord>>(data) else {
        return;
    };
    let roster: Vec<Student> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| Student::new(*id, *id, "1", "1"))
        .collect();

    let outcome = analyze_snapshot(
        "fuzz",
        &roster,
        &records,
        &AnalysisConfig::default(),
        &CancellationFlag::new(),
    )
    .expect("analysis never fails on bad data");

    let result = outcome.result;
    assert_eq!(result.friendship_type_distribution.total(), roster.len());
    for edge in &result.network_data.edges {
        assert_ne!(edge.source, edge.target);
        assert!(result.student_details.contains_key(&edge.source));
        assert!(result.student_details.contains_key(&edge.target));
    }
});
