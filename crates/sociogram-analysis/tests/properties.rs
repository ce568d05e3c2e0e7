use proptest::prelude::*;
use sociogram_analysis::analyze_snapshot;
use sociogram_core::config::CommunityStrategy;
use sociogram_core::{AnalysisConfig, CancellationFlag, ResponseRecord, Student};

/// A class of `n` students plus nomination pairs. Indices may point one or
/// two past the roster and may repeat the nominator, so dangling references
/// and self-nominations are generated too.
fn arb_class() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (0usize..12).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n + 2, 0..n + 2), 0..40),
        )
    })
}

fn id(i: usize) -> String {
    format!("s{i:02}")
}

fn materialize(n: usize, pairs: &[(usize, usize)]) -> (Vec<Student>, Vec<ResponseRecord>) {
    let roster = (0..n)
        .map(|i| Student::new(id(i), format!("Student {i}"), "5", "1"))
        .collect();
    // One question per pair so repeated pairs become parallel nominations.
    let records = pairs
        .iter()
        .enumerate()
        .map(|(q, (from, to))| {
            ResponseRecord::new(id(*from), "p", serde_json::json!({ format!("q{q:02}"): id(*to) }))
        })
        .collect();
    (roster, records)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn centralities_stay_in_unit_interval((n, pairs) in arb_class()) {
        let (roster, records) = materialize(n, &pairs);
        let outcome = analyze_snapshot("p", &roster, &records, &AnalysisConfig::default(), &CancellationFlag::new()).expect("analysis");

        for metrics in outcome.result.student_details.values() {
            let c = metrics.centrality;
            for score in [c.degree, c.betweenness, c.closeness, c.eigenvector] {
                prop_assert!((0.0..=1.0 + 1e-12).contains(&score), "{} out of range: {score}", metrics.student_id);
            }
        }
    }

    #[test]
    fn degree_sums_match_edge_count((n, pairs) in arb_class()) {
        let (roster, records) = materialize(n, &pairs);
        let result = analyze_snapshot("p", &roster, &records, &AnalysisConfig::default(), &CancellationFlag::new()).expect("analysis").result;

        let edges = result.network_data.edges.len();
        let out: usize = result.student_details.values().map(|m| m.out_degree).sum();
        let inc: usize = result.student_details.values().map(|m| m.in_degree).sum();
        prop_assert_eq!(out, edges);
        prop_assert_eq!(inc, edges);
        prop_assert_eq!(result.network_stats.total_relationships, edges);

        for m in result.student_details.values() {
            prop_assert!(m.connection_count <= m.total_degree);
            prop_assert_eq!(m.connection_count, m.neighbors.len());
        }
    }

    #[test]
    fn histogram_covers_every_student((n, pairs) in arb_class()) {
        let (roster, records) = materialize(n, &pairs);
        let result = analyze_snapshot("p", &roster, &records, &AnalysisConfig::default(), &CancellationFlag::new()).expect("analysis").result;
        prop_assert_eq!(result.friendship_type_distribution.total(), n);
        prop_assert_eq!(result.student_details.len(), n);
    }

    #[test]
    fn exported_edges_are_valid((n, pairs) in arb_class()) {
        let (roster, records) = materialize(n, &pairs);
        let outcome = analyze_snapshot("p", &roster, &records, &AnalysisConfig::default(), &CancellationFlag::new()).expect("analysis");

        for edge in &outcome.result.network_data.edges {
            prop_assert_ne!(&edge.source, &edge.target);
            prop_assert!(outcome.result.student_details.contains_key(&edge.source));
            prop_assert!(outcome.result.student_details.contains_key(&edge.target));
        }
        // Every generated pair is either an edge or a warning.
        prop_assert_eq!(outcome.result.network_data.edges.len() + outcome.warnings.len(), pairs.len());
    }

    #[test]
    fn communities_are_dense_and_deterministic((n, pairs) in arb_class(), propagate in any::<bool>()) {
        let (roster, records) = materialize(n, &pairs);
        let mut config = AnalysisConfig::default();
        if propagate {
            config.community.strategy = CommunityStrategy::LabelPropagation;
        }
        let first = analyze_snapshot("p", &roster, &records, &config, &CancellationFlag::new()).expect("first").result;
        let second = analyze_snapshot("p", &roster, &records, &config, &CancellationFlag::new()).expect("second").result;

        let count = first.network_data.nodes.iter().map(|node| node.community + 1).max().unwrap_or(0);
        for c in 0..count {
            prop_assert!(first.network_data.nodes.iter().any(|node| node.community == c), "community {c} unused");
        }
        prop_assert_eq!(first, second);
    }
}
