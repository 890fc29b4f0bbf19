//! Matching behavior through the public library API

use signal_solver::matching::aligner::best_alignment;
use signal_solver::matching::normalizer::rank_alignments;
use signal_solver::{
    Aligner, AlignmentError, Confidence, ErrorMetric, MatchingConfig, MatchingEngine, RankError,
    RankingKind, ReferenceName, ReferenceSet, Signal,
};

fn signal(values: &[f64]) -> Signal {
    Signal::from_intensities(values.to_vec()).unwrap()
}

fn reference_set(entries: Vec<(&str, Vec<f64>)>) -> ReferenceSet {
    let mut set = ReferenceSet::new();
    for (name, values) in entries {
        set.insert(name.into(), signal(&values)).unwrap();
    }
    set
}

#[test]
fn test_exact_window_is_a_perfect_match() {
    let references = reference_set(vec![
        ("A", vec![0.0, 1.0, 2.0, 3.0, 4.0]),
        ("B", vec![5.0, 5.0, 5.0, 5.0, 5.0]),
    ]);
    let experimental = signal(&[1.0, 2.0, 3.0]);

    let result = MatchingEngine::new(&references)
        .identify(&experimental)
        .unwrap();

    let a = result
        .alignments
        .get(&ReferenceName::new("A"))
        .unwrap()
        .as_ref()
        .unwrap();
    assert_eq!(a.best_offset, 1);
    assert_eq!(a.best_error, 0.0);

    assert_eq!(result.ranking.kind(), RankingKind::PerfectMatch);
    assert_eq!(result.ranking.best().name.as_str(), "A");
    assert_eq!(result.ranking.best().probability, 1.0);
    assert_eq!(result.ranking.second().name.as_str(), "B");
    assert_eq!(result.ranking.second().probability, 0.0);
    assert_eq!(result.ranking.confidence(0), Confidence::Exact);
}

#[test]
fn test_tied_offsets_resolve_to_lowest() {
    let references = reference_set(vec![
        ("A", vec![2.0, 2.0, 2.0, 2.0]),
        ("B", vec![1.0, 1.0, 1.0, 1.0]),
    ]);
    let experimental = signal(&[1.0, 1.0, 1.0]);

    let alignments = Aligner::new(ErrorMetric::SumOfSquares).align(&experimental, &references);

    let a = alignments.get(&"A".into()).unwrap().as_ref().unwrap();
    assert_eq!(a.best_offset, 0);
    assert_eq!(a.best_error, 3.0);

    let b = alignments.get(&"B".into()).unwrap().as_ref().unwrap();
    assert_eq!(b.best_offset, 0);
    assert_eq!(b.best_error, 0.0);
}

#[test]
fn test_single_reference_cannot_be_ranked() {
    let references = reference_set(vec![("A", vec![0.0, 1.0, 2.0])]);
    let result = MatchingEngine::new(&references).identify(&signal(&[1.0, 2.0]));

    assert_eq!(
        result.unwrap_err(),
        RankError::InsufficientCandidates { found: 1 }
    );
}

#[test]
fn test_offsets_and_errors_are_in_bounds() {
    let experimental = [0.3, -1.2, 4.4];
    let references: [&[f64]; 4] = [
        &[0.3, -1.2, 4.4],
        &[9.0, 8.0, 7.0, 6.0, 5.0, 4.0],
        &[0.0; 12],
        &[1.0, -1.0, 1.0, -1.0, 1.0],
    ];

    for reference in references {
        for metric in [ErrorMetric::SumOfSquares, ErrorMetric::SumOfAbsolute] {
            let result = best_alignment(&experimental, reference, metric).unwrap();
            assert!(result.best_offset <= reference.len() - experimental.len());
            assert!(result.best_error >= 0.0);
        }
    }
}

#[test]
fn test_smallest_error_gets_highest_probability() {
    let references = reference_set(vec![
        ("far", vec![10.0, 10.0, 10.0, 10.0]),
        ("near", vec![1.1, 2.2, 2.9, 0.0]),
        ("mid", vec![2.0, 3.0, 4.0, 5.0]),
    ]);
    let experimental = signal(&[1.0, 2.0, 3.0]);

    let result = MatchingEngine::new(&references)
        .identify(&experimental)
        .unwrap();
    let ranking = &result.ranking;

    assert_eq!(ranking.kind(), RankingKind::Weighted);
    assert_eq!(ranking.best().name.as_str(), "near");

    let total: f64 = ranking.scores().iter().map(|s| s.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let probabilities: Vec<f64> = ranking.scores().iter().map(|s| s.probability).collect();
    assert!(probabilities.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_short_references_are_skipped_not_fatal() {
    let references = reference_set(vec![
        ("tiny", vec![1.0]),
        ("A", vec![0.0, 1.0, 2.0]),
        ("B", vec![3.0, 3.0, 3.0]),
    ]);

    let result = MatchingEngine::new(&references)
        .identify(&signal(&[1.0, 2.0]))
        .unwrap();

    let skipped: Vec<_> = result.alignments.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0.as_str(), "tiny");
    assert_eq!(
        *skipped[0].1,
        AlignmentError::ReferenceTooShort {
            reference_len: 1,
            experimental_len: 2
        }
    );
    assert_eq!(result.ranking.scores().len(), 2);
}

#[test]
fn test_batch_identification_keeps_input_order() {
    let references = reference_set(vec![
        ("A", vec![0.0, 1.0, 2.0, 3.0, 4.0]),
        ("B", vec![5.0, 5.0, 5.0, 5.0, 5.0]),
    ]);
    let experiments: Vec<(String, Signal)> = (0..16)
        .map(|i| {
            let v = f64::from(i) / 4.0;
            (format!("exp{i}"), signal(&[v, v + 1.0]))
        })
        .collect();

    let parallel = MatchingEngine::new(&references).identify_all(&experiments);
    let serial = MatchingEngine::with_config(
        &references,
        MatchingConfig {
            parallel: false,
            ..MatchingConfig::default()
        },
    )
    .identify_all(&experiments);

    let ids: Vec<&str> = parallel.iter().map(|(id, _)| *id).collect();
    let expected: Vec<String> = (0..16).map(|i| format!("exp{i}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(parallel, serial);
}

#[test]
fn test_rank_alignments_matches_engine() {
    let references = reference_set(vec![
        ("A", vec![0.0, 1.0, 2.0, 3.0]),
        ("B", vec![1.0, 1.0, 1.0, 1.0]),
    ]);
    let experimental = signal(&[0.5, 1.5]);

    let alignments = Aligner::new(ErrorMetric::SumOfSquares).align(&experimental, &references);
    let ranking = rank_alignments(&alignments).unwrap();
    let result = MatchingEngine::new(&references)
        .identify(&experimental)
        .unwrap();

    assert_eq!(ranking, result.ranking);
}

#[test]
fn test_near_zero_errors_still_normalize() {
    // Both errors are 1e-308, whose inverses sum past f64::MAX
    let references = reference_set(vec![
        ("A", vec![1e-154, 1e-154]),
        ("B", vec![-1e-154, -1e-154]),
    ]);

    let result = MatchingEngine::new(&references)
        .identify(&signal(&[0.0]))
        .unwrap();
    let ranking = &result.ranking;

    assert_eq!(ranking.kind(), RankingKind::Weighted);
    let total: f64 = ranking.scores().iter().map(|s| s.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(ranking.best().name.as_str(), "A");
    assert!((ranking.best().probability - 0.5).abs() < 1e-12);
}

#[test]
fn test_overflowing_reference_is_skipped_by_engine() {
    let references = reference_set(vec![
        ("A", vec![0.0, 1.0, 2.0]),
        ("huge", vec![1e160, 1e160]),
        ("B", vec![3.0, 3.0, 3.0]),
    ]);

    let result = MatchingEngine::new(&references)
        .identify(&signal(&[1.0]))
        .unwrap();

    let skipped: Vec<_> = result.alignments.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0.as_str(), "huge");
    assert_eq!(*skipped[0].1, AlignmentError::ErrorOverflow);
    assert_eq!(result.ranking.kind(), RankingKind::PerfectMatch);
    assert_eq!(result.ranking.best().name.as_str(), "A");
}
