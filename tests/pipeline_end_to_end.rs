mod common;

use common::{fixed_velocity_config, indexed_map, query_along, random_descriptors, rng};
use seqmatch::{
    localize_traverse, AnyLocalizer, Descriptors, Localizer, LocalizerKind, ReferenceMap,
    SeqMatchConfig, SeqMatchError, SeqMatcher, SingleImageMatcher,
};
use std::sync::Arc;

/// Confidence below this means the injected sequence clearly beat all
/// alternatives outside the exclusion window.
const NOISE_FLOOR_CONFIDENCE: f32 = 0.3;

#[test]
fn recovers_injected_trajectory() {
    let mut rng = rng(42);
    let reference = random_descriptors(&mut rng, 50, 32);
    let query = query_along(&mut rng, &reference, 20, 1.0, 5, 0.02);
    let matcher = SeqMatcher::new(indexed_map(reference), fixed_velocity_config(5, 1.0)).unwrap();

    let loc = matcher.localize(query.view()).unwrap();
    assert_eq!(loc.index, 20);
    assert_eq!(loc.pose, 20);
    assert!(
        loc.score < NOISE_FLOOR_CONFIDENCE,
        "confidence {} above noise floor",
        loc.score
    );
}

#[test]
fn recovers_trajectory_with_unknown_velocity() {
    let mut rng = rng(7);
    let reference = random_descriptors(&mut rng, 120, 48);
    let query = query_along(&mut rng, &reference, 33, 1.5, 10, 0.02);
    let cfg = SeqMatchConfig {
        seq_len: 10,
        contrast_window: 10,
        num_velocities: 4,
        v_min: 1.0,
        v_max: 3.0,
        match_window: 20,
        enhance: false,
        parallel: false,
    };
    let matcher = SeqMatcher::new(indexed_map(reference), cfg).unwrap();
    let m = matcher.match_sequence(query.view()).unwrap();
    assert_eq!(m.index, 33);
    assert!(m.is_finite());
    assert!(m.confidence < NOISE_FLOOR_CONFIDENCE);
}

#[test]
fn contrast_enhancement_keeps_the_match() {
    let mut rng = rng(11);
    let reference = random_descriptors(&mut rng, 80, 32);
    let query = query_along(&mut rng, &reference, 40, 1.0, 6, 0.02);
    let cfg = SeqMatchConfig {
        enhance: true,
        ..fixed_velocity_config(6, 1.0)
    };
    let matcher = SeqMatcher::new(indexed_map(reference), cfg).unwrap();
    let m = matcher.match_sequence(query.view()).unwrap();
    assert_eq!(m.index, 40);
    assert!(m.is_finite());
}

#[test]
fn degenerate_enhancement_is_detectable() {
    let row = [0.6f32, 0.8];
    let data: Vec<f32> = row.iter().copied().cycle().take(2 * 30).collect();
    let reference = Descriptors::new(data, 30, 2).unwrap();
    let cfg = SeqMatchConfig {
        enhance: true,
        contrast_window: 4,
        match_window: 4,
        ..fixed_velocity_config(4, 1.0)
    };
    let matcher = SeqMatcher::new(indexed_map(reference), cfg).unwrap();
    let query = Descriptors::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2).unwrap();

    assert!(matcher.difference_matrix(query.view()).unwrap().has_non_finite());
    let m = matcher.match_sequence(query.view()).unwrap();
    assert!(!m.is_finite());
}

#[test]
fn boundary_configurations() {
    let mut rng = rng(3);
    let cfg = SeqMatchConfig {
        seq_len: 10,
        num_velocities: 2,
        v_min: 1.0,
        v_max: 2.0,
        contrast_window: 5,
        match_window: 5,
        ..SeqMatchConfig::default()
    };

    let long = SeqMatcher::new(indexed_map(random_descriptors(&mut rng, 100, 8)), cfg.clone())
        .unwrap();
    let query = random_descriptors(&mut rng, 10, 8);
    assert_eq!(long.template_scores(query.view()).unwrap().len(), 79);

    let short = SeqMatcher::new(
        indexed_map(random_descriptors(&mut rng, 10, 8)),
        SeqMatchConfig {
            contrast_window: 2,
            match_window: 2,
            ..cfg
        },
    );
    assert!(matches!(
        short.err(),
        Some(SeqMatchError::InvalidConfiguration { .. })
    ));
}

#[test]
fn localizer_kind_selects_implementation() {
    let mut rng = rng(5);
    let reference = random_descriptors(&mut rng, 60, 16);
    let query = query_along(&mut rng, &reference, 25, 1.0, 5, 0.01);
    let map = indexed_map(reference);

    let seq = AnyLocalizer::build(
        map.clone(),
        LocalizerKind::Sequence(fixed_velocity_config(5, 1.0)),
    )
    .unwrap();
    let single = AnyLocalizer::build(map, LocalizerKind::SingleImage).unwrap();

    assert_eq!(seq.name(), "Seq Match");
    assert_eq!(single.name(), "Single");
    assert_eq!(seq.localize(query.view()).unwrap().index, 25);
    let baseline = single.localize(query.view()).unwrap();
    assert_eq!(baseline.index, 25);
    assert!(baseline.score < 0.2);
}

#[test]
fn sweep_localizes_a_traverse() {
    let mut rng = rng(9);
    let reference = random_descriptors(&mut rng, 70, 24);
    let poses: Vec<(f64, f64)> = (0..70).map(|i| (i as f64, 0.0)).collect();
    let map = Arc::new(ReferenceMap::new(poses, reference.clone()).unwrap());
    let matcher = SeqMatcher::new(map.clone(), fixed_velocity_config(5, 1.0)).unwrap();

    let starts = [5usize, 18, 30, 44];
    let windows: Vec<Descriptors> = starts
        .iter()
        .map(|&s| query_along(&mut rng, &reference, s, 1.0, 5, 0.02))
        .collect();

    let report = localize_traverse(&matcher, &windows);
    assert_eq!(report.model, "Seq Match");
    assert_eq!(report.num_failed(), 0);
    for (outcome, &s) in report.outcomes.iter().zip(starts.iter()) {
        let loc = outcome.result.as_ref().unwrap();
        assert_eq!(loc.pose, (s as f64, 0.0));
    }

    let baseline = localize_traverse(&SingleImageMatcher::new(map), &windows);
    assert_eq!(baseline.num_localized(), starts.len());
}
