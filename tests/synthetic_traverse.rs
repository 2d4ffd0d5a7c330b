//! Synthetic traverses written to and read back from the JSON layout used
//! by the command-line tool.

mod common;

use common::{indexed_map, query_along, random_descriptors, rng};
use serde::{Deserialize, Serialize};
use seqmatch::{
    localize_traverse, AnyLocalizer, Descriptors, LocalizerKind, ReferenceMap, SeqMatchConfig,
};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
struct ReferenceFile {
    poses: Vec<[f64; 2]>,
    descriptors: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct QueryFile {
    poses: Vec<[f64; 2]>,
    windows: Vec<Vec<Vec<f32>>>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SequenceParams {
    seq_len: usize,
    contrast_window: usize,
    num_velocities: usize,
    v_min: f64,
    v_max: f64,
    match_window: usize,
    enhance: bool,
}

impl Default for SequenceParams {
    fn default() -> Self {
        let cfg = SeqMatchConfig::default();
        Self {
            seq_len: cfg.seq_len,
            contrast_window: cfg.contrast_window,
            num_velocities: cfg.num_velocities,
            v_min: cfg.v_min,
            v_max: cfg.v_max,
            match_window: cfg.match_window,
            enhance: cfg.enhance,
        }
    }
}

impl From<SequenceParams> for SeqMatchConfig {
    fn from(p: SequenceParams) -> Self {
        Self {
            seq_len: p.seq_len,
            contrast_window: p.contrast_window,
            num_velocities: p.num_velocities,
            v_min: p.v_min,
            v_max: p.v_max,
            match_window: p.match_window,
            enhance: p.enhance,
            parallel: false,
        }
    }
}

const SEQUENCE_PARAMS: &str = r#"{
    "seq_len": 5,
    "num_velocities": 1,
    "v_min": 1.0,
    "v_max": 1.0,
    "match_window": 10
}"#;

const STARTS: [usize; 4] = [5, 18, 31, 44];

fn pose_of(idx: usize) -> [f64; 2] {
    [idx as f64 * 0.5, 1.0]
}

/// Builds a 60-place reference and four query windows at `STARTS`, both
/// serialized to JSON text.
fn synthetic_traverse(seed: u64) -> (String, String) {
    let mut rng = rng(seed);
    let reference = random_descriptors(&mut rng, 60, 32);
    let map = indexed_map(reference.clone());

    let reference_file = ReferenceFile {
        poses: map.poses().iter().map(|&i| pose_of(i)).collect(),
        descriptors: reference
            .data()
            .chunks(reference.dim())
            .map(|row| row.to_vec())
            .collect(),
    };
    let windows: Vec<Vec<Vec<f32>>> = STARTS
        .iter()
        .map(|&s| {
            let q = query_along(&mut rng, &reference, s, 1.0, 5, 0.02);
            q.view().rows().map(|row| row.to_vec()).collect::<Vec<_>>()
        })
        .collect();
    let query_file = QueryFile {
        poses: STARTS.iter().map(|&s| pose_of(s)).collect(),
        windows,
    };

    (
        serde_json::to_string(&reference_file).unwrap(),
        serde_json::to_string_pretty(&query_file).unwrap(),
    )
}

fn load(reference_json: &str, query_json: &str) -> (Arc<ReferenceMap<[f64; 2]>>, QueryFile) {
    let reference: ReferenceFile = serde_json::from_str(reference_json).unwrap();
    let descriptors = Descriptors::from_rows(&reference.descriptors).unwrap();
    let map = Arc::new(ReferenceMap::new(reference.poses, descriptors).unwrap());
    let query: QueryFile = serde_json::from_str(query_json).unwrap();
    (map, query)
}

fn windows_of(query: &QueryFile) -> Vec<Descriptors> {
    query
        .windows
        .iter()
        .map(|w| Descriptors::from_rows(w).unwrap())
        .collect()
}

#[test]
fn empty_params_fall_back_to_defaults() {
    let params: SequenceParams = serde_json::from_str("{}").unwrap();
    assert_eq!(SeqMatchConfig::from(params), SeqMatchConfig::default());
}

#[test]
fn sequence_localizer_recovers_json_traverse() {
    let (reference_json, query_json) = synthetic_traverse(11);
    let (map, query) = load(&reference_json, &query_json);
    assert_eq!(map.len(), 60);
    assert_eq!(map.poses()[44], pose_of(44));

    let params: SequenceParams = serde_json::from_str(SEQUENCE_PARAMS).unwrap();
    let localizer = AnyLocalizer::build(map, LocalizerKind::Sequence(params.into())).unwrap();
    let report = localize_traverse(&localizer, &windows_of(&query));

    assert_eq!(report.num_localized(), STARTS.len());
    assert_eq!(report.num_failed(), 0);
    for (outcome, truth) in report.outcomes.iter().zip(&query.poses) {
        let loc = outcome.result.as_ref().unwrap();
        assert_eq!(&loc.pose, truth, "query {}", outcome.query);
    }
    let summed: std::time::Duration = report.outcomes.iter().map(|o| o.elapsed).sum();
    assert_eq!(report.total_time(), summed);
}

#[test]
fn single_image_localizer_recovers_json_traverse() {
    let (reference_json, query_json) = synthetic_traverse(12);
    let (map, query) = load(&reference_json, &query_json);
    let localizer = AnyLocalizer::build(map, LocalizerKind::SingleImage).unwrap();
    let report = localize_traverse(&localizer, &windows_of(&query));

    assert_eq!(report.model, "Single");
    for (outcome, truth) in report.outcomes.iter().zip(&query.poses) {
        let loc = outcome.result.as_ref().unwrap();
        assert_eq!(&loc.pose, truth);
        assert!(loc.score < 0.5, "distance {}", loc.score);
    }
}
