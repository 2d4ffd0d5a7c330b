#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seqmatch::{Descriptors, ReferenceMap, SeqMatchConfig};
use std::sync::Arc;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_unit(rng: &mut StdRng, dim: usize) -> Vec<f32> {
    let mut v: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0)).collect();
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    for x in v.iter_mut() {
        *x /= norm;
    }
    v
}

pub fn random_descriptors(rng: &mut StdRng, len: usize, dim: usize) -> Descriptors {
    let rows: Vec<Vec<f32>> = (0..len).map(|_| random_unit(rng, dim)).collect();
    Descriptors::from_rows(&rows).unwrap()
}

/// Perturbs `base` by uniform noise of amplitude `noise` and renormalizes.
pub fn noisy_copy(rng: &mut StdRng, base: &[f32], noise: f32) -> Vec<f32> {
    let mut v: Vec<f32> = base
        .iter()
        .map(|x| x + rng.random_range(-noise..noise))
        .collect();
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    for x in v.iter_mut() {
        *x /= norm;
    }
    v
}

pub fn indexed_map(descriptors: Descriptors) -> Arc<ReferenceMap<usize>> {
    let poses = (0..descriptors.len()).collect();
    Arc::new(ReferenceMap::new(poses, descriptors).unwrap())
}

/// Query window following the reference from `start` at `velocity`, with
/// row 0 aligned to `start`.
pub fn query_along(
    rng: &mut StdRng,
    reference: &Descriptors,
    start: usize,
    velocity: f64,
    len: usize,
    noise: f32,
) -> Descriptors {
    let rows: Vec<Vec<f32>> = (0..len)
        .map(|t| {
            let idx = (start as f64 + velocity * t as f64).floor() as usize;
            noisy_copy(rng, reference.row(idx).unwrap(), noise)
        })
        .collect();
    Descriptors::from_rows(&rows).unwrap()
}

pub fn fixed_velocity_config(seq_len: usize, velocity: f64) -> SeqMatchConfig {
    SeqMatchConfig {
        seq_len,
        contrast_window: 10,
        num_velocities: 1,
        v_min: velocity,
        v_max: velocity,
        match_window: 10,
        enhance: false,
        parallel: false,
    }
}
