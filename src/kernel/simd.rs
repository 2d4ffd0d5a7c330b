//! SIMD dot-product kernel using the `wide` crate.
//!
//! Descriptors are processed eight lanes at a time with `f32x8`; the tail
//! that does not fill a full vector is handled with scalar code.

use crate::kernel::Kernel;
use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

#[inline]
fn hsum(v: f32x8) -> f32 {
    v.to_array().iter().sum()
}

/// SIMD-accelerated dot-product kernel.
pub struct DotSimd;

impl Kernel for DotSimd {
    #[inline]
    fn dot(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        let len = a.len().min(b.len());
        let simd_end = len / LANES * LANES;

        let mut acc = f32x8::ZERO;
        let mut idx = 0;
        while idx < simd_end {
            acc += load_f32x8(&a[idx..]) * load_f32x8(&b[idx..]);
            idx += LANES;
        }

        let mut tail = 0.0f32;
        while idx < len {
            tail += a[idx] * b[idx];
            idx += 1;
        }

        hsum(acc) + tail
    }
}

#[cfg(test)]
mod tests {
    use super::DotSimd;
    use crate::kernel::scalar::DotScalar;
    use crate::kernel::Kernel;

    #[test]
    fn simd_matches_scalar_with_tail() {
        let a: Vec<f32> = (0..19).map(|v| (v as f32 * 0.37).sin()).collect();
        let b: Vec<f32> = (0..19).map(|v| (v as f32 * 0.11).cos()).collect();
        let simd = DotSimd::dot(&a, &b);
        let scalar = DotScalar::dot(&a, &b);
        assert!((simd - scalar).abs() < 1e-5);
    }
}
