//! Scalar reference kernel.

use crate::kernel::Kernel;

/// Plain dot-product kernel.
pub struct DotScalar;

impl Kernel for DotScalar {
    #[inline]
    fn dot(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::DotScalar;
    use crate::kernel::Kernel;

    #[test]
    fn dot_and_distance() {
        let a = [1.0f32, 0.0, 0.0];
        let b = [0.0f32, 1.0, 0.0];
        assert_eq!(DotScalar::dot(&a, &b), 0.0);
        assert!((DotScalar::distance(&a, &b) - 2.0f32.sqrt()).abs() < 1e-6);
        assert_eq!(DotScalar::distance(&a, &a), 0.0);
    }
}
