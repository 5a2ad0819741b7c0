// Dot product and norm kernels for latent vectors.
// Topic spaces are small (K is usually 10-100), so the scalar path is the
// common one; AVX2 only kicks in for wide projections.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 32;

/// Dot product of two equally sized slices.
/// Returns 0.0 when the lengths differ.
#[inline]
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if a.len() >= MIN_DIM_SIZE_AVX
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut acc = _mm256_setzero_ps();
    let mut i = 0;

    while i + 8 <= dim {
        let va = _mm256_loadu_ps(a.as_ptr().add(i));
        let vb = _mm256_loadu_ps(b.as_ptr().add(i));
        acc = _mm256_fmadd_ps(va, vb, acc);
        i += 8;
    }

    let high = _mm256_extractf128_ps(acc, 1);
    let low = _mm256_castps256_ps128(acc);
    let mut sum = _mm_add_ps(high, low);
    sum = _mm_hadd_ps(sum, sum);
    sum = _mm_hadd_ps(sum, sum);
    let mut dot = _mm_cvtss_f32(sum);

    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }
    dot
}

/// Scalar fallback, two accumulators over 4-wide chunks.
#[inline]
fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut even = 0.0f32;
    let mut odd = 0.0f32;

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        even += x[0] * y[0] + x[2] * y[2];
        odd += x[1] * y[1] + x[3] * y[3];
    }
    for (x, y) in a_tail.iter().zip(b_tail) {
        even += x * y;
    }

    even + odd
}

#[inline]
pub fn norm_squared_simd(v: &[f32]) -> f32 {
    dot_product_simd(v, v)
}

#[inline]
pub fn norm_simd(v: &[f32]) -> f32 {
    norm_squared_simd(v).sqrt()
}
