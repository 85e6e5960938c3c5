//! Scalar math kernels shared by the pricing engines.

pub mod timeseries;

/// Standard normal probability density function.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution function.
///
/// Abramowitz & Stegun 7.1.26 polynomial approximation with absolute error
/// below 7.5e-8 over the real line. The construction satisfies
/// `normal_cdf(x) + normal_cdf(-x) == 1` to machine precision, which keeps
/// put-call parity exact at the pricing layer.
pub fn normal_cdf(x: f64) -> f64 {
    const P: f64 = 0.231_641_9;
    const B1: f64 = 0.319_381_530;
    const B2: f64 = -0.356_563_782;
    const B3: f64 = 1.781_477_937;
    const B4: f64 = -1.821_255_978;
    const B5: f64 = 1.330_274_429;

    let z = x.abs();
    let t = 1.0 / (1.0 + P * z);
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let upper_tail = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { upper_tail } else { 1.0 - upper_tail }
}

/// `n` evenly spaced values over `[lo, hi]`, endpoints included.
///
/// Requires `n >= 2`; callers validate before reaching this kernel.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    debug_assert!(n >= 2, "linspace needs at least two points");
    let span = hi - lo;
    let denom = (n - 1) as f64;
    (0..n).map(|i| lo + span * (i as f64 / denom)).collect()
}
