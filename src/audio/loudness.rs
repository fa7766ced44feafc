//! Block RMS, the compressive nonlinearity and threshold-in-quiet clipping.

use std::sync::LazyLock;

use super::bark::LTQ_Z;
use super::signal::P_REF;

/// Calibration constant of the nonlinearity.
pub const C_N: f64 = 0.0217406;

/// Transition steepness between compression regimes.
pub const ALPHA: f64 = 1.5;

/// Compression exponents below, between and above the thresholds.
pub const V: [f64; 9] = [1.0, 0.6602, 0.0864, 0.6384, 0.0328, 0.4068, 0.2082, 0.3994, 0.6434];

/// Regime boundaries in dB SPL.
pub const THRESHOLDS_DB: [f64; 8] = [15.0, 25.0, 35.0, 45.0, 55.0, 65.0, 75.0, 85.0];

/// (threshold pressure, exponent) per regime boundary.
static STAGES: LazyLock<[(f64, f64); 8]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let p_t = P_REF * 10f64.powf(THRESHOLDS_DB[i] / 20.0);
        (p_t, (V[i + 1] - V[i]) / ALPHA)
    })
});

/// Half-wave rectify a block and return `sqrt(2 * mean(x^2))` over it.
pub fn rectified_rms(block: &[f64]) -> f64 {
    if block.is_empty() {
        return 0.0;
    }
    let energy: f64 = block.iter().map(|&x| x.max(0.0)).map(|x| x * x).sum();
    (2.0 * energy / block.len() as f64).sqrt()
}

/// Compressive nonlinearity: RMS pressure in Pa to loudness before threshold removal.
///
/// Non-decreasing in `p`, exactly zero at `p == 0`.
pub fn nonlinearity(p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    STAGES
        .iter()
        .fold(C_N * p / P_REF, |acc, &(p_t, exponent)| {
            acc * (1.0 + (p / p_t).powf(ALPHA)).powf(exponent)
        })
}

/// Remove the threshold in quiet of `band`, never below zero.
#[inline]
pub fn clip_to_threshold(a: f64, band: usize) -> f64 {
    let ltq = LTQ_Z[band];
    a.max(ltq) - ltq
}

/// Specific loudness of one band from its blocks, written into `out`.
pub fn specific_loudness<'a>(
    band: usize,
    blocks: impl Iterator<Item = &'a [f64]>,
    out: &mut [f64],
) {
    for (value, block) in out.iter_mut().zip(blocks) {
        *value = clip_to_threshold(nonlinearity(rectified_rms(block)), band);
    }
}
