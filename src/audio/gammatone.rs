//! # Gammatone filter bank
//!
//! Each auditory band is a fifth-order gammatone, realised as a recursive filter with five
//! coincident poles.  The low-pass prototype is designed from the band's bandwidth and then
//! shifted to the centre frequency by complex modulation of the taps, so the filter itself has
//! complex coefficients.  Feeding a real signal through it and keeping twice the real part of
//! the output gives the real band-pass signal.
//!
//! The modulation uses `exp(+j 2 pi f m / fs)`.  A literal reading of the standard's formula
//! has the opposite sign, which mirrors the pass band to negative frequencies.

use std::f64::consts::TAU;

use num_complex::Complex64;
use rayon::prelude::*;

use super::bark::{self, N_BANDS};
use super::signal::{Padding, SAMPLE_RATE};
use crate::config::SegmentationConfig;

/// Filter order.
pub const ORDER: usize = 5;

/// Numerator weights of the low-pass prototype.
const E_WEIGHTS: [f64; ORDER] = [0.0, 1.0, 11.0, 11.0, 1.0];

/// Complex recursive filter coefficients of one band.
#[derive(Clone, Debug)]
pub struct GammatoneCoefficients {
    /// Centre frequency in Hz.
    pub centre: f64,
    /// Pole radius of the low-pass prototype.
    pub d: f64,
    /// Denominator, `am[0] == 1`.
    pub am: [Complex64; ORDER + 1],
    /// Numerator.
    pub bm: [Complex64; ORDER],
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

impl GammatoneCoefficients {
    pub fn new(centre: f64) -> Self {
        let fs = SAMPLE_RATE as f64;
        let k = ORDER;

        let delta_f = bark::bandwidth(centre);
        let tau = binomial(2 * k - 2, k - 1) / 2f64.powi(2 * k as i32 - 1) / delta_f;
        let d = (-1.0 / (fs * tau)).exp();

        let norm = (1.0 - d).powi(k as i32)
            / (1..k).map(|i| E_WEIGHTS[i] * d.powi(i as i32)).sum::<f64>();

        let shift = |m: usize| Complex64::from_polar(1.0, TAU * centre * m as f64 / fs);

        let am = std::array::from_fn(|m| {
            if m == 0 {
                Complex64::new(1.0, 0.0)
            } else {
                shift(m) * ((-d).powi(m as i32) * binomial(k, m))
            }
        });
        let bm = std::array::from_fn(|m| shift(m) * (norm * d.powi(m as i32) * E_WEIGHTS[m]));

        Self { centre, d, am, bm }
    }

    /// Coefficients for every band of the hearing model.
    pub fn bank() -> Vec<Self> {
        bark::centre_frequencies().iter().map(|&f| Self::new(f)).collect()
    }
}

/// Complex-coefficient recursive filter, transposed direct form II.
pub struct ComplexIir {
    b: [Complex64; ORDER + 1],
    a: [Complex64; ORDER + 1],
    state: [Complex64; ORDER],
}

impl ComplexIir {
    pub fn new(coefficients: &GammatoneCoefficients) -> Self {
        debug_assert!(coefficients.am[0] == Complex64::new(1.0, 0.0));
        let mut b = [Complex64::default(); ORDER + 1];
        b[..ORDER].copy_from_slice(&coefficients.bm);
        Self {
            b,
            a: coefficients.am,
            state: [Complex64::default(); ORDER],
        }
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> Complex64 {
        let y = self.b[0] * x + self.state[0];
        for m in 1..ORDER {
            self.state[m - 1] = self.b[m] * x - self.a[m] * y + self.state[m];
        }
        self.state[ORDER - 1] = self.b[ORDER] * x - self.a[ORDER] * y;
        y
    }

    /// Real band-pass output, twice the real part of the complex response.
    pub fn process_into(&mut self, input: &[f64], output: &mut [f64]) {
        for (y, &x) in output.iter_mut().zip(input) {
            *y = 2.0 * self.process(x).re;
        }
    }
}

/// The 53 real band-pass signals, one contiguous buffer.
#[derive(Clone, Debug)]
pub struct BandPassSignals {
    data: Vec<f64>,
    len: usize,
    padding: Padding,
    segmentation: SegmentationConfig,
}

impl BandPassSignals {
    /// Samples of `band`, on the padded time axis.
    pub fn band(&self, band: usize) -> &[f64] {
        &self.data[band * self.len..(band + 1) * self.len]
    }

    /// Padded length of each band.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn padding(&self) -> &Padding {
        &self.padding
    }

    /// Block layout the padding was sized for.
    pub fn segmentation(&self) -> &SegmentationConfig {
        &self.segmentation
    }

    pub fn bands(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.len)
    }
}

/// Filter the ear-filtered, padded signal through all bands.
pub fn filter_bank(
    input: &[f64],
    padding: Padding,
    segmentation: &SegmentationConfig,
    parallel: bool,
) -> BandPassSignals {
    debug_assert_eq!(input.len(), padding.total);
    let len = input.len();
    let coefficients = GammatoneCoefficients::bank();
    let mut data = vec![0.0; len * N_BANDS];

    let run = |(band, out): (usize, &mut [f64])| {
        let mut filter = ComplexIir::new(&coefficients[band]);
        filter.process_into(input, out);
    };
    if parallel {
        data.par_chunks_mut(len).enumerate().for_each(run);
    } else {
        data.chunks_mut(len).enumerate().for_each(run);
    }

    BandPassSignals {
        data,
        len,
        padding,
        segmentation: segmentation.clone(),
    }
}
