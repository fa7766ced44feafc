use crate::config::SegmentationConfig;
use crate::error::LoudnessError;

/// The hearing model only runs at this rate. Resample before building a [`Signal`].
pub const SAMPLE_RATE: u32 = 48_000;

/// Reference sound pressure, 20 µPa.
pub const P_REF: f64 = 2e-5;

/// Length of the half-cosine fade-in applied before filtering (5 ms).
pub const FADE_IN_SAMPLES: usize = 240;

/// Mono sound pressure signal in Pascals, validated for the hearing model.
#[derive(Clone, Debug)]
pub struct Signal {
    samples: Vec<f64>,
}

impl Signal {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, LoudnessError> {
        if sample_rate != SAMPLE_RATE {
            return Err(LoudnessError::SampleRate { found: sample_rate });
        }
        if samples.is_empty() {
            return Err(LoudnessError::EmptySignal);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(LoudnessError::NonFinite { index });
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }
}

/// RMS pressure in Pa of a sound at `db_spl` dB re 20 µPa.
pub fn pascal_from_db(db_spl: f64) -> f64 {
    P_REF * 10f64.powf(db_spl / 20.0)
}

/// Zero-padding shared by every band so that their blocks stay aligned in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    /// Zeros before the first signal sample, the largest block size.
    pub start: usize,
    /// Signal plus end padding, always a multiple of the largest hop size.
    pub n_new: usize,
    /// Total padded length, `start + n_new`.
    pub total: usize,
}

impl Padding {
    pub fn new(n_samples: usize, segmentation: &SegmentationConfig) -> Self {
        let sb_max = segmentation.max_block();
        let sh_max = segmentation.max_hop();
        let n_new = sh_max * ((n_samples + sh_max + sb_max).div_ceil(sh_max) - 1);
        debug_assert!(n_new % sh_max == 0);
        debug_assert!(n_new >= n_samples);
        Self {
            start: sb_max,
            n_new,
            total: sb_max + n_new,
        }
    }

    /// Zeros appended after the last signal sample.
    pub fn end(&self, n_samples: usize) -> usize {
        self.n_new - n_samples
    }
}

/// Multiplies the first [`FADE_IN_SAMPLES`] samples by `0.5 - 0.5 cos(pi n / 240)`.
pub fn fade_in(samples: &mut [f64]) {
    let n = FADE_IN_SAMPLES.min(samples.len());
    for (i, s) in samples[..n].iter_mut().enumerate() {
        *s *= 0.5 - 0.5 * (std::f64::consts::PI * i as f64 / FADE_IN_SAMPLES as f64).cos();
    }
}

/// Fade-in and zero-pad the signal. The input is left untouched.
pub fn preprocess(signal: &Signal, padding: &Padding) -> Vec<f64> {
    let mut padded = vec![0.0; padding.total];
    let body = &mut padded[padding.start..padding.start + signal.len()];
    body.copy_from_slice(signal.samples());
    fade_in(body);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_wrong_rate() {
        let err = Signal::new(vec![0.0; 10], 44_100).unwrap_err();
        assert!(matches!(err, LoudnessError::SampleRate { found: 44_100 }));
    }

    #[test]
    fn rejects_empty_and_nan() {
        assert!(matches!(
            Signal::new(Vec::new(), SAMPLE_RATE),
            Err(LoudnessError::EmptySignal)
        ));
        assert!(matches!(
            Signal::new(vec![0.0, f64::NAN], SAMPLE_RATE),
            Err(LoudnessError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn fade_in_ramps_from_zero() {
        let mut x = vec![1.0; 500];
        fade_in(&mut x);
        assert_eq!(x[0], 0.0);
        assert_abs_diff_eq!(x[120], 0.5, epsilon = 1e-12);
        assert!(x[..240].windows(2).all(|w| w[0] <= w[1]));
        assert!(x[240..].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn fade_in_short_signal() {
        let mut x = vec![1.0; 10];
        fade_in(&mut x);
        assert_eq!(x[0], 0.0);
        assert!(x[9] < 0.02);
    }

    #[test]
    fn padding_for_loudness_preset() {
        let seg = SegmentationConfig::loudness();
        let p = Padding::new(48_000, &seg);
        assert_eq!(p.start, 2048);
        // 1024 * (ceil(51072 / 1024) - 1) = 1024 * 49
        assert_eq!(p.n_new, 50_176);
        assert_eq!(p.end(48_000), 2_176);
        assert_eq!(p.total, 2048 + 50_176);
    }

    #[test]
    fn padding_is_multiple_of_largest_hop() {
        let seg = SegmentationConfig::tonality();
        for n in [1, 100, 2047, 2048, 48_000, 100_003] {
            let p = Padding::new(n, &seg);
            assert_eq!(p.n_new % seg.max_hop(), 0);
            assert!(p.n_new >= n);
            assert_eq!(p.start, 8192);
        }
    }

    #[test]
    fn preprocess_places_signal_after_start_padding() {
        let signal = Signal::new(vec![1.0; 1000], SAMPLE_RATE).unwrap();
        let seg = SegmentationConfig::loudness();
        let p = Padding::new(signal.len(), &seg);
        let x = preprocess(&signal, &p);
        assert_eq!(x.len(), p.total);
        assert!(x[..p.start].iter().all(|&v| v == 0.0));
        assert_eq!(x[p.start + 999], 1.0);
        assert!(x[p.start + 1000..].iter().all(|&v| v == 0.0));
        // input untouched
        assert_eq!(signal.samples()[0], 1.0);
    }

    #[test]
    fn db_to_pascal() {
        assert_abs_diff_eq!(pascal_from_db(0.0), 2e-5, epsilon = 1e-18);
        assert_abs_diff_eq!(pascal_from_db(60.0), 0.02, epsilon = 1e-12);
    }
}
