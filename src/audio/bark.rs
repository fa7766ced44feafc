//! Critical-band-rate layout of the hearing model: 53 half-Bark bands from 0.5 to 26.5 Bark.

use std::sync::LazyLock;

/// Number of auditory filter bands.
pub const N_BANDS: usize = 53;

/// Bark spacing between neighbouring bands.
pub const BARK_STEP: f64 = 0.5;

/// Bandwidth of the auditory filters at very low frequencies (Hz).
pub const DELTA_F_0: f64 = 81.9289;

/// Slope of the auditory filter bandwidth over centre frequency.
pub const C_BANDWIDTH: f64 = 0.1618;

/// Threshold in quiet per band, in the units of the compressive nonlinearity output.
pub const LTQ_Z: [f64; N_BANDS] = [
    0.3310, 0.1625, 0.1051, 0.0757, 0.0576, 0.0453, 0.0365, 0.0298, 0.0247, 0.0207, 0.0176,
    0.0151, 0.0131, 0.0115, 0.0103, 0.0093, 0.0086, 0.0081, 0.0077, 0.0074, 0.0073, 0.0072,
    0.0071, 0.0072, 0.0073, 0.0074, 0.0076, 0.0079, 0.0082, 0.0086, 0.0092, 0.0100, 0.0109,
    0.0122, 0.0138, 0.0157, 0.0172, 0.0180, 0.0180, 0.0177, 0.0176, 0.0177, 0.0182, 0.0190,
    0.0202, 0.0217, 0.0237, 0.0263, 0.0296, 0.0339, 0.0398, 0.0485, 0.0622,
];

static CENTRE_FREQUENCIES: LazyLock<[f64; N_BANDS]> =
    LazyLock::new(|| std::array::from_fn(|band| centre_frequency(bark(band))));

static BARK_AXIS: LazyLock<[f64; N_BANDS]> = LazyLock::new(|| std::array::from_fn(bark));

/// Critical band rate of `band` (0-based).
#[inline]
pub fn bark(band: usize) -> f64 {
    (band + 1) as f64 * BARK_STEP
}

/// Centre frequency in Hz for critical band rate `z`.
pub fn centre_frequency(z: f64) -> f64 {
    (DELTA_F_0 / C_BANDWIDTH) * (C_BANDWIDTH * z).sinh()
}

/// Auditory filter bandwidth in Hz at centre frequency `f`.
pub fn bandwidth(f: f64) -> f64 {
    DELTA_F_0.hypot(C_BANDWIDTH * f)
}

/// The 53 band centre frequencies, strictly increasing.
pub fn centre_frequencies() -> &'static [f64; N_BANDS] {
    &CENTRE_FREQUENCIES
}

/// Bark value of every band: `[0.5, 1.0, ..., 26.5]`.
pub fn bark_axis() -> &'static [f64; N_BANDS] {
    &BARK_AXIS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn centre_frequencies_increase() {
        let f = centre_frequencies();
        assert!(f.windows(2).all(|w| w[0] < w[1]));
        assert!(f[0] > 40.0 && f[0] < 42.0);
        assert!(f[N_BANDS - 1] < 24_000.0);
    }

    #[test]
    fn band_26_closed_form() {
        // z = 13.5
        let expected = (81.9289 / 0.1618) * (0.1618f64 * 13.5).sinh();
        assert_abs_diff_eq!(centre_frequencies()[26], expected, epsilon = 1e-9);
        assert_abs_diff_eq!(centre_frequencies()[26], 2220.858, epsilon = 0.01);
    }

    #[test]
    fn bark_axis_spans_half_bark_steps() {
        let axis = bark_axis();
        assert_eq!(axis[0], 0.5);
        assert_eq!(axis[26], 13.5);
        assert_eq!(axis[N_BANDS - 1], 26.5);
    }

    #[test]
    fn bandwidth_approaches_floor_at_low_frequency() {
        assert_abs_diff_eq!(bandwidth(0.0), DELTA_F_0, epsilon = 1e-12);
        assert!(bandwidth(1000.0) > bandwidth(100.0));
    }

    #[test]
    fn ltq_is_positive() {
        assert!(LTQ_Z.iter().all(|&v| v > 0.0));
    }
}
