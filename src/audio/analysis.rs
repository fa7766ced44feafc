use rayon::prelude::*;

use super::ear;
use super::features::SpecificLoudness;
use super::gammatone::{self, BandPassSignals};
use super::loudness;
use super::segment::SegmentPlan;
use super::signal::{self, Padding, Signal};
use crate::config::{AnalysisConfig, SegmentationConfig};

/// Ear filter and gammatone bank over the faded, padded signal.
///
/// The padding is sized for `segmentation`, which travels with the result so that segmentation
/// uses the same layout.  Envelope analysis can take the band signals as they are.
pub fn band_pass(signal: &Signal, segmentation: &SegmentationConfig, parallel: bool) -> BandPassSignals {
    let padding = Padding::new(signal.len(), segmentation);

    log::info!(
        "Pass 1: Fade-in and padding ({} samples -> {} padded)...",
        signal.len(),
        padding.total
    );
    let mut padded = signal::preprocess(signal, &padding);

    log::info!("Pass 2: Outer and middle ear filter...");
    ear::apply(&mut padded);

    log::info!("Pass 3: Gammatone filter bank ({} bands)...", super::bark::N_BANDS);
    gammatone::filter_bank(&padded, padding, segmentation, parallel)
}

/// Specific loudness of `signal` per band and block.
pub fn analyze(signal: &Signal, config: &AnalysisConfig) -> SpecificLoudness {
    let bands = band_pass(signal, &config.segmentation, config.parallel);
    segment_and_compress(&bands, config.parallel)
}

/// Segment band-pass signals and run RMS, nonlinearity and threshold clipping per block.
pub fn segment_and_compress(bands: &BandPassSignals, parallel: bool) -> SpecificLoudness {
    let plan = SegmentPlan::new(bands.segmentation(), *bands.padding());
    debug_assert_eq!(bands.len(), plan.padding().total);
    log::info!(
        "Pass 4: Segmentation and compression ({} blocks)...",
        plan.total_blocks()
    );

    let mut values = vec![0.0; plan.total_blocks()];
    let outputs = split_bands(&mut values, &plan);

    let run = |(band, out): (usize, &mut [f64])| {
        log::debug!(
            "band {band}: {} blocks of {} hop {} from {}",
            plan.slot(band).blocks,
            plan.slot(band).block_size,
            plan.slot(band).hop_size,
            plan.slot(band).start
        );
        loudness::specific_loudness(band, plan.blocks(band, bands.band(band)), out);
    };
    if parallel {
        outputs.into_par_iter().enumerate().for_each(run);
    } else {
        outputs.into_iter().enumerate().for_each(run);
    }

    let loudness = SpecificLoudness::new(values, plan);
    log::info!("Peak specific loudness: {:.4} sone/Bark", loudness.max());
    loudness
}

/// Disjoint mutable views of each band's output slot.
fn split_bands<'a>(values: &'a mut [f64], plan: &SegmentPlan) -> Vec<&'a mut [f64]> {
    let mut rest = values;
    plan.slots()
        .iter()
        .map(|slot| {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(slot.blocks);
            rest = tail;
            head
        })
        .collect()
}
