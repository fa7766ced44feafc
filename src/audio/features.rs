use super::bark::{self, N_BANDS};
use super::segment::{BandSlot, SegmentPlan};

/// Specific loudness of every band in sone per Bark, one value per block.
///
/// Bands have different block counts.  All values sit in one buffer, indexed by the
/// per-band [`BandSlot`] table.
#[derive(Clone, Debug)]
pub struct SpecificLoudness {
    values: Vec<f64>,
    plan: SegmentPlan,
}

impl SpecificLoudness {
    pub(crate) fn new(values: Vec<f64>, plan: SegmentPlan) -> Self {
        debug_assert_eq!(values.len(), plan.total_blocks());
        Self { values, plan }
    }

    /// Values of `band` in block order.
    pub fn band(&self, band: usize) -> &[f64] {
        &self.values[self.plan.slot(band).values()]
    }

    pub fn slot(&self, band: usize) -> &BandSlot {
        self.plan.slot(band)
    }

    pub fn plan(&self) -> &SegmentPlan {
        &self.plan
    }

    /// Block time stamps of `band` in seconds.
    pub fn times(&self, band: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.plan.slot(band).blocks).map(move |l| self.plan.block_time(band, l))
    }

    pub fn bark_axis(&self) -> &'static [f64; N_BANDS] {
        bark::bark_axis()
    }

    /// `(bark, values)` for every band.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        (0..N_BANDS).map(move |band| (bark::bark(band), self.band(band)))
    }

    /// Largest value over all bands and blocks.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Mean over blocks of each band.
    pub fn band_means(&self) -> [f64; N_BANDS] {
        std::array::from_fn(|band| {
            let values = self.band(band);
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        })
    }

    /// All values, band after band.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
