use std::ops::Range;

use super::bark::N_BANDS;
use super::signal::{Padding, SAMPLE_RATE};
use crate::config::SegmentationConfig;

/// Where one band's blocks live, both in the padded signal and in the output arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandSlot {
    /// First value of this band in the output arena.
    pub offset: usize,
    /// Number of blocks.
    pub blocks: usize,
    pub block_size: usize,
    pub hop_size: usize,
    /// Padded-signal index of the first sample of block 0.
    pub start: usize,
}

impl BandSlot {
    /// Padded-signal indices covered by block `l`.
    #[inline]
    pub fn block_range(&self, l: usize) -> Range<usize> {
        let begin = self.start + l * self.hop_size;
        begin..begin + self.block_size
    }

    /// Last padded-signal index read by this band, exclusive.
    pub fn end(&self) -> usize {
        self.block_range(self.blocks.saturating_sub(1)).end
    }

    /// Output arena range of this band.
    pub fn values(&self) -> Range<usize> {
        self.offset..self.offset + self.blocks
    }
}

/// Block layout of all bands for one padded signal.
///
/// All bands' first blocks end on the same padded sample: bands with shorter blocks start
/// later by the difference to the largest block.  Every band's last block ends within one hop
/// of the end of the shared padded signal.
#[derive(Clone, Debug)]
pub struct SegmentPlan {
    slots: [BandSlot; N_BANDS],
    padding: Padding,
    total_blocks: usize,
}

impl SegmentPlan {
    pub fn new(segmentation: &SegmentationConfig, padding: Padding) -> Self {
        let sb_max = segmentation.max_block();
        let mut offset = 0;
        let slots = std::array::from_fn(|band| {
            let block_size = segmentation.block(band);
            let hop_size = segmentation.hop(band);
            let blocks = (padding.n_new + hop_size).div_ceil(hop_size) - 1;
            let slot = BandSlot {
                offset,
                blocks,
                block_size,
                hop_size,
                start: sb_max - block_size,
            };
            offset += blocks;
            debug_assert!(slot.end() <= padding.total);
            slot
        });
        Self {
            slots,
            padding,
            total_blocks: offset,
        }
    }

    pub fn slot(&self, band: usize) -> &BandSlot {
        &self.slots[band]
    }

    pub fn slots(&self) -> &[BandSlot; N_BANDS] {
        &self.slots
    }

    pub fn padding(&self) -> &Padding {
        &self.padding
    }

    /// Blocks summed over all bands, the output arena size.
    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    /// Time stamp of block `l` of `band` in seconds: the mean time of its samples, zero at the
    /// first sample of the unpadded signal.
    pub fn block_time(&self, band: usize, l: usize) -> f64 {
        let slot = &self.slots[band];
        let first = slot.block_range(l).start as f64 - self.padding.start as f64;
        (first + (slot.block_size - 1) as f64 / 2.0) / SAMPLE_RATE as f64
    }

    /// Split `band`'s padded signal into its blocks.
    pub fn blocks<'a>(&self, band: usize, signal: &'a [f64]) -> impl Iterator<Item = &'a [f64]> {
        let slot = self.slots[band];
        (0..slot.blocks).map(move |l| &signal[slot.block_range(l)])
    }
}
