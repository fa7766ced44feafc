use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::audio::bark::N_BANDS;
use crate::error::LoudnessError;

/// Per-band block and hop sizes in samples. Scalars are broadcast to all bands once, here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentationConfig {
    block: [usize; N_BANDS],
    hop: [usize; N_BANDS],
}

impl SegmentationConfig {
    /// Accepts one value (broadcast) or one value per band for each of `block` and `hop`.
    pub fn from_slices(block: &[usize], hop: &[usize]) -> Result<Self, LoudnessError> {
        let block = broadcast("block size", block)?;
        let hop = broadcast("hop size", hop)?;
        Ok(Self { block, hop })
    }

    pub fn uniform(block: usize, hop: usize) -> Result<Self, LoudnessError> {
        Self::from_slices(&[block], &[hop])
    }

    /// 2048 / 1024 in every band.
    pub fn loudness() -> Self {
        Self {
            block: [2048; N_BANDS],
            hop: [1024; N_BANDS],
        }
    }

    /// Four Bark regimes, longer blocks at low critical band rates.
    pub fn tonality() -> Self {
        let regime = |band: usize| match band {
            0..=2 => (8192, 2048),
            3..=7 => (4096, 1024),
            8..=15 => (2048, 512),
            _ => (1024, 256),
        };
        Self {
            block: std::array::from_fn(|band| regime(band).0),
            hop: std::array::from_fn(|band| regime(band).1),
        }
    }

    /// 16384 / 4096 in every band.
    pub fn roughness() -> Self {
        Self {
            block: [16384; N_BANDS],
            hop: [4096; N_BANDS],
        }
    }

    pub fn preset(name: &str) -> Result<Self, LoudnessError> {
        match name {
            "loudness" => Ok(Self::loudness()),
            "tonality" => Ok(Self::tonality()),
            "roughness" => Ok(Self::roughness()),
            other => Err(LoudnessError::UnknownPreset(other.to_string())),
        }
    }

    pub fn block(&self, band: usize) -> usize {
        self.block[band]
    }

    pub fn hop(&self, band: usize) -> usize {
        self.hop[band]
    }

    pub fn blocks(&self) -> &[usize; N_BANDS] {
        &self.block
    }

    pub fn hops(&self) -> &[usize; N_BANDS] {
        &self.hop
    }

    pub fn max_block(&self) -> usize {
        self.block.iter().copied().max().unwrap_or(0)
    }

    pub fn max_hop(&self) -> usize {
        self.hop.iter().copied().max().unwrap_or(0)
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self::loudness()
    }
}

fn broadcast(what: &'static str, values: &[usize]) -> Result<[usize; N_BANDS], LoudnessError> {
    let out: [usize; N_BANDS] = match values.len() {
        1 => [values[0]; N_BANDS],
        N_BANDS => std::array::from_fn(|band| values[band]),
        len => return Err(LoudnessError::BandCount { what, len }),
    };
    if let Some(band) = out.iter().position(|&v| v == 0) {
        return Err(LoudnessError::ZeroSize { what, band });
    }
    Ok(out)
}

/// Runtime options for [`crate::audio::analysis::analyze`].
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub segmentation: SegmentationConfig,
    /// Fan the per-band work out over the rayon pool.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::loudness(),
            parallel: true,
        }
    }
}

/// On-disk configuration, TOML.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub segmentation: SegmentationSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// A scalar applied to every band, or one entry per band.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Sizes {
    Scalar(usize),
    PerBand(Vec<usize>),
}

impl Sizes {
    fn as_slice(&self) -> &[usize] {
        match self {
            Sizes::Scalar(v) => std::slice::from_ref(v),
            Sizes::PerBand(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SegmentationSection {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub block_size: Option<Sizes>,
    #[serde(default)]
    pub hop_size: Option<Sizes>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for SegmentationSection {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            block_size: None,
            hop_size: None,
        }
    }
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

fn default_preset() -> String { "loudness".into() }
fn default_parallel() -> bool { true }

impl SegmentationSection {
    /// Preset first, then explicit sizes on top of it.
    pub fn resolve(&self) -> Result<SegmentationConfig, LoudnessError> {
        let base = SegmentationConfig::preset(&self.preset)?;
        if self.block_size.is_none() && self.hop_size.is_none() {
            return Ok(base);
        }
        if self.block_size.is_none() || self.hop_size.is_none() {
            log::warn!(
                "only one of block_size/hop_size set, the other comes from preset {}",
                self.preset
            );
        }
        let block = self
            .block_size
            .as_ref()
            .map_or(base.blocks().as_slice(), Sizes::as_slice);
        let hop = self
            .hop_size
            .as_ref()
            .map_or(base.hops().as_slice(), Sizes::as_slice);
        SegmentationConfig::from_slices(block, hop)
    }
}

impl Config {
    pub fn analysis(&self) -> Result<AnalysisConfig, LoudnessError> {
        Ok(AnalysisConfig {
            segmentation: self.segmentation.resolve()?,
            parallel: self.analysis.parallel,
        })
    }
}

pub fn parse_config(content: &str) -> Result<Config, LoudnessError> {
    Ok(toml::from_str(content)?)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_broadcasts_to_all_bands() {
        let seg = SegmentationConfig::uniform(4096, 512).unwrap();
        assert!(seg.blocks().iter().all(|&b| b == 4096));
        assert!(seg.hops().iter().all(|&h| h == 512));
        assert_eq!(seg.max_block(), 4096);
        assert_eq!(seg.max_hop(), 512);
    }

    #[test]
    fn rejects_bad_lengths() {
        let err = SegmentationConfig::from_slices(&[1024, 2048], &[512]).unwrap_err();
        assert!(matches!(err, LoudnessError::BandCount { what: "block size", len: 2 }));
        let err = SegmentationConfig::from_slices(&[1024], &[]).unwrap_err();
        assert!(matches!(err, LoudnessError::BandCount { what: "hop size", len: 0 }));
    }

    #[test]
    fn rejects_zero_sizes() {
        let mut hop = vec![256; N_BANDS];
        hop[7] = 0;
        let err = SegmentationConfig::from_slices(&[1024], &hop).unwrap_err();
        assert!(matches!(err, LoudnessError::ZeroSize { band: 7, .. }));
    }

    #[test]
    fn tonality_regimes() {
        let seg = SegmentationConfig::tonality();
        assert_eq!((seg.block(0), seg.hop(0)), (8192, 2048));
        assert_eq!((seg.block(3), seg.hop(3)), (4096, 1024));
        assert_eq!((seg.block(15), seg.hop(15)), (2048, 512));
        assert_eq!((seg.block(16), seg.hop(16)), (1024, 256));
        assert_eq!((seg.block(52), seg.hop(52)), (1024, 256));
    }

    #[test]
    fn unknown_preset() {
        assert!(matches!(
            SegmentationConfig::preset("sharpness"),
            Err(LoudnessError::UnknownPreset(_))
        ));
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = parse_config("").unwrap();
        let analysis = config.analysis().unwrap();
        assert_eq!(analysis.segmentation, SegmentationConfig::loudness());
        assert!(analysis.parallel);
    }

    #[test]
    fn toml_scalar_and_list() {
        let hops: Vec<String> = (0..N_BANDS).map(|_| "512".to_string()).collect();
        let text = format!(
            "[segmentation]\nblock_size = 4096\nhop_size = [{}]\n[analysis]\nparallel = false\n",
            hops.join(", ")
        );
        let analysis = parse_config(&text).unwrap().analysis().unwrap();
        assert_eq!(analysis.segmentation, SegmentationConfig::uniform(4096, 512).unwrap());
        assert!(!analysis.parallel);
    }

    #[test]
    fn toml_preset_with_override() {
        let text = "[segmentation]\npreset = \"tonality\"\nhop_size = 128\n";
        let seg = parse_config(text).unwrap().segmentation.resolve().unwrap();
        assert_eq!(seg.block(0), 8192);
        assert_eq!(seg.block(52), 1024);
        assert!(seg.hops().iter().all(|&h| h == 128));
    }

    #[test]
    fn toml_wrong_band_count() {
        let text = "[segmentation]\nblock_size = [1024, 2048, 4096]\nhop_size = 512\n";
        let err = parse_config(text).unwrap().analysis().unwrap_err();
        assert!(matches!(err, LoudnessError::BandCount { len: 3, .. }));
    }
}
