/// Configuration and input errors surfaced by the hearing model.
///
/// Numerical corner cases (silent blocks, zero pressure) never show up here, they flow
/// through the pipeline as zeros.
#[derive(thiserror::Error, Debug)]
pub enum LoudnessError {
    #[error("signal is empty")]
    EmptySignal,

    #[error("sample rate must be 48000 Hz, found {found} Hz")]
    SampleRate { found: u32 },

    #[error("sample {index} is not finite")]
    NonFinite { index: usize },

    #[error("{what} needs 1 or 53 values, found {len}")]
    BandCount { what: &'static str, len: usize },

    #[error("{what} of band {band} is zero")]
    ZeroSize { what: &'static str, band: usize },

    #[error("unknown segmentation preset: {0}")]
    UnknownPreset(String),

    #[error("config parse: {0}")]
    Toml(#[from] toml::de::Error),
}
