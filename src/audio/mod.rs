pub mod analysis;
pub mod bark;
pub mod ear;
pub mod features;
pub mod gammatone;
pub mod loudness;
pub mod segment;
pub mod signal;
