//! Spectral bin classification and percussive band segmentation
//!
//! - Bin classifier (harmonic / percussive / residual per bin)
//! - Bin segmenter (percussive band edges per frame)
//! - Channel guide (classifier + segmenter with one frame of readahead)

pub mod channel;
pub mod classifier;
pub mod segmenter;

pub use channel::ChannelGuide;
pub use classifier::{BinClassifier, Classification, ClassifierParameters};
pub use segmenter::{
    bin_for_frequency, frequency_for_bin, BinSegmenter, Segmentation, SegmenterParameters,
};
