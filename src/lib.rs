//! # Spectral Guide
//!
//! Real-time spectral frame classification for audio time-stretching. Each
//! analysis frame's magnitude spectrum is classified bin by bin as harmonic,
//! percussive or residual, and the classification is reduced to the edges
//! of the percussive frequency band.
//!
//! ## Features
//!
//! - **Order-statistic filters**: moving median/percentile, histogram
//!   median/mode, peak and trough location, all allocation-free after
//!   construction
//! - **Bin classification**: time-direction versus frequency-direction
//!   median comparison with lag alignment
//! - **Segmentation**: percussive band edges in Hz, denoised with a modal filter
//!
//! ## Quick Start
//!
//! ```
//! use spectral_guide::{ChannelGuide, GuideConfig};
//!
//! let config = GuideConfig::new(2048, 48000.0);
//! let mut guide = ChannelGuide::new(&config)?;
//!
//! // One magnitude frame per analysis hop, from your own FFT stage
//! let magnitudes = vec![0.0f64; 1025];
//! guide.advance(&magnitudes);
//!
//! let segmentation = guide.segmentation();
//! println!("percussive below {:.0} Hz", segmentation.percussive_below);
//! # Ok::<(), spectral_guide::GuideError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Magnitudes → BinClassifier → Classification[] → BinSegmenter → Segmentation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classification;
pub mod config;
pub mod error;
pub mod filters;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use classification::{
    BinClassifier, BinSegmenter, ChannelGuide, Classification, ClassifierParameters,
    Segmentation, SegmenterParameters,
};
pub use config::GuideConfig;
pub use error::GuideError;

/// Classification and segmentation of one analysis frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGuide {
    /// Per-bin classification
    pub classification: Vec<Classification>,
    /// Percussive band edges
    pub segmentation: Segmentation,
}

/// Classify a whole magnitude spectrogram offline
///
/// Runs a fresh [`ChannelGuide`] over `frames` and returns, for every frame,
/// the classification and segmentation computed when that frame was fed in.
/// Only the first `bin_count` values of each frame are used.
///
/// # Arguments
///
/// * `frames` - Magnitude spectra, one per analysis hop
/// * `config` - Pipeline configuration
///
/// # Errors
///
/// Returns `GuideError::InvalidInput` if `frames` is empty or any frame is
/// shorter than the configured bin count, and `GuideError::InvalidParameter`
/// if the configuration is invalid.
///
/// # Example
///
/// ```
/// use spectral_guide::{classify_frames, GuideConfig};
///
/// let frames = vec![vec![0.0f64; 513]; 4];
/// let guides = classify_frames(&frames, &GuideConfig::new(1024, 44100.0))?;
/// assert_eq!(guides.len(), 4);
/// # Ok::<(), spectral_guide::GuideError>(())
/// ```
pub fn classify_frames(
    frames: &[Vec<f64>],
    config: &GuideConfig,
) -> Result<Vec<FrameGuide>, GuideError> {
    if frames.is_empty() {
        return Err(GuideError::InvalidInput("Empty spectrogram".to_string()));
    }

    let mut guide = ChannelGuide::new(config)?;
    let bin_count = guide.bin_count();

    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.len() < bin_count)
    {
        return Err(GuideError::InvalidInput(format!(
            "Frame {} has {} bins, expected at least {}",
            index,
            frame.len(),
            bin_count
        )));
    }

    log::debug!(
        "Classifying {} frames: {} bins, fft={}, {} Hz",
        frames.len(),
        bin_count,
        config.effective_fft_size(),
        config.sample_rate
    );

    let guides: Vec<FrameGuide> = frames
        .iter()
        .map(|frame| {
            guide.advance(frame);
            FrameGuide {
                classification: guide.next_classification().to_vec(),
                segmentation: guide.next_segmentation(),
            }
        })
        .collect();

    let percussive_frames = guides
        .iter()
        .filter(|g| g.segmentation.percussive_below > 0.0)
        .count();
    log::debug!(
        "Classified {} frames, {} with low percussive content",
        guides.len(),
        percussive_frames
    );

    Ok(guides)
}
