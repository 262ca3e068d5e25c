//! Configuration for the per-channel classification pipeline

use serde::{Deserialize, Serialize};

use crate::classification::{ClassifierParameters, SegmenterParameters};
use crate::error::GuideError;

/// Smallest FFT size the classification scale may use
pub const MIN_CLASSIFICATION_FFT_SIZE: usize = 1024;

/// Bins above this frequency are not classified
pub const MAX_CLASSIFIER_FREQUENCY: f64 = 16000.0;

/// Modal filter length applied by the segmenter, in bins
pub const SEGMENTER_FILTER_LENGTH: usize = 18;

/// Guide configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    /// FFT size of the classification scale (default: 2048)
    /// Values below 1024 are rounded up
    pub classification_fft_size: usize,

    /// Sample rate in Hz (default: 48000.0)
    pub sample_rate: f64,

    /// Single-window mode (default: false)
    /// Uses a shorter time-direction median so classification reacts faster
    pub single_window: bool,

    /// Time-direction median length in frames (default: 9, or 7 in single-window mode)
    pub horizontal_filter_length: Option<usize>,

    /// Frequency-direction median length in bins (default: 10)
    pub vertical_filter_length: usize,

    /// Harmonic ratio threshold (default: 2.0)
    pub harmonic_threshold: f64,

    /// Percussive ratio threshold (default: 2.0)
    pub percussive_threshold: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            classification_fft_size: 2048,
            sample_rate: 48000.0,
            single_window: false,
            horizontal_filter_length: None,
            vertical_filter_length: 10,
            harmonic_threshold: 2.0,
            percussive_threshold: 2.0,
        }
    }
}

impl GuideConfig {
    /// Default configuration for a given FFT size and sample rate
    pub fn new(classification_fft_size: usize, sample_rate: f64) -> Self {
        Self {
            classification_fft_size,
            sample_rate,
            ..Self::default()
        }
    }

    /// Check the configuration before deriving component parameters
    pub fn validate(&self) -> Result<(), GuideError> {
        if self.classification_fft_size == 0 {
            return Err(GuideError::InvalidParameter(
                "Classification FFT size must be > 0".to_string(),
            ));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(GuideError::InvalidParameter(format!(
                "Sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// FFT size actually used for classification
    pub fn effective_fft_size(&self) -> usize {
        self.classification_fft_size.max(MIN_CLASSIFICATION_FFT_SIZE)
    }

    /// Number of classified bins: those up to 16 kHz, or Nyquist if lower
    pub fn bin_count(&self) -> usize {
        let max_frequency = MAX_CLASSIFIER_FREQUENCY.min(self.sample_rate / 2.0);
        (self.effective_fft_size() as f64 * max_frequency / self.sample_rate).floor() as usize
    }

    /// Time-direction median length in frames
    pub fn effective_horizontal_filter_length(&self) -> usize {
        let default = if self.single_window { 7 } else { 9 };
        self.horizontal_filter_length.unwrap_or(default)
    }

    /// Classifier parameters derived from this configuration
    pub fn classifier_parameters(&self) -> ClassifierParameters {
        ClassifierParameters::new(
            self.bin_count(),
            self.effective_horizontal_filter_length(),
            1,
            self.vertical_filter_length,
            self.harmonic_threshold,
            self.percussive_threshold,
        )
    }

    /// Segmenter parameters derived from this configuration
    pub fn segmenter_parameters(&self) -> SegmenterParameters {
        SegmenterParameters::new(
            self.effective_fft_size(),
            self.bin_count(),
            self.sample_rate,
            SEGMENTER_FILTER_LENGTH,
        )
    }

    /// Validate and derive both component parameter sets
    ///
    /// # Errors
    ///
    /// Returns `GuideError::InvalidParameter` if the configuration or either
    /// derived parameter set is invalid.
    pub fn resolve(&self) -> Result<(ClassifierParameters, SegmenterParameters), GuideError> {
        self.validate()?;

        if self.classification_fft_size < MIN_CLASSIFICATION_FFT_SIZE {
            log::info!(
                "Rounding classification FFT size up from {} to {}",
                self.classification_fft_size,
                MIN_CLASSIFICATION_FFT_SIZE
            );
        }

        let classifier = self.classifier_parameters();
        let segmenter = self.segmenter_parameters();
        classifier.validate()?;
        segmenter.validate()?;
        Ok((classifier, segmenter))
    }
}
