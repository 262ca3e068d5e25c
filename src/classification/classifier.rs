//! Per-bin harmonic / percussive / residual classification
//!
//! Each bin is smoothed twice:
//! - along time, by a per-bin moving median (`hf`)
//! - along frequency, by one moving median run across the current frame (`vf`)
//!
//! Energy that is stable over time but peaky over frequency has a large
//! `hf / vf` ratio and is harmonic; energy that is broadband but short-lived
//! has a large `vf / hf` ratio and is percussive. Everything else is residual.
//!
//! The time-direction median lags its input by half a window, so the
//! frequency-direction result is delayed by `horizontal_filter_lag` frames
//! through a small queue before the two are compared.
//!
//! # Example
//!
//! ```
//! use spectral_guide::classification::{BinClassifier, Classification, ClassifierParameters};
//!
//! let params = ClassifierParameters::new(4, 3, 0, 3, 2.0, 2.0);
//! let mut classifier = BinClassifier::new(params)?;
//! let mut out = vec![Classification::Residual; 4];
//! classifier.classify(&[0.0, 1.0, 0.0, 0.0], &mut out);
//! assert_eq!(out[1], Classification::Harmonic);
//! # Ok::<(), spectral_guide::GuideError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::GuideError;
use crate::filters::{MovingMedian, MovingMedianStack, RingBuffer};

/// Guards the ratio tests against division by zero
const EPSILON: f64 = 1e-7;

/// Classification of one frequency bin in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Stable over time, peaky over frequency
    Harmonic,
    /// Broadband and short-lived
    Percussive,
    /// Neither
    #[default]
    Residual,
}

/// Classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParameters {
    /// Number of bins per frame
    pub bin_count: usize,

    /// Time-direction median length in frames
    pub horizontal_filter_length: usize,

    /// Delay applied to the frequency-direction median, in frames
    /// (usually `horizontal_filter_length / 2`)
    pub horizontal_filter_lag: usize,

    /// Frequency-direction median length in bins
    pub vertical_filter_length: usize,

    /// `hf / vf` ratio above which a bin is harmonic
    pub harmonic_threshold: f64,

    /// `vf / hf` ratio above which a bin is percussive
    pub percussive_threshold: f64,
}

impl ClassifierParameters {
    /// Build a parameter set
    pub fn new(
        bin_count: usize,
        horizontal_filter_length: usize,
        horizontal_filter_lag: usize,
        vertical_filter_length: usize,
        harmonic_threshold: f64,
        percussive_threshold: f64,
    ) -> Self {
        Self {
            bin_count,
            horizontal_filter_length,
            horizontal_filter_lag,
            vertical_filter_length,
            harmonic_threshold,
            percussive_threshold,
        }
    }

    /// Check the parameters can build a classifier
    pub fn validate(&self) -> Result<(), GuideError> {
        if self.bin_count == 0 {
            return Err(GuideError::InvalidParameter(
                "Classifier bin count must be > 0".to_string(),
            ));
        }
        if self.horizontal_filter_length == 0 || self.vertical_filter_length == 0 {
            return Err(GuideError::InvalidParameter(format!(
                "Classifier filter lengths must be > 0, got horizontal={} vertical={}",
                self.horizontal_filter_length, self.vertical_filter_length
            )));
        }
        for (name, threshold) in [
            ("harmonic", self.harmonic_threshold),
            ("percussive", self.percussive_threshold),
        ] {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(GuideError::InvalidParameter(format!(
                    "Classifier {} threshold must be finite and non-negative, got {}",
                    name, threshold
                )));
            }
        }
        Ok(())
    }
}

/// Streaming bin classifier, one magnitude frame per call
#[derive(Debug, Clone)]
pub struct BinClassifier {
    parameters: ClassifierParameters,
    horizontal: MovingMedianStack<f64>,
    vertical: MovingMedian<f64>,
    hf: Vec<f64>,
    // Frequency-smoothed frames; `current` is written each frame and the
    // rest are held in `lag_queue` by index
    vf_buffers: Vec<Vec<f64>>,
    current: usize,
    lag_queue: Option<RingBuffer<usize>>,
}

impl BinClassifier {
    /// Create a classifier, allocating every buffer it will use
    ///
    /// # Errors
    ///
    /// Returns `GuideError::InvalidParameter` if `parameters` fail
    /// [`ClassifierParameters::validate`].
    pub fn new(parameters: ClassifierParameters) -> Result<Self, GuideError> {
        parameters.validate()?;

        log::debug!(
            "Creating bin classifier: {} bins, horizontal={} (lag {}), vertical={}, thresholds h={:.2} p={:.2}",
            parameters.bin_count,
            parameters.horizontal_filter_length,
            parameters.horizontal_filter_lag,
            parameters.vertical_filter_length,
            parameters.harmonic_threshold,
            parameters.percussive_threshold
        );

        let n = parameters.bin_count;
        let lag = parameters.horizontal_filter_lag;

        let mut classifier = Self {
            parameters,
            horizontal: MovingMedianStack::new(n, parameters.horizontal_filter_length),
            vertical: MovingMedian::new(parameters.vertical_filter_length),
            hf: vec![0.0; n],
            vf_buffers: vec![vec![0.0; n]; lag + 1],
            current: 0,
            lag_queue: if lag > 0 {
                Some(RingBuffer::new(lag))
            } else {
                None
            },
        };
        classifier.reset();
        Ok(classifier)
    }

    /// Parameters this classifier was built with
    pub fn parameters(&self) -> &ClassifierParameters {
        &self.parameters
    }

    /// Forget all history: empty the time filters and refill the lag queue
    /// with silent frames
    pub fn reset(&mut self) {
        for buffer in &mut self.vf_buffers {
            buffer.fill(0.0);
        }
        self.current = 0;
        if let Some(queue) = &mut self.lag_queue {
            queue.reset();
            for index in 1..self.vf_buffers.len() {
                queue.write_one(index);
            }
        }
        self.horizontal.reset();
        self.vertical.reset();
        self.hf.fill(0.0);
    }

    /// Classify one frame
    ///
    /// `magnitudes` and `classification` must both hold at least `bin_count`
    /// values; only the first `bin_count` are read or written.
    pub fn classify(&mut self, magnitudes: &[f64], classification: &mut [Classification]) {
        let n = self.parameters.bin_count;

        for (i, &magnitude) in magnitudes[..n].iter().enumerate() {
            self.horizontal.push(i, magnitude);
            self.hf[i] = self.horizontal.get(i);
        }

        let vf = &mut self.vf_buffers[self.current];
        vf.copy_from_slice(&magnitudes[..n]);
        MovingMedian::filter(&mut self.vertical, vf);

        if let Some(queue) = &mut self.lag_queue {
            let lagged = queue.read_one();
            queue.write_one(self.current);
            self.current = lagged;
        }

        let vf = &self.vf_buffers[self.current];
        let harmonic_threshold = self.parameters.harmonic_threshold;
        let percussive_threshold = self.parameters.percussive_threshold;

        for ((out, &h), &v) in classification[..n].iter_mut().zip(&self.hf).zip(vf) {
            *out = if h / (v + EPSILON) > harmonic_threshold {
                Classification::Harmonic
            } else if v / (h + EPSILON) > percussive_threshold {
                Classification::Percussive
            } else {
                Classification::Residual
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Classification::{Harmonic as H, Percussive as P, Residual as R};

    #[test]
    fn test_invalid_parameters() {
        assert!(BinClassifier::new(ClassifierParameters::new(0, 3, 1, 3, 2.0, 2.0)).is_err());
        assert!(BinClassifier::new(ClassifierParameters::new(4, 0, 0, 3, 2.0, 2.0)).is_err());
        assert!(BinClassifier::new(ClassifierParameters::new(4, 3, 1, 0, 2.0, 2.0)).is_err());
        assert!(BinClassifier::new(ClassifierParameters::new(4, 3, 1, 3, f64::NAN, 2.0)).is_err());
        assert!(BinClassifier::new(ClassifierParameters::new(4, 3, 1, 3, 2.0, -1.0)).is_err());
    }

    #[test]
    fn test_no_lag_classifies_current_frame() {
        let params = ClassifierParameters::new(5, 3, 0, 3, 2.0, 2.0);
        let mut classifier = BinClassifier::new(params).unwrap();
        let mut out = vec![R; 5];

        // An isolated line: stable in time, peaky in frequency
        classifier.classify(&[0.0, 0.0, 1.0, 0.0, 0.0], &mut out);
        assert_eq!(out, vec![R, R, H, R, R]);
        classifier.classify(&[0.0, 0.0, 1.0, 0.0, 0.0], &mut out);
        assert_eq!(out, vec![R, R, H, R, R]);

        // Sudden broadband frame: the time median still holds the previous
        // frames, the frequency median sees the burst
        classifier.classify(&[1.0, 1.0, 1.0, 1.0, 1.0], &mut out);
        assert_eq!(out, vec![P, P, R, P, P]);
    }

    #[test]
    fn test_lag_delays_frequency_median() {
        let params = ClassifierParameters::new(4, 3, 2, 3, 2.0, 2.0);
        let mut classifier = BinClassifier::new(params).unwrap();
        let mut out = vec![R; 4];
        let burst = [1.0, 1.0, 1.0, 1.0];
        let silence = [0.0, 0.0, 0.0, 0.0];

        // The queue starts out silent, so the burst first reads as harmonic
        classifier.classify(&burst, &mut out);
        assert_eq!(out, vec![H; 4]);
        classifier.classify(&silence, &mut out);
        assert_eq!(out, vec![R; 4]);
        // The burst's frequency median arrives two frames late, after the
        // time median has returned to silence
        classifier.classify(&silence, &mut out);
        assert_eq!(out, vec![P; 4]);
        classifier.classify(&silence, &mut out);
        assert_eq!(out, vec![R; 4]);
    }

    #[test]
    fn test_reset_clears_history() {
        let params = ClassifierParameters::new(4, 3, 1, 3, 2.0, 2.0);
        let mut classifier = BinClassifier::new(params).unwrap();
        let mut out = vec![R; 4];

        classifier.classify(&[1.0, 1.0, 1.0, 1.0], &mut out);
        classifier.reset();
        classifier.classify(&[0.0, 0.0, 0.0, 0.0], &mut out);
        // Without the reset the queued burst would now read as percussive
        assert_eq!(out, vec![R; 4]);
    }

    #[test]
    fn test_extra_input_is_ignored() {
        let params = ClassifierParameters::new(3, 1, 0, 1, 2.0, 2.0);
        let mut classifier = BinClassifier::new(params).unwrap();
        let mut out = vec![H; 5];
        classifier.classify(&[1.0, 1.0, 1.0, 50.0, 50.0], &mut out);
        assert_eq!(out, vec![R, R, R, H, H]);
    }
}
