//! Percussive band segmentation from a bin classification
//!
//! The classification is first denoised along the frequency axis with a
//! modal filter, then scanned from both ends to find the edges of the
//! percussive region:
//! - `percussive_below`: the top of a percussive run starting at the lowest bins
//! - `percussive_above`: the bottom of the highest percussive run
//! - `residual_above`: the top of the highest percussive run, above which only
//!   residual bins remain

use serde::{Deserialize, Serialize};

use super::classifier::Classification;
use crate::error::GuideError;
use crate::filters::HistogramFilter;

const HARMONIC: usize = 0;
const PERCUSSIVE: usize = 1;
const RESIDUAL: usize = 2;

/// Centre frequency of `bin` in Hz
#[inline]
pub fn frequency_for_bin(bin: usize, fft_size: usize, sample_rate: f64) -> f64 {
    bin as f64 * sample_rate / fft_size as f64
}

/// Nearest bin to frequency `f` in Hz
#[inline]
pub fn bin_for_frequency(f: f64, fft_size: usize, sample_rate: f64) -> usize {
    (f * fft_size as f64 / sample_rate).round() as usize
}

/// Frequency edges of the percussive band for one frame, in Hz
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Upper edge of a percussive run that starts at the bottom of the spectrum
    pub percussive_below: f64,
    /// Lower edge of the highest percussive run
    pub percussive_above: f64,
    /// Upper edge of the highest percussive run
    pub residual_above: f64,
}

impl Segmentation {
    /// Build a segmentation from its three edges
    pub fn new(percussive_below: f64, percussive_above: f64, residual_above: f64) -> Self {
        Self {
            percussive_below,
            percussive_above,
            residual_above,
        }
    }
}

/// Segmenter configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmenterParameters {
    /// FFT size the classified bins came from
    pub fft_size: usize,
    /// Number of classified bins per frame
    pub bin_count: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Modal filter length along the frequency axis, in bins
    pub classification_filter_length: usize,
}

impl SegmenterParameters {
    /// Build a parameter set
    pub fn new(
        fft_size: usize,
        bin_count: usize,
        sample_rate: f64,
        classification_filter_length: usize,
    ) -> Self {
        Self {
            fft_size,
            bin_count,
            sample_rate,
            classification_filter_length,
        }
    }

    /// Check the parameters can build a segmenter
    pub fn validate(&self) -> Result<(), GuideError> {
        if self.fft_size == 0 {
            return Err(GuideError::InvalidParameter(
                "Segmenter FFT size must be > 0".to_string(),
            ));
        }
        if self.bin_count == 0 {
            return Err(GuideError::InvalidParameter(
                "Segmenter bin count must be > 0".to_string(),
            ));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(GuideError::InvalidParameter(format!(
                "Segmenter sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.classification_filter_length == 0 {
            return Err(GuideError::InvalidParameter(
                "Segmenter classification filter length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Derives a [`Segmentation`] from each frame's classification
#[derive(Debug, Clone)]
pub struct BinSegmenter {
    parameters: SegmenterParameters,
    numeric: Vec<usize>,
    class_filter: HistogramFilter,
}

impl BinSegmenter {
    /// Create a segmenter
    ///
    /// # Errors
    ///
    /// Returns `GuideError::InvalidParameter` if `parameters` fail
    /// [`SegmenterParameters::validate`].
    pub fn new(parameters: SegmenterParameters) -> Result<Self, GuideError> {
        parameters.validate()?;

        log::debug!(
            "Creating bin segmenter: fft={}, {} bins, {} Hz, filter length {}",
            parameters.fft_size,
            parameters.bin_count,
            parameters.sample_rate,
            parameters.classification_filter_length
        );

        Ok(Self {
            parameters,
            numeric: vec![RESIDUAL; parameters.bin_count],
            class_filter: HistogramFilter::new(parameters.classification_filter_length, 3),
        })
    }

    /// Parameters this segmenter was built with
    pub fn parameters(&self) -> &SegmenterParameters {
        &self.parameters
    }

    /// Segment one frame's classification
    ///
    /// `classification` must hold at least `bin_count` values.
    pub fn segment(&mut self, classification: &[Classification]) -> Segmentation {
        let n = self.parameters.bin_count;

        for (code, class) in self.numeric.iter_mut().zip(&classification[..n]) {
            *code = match class {
                Classification::Harmonic => HARMONIC,
                Classification::Percussive => PERCUSSIVE,
                Classification::Residual => RESIDUAL,
            };
        }

        // Equal counts resolve toward the smaller code, so harmonic beats
        // percussive beats residual
        HistogramFilter::modal_filter(&mut self.class_filter, &mut self.numeric);

        let numeric = &self.numeric;
        let frequency = |bin: usize| {
            frequency_for_bin(bin, self.parameters.fft_size, self.parameters.sample_rate)
        };

        let mut f0 = 0.0;
        for i in 1..n {
            if numeric[i] != PERCUSSIVE {
                if i == 1 && numeric[0] != PERCUSSIVE {
                    f0 = 0.0;
                } else {
                    f0 = frequency(i);
                }
                break;
            }
        }

        let nyquist = self.parameters.sample_rate / 2.0;
        let mut f1 = nyquist;
        let mut f2 = nyquist;
        let mut in_percussive = false;

        for i in (1..n).rev() {
            let code = numeric[i];
            if in_percussive {
                if code != PERCUSSIVE {
                    f1 = frequency(i);
                    break;
                }
            } else if code == PERCUSSIVE {
                f2 = frequency(i);
                in_percussive = true;
            } else if code == HARMONIC {
                f1 = frequency(i);
                f2 = f1;
                break;
            }
        }

        // A percussive run reaching the bottom has no lower edge to report
        if f1 == nyquist && f2 < nyquist {
            f1 = 0.0;
        }

        Segmentation::new(f0, f1, f2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Classification::{Harmonic as H, Percussive as P, Residual as R};

    fn segmenter() -> BinSegmenter {
        BinSegmenter::new(SegmenterParameters::new(16, 6, 48000.0, 3)).unwrap()
    }

    #[test]
    fn test_frequency_bin_conversion() {
        assert_eq!(frequency_for_bin(0, 16, 48000.0), 0.0);
        assert_eq!(frequency_for_bin(3, 16, 48000.0), 9000.0);
        assert_eq!(frequency_for_bin(512, 1024, 44100.0), 22050.0);
        assert_eq!(bin_for_frequency(9000.0, 16, 48000.0), 3);
        assert_eq!(bin_for_frequency(1000.0, 2048, 48000.0), 43);
        assert_eq!(bin_for_frequency(0.0, 2048, 48000.0), 0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(BinSegmenter::new(SegmenterParameters::new(0, 6, 48000.0, 3)).is_err());
        assert!(BinSegmenter::new(SegmenterParameters::new(16, 0, 48000.0, 3)).is_err());
        assert!(BinSegmenter::new(SegmenterParameters::new(16, 6, 0.0, 3)).is_err());
        assert!(BinSegmenter::new(SegmenterParameters::new(16, 6, f64::NAN, 3)).is_err());
        assert!(BinSegmenter::new(SegmenterParameters::new(16, 6, 48000.0, 0)).is_err());
    }

    #[test]
    fn test_all_residual() {
        let s = segmenter().segment(&[R; 6]);
        assert_eq!(s, Segmentation::new(0.0, 24000.0, 24000.0));
    }

    #[test]
    fn test_all_percussive() {
        let s = segmenter().segment(&[P; 6]);
        assert_eq!(s, Segmentation::new(0.0, 0.0, 15000.0));
    }

    #[test]
    fn test_all_harmonic() {
        let s = segmenter().segment(&[H; 6]);
        assert_eq!(s, Segmentation::new(0.0, 15000.0, 15000.0));
    }

    #[test]
    fn test_low_percussive_run() {
        let s = segmenter().segment(&[P, P, P, H, H, H]);
        assert_eq!(s.percussive_below, 9000.0);
        assert_eq!(s.percussive_above, 15000.0);
        assert_eq!(s.residual_above, 15000.0);
    }

    #[test]
    fn test_high_percussive_run() {
        let s = segmenter().segment(&[R, R, P, P, P, R]);
        assert_eq!(s, Segmentation::new(0.0, 3000.0, 15000.0));
    }

    #[test]
    fn test_isolated_bin_is_smoothed_away() {
        let mut segmenter = segmenter();
        assert_eq!(
            segmenter.segment(&[P, P, H, P, P, P]),
            segmenter.segment(&[P; 6])
        );
        assert_eq!(
            segmenter.segment(&[H, H, H, H, H, P]),
            segmenter.segment(&[H; 6])
        );
    }

    #[test]
    fn test_lone_harmonic_floor() {
        // Bin 0 is never visited by the downward scan
        let s = segmenter().segment(&[H, R, R, R, R, R]);
        assert_eq!(s, Segmentation::new(0.0, 24000.0, 24000.0));
    }
}
