//! Per-channel classification pipeline with one frame of readahead
//!
//! Classification runs one frame ahead of the frame being processed. Each
//! channel keeps the current and next classifications, and the previous,
//! current and next segmentations.

use super::classifier::{BinClassifier, Classification};
use super::segmenter::{BinSegmenter, Segmentation};
use crate::config::GuideConfig;
use crate::error::GuideError;

/// Classification state for one audio channel
#[derive(Debug, Clone)]
pub struct ChannelGuide {
    classifier: BinClassifier,
    segmenter: BinSegmenter,
    classification: Vec<Classification>,
    next_classification: Vec<Classification>,
    prev_segmentation: Segmentation,
    segmentation: Segmentation,
    next_segmentation: Segmentation,
}

impl ChannelGuide {
    /// Create the pipeline for one channel
    ///
    /// # Errors
    ///
    /// Returns `GuideError::InvalidParameter` if the configuration is invalid.
    pub fn new(config: &GuideConfig) -> Result<Self, GuideError> {
        let (classifier_parameters, segmenter_parameters) = config.resolve()?;
        let bin_count = classifier_parameters.bin_count;

        Ok(Self {
            classifier: BinClassifier::new(classifier_parameters)?,
            segmenter: BinSegmenter::new(segmenter_parameters)?,
            classification: vec![Classification::Residual; bin_count],
            next_classification: vec![Classification::Residual; bin_count],
            prev_segmentation: Segmentation::default(),
            segmentation: Segmentation::default(),
            next_segmentation: Segmentation::default(),
        })
    }

    /// Number of classified bins; magnitude frames must be at least this long
    pub fn bin_count(&self) -> usize {
        self.classification.len()
    }

    /// Feed the magnitudes of the readahead frame and shift every stage on
    /// by one frame
    pub fn advance(&mut self, magnitudes: &[f64]) {
        self.classification.copy_from_slice(&self.next_classification);
        self.classifier.classify(magnitudes, &mut self.next_classification);

        self.prev_segmentation = self.segmentation;
        self.segmentation = self.next_segmentation;
        self.next_segmentation = self.segmenter.segment(&self.next_classification);
    }

    /// Classification of the current frame
    pub fn classification(&self) -> &[Classification] {
        &self.classification
    }

    /// Classification of the readahead frame
    pub fn next_classification(&self) -> &[Classification] {
        &self.next_classification
    }

    /// Segmentation of the previous frame
    pub fn prev_segmentation(&self) -> Segmentation {
        self.prev_segmentation
    }

    /// Segmentation of the current frame
    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }

    /// Segmentation of the readahead frame
    pub fn next_segmentation(&self) -> Segmentation {
        self.next_segmentation
    }

    /// Return to the state just after construction
    pub fn reset(&mut self) {
        self.classifier.reset();
        self.classification.fill(Classification::Residual);
        self.next_classification.fill(Classification::Residual);
        self.prev_segmentation = Segmentation::default();
        self.segmentation = Segmentation::default();
        self.next_segmentation = Segmentation::default();
    }
}
