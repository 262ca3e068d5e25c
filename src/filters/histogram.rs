//! Sliding-window median and mode over small non-negative integers
//!
//! Keeps a count per value instead of a sorted window, so both queries are
//! linear in the alphabet size rather than the window length. The mode is
//! cached and only recomputed after the cached value leaves the window.
//!
//! Ties are always broken toward the smaller value.

use super::ring_buffer::RingBuffer;

/// Moving median / mode filter over values in `0..n_values`
#[derive(Debug, Clone)]
pub struct HistogramFilter {
    frame: RingBuffer<usize>,
    histogram: Vec<usize>,
    size: usize,
    fill: usize,
    mode: Option<usize>,
}

impl HistogramFilter {
    /// Create a filter over the last `size` values, each in `0..n_values`
    pub fn new(size: usize, n_values: usize) -> Self {
        assert!(size > 0, "HistogramFilter size must be greater than zero");
        assert!(n_values > 0, "HistogramFilter needs at least one value");
        Self {
            frame: RingBuffer::new(size),
            histogram: vec![0; n_values],
            size,
            fill: 0,
            mode: None,
        }
    }

    /// Window length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of distinct values accepted
    pub fn n_values(&self) -> usize {
        self.histogram.len()
    }

    /// Number of values currently in the window
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Occurrences of `value` in the current window
    pub fn count(&self, value: usize) -> usize {
        self.histogram[value]
    }

    /// Empty the window
    pub fn reset(&mut self) {
        self.frame.reset();
        self.histogram.fill(0);
        self.fill = 0;
        self.mode = None;
    }

    /// Add a value, evicting the oldest one if the window is full
    ///
    /// `value` must be less than [`n_values`](Self::n_values).
    pub fn push(&mut self, value: usize) {
        if self.fill == self.size {
            self.evict();
        }
        self.frame.write_one(value);
        self.fill += 1;
        self.histogram[value] += 1;

        if let Some(mode) = self.mode {
            if value != mode {
                let count = self.histogram[value];
                let mode_count = self.histogram[mode];
                if count > mode_count || (count == mode_count && value < mode) {
                    self.mode = Some(value);
                }
            }
        }
    }

    /// Evict the oldest value without adding a new one
    pub fn drop_value(&mut self) {
        if self.fill > 0 {
            self.evict();
        }
    }

    /// Median of the window; the lower middle value when the fill is even
    pub fn median(&self) -> usize {
        let target = self.fill.div_ceil(2);
        let mut seen = 0;
        for (value, &count) in self.histogram.iter().enumerate() {
            seen += count;
            if seen >= target {
                return value;
            }
        }
        0
    }

    /// Most frequent value in the window, smallest value on ties
    pub fn mode(&mut self) -> usize {
        if let Some(mode) = self.mode {
            return mode;
        }
        let mut mode = 0;
        let mut max_count = self.histogram[0];
        for (value, &count) in self.histogram.iter().enumerate().skip(1) {
            if count > max_count {
                max_count = count;
                mode = value;
            }
        }
        self.mode = Some(mode);
        mode
    }

    /// Filter `values` in place with the moving median or mode
    ///
    /// Uses the same centred alignment as
    /// [`MovingMedian::filter`](super::MovingMedian::filter).
    pub fn filter(hf: &mut HistogramFilter, values: &mut [usize], use_mode: bool) {
        hf.reset();
        let n = values.len() as isize;
        let mut i = -((hf.size / 2) as isize);
        for j in 0..values.len() {
            hf.push(values[j]);
            if i >= 0 {
                values[i as usize] = hf.output(use_mode);
            }
            i += 1;
        }
        while i < n {
            hf.drop_value();
            if i >= 0 {
                values[i as usize] = hf.output(use_mode);
            }
            i += 1;
        }
    }

    /// Moving-median filter `values` in place
    pub fn median_filter(hf: &mut HistogramFilter, values: &mut [usize]) {
        Self::filter(hf, values, false);
    }

    /// Moving-mode filter `values` in place
    pub fn modal_filter(hf: &mut HistogramFilter, values: &mut [usize]) {
        Self::filter(hf, values, true);
    }

    fn output(&mut self, use_mode: bool) -> usize {
        if use_mode {
            self.mode()
        } else {
            self.median()
        }
    }

    fn evict(&mut self) {
        let to_drop = self.frame.read_one();
        self.histogram[to_drop] -= 1;
        self.fill -= 1;
        if self.mode == Some(to_drop) {
            self.mode = None;
        }
    }
}
