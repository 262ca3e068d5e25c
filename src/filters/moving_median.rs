//! Sliding-window median and percentile filters
//!
//! Each filter keeps its window in a [`RingBuffer`] (for eviction order) and
//! a shadow array holding the same values in ascending order. Window lengths
//! in this crate are tens of elements, so shifting a sorted array between the
//! evicted value's slot and the new value's slot is cheaper than maintaining
//! a heap or tree.
//!
//! # Example
//!
//! ```
//! use spectral_guide::filters::MovingMedian;
//!
//! let mut mm = MovingMedian::<f64>::new(3);
//! let mut values = vec![1.0, 2.0, 3.0];
//! MovingMedian::filter(&mut mm, &mut values);
//! assert_eq!(values, vec![1.0, 2.0, 2.0]);
//! ```

use super::ring_buffer::RingBuffer;
use super::sample::Sample;

/// Percentile used when none is given (the median)
pub const DEFAULT_PERCENTILE: f32 = 50.0;

/// Moving median (or arbitrary percentile) over the last `size` values
#[derive(Debug, Clone)]
pub struct MovingMedian<T> {
    frame: RingBuffer<T>,
    sorted: Vec<T>,
    size: usize,
    fill: usize,
    percentile: f32,
}

impl<T: Sample> MovingMedian<T> {
    /// Create a median filter over `size` values
    pub fn new(size: usize) -> Self {
        Self::with_percentile(size, DEFAULT_PERCENTILE)
    }

    /// Create a filter returning the given percentile (0-100) of the window
    pub fn with_percentile(size: usize, percentile: f32) -> Self {
        assert!(size > 0, "MovingMedian size must be greater than zero");
        Self {
            frame: RingBuffer::new(size),
            sorted: vec![T::default(); size],
            size,
            fill: 0,
            percentile,
        }
    }

    /// Window length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values currently in the window
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Percentile returned by [`get`](Self::get)
    pub fn percentile(&self) -> f32 {
        self.percentile
    }

    /// Change the percentile returned by [`get`](Self::get)
    pub fn set_percentile(&mut self, percentile: f32) {
        self.percentile = percentile;
    }

    /// Current window contents in ascending order
    pub fn sorted(&self) -> &[T] {
        &self.sorted[..self.fill]
    }

    /// Add a value, evicting the oldest one if the window is full
    ///
    /// NaN is replaced with zero.
    pub fn push(&mut self, value: T) {
        let value = if value.is_nan() {
            log::warn!("MovingMedian: NaN encountered, substituting zero");
            T::default()
        } else {
            value
        };

        if self.fill == self.size {
            let to_drop = self.frame.read_one();
            self.drop_and_put(to_drop, value);
        } else {
            self.put(value);
            self.fill += 1;
        }
        self.frame.write_one(value);
    }

    /// Evict the oldest value without adding a new one
    pub fn drop_value(&mut self) {
        if self.fill > 0 {
            let to_drop = self.frame.read_one();
            self.remove(to_drop);
            self.fill -= 1;
        }
    }

    /// Value at the configured percentile, or zero if the window is empty
    ///
    /// For the median of an even-sized window this is the lower of the two
    /// central values.
    pub fn get(&self) -> T {
        if self.fill == 0 {
            return T::default();
        }
        let last = self.fill - 1;
        let index = if self.percentile == DEFAULT_PERCENTILE {
            last / 2
        } else {
            ((last as f64 * self.percentile as f64 / 100.0).floor() as usize).min(last)
        };
        self.sorted[index]
    }

    /// Empty the window
    pub fn reset(&mut self) {
        self.frame.reset();
        self.sorted.fill(T::default());
        self.fill = 0;
    }

    /// Filter `values` in place
    ///
    /// Output is centred on the window: the first `size / 2` pushes only
    /// pre-roll, and once the input runs out the window is drained with
    /// [`drop_value`](Self::drop_value) so every position gets an output.
    pub fn filter(mm: &mut MovingMedian<T>, values: &mut [T]) {
        mm.reset();
        let n = values.len() as isize;
        let mut i = -((mm.size / 2) as isize);
        for j in 0..values.len() {
            mm.push(values[j]);
            if i >= 0 {
                values[i as usize] = mm.get();
            }
            i += 1;
        }
        while i < n {
            mm.drop_value();
            if i >= 0 {
                values[i as usize] = mm.get();
            }
            i += 1;
        }
    }

    // Insert into the sorted prefix of length `fill`
    fn put(&mut self, value: T) {
        let index = self.sorted[..self.fill].partition_point(|x| *x < value);
        self.sorted.copy_within(index..self.fill, index + 1);
        self.sorted[index] = value;
    }

    fn remove(&mut self, to_drop: T) {
        let index = self.sorted[..self.fill].partition_point(|x| *x < to_drop);
        self.sorted.copy_within(index + 1..self.fill, index);
    }

    // Replace `to_drop` with `value`, shifting only the span between their
    // sorted positions
    fn drop_and_put(&mut self, to_drop: T, value: T) {
        let fill = self.fill;
        let index = self.sorted[..fill].partition_point(|x| *x < to_drop);
        if value > to_drop {
            let insert =
                index + 1 + self.sorted[index + 1..fill].partition_point(|x| *x < value);
            self.sorted.copy_within(index + 1..insert, index);
            self.sorted[insert - 1] = value;
        } else {
            let insert = self.sorted[..index].partition_point(|x| *x < value);
            self.sorted.copy_within(insert..index, insert + 1);
            self.sorted[insert] = value;
        }
    }
}

/// A bank of independent moving medians sharing one window length
///
/// Used to give every frequency bin its own time-direction filter.
#[derive(Debug, Clone)]
pub struct MovingMedianStack<T> {
    filters: Vec<MovingMedian<T>>,
    filter_length: usize,
}

impl<T: Sample> MovingMedianStack<T> {
    /// Create `n_filters` filters, each over `filter_length` values
    pub fn new(n_filters: usize, filter_length: usize) -> Self {
        Self {
            filters: (0..n_filters)
                .map(|_| MovingMedian::new(filter_length))
                .collect(),
            filter_length,
        }
    }

    /// Number of filters in the bank
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True if the bank holds no filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Window length shared by every filter
    pub fn filter_length(&self) -> usize {
        self.filter_length
    }

    /// Push a value into one filter of the bank
    #[inline]
    pub fn push(&mut self, filter: usize, value: T) {
        self.filters[filter].push(value);
    }

    /// Evict the oldest value of one filter
    #[inline]
    pub fn drop_value(&mut self, filter: usize) {
        self.filters[filter].drop_value();
    }

    /// Current output of one filter
    #[inline]
    pub fn get(&self, filter: usize) -> T {
        self.filters[filter].get()
    }

    /// Empty every filter in the bank
    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Deterministic pseudo-random values with plenty of duplicates
    fn lcg_values(count: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..count)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) % 17) as f64 - 8.0
            })
            .collect()
    }

    #[test]
    fn test_median_odd_window() {
        let mut mm = MovingMedian::<f64>::new(3);
        mm.push(1.0);
        mm.push(2.0);
        mm.push(3.0);
        assert_eq!(mm.get(), 2.0);
    }

    #[test]
    fn test_median_even_window_takes_lower_middle() {
        let mut mm = MovingMedian::<f64>::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            mm.push(v);
        }
        assert_eq!(mm.get(), 2.0);
    }

    #[test]
    fn test_empty_returns_zero() {
        let mm = MovingMedian::<f32>::new(5);
        assert_eq!(mm.get(), 0.0);
        assert_eq!(mm.fill(), 0);
    }

    #[test]
    fn test_eviction_of_oldest() {
        let mut mm = MovingMedian::<i32>::new(3);
        for v in [10, 20, 30, 1, 2] {
            mm.push(v);
        }
        // Window is now [30, 1, 2]
        assert_eq!(mm.sorted(), &[1, 2, 30]);
        assert_eq!(mm.get(), 2);
    }

    #[test]
    fn test_percentile() {
        let mut mm = MovingMedian::<f64>::with_percentile(5, 80.0);
        for v in [5.0, 1.0, 4.0, 2.0, 3.0] {
            mm.push(v);
        }
        // floor(4 * 0.8) = 3
        assert_eq!(mm.get(), 4.0);

        mm.set_percentile(100.0);
        assert_eq!(mm.get(), 5.0);
        mm.set_percentile(0.0);
        assert_eq!(mm.get(), 1.0);
        mm.set_percentile(250.0);
        assert_eq!(mm.get(), 5.0);
    }

    #[test]
    fn test_nan_is_replaced_with_zero() {
        let mut mm = MovingMedian::<f64>::new(3);
        mm.push(5.0);
        mm.push(f64::NAN);
        mm.push(-1.0);
        assert_eq!(mm.sorted(), &[-1.0, 0.0, 5.0]);
        assert_eq!(mm.get(), 0.0);
    }

    #[test]
    fn test_drop_drains_window() {
        let mut mm = MovingMedian::<f64>::new(3);
        for v in [3.0, 1.0, 2.0] {
            mm.push(v);
        }
        mm.drop_value();
        assert_eq!(mm.sorted(), &[1.0, 2.0]);
        mm.drop_value();
        assert_eq!(mm.sorted(), &[2.0]);
        mm.drop_value();
        assert_eq!(mm.fill(), 0);
        mm.drop_value();
        assert_eq!(mm.fill(), 0);
        assert_eq!(mm.get(), 0.0);
    }

    #[test]
    fn test_sorted_shadow_matches_window() {
        for size in [1, 2, 3, 4, 7, 10] {
            let mut mm = MovingMedian::<f64>::new(size);
            let mut window = VecDeque::new();
            let values = lcg_values(300, size as u64 + 11);

            for (step, &v) in values.iter().enumerate() {
                if step % 7 == 3 {
                    mm.drop_value();
                    window.pop_front();
                } else {
                    mm.push(v);
                    if window.len() == size {
                        window.pop_front();
                    }
                    window.push_back(v);
                }

                let mut expected: Vec<f64> = window.iter().copied().collect();
                expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
                assert_eq!(mm.sorted(), expected.as_slice(), "size {} step {}", size, step);
                assert_eq!(mm.fill(), window.len());
                if !expected.is_empty() {
                    assert_eq!(mm.get(), expected[(expected.len() - 1) / 2]);
                }
            }
        }
    }

    #[test]
    fn test_filter_centred_alignment() {
        let mut mm = MovingMedian::<f64>::new(3);
        let mut values = vec![1.0, 2.0, 3.0];
        MovingMedian::filter(&mut mm, &mut values);
        assert_eq!(values, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_filter_removes_spike() {
        let mut mm = MovingMedian::<f64>::new(3);
        let mut values = vec![1.0, 1.0, 9.0, 1.0, 1.0];
        MovingMedian::filter(&mut mm, &mut values);
        assert_eq!(values, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_filter_window_longer_than_input() {
        let mut mm = MovingMedian::<f64>::new(5);
        let mut values = vec![4.0, 8.0];
        MovingMedian::filter(&mut mm, &mut values);
        // Pre-roll of 2 is never reached by pushes; both outputs come from draining
        assert_eq!(values, vec![8.0, 0.0]);
    }

    #[test]
    fn test_stack_filters_are_independent() {
        let mut stack = MovingMedianStack::<f64>::new(2, 3);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.filter_length(), 3);
        for v in [1.0, 5.0, 3.0] {
            stack.push(0, v);
            stack.push(1, v * 10.0);
        }
        assert_eq!(stack.get(0), 3.0);
        assert_eq!(stack.get(1), 30.0);

        stack.drop_value(0);
        assert_eq!(stack.get(0), 3.0);

        stack.reset();
        assert_eq!(stack.get(0), 0.0);
        assert_eq!(stack.get(1), 0.0);
    }
}
