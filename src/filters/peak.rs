//! Peak and trough location with a neighbour radius
//!
//! For every index of an array, finds the nearest extremum and the next
//! extremum at or after it. The ordering is a strategy parameter: [`Greater`]
//! picks peaks, [`Less`] picks troughs, and any `Fn(&T, &T) -> bool` closure
//! can be supplied for other orderings.
//!
//! # Example
//!
//! ```
//! use spectral_guide::filters::Peak;
//!
//! let values = [0.0, 1.0, 3.0, 1.0, 0.0, 2.0, 2.0, 0.0];
//! let mut peak = Peak::<f64>::new(values.len());
//! let mut nearest = [0; 8];
//! let mut next = [0; 8];
//! peak.find_nearest_and_next_peaks(&values, 1, Some(&mut nearest[..]), Some(&mut next[..]));
//! assert_eq!(next, [2, 2, 2, 5, 5, 5, 6, 7]);
//! assert_eq!(nearest, [2, 2, 2, 2, 5, 5, 5, 5]);
//! ```

use std::marker::PhantomData;

/// Strict ordering used to decide whether one value dominates another
pub trait PeakOrder<T> {
    /// True if `a` strictly dominates `b`
    fn dominates(&self, a: &T, b: &T) -> bool;
}

/// Peak picking: larger values dominate
#[derive(Debug, Clone, Copy, Default)]
pub struct Greater;

/// Trough picking: smaller values dominate
#[derive(Debug, Clone, Copy, Default)]
pub struct Less;

impl<T: PartialOrd> PeakOrder<T> for Greater {
    #[inline]
    fn dominates(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

impl<T: PartialOrd> PeakOrder<T> for Less {
    #[inline]
    fn dominates(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

impl<T, F> PeakOrder<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn dominates(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Extremum locator for arrays of up to `n` values
#[derive(Debug, Clone)]
pub struct Peak<T, C = Greater> {
    order: C,
    locations: Vec<usize>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: PartialOrd> Peak<T, Greater> {
    /// Peak picker for arrays of up to `n` values
    pub fn new(n: usize) -> Self {
        Self::with_order(n, Greater)
    }
}

impl<T, C: PeakOrder<T>> Peak<T, C> {
    /// Extremum locator using a custom ordering
    pub fn with_order(n: usize, order: C) -> Self {
        Self {
            order,
            locations: vec![0; n],
            _marker: PhantomData,
        }
    }

    /// Maximum array length this locator accepts
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// True if the locator was created for zero-length arrays
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locate extrema over the whole array
    ///
    /// See [`find_nearest_and_next_peaks_in`](Self::find_nearest_and_next_peaks_in).
    pub fn find_nearest_and_next_peaks(
        &mut self,
        values: &[T],
        p: usize,
        nearest: Option<&mut [usize]>,
        next: Option<&mut [usize]>,
    ) {
        let count = values.len().min(self.locations.len());
        self.find_nearest_and_next_peaks_in(values, 0, count, p, nearest, next);
    }

    /// Locate extrema within `values[start..start + count]`
    ///
    /// Index `i` is an extremum if it strictly dominates every value up to
    /// `p` places to its left and is not strictly dominated by any value up
    /// to `p` places to its right, neighbours being clipped to the range. A
    /// flat plateau therefore reports its leftmost point.
    ///
    /// For each index in the range, `next` receives the first extremum at or
    /// after it (or the index itself if there is none) and `nearest` receives
    /// whichever of the previous and next extrema is closer, preferring the
    /// next one on a tie. Output entries outside the range are left as they
    /// were.
    pub fn find_nearest_and_next_peaks_in(
        &mut self,
        values: &[T],
        start: usize,
        count: usize,
        p: usize,
        mut nearest: Option<&mut [usize]>,
        mut next: Option<&mut [usize]>,
    ) {
        let end = start + count;
        debug_assert!(end <= values.len(), "range exceeds input length");
        debug_assert!(count <= self.locations.len(), "range exceeds locator length");

        let mut n_peaks = 0;
        for i in start..end {
            let v = &values[i];
            let lo = i.saturating_sub(p).max(start);
            let hi = i.saturating_add(p).min(end - 1);
            let is_peak = (lo..i).all(|k| self.order.dominates(v, &values[k]))
                && (i + 1..=hi).all(|k| !self.order.dominates(&values[k], v));
            if is_peak {
                self.locations[n_peaks] = i;
                n_peaks += 1;
            }
        }

        let mut prev_peak = None;
        let mut peak_index = 0;
        for i in start..end {
            while peak_index < n_peaks && self.locations[peak_index] < i {
                prev_peak = Some(self.locations[peak_index]);
                peak_index += 1;
            }
            let next_peak = if peak_index < n_peaks {
                Some(self.locations[peak_index])
            } else {
                None
            };

            if let Some(out) = next.as_deref_mut() {
                out[i] = next_peak.unwrap_or(i);
            }

            if let Some(out) = nearest.as_deref_mut() {
                out[i] = match (prev_peak, next_peak) {
                    (Some(prev), Some(following)) => {
                        if following - i <= i - prev {
                            following
                        } else {
                            prev
                        }
                    }
                    (Some(prev), None) => prev,
                    (None, Some(following)) => following,
                    (None, None) => i,
                };
            }
        }
    }
}
