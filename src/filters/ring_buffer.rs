//! Fixed-capacity circular buffer
//!
//! Single-reader, single-writer, same thread. Storage is one slot larger
//! than the capacity so that a full buffer can be told apart from an empty
//! one without a separate counter.

/// Fixed-capacity FIFO of `Copy` values
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    reader: usize,
    writer: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create an empty buffer able to hold `capacity` values
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be greater than zero");
        Self {
            slots: vec![T::default(); capacity + 1],
            reader: 0,
            writer: 0,
        }
    }

    /// Maximum number of values the buffer can hold
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of values available to read
    #[inline]
    pub fn read_space(&self) -> usize {
        if self.writer >= self.reader {
            self.writer - self.reader
        } else {
            self.writer + self.slots.len() - self.reader
        }
    }

    /// Number of values that can be written before the buffer is full
    #[inline]
    pub fn write_space(&self) -> usize {
        self.capacity() - self.read_space()
    }

    /// Append one value. Does nothing if the buffer is full.
    #[inline]
    pub fn write_one(&mut self, value: T) {
        if self.write_space() == 0 {
            return;
        }
        self.slots[self.writer] = value;
        self.writer = self.advance(self.writer);
    }

    /// Remove and return the oldest value, or the zero value if empty
    #[inline]
    pub fn read_one(&mut self) -> T {
        if self.reader == self.writer {
            return T::default();
        }
        let value = self.slots[self.reader];
        self.reader = self.advance(self.reader);
        value
    }

    /// Return the oldest value without removing it, or the zero value if empty
    #[inline]
    pub fn peek_one(&self) -> T {
        if self.reader == self.writer {
            T::default()
        } else {
            self.slots[self.reader]
        }
    }

    /// Discard all contents. Storage is kept.
    pub fn reset(&mut self) {
        self.reader = 0;
        self.writer = 0;
    }

    #[inline]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() {
            0
        } else {
            next
        }
    }
}
