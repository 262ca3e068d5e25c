//! Order-statistic filters over bounded windows
//!
//! All filters here are allocation-free after construction and run in time
//! proportional to their window length, so they can be driven from inside
//! an audio callback:
//! - Ring buffer (window substrate)
//! - Moving median / percentile, single and per-bin bank
//! - Histogram filter (median and mode over small integer alphabets)
//! - Peak and trough location with a neighbour radius

pub mod histogram;
pub mod moving_median;
pub mod peak;
pub mod ring_buffer;
pub mod sample;

pub use histogram::HistogramFilter;
pub use moving_median::{MovingMedian, MovingMedianStack};
pub use peak::{Greater, Less, Peak, PeakOrder};
pub use ring_buffer::RingBuffer;
pub use sample::Sample;
