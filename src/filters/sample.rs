//! Value types accepted by the sliding-window filters

/// A value that can be held in a filter window
///
/// `Default` supplies the zero value returned from empty windows and
/// substituted for NaN input.
pub trait Sample: Copy + PartialOrd + Default + std::fmt::Debug {
    /// True if the value is unordered (floating-point NaN)
    fn is_nan(self) -> bool;
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn is_nan(self) -> bool {
                    <$t>::is_nan(self)
                }
            }
        )*
    };
}

macro_rules! impl_int_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn is_nan(self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_float_sample!(f32, f64);
impl_int_sample!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_detection() {
        assert!(Sample::is_nan(f64::NAN));
        assert!(Sample::is_nan(f32::NAN));
        assert!(!Sample::is_nan(1.0f64));
        assert!(!Sample::is_nan(3i32));
    }
}
