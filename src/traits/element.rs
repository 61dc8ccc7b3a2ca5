// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Element Trait Module
//!
//! Element types the dispatcher is instantiated over, and the per-type
//! kernel registry each one exposes.

use std::fmt::{Debug, Display};
use std::sync::OnceLock;

use num_traits::{Float as NumFloat, NumCast, ToPrimitive};

use crate::enums::dtype::DType;
use crate::kernels::table::KernelRegistry;

/// Trait for types valid as tensor elements.
///
/// Useful when specifying `my_fn::<T: Element>() {}`.
///
/// Extends and constrains the *num-traits* `Float` implementation to fit the
/// crate's type universe. Each implementor owns one immutable
/// [`KernelRegistry`], built on first use and shared by every thread
/// afterwards.
pub trait Element:
    NumFloat + NumCast + ToPrimitive + Copy + Default + Debug + Display + Send + Sync + 'static
{
    /// Runtime tag for this element type.
    const DTYPE: DType;

    /// The kernel tables registered for this element type.
    fn registry() -> &'static KernelRegistry<Self>;

    /// Lossless cast from a lane index.
    ///
    /// Index-reduce kernels write positions in the element type, `-1`
    /// marking "not found".
    #[inline]
    fn from_index(idx: i64) -> Self {
        <Self as NumCast>::from(idx).unwrap_or_else(Self::nan)
    }

    /// Cast from a lane length.
    #[inline]
    fn from_len(n: usize) -> Self {
        <Self as NumCast>::from(n).unwrap_or_else(Self::infinity)
    }

    /// Encodes a predicate as `1` or `0`.
    #[inline]
    fn from_bool(b: bool) -> Self {
        if b { Self::one() } else { Self::zero() }
    }
}

macro_rules! impl_element {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            fn registry() -> &'static KernelRegistry<Self> {
                static REGISTRY: OnceLock<KernelRegistry<$t>> = OnceLock::new();
                REGISTRY.get_or_init(KernelRegistry::new)
            }
        }
    };
}

impl_element!(f32, DType::Float32);
impl_element!(f64, DType::Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_tags() {
        assert_eq!(<f32 as Element>::DTYPE, DType::Float32);
        assert_eq!(<f64 as Element>::DTYPE, DType::Float64);
    }

    #[test]
    fn test_registry_is_shared() {
        let a = <f64 as Element>::registry() as *const _;
        let b = <f64 as Element>::registry() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_and_bool_casts() {
        assert_eq!(f32::from_index(7), 7.0);
        assert_eq!(f64::from_index(-1), -1.0);
        assert_eq!(f64::from_bool(true), 1.0);
        assert_eq!(f32::from_bool(false), 0.0);
        assert_eq!(f64::from_len(4), 4.0);
    }
}
