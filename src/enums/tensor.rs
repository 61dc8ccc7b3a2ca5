// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Tensor Module** - *Type-Erased Operands*
//!
//! `Tensor` wraps an [`NdArray`] of any supported element type so that
//! graph-side callers can hold operands without naming `T`.
//!
//! ## Features:
//! - one variant per [`DType`]
//! - zero-cost access to the typed array when the element type is known
//! - matching erased forms for the scalar operand (`ScalarValue`) and the
//!   auxiliary parameters (`ExtraArgs`)

use std::fmt::{Display, Formatter};

use crate::enums::dtype::DType;
use crate::structs::ndarray::NdArray;
use crate::traits::element::Element;
use crate::traits::shape::Shape;

/// Type-erased n-dimensional operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    Float32(NdArray<f32>),
    Float64(NdArray<f64>),
}

impl Tensor {
    #[inline]
    pub fn from_float32(arr: NdArray<f32>) -> Self {
        Tensor::Float32(arr)
    }

    #[inline]
    pub fn from_float64(arr: NdArray<f64>) -> Self {
        Tensor::Float64(arr)
    }

    /// Element type of the wrapped array.
    pub fn dtype(&self) -> DType {
        match self {
            Tensor::Float32(_) => DType::Float32,
            Tensor::Float64(_) => DType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Tensor::Float32(a) => a.len(),
            Tensor::Float64(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The typed array, or `None` when `T` is not the wrapped element type.
    pub fn inner_check<T: TensorElement>(&self) -> Option<&NdArray<T>> {
        T::from_tensor(self)
    }

    pub fn inner_check_mut<T: TensorElement>(&mut self) -> Option<&mut NdArray<T>> {
        T::from_tensor_mut(self)
    }
}

impl Shape for Tensor {
    fn shape(&self) -> &[usize] {
        match self {
            Tensor::Float32(a) => a.shape(),
            Tensor::Float64(a) => a.shape(),
        }
    }
}

impl From<NdArray<f32>> for Tensor {
    fn from(arr: NdArray<f32>) -> Self {
        Tensor::Float32(arr)
    }
}

impl From<NdArray<f64>> for Tensor {
    fn from(arr: NdArray<f64>) -> Self {
        Tensor::Float64(arr)
    }
}

impl Display for Tensor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Tensor::Float32(a) => write!(f, "{a}"),
            Tensor::Float64(a) => write!(f, "{a}"),
        }
    }
}

/// Type-erased scalar operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Float32(f32),
    Float64(f64),
}

impl ScalarValue {
    pub fn dtype(&self) -> DType {
        match self {
            ScalarValue::Float32(_) => DType::Float32,
            ScalarValue::Float64(_) => DType::Float64,
        }
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        ScalarValue::Float32(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float64(v)
    }
}

/// Type-erased auxiliary parameters.
///
/// `None` carries no values and agrees with every element type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExtraArgs<'a> {
    #[default]
    None,
    Float32(&'a [f32]),
    Float64(&'a [f64]),
}

impl ExtraArgs<'_> {
    /// Element type of the values, `None` when no values are carried.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            ExtraArgs::None => None,
            ExtraArgs::Float32(_) => Some(DType::Float32),
            ExtraArgs::Float64(_) => Some(DType::Float64),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExtraArgs::None => 0,
            ExtraArgs::Float32(v) => v.len(),
            ExtraArgs::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [f32]> for ExtraArgs<'a> {
    fn from(v: &'a [f32]) -> Self {
        ExtraArgs::Float32(v)
    }
}

impl<'a> From<&'a [f64]> for ExtraArgs<'a> {
    fn from(v: &'a [f64]) -> Self {
        ExtraArgs::Float64(v)
    }
}

/// Element types with a variant in each of the erased wrappers.
pub trait TensorElement: Element {
    fn from_tensor(t: &Tensor) -> Option<&NdArray<Self>>;
    fn from_tensor_mut(t: &mut Tensor) -> Option<&mut NdArray<Self>>;
    fn from_scalar(v: ScalarValue) -> Option<Self>;
    /// Borrowed values, or `None` on a type clash. `ExtraArgs::None` yields
    /// an empty slice.
    fn from_extras<'a>(e: ExtraArgs<'a>) -> Option<&'a [Self]>;
}

macro_rules! impl_tensor_element {
    ($t:ty, $variant:ident) => {
        impl TensorElement for $t {
            #[inline]
            fn from_tensor(t: &Tensor) -> Option<&NdArray<Self>> {
                match t {
                    Tensor::$variant(a) => Some(a),
                    _ => None,
                }
            }

            #[inline]
            fn from_tensor_mut(t: &mut Tensor) -> Option<&mut NdArray<Self>> {
                match t {
                    Tensor::$variant(a) => Some(a),
                    _ => None,
                }
            }

            #[inline]
            fn from_scalar(v: ScalarValue) -> Option<Self> {
                match v {
                    ScalarValue::$variant(s) => Some(s),
                    _ => None,
                }
            }

            #[inline]
            fn from_extras<'a>(e: ExtraArgs<'a>) -> Option<&'a [Self]> {
                match e {
                    ExtraArgs::None => Some(&[]),
                    ExtraArgs::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_tensor_element!(f32, Float32);
impl_tensor_element!(f64, Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_dtype_and_shape() {
        let t = Tensor::from(NdArray::<f32>::zeros(&[2, 3]));
        assert_eq!(t.dtype(), DType::Float32);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_inner_check() {
        let mut t = Tensor::from_float64(NdArray::vector(&[1.0, 2.0]));
        assert!(t.inner_check::<f32>().is_none());
        assert_eq!(t.inner_check::<f64>().unwrap().as_slice(), &[1.0, 2.0]);
        t.inner_check_mut::<f64>().unwrap().as_mut_slice()[0] = 5.0;
        assert_eq!(t.inner_check::<f64>().unwrap().as_slice(), &[5.0, 2.0]);
    }

    #[test]
    fn test_extras_agree_when_empty() {
        assert_eq!(f32::from_extras(ExtraArgs::None), Some(&[][..]));
        assert_eq!(f64::from_extras(ExtraArgs::None), Some(&[][..]));
        let v = [0.5f32];
        assert!(f64::from_extras(ExtraArgs::from(&v[..])).is_none());
        assert_eq!(ExtraArgs::from(&v[..]).dtype(), Some(DType::Float32));
    }

    #[test]
    fn test_scalar_value() {
        assert_eq!(ScalarValue::from(2.0f64).dtype(), DType::Float64);
        assert_eq!(f32::from_scalar(ScalarValue::Float32(1.5)), Some(1.5));
        assert_eq!(f32::from_scalar(ScalarValue::Float64(1.5)), None);
    }
}
