// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # NdArray Module - *Dense row-major operand array*
//!
//! The operand type consumed by every dispatcher entry point.
//!
//! The dispatcher never allocates, resizes or frees an `NdArray`. It reads
//! the shape to validate a call and hands the buffer slices to the kernel.

use std::fmt;

use vec64::Vec64;

use crate::traits::element::Element;
use crate::traits::shape::Shape;

/// # NdArray
///
/// Dense, contiguous, row-major multi-dimensional array.
///
/// ### Description
/// Storage is a `Vec64<T>` buffer so kernel loops see 64-byte aligned data.
/// A rank-0 array (`shape == []`) holds exactly one element.
///
/// ### Properties
/// - `data`: Flat buffer in row-major order.
/// - `shape`: Dimension list, outermost first.
///
/// Both are private: the buffer length always equals the shape's element
/// count, and the dispatcher validates calls on the shape alone.
#[derive(Clone, PartialEq)]
pub struct NdArray<T: Element> {
    data: Vec64<T>,
    shape: Vec<usize>,
}

impl<T: Element> NdArray<T> {
    /// Constructs an array from a flat buffer (must be row-major order).
    /// Panics if data length does not match shape.
    pub fn from_vec64(data: Vec64<T>, shape: Vec<usize>) -> Self {
        assert_eq!(
            data.len(),
            shape.iter().product::<usize>(),
            "NdArray shape {:?} does not match buffer length {}",
            shape,
            data.len()
        );
        NdArray { data, shape }
    }

    /// Copies `values` into a new array of `shape`.
    /// Panics if the element count does not match shape.
    pub fn from_slice(values: &[T], shape: &[usize]) -> Self {
        Self::from_vec64(values.iter().copied().collect(), shape.to_vec())
    }

    /// Constructs an array of `shape` with every element set to `value`.
    pub fn full(shape: &[usize], value: T) -> Self {
        let len = shape.iter().product();
        let data: Vec64<T> = std::iter::repeat(value).take(len).collect();
        NdArray {
            data,
            shape: shape.to_vec(),
        }
    }

    /// Zero-filled array of `shape`.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    /// Rank-0 array holding `value`.
    pub fn scalar(value: T) -> Self {
        Self::full(&[], value)
    }

    /// Rank-1 array over `values`.
    pub fn vector(values: &[T]) -> Self {
        Self::from_slice(values, &[values.len()])
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Returns an immutable reference to the flat buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable reference to the flat buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Element at a multi-dimensional index, `None` when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        self.data.get(offset).copied()
    }

    /// Consumes the array, returning its flat buffer.
    pub fn into_vec64(self) -> Vec64<T> {
        self.data
    }

    /// Returns the array with a new shape of equal element count.
    /// Panics if the element counts differ.
    pub fn reshape(self, shape: &[usize]) -> Self {
        Self::from_vec64(self.data, shape.to_vec())
    }
}

impl<T: Element> Shape for NdArray<T> {
    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

impl<T: Element> fmt::Debug for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("dtype", &T::DTYPE)
            .field("shape", &self.shape)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T: Element> fmt::Display for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NdArray<{}>{:?} [", T::DTYPE, self.shape)?;
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}
