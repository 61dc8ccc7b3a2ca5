// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Dims Module - *Fixed-capacity dimension list*
//!
//! Shape and stride lists held inline, so that routing a call never touches
//! the heap. Capacity is [`MAX_RANK`]; longer shapes are rejected by the
//! dispatcher before any `Dims` is built from them.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::traits::shape::Shape;

/// Highest operand rank the dispatcher routes.
pub const MAX_RANK: usize = 32;

/// Up to [`MAX_RANK`] dimensions (or strides), outermost first.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    dims: [usize; MAX_RANK],
    rank: usize,
}

impl Dims {
    /// Rank-0 list.
    pub const fn empty() -> Self {
        Dims {
            dims: [0; MAX_RANK],
            rank: 0,
        }
    }

    /// `rank` copies of `value`. Panics when `rank > MAX_RANK`.
    pub fn filled(rank: usize, value: usize) -> Self {
        assert!(rank <= MAX_RANK, "rank {rank} exceeds {MAX_RANK}");
        let mut dims = [0; MAX_RANK];
        dims[..rank].fill(value);
        Dims { dims, rank }
    }

    /// Copies `dims`, or `None` when it is longer than [`MAX_RANK`].
    pub fn from_slice(dims: &[usize]) -> Option<Self> {
        if dims.len() > MAX_RANK {
            return None;
        }
        let mut out = Self::empty();
        out.dims[..dims.len()].copy_from_slice(dims);
        out.rank = dims.len();
        Some(out)
    }

    /// Appends a dimension. Panics when full.
    #[inline]
    pub fn push(&mut self, dim: usize) {
        assert!(self.rank < MAX_RANK, "rank exceeds {MAX_RANK}");
        self.dims[self.rank] = dim;
        self.rank += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.dims[..self.rank]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.dims[..self.rank]
    }

    /// Row-major strides of a contiguous buffer with these dimensions.
    pub fn contiguous_strides(&self) -> Dims {
        let mut strides = Dims::filled(self.rank, 1);
        for i in (0..self.rank.saturating_sub(1)).rev() {
            strides.dims[i] = strides.dims[i + 1] * self.dims[i + 1];
        }
        strides
    }
}

impl Default for Dims {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Dims {
    type Target = [usize];

    #[inline]
    fn deref(&self) -> &[usize] {
        self.as_slice()
    }
}

impl DerefMut for Dims {
    #[inline]
    fn deref_mut(&mut self) -> &mut [usize] {
        self.as_mut_slice()
    }
}

impl Shape for Dims {
    fn shape(&self) -> &[usize] {
        self.as_slice()
    }
}

impl fmt::Debug for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_and_push() {
        let mut d = Dims::from_slice(&[2, 3]).unwrap();
        d.push(4);
        assert_eq!(&d[..], &[2, 3, 4]);
        assert_eq!(d.numel(), 24);
        assert_eq!(format!("{d:?}"), "[2, 3, 4]");
    }

    #[test]
    fn test_rank_limit() {
        assert!(Dims::from_slice(&[1; MAX_RANK]).is_some());
        assert!(Dims::from_slice(&[1; MAX_RANK + 1]).is_none());
    }

    #[test]
    fn test_contiguous_strides() {
        let d = Dims::from_slice(&[2, 3, 4]).unwrap();
        assert_eq!(&d.contiguous_strides()[..], &[12, 4, 1]);
        assert!(Dims::empty().contiguous_strides().is_empty());
    }

    #[test]
    fn test_equality_ignores_spare_capacity() {
        let mut a = Dims::filled(3, 7);
        a.as_mut_slice()[2] = 1;
        let b = Dims::from_slice(&[7, 7, 1]).unwrap();
        assert_eq!(a, b);
    }
}
