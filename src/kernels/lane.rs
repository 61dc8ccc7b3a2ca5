// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Lane Module
//!
//! Borrowed, possibly strided, one-dimensional views over an operand buffer.
//!
//! Reductions see their input as a set of lanes, one per output element.
//! Binary elementwise kernels see each operand as a single lane laid out
//! over the output shape, with zero strides standing in for broadcast
//! dimensions.
//!
//! Lane geometry is a [`Walk`]: an inline list of dimensions and strides.
//! Element offsets are produced on the fly by an n-d counter, so neither
//! building nor reading a lane allocates.

use crate::structs::dims::{Dims, MAX_RANK};

/// Walk of a single element at offset 0.
pub static SCALAR_WALK: Walk = Walk::scalar();

/// Row-major traversal of a set of dimensions with the given strides.
///
/// Size-1 dimensions are dropped and adjacent dimensions that step as one
/// are merged on construction, so a contiguous region always walks as a
/// single unit-stride dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    dims: Dims,
    strides: Dims,
}

impl Walk {
    /// One element at offset 0.
    pub const fn scalar() -> Self {
        Walk {
            dims: Dims::empty(),
            strides: Dims::empty(),
        }
    }

    /// Walk over every dimension of `shape`, read with `strides`.
    pub fn new(shape: &[usize], strides: &[usize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self::from_pairs(shape.iter().copied().zip(strides.iter().copied()))
    }

    /// Walk over the listed dimensions of `shape`, in the order given.
    pub fn over(shape: &[usize], strides: &[usize], dims: impl IntoIterator<Item = usize>) -> Self {
        Self::from_pairs(dims.into_iter().map(|d| (shape[d], strides[d])))
    }

    fn from_pairs(pairs: impl Iterator<Item = (usize, usize)>) -> Self {
        let mut walk = Walk::scalar();
        for (n, s) in pairs {
            if n == 0 {
                let mut empty = Walk::scalar();
                empty.dims.push(0);
                empty.strides.push(0);
                return empty;
            }
            if n == 1 {
                continue;
            }
            match (walk.dims.last_mut(), walk.strides.last_mut()) {
                (Some(pn), Some(ps)) if *ps == s * n => {
                    *pn *= n;
                    *ps = s;
                }
                _ => {
                    walk.dims.push(n);
                    walk.strides.push(s);
                }
            }
        }
        walk
    }

    /// Number of positions visited.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether position `i` sits at offset `i`.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        match self.dims.len() {
            0 => true,
            1 => self.strides[0] == 1,
            _ => false,
        }
    }

    /// Offset of the `i`th position.
    #[inline]
    pub fn offset_of(&self, mut i: usize) -> usize {
        let mut offset = 0;
        for (&n, &s) in self.dims.iter().zip(self.strides.iter()).rev() {
            offset += (i % n) * s;
            i /= n;
        }
        offset
    }
}

impl Default for Walk {
    fn default() -> Self {
        Self::scalar()
    }
}

/// One lane: `len` elements read from `data` at `base` plus the offsets of
/// `walk`, or at `base + i` when the lane is contiguous.
#[derive(Debug, Clone, Copy)]
pub struct Lane<'a, T> {
    data: &'a [T],
    base: usize,
    walk: Option<&'a Walk>,
    len: usize,
}

impl<'a, T: Copy> Lane<'a, T> {
    /// Lane over the whole of `data`.
    pub fn contiguous(data: &'a [T]) -> Self {
        Lane {
            data,
            base: 0,
            walk: None,
            len: data.len(),
        }
    }

    /// Lane reading `data` along `walk`.
    pub fn strided(data: &'a [T], walk: &'a Walk) -> Self {
        Self::at(data, 0, walk)
    }

    #[inline]
    fn at(data: &'a [T], base: usize, walk: &'a Walk) -> Self {
        Lane {
            data,
            base,
            walk: (!walk.is_contiguous()).then_some(walk),
            len: walk.len(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `i`th element of the lane.
    #[inline(always)]
    pub fn get(&self, i: usize) -> T {
        match self.walk {
            Some(w) => self.data[self.base + w.offset_of(i)],
            None => self.data[self.base + i],
        }
    }

    /// The backing slice when the lane is contiguous.
    #[inline]
    pub fn as_contiguous(&self) -> Option<&'a [T]> {
        match self.walk {
            Some(_) => None,
            None if self.len == 0 => Some(&[]),
            None => Some(&self.data[self.base..self.base + self.len]),
        }
    }

    pub fn iter(&self) -> LaneIter<'a, T> {
        LaneIter::new(*self)
    }
}

impl<'a, T: Copy> IntoIterator for Lane<'a, T> {
    type Item = T;
    type IntoIter = LaneIter<'a, T>;

    fn into_iter(self) -> LaneIter<'a, T> {
        LaneIter::new(self)
    }
}

/// Iterator over the elements of a [`Lane`].
#[derive(Debug, Clone)]
pub struct LaneIter<'a, T> {
    lane: Lane<'a, T>,
    counter: [usize; MAX_RANK],
    offset: usize,
    pos: usize,
}

impl<'a, T: Copy> LaneIter<'a, T> {
    fn new(lane: Lane<'a, T>) -> Self {
        LaneIter {
            lane,
            counter: [0; MAX_RANK],
            offset: 0,
            pos: 0,
        }
    }

    #[inline]
    fn advance(&mut self) {
        let Some(w) = self.lane.walk else {
            self.offset += 1;
            return;
        };
        for k in (0..w.dims.len()).rev() {
            self.counter[k] += 1;
            self.offset += w.strides[k];
            if self.counter[k] < w.dims[k] {
                return;
            }
            self.offset -= w.strides[k] * w.dims[k];
            self.counter[k] = 0;
        }
    }
}

impl<T: Copy> Iterator for LaneIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.pos >= self.lane.len {
            return None;
        }
        let v = self.lane.data[self.lane.base + self.offset];
        self.pos += 1;
        self.advance();
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.lane.len - self.pos;
        (rem, Some(rem))
    }
}

impl<T: Copy> ExactSizeIterator for LaneIter<'_, T> {}

/// A set of equally long lanes over one buffer, one per output element.
///
/// Lane `i` starts at the `i`th offset of the outer walk and reads along
/// the inner walk.
#[derive(Debug, Clone, Copy)]
pub struct Lanes<'a, T> {
    data: &'a [T],
    outer: &'a Walk,
    count: usize,
    inner: &'a Walk,
    lane_len: usize,
}

impl<'a, T: Copy> Lanes<'a, T> {
    /// A single contiguous lane spanning `data`.
    pub fn whole(data: &'a [T]) -> Self {
        Lanes {
            data,
            outer: &SCALAR_WALK,
            count: 1,
            inner: &SCALAR_WALK,
            lane_len: data.len(),
        }
    }

    /// One lane per position of `outer`, each reading along `inner`.
    pub fn new(data: &'a [T], outer: &'a Walk, inner: &'a Walk) -> Self {
        Lanes {
            data,
            outer,
            count: outer.len(),
            inner,
            lane_len: inner.len(),
        }
    }

    /// Number of lanes.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn lane_len(&self) -> usize {
        self.lane_len
    }

    #[inline]
    pub fn lane(&self, i: usize) -> Lane<'a, T> {
        let base = self.outer.offset_of(i);
        if self.inner.dims.is_empty() {
            // whole-buffer lane, or a lane of one element
            return Lane {
                data: self.data,
                base,
                walk: None,
                len: self.lane_len,
            };
        }
        Lane::at(self.data, base, self.inner)
    }
}
