// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Broadcast Routing Module
//!
//! Shape broadcasting and lane geometry.
//!
//! Shapes align on their trailing dimensions; a dimension of size 1, or a
//! missing leading dimension, stretches to match the other side. Operands
//! are never copied to broadcast them. Instead a zero stride is used for
//! each stretched dimension, and the kernel reads through a [`Walk`] built
//! from those strides.

use crate::kernels::lane::Walk;
use crate::structs::dims::{Dims, MAX_RANK};

/// Broadcast shape of `a` and `b`, or `None` when they are incompatible
/// or the result would exceed [`MAX_RANK`].
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Dims> {
    let rank = a.len().max(b.len());
    if rank > MAX_RANK {
        return None;
    }
    let mut out = Dims::filled(rank, 0);
    for i in 0..rank {
        let da = dim_from_end(a, rank - 1 - i);
        let db = dim_from_end(b, rank - 1 - i);
        out[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(out)
}

/// Whether `src` stretches to exactly `target` without changing `target`.
pub fn can_broadcast_into(src: &[usize], target: &[usize]) -> bool {
    src.len() <= target.len()
        && src
            .iter()
            .rev()
            .zip(target.iter().rev())
            .all(|(&s, &t)| s == t || s == 1)
}

/// Strides that read a contiguous `src` buffer laid out over `target`.
/// Stretched and missing dimensions get stride 0.
///
/// Caller guarantees `can_broadcast_into(src, target)` and that `target`
/// fits in [`MAX_RANK`].
pub fn broadcast_strides(src: &[usize], target: &[usize]) -> Dims {
    debug_assert!(can_broadcast_into(src, target));
    let lead = target.len() - src.len();
    let mut out = Dims::filled(target.len(), 0);
    let mut step = 1;
    for i in (lead..target.len()).rev() {
        let n = src[i - lead];
        if n != 1 {
            out[i] = step;
        }
        step *= n;
    }
    out
}

/// Walk reading a contiguous `src` buffer laid out over `target`.
pub(crate) fn broadcast_walk(src: &[usize], target: &[usize]) -> Walk {
    Walk::new(target, &broadcast_strides(src, target))
}

/// Outer and inner walks of a reduction over `axes` of `shape`.
///
/// The outer walk visits the kept dimensions, one position per output
/// element; the inner walk visits the reduced ones. `axes` must be sorted,
/// unique and in range of `shape`.
pub(crate) fn reduction_walks(shape: &[usize], strides: &[usize], axes: &[usize]) -> (Walk, Walk) {
    let kept = (0..shape.len()).filter(|d| axes.binary_search(d).is_err());
    let outer = Walk::over(shape, strides, kept);
    let inner = Walk::over(shape, strides, axes.iter().copied());
    (outer, inner)
}

#[inline]
fn dim_from_end(shape: &[usize], from_end: usize) -> usize {
    if from_end < shape.len() {
        shape[shape.len() - 1 - from_end]
    } else {
        1
    }
}
