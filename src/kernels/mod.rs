// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Kernels Module
//!
//! Reference CPU kernels for every legacy op family, the opcode tables they
//! are registered in, and the routing layer that validates and dispatches
//! calls to them.
//!
//! The loop helpers below are shared by the family modules. Each splits its
//! work across the `rayon` pool when the `parallel_proc` feature is on and
//! the call reaches the context's parallel threshold.

#[macro_use]
mod macros;

pub mod broadcast;
pub mod index_reduce;
pub mod lane;
pub mod pairwise;
pub mod reduce;
pub mod reduce3;
pub mod routing;
pub mod scalar;
pub mod summary_stats;
pub mod table;
pub mod transform;

#[cfg(feature = "parallel_proc")]
use rayon::prelude::*;

use crate::kernels::lane::{Lane, Lanes};
use crate::structs::context::LaunchContext;
use crate::traits::element::Element;

/// `z[i] = f(x[i])`
#[inline]
pub(crate) fn map_unary<T, F>(ctx: &LaunchContext, x: &[T], z: &mut [T], f: F)
where
    T: Element,
    F: Fn(T) -> T + Send + Sync,
{
    debug_assert_eq!(x.len(), z.len());
    if ctx.go_parallel(z.len()) {
        #[cfg(feature = "parallel_proc")]
        {
            z.par_iter_mut().zip(x.par_iter()).for_each(|(o, &v)| *o = f(v));
            return;
        }
    }
    for (o, &v) in z.iter_mut().zip(x) {
        *o = f(v);
    }
}

/// `z[i] = f(x[i], y[i])` with both lanes laid out over `z`.
#[inline]
pub(crate) fn map_binary<T, F>(ctx: &LaunchContext, x: Lane<'_, T>, y: Lane<'_, T>, z: &mut [T], f: F)
where
    T: Element,
    F: Fn(T, T) -> T + Send + Sync,
{
    debug_assert_eq!(x.len(), z.len());
    debug_assert_eq!(y.len(), z.len());
    if ctx.go_parallel(z.len()) {
        #[cfg(feature = "parallel_proc")]
        {
            z.par_iter_mut()
                .enumerate()
                .for_each(|(i, o)| *o = f(x.get(i), y.get(i)));
            return;
        }
    }
    if let (Some(xs), Some(ys)) = (x.as_contiguous(), y.as_contiguous()) {
        for ((o, &a), &b) in z.iter_mut().zip(xs).zip(ys) {
            *o = f(a, b);
        }
        return;
    }
    for (o, (a, b)) in z.iter_mut().zip(x.iter().zip(y.iter())) {
        *o = f(a, b);
    }
}

/// `z[i] = f(lane i)`
#[inline]
pub(crate) fn map_lanes<T, F>(ctx: &LaunchContext, lanes: &Lanes<'_, T>, z: &mut [T], f: F)
where
    T: Element,
    F: Fn(Lane<'_, T>) -> T + Send + Sync,
{
    debug_assert_eq!(lanes.count(), z.len());
    if ctx.go_parallel(lanes.count() * lanes.lane_len()) {
        #[cfg(feature = "parallel_proc")]
        {
            z.par_iter_mut()
                .enumerate()
                .for_each(|(i, o)| *o = f(lanes.lane(i)));
            return;
        }
    }
    for (i, o) in z.iter_mut().enumerate() {
        *o = f(lanes.lane(i));
    }
}

/// `z[i] = f(x lane i, y lane i)`
#[inline]
pub(crate) fn map_lane_pairs<T, F>(
    ctx: &LaunchContext,
    x: &Lanes<'_, T>,
    y: &Lanes<'_, T>,
    z: &mut [T],
    f: F,
) where
    T: Element,
    F: Fn(Lane<'_, T>, Lane<'_, T>) -> T + Send + Sync,
{
    debug_assert_eq!(x.count(), z.len());
    debug_assert_eq!(y.count(), z.len());
    debug_assert_eq!(x.lane_len(), y.lane_len());
    if ctx.go_parallel(x.count() * x.lane_len()) {
        #[cfg(feature = "parallel_proc")]
        {
            z.par_iter_mut()
                .enumerate()
                .for_each(|(i, o)| *o = f(x.lane(i), y.lane(i)));
            return;
        }
    }
    for (i, o) in z.iter_mut().enumerate() {
        *o = f(x.lane(i), y.lane(i));
    }
}
