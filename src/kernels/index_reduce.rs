// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Index Reduce Kernels
//!
//! One position per lane, written in the element type. `-1` marks an empty
//! lane, a lane with no eligible element, or a search with no match. NaN
//! elements never win a comparison, and ties resolve to the first
//! occurrence.

use crate::enums::family::OpFamily;
use crate::kernels::lane::{Lane, Lanes};
use crate::kernels::map_lanes;
use crate::kernels::table::{IndexReduceKernel, KernelTable};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

/// Position of the best `key(x)` under `better`.
#[inline]
fn select<T: Element>(lane: Lane<'_, T>, key: impl Fn(T) -> T, better: impl Fn(T, T) -> bool) -> T {
    let mut best: Option<(usize, T)> = None;
    for (i, v) in lane.iter().enumerate() {
        let k = key(v);
        if k.is_nan() {
            continue;
        }
        let replace = match best {
            None => true,
            Some((_, b)) => better(k, b),
        };
        if replace {
            best = Some((i, k));
        }
    }
    T::from_index(best.map_or(-1, |(i, _)| i as i64))
}

reduce_kernel!(argmax, |lane, _p| select(lane, |v| v, |a, b| a > b));
reduce_kernel!(argmin, |lane, _p| select(lane, |v| v, |a, b| a < b));
reduce_kernel!(iamax, |lane, _p| select(lane, T::abs, |a, b| a > b));
reduce_kernel!(iamin, |lane, _p| select(lane, T::abs, |a, b| a < b));
reduce_kernel!(
    /// First position holding a value above `threshold`.
    first_index,
    |lane, p| T::from_index(lane.iter().position(|v| v > p[0]).map_or(-1, |i| i as i64))
);
reduce_kernel!(
    /// Last position holding a value above `threshold`.
    last_index,
    |lane, p| {
        let hit = (0..lane.len()).rev().find(|&i| lane.get(i) > p[0]);
        T::from_index(hit.map_or(-1, |i| i as i64))
    }
);

/// Index-reduce family table.
pub fn table<T: Element>() -> KernelTable<IndexReduceKernel<T>> {
    let mut t: KernelTable<IndexReduceKernel<T>> = KernelTable::new(OpFamily::IndexReduce);
    t.register(0, "argmax", ExtrasSpec::NONE, argmax::<T>)
        .register(1, "argmin", ExtrasSpec::NONE, argmin::<T>)
        .register(2, "iamax", ExtrasSpec::NONE, iamax::<T>)
        .register(3, "iamin", ExtrasSpec::NONE, iamin::<T>)
        .register(4, "first_index", ExtrasSpec::named(&["threshold"]), first_index::<T>)
        .register(5, "last_index", ExtrasSpec::named(&["threshold"]), last_index::<T>);
    t
}
