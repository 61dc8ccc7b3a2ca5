// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Summary Statistics Kernels
//!
//! Variance and standard deviation per lane. With bias correction the sum
//! of squared deviations is divided by `n - 1` (Bessel's correction),
//! otherwise by `n`. A lane too short for its divisor yields NaN.

use crate::enums::family::OpFamily;
use crate::kernels::lane::{Lane, Lanes};
use crate::kernels::map_lanes;
use crate::kernels::table::{KernelTable, SummaryStatsKernel};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

/// Two-pass variance.
fn lane_variance<T: Element>(lane: Lane<'_, T>, bias_corrected: bool) -> T {
    let n = lane.len();
    let divisor = if bias_corrected { n.saturating_sub(1) } else { n };
    if divisor == 0 {
        return T::nan();
    }
    let mean = lane.iter().fold(T::zero(), |acc, v| acc + v) / T::from_len(n);
    let ss = lane.iter().fold(T::zero(), |acc, v| {
        let d = v - mean;
        acc + d * d
    });
    ss / T::from_len(divisor)
}

pub(crate) fn variance<T: Element>(
    ctx: &LaunchContext,
    lanes: &Lanes<'_, T>,
    bias_corrected: bool,
    _p: Params<'_, T>,
    z: &mut [T],
) {
    map_lanes(ctx, lanes, z, |lane| lane_variance(lane, bias_corrected))
}

pub(crate) fn standard_deviation<T: Element>(
    ctx: &LaunchContext,
    lanes: &Lanes<'_, T>,
    bias_corrected: bool,
    _p: Params<'_, T>,
    z: &mut [T],
) {
    map_lanes(ctx, lanes, z, |lane| lane_variance(lane, bias_corrected).sqrt())
}

/// Summary-stats family table.
pub fn table<T: Element>() -> KernelTable<SummaryStatsKernel<T>> {
    let mut t: KernelTable<SummaryStatsKernel<T>> = KernelTable::new(OpFamily::SummaryStats);
    t.register(0, "variance", ExtrasSpec::NONE, variance::<T>)
        .register(1, "standard_deviation", ExtrasSpec::NONE, standard_deviation::<T>);
    t
}
