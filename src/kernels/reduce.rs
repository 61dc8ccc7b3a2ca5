// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Reduce Kernels
//!
//! One accumulated value per lane.
//!
//! Empty lanes yield the accumulator's identity: `0` for sums and counts,
//! `1` for products, `-inf`/`+inf` for max/min, NaN for means.

use crate::enums::family::OpFamily;
use crate::kernels::lane::{Lane, Lanes};
use crate::kernels::map_lanes;
use crate::kernels::table::{KernelTable, ReduceKernel};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

#[inline]
fn sum_of<T: Element>(lane: Lane<'_, T>, f: impl Fn(T) -> T) -> T {
    match lane.as_contiguous() {
        Some(xs) => xs.iter().fold(T::zero(), |acc, &v| acc + f(v)),
        None => lane.iter().fold(T::zero(), |acc, v| acc + f(v)),
    }
}

#[inline]
fn count_of<T: Element>(lane: Lane<'_, T>, pred: impl Fn(T) -> bool) -> T {
    T::from_len(lane.iter().filter(|&v| pred(v)).count())
}

reduce_kernel!(mean, |lane, _p| sum_of(lane, |v| v) / T::from_len(lane.len()));
reduce_kernel!(sum, |lane, _p| sum_of(lane, |v| v));
reduce_kernel!(max, |lane, _p| lane.iter().fold(T::neg_infinity(), T::max));
reduce_kernel!(min, |lane, _p| lane.iter().fold(T::infinity(), T::min));
reduce_kernel!(norm1, |lane, _p| sum_of(lane, T::abs));
reduce_kernel!(norm2, |lane, _p| sum_of(lane, |v| v * v).sqrt());
reduce_kernel!(norm_max, |lane, _p| lane.iter().fold(T::zero(), |acc, v| acc.max(v.abs())));
reduce_kernel!(prod, |lane, _p| lane.iter().fold(T::one(), |acc, v| acc * v));
reduce_kernel!(asum, |lane, _p| sum_of(lane, T::abs));
reduce_kernel!(
    /// Counts elements within `eps` of `target`.
    match_condition,
    |lane, p| count_of(lane, |v| (v - p[0]).abs() <= p[1])
);
reduce_kernel!(amax, |lane, _p| lane.iter().fold(T::neg_infinity(), |acc, v| acc.max(v.abs())));
reduce_kernel!(amin, |lane, _p| lane.iter().fold(T::infinity(), |acc, v| acc.min(v.abs())));
reduce_kernel!(amean, |lane, _p| sum_of(lane, T::abs) / T::from_len(lane.len()));
reduce_kernel!(
    /// `-sum(x * ln(x))`
    entropy,
    |lane, _p| -sum_of(lane, |v| v * v.ln())
);
reduce_kernel!(log_sum_exp, |lane, _p| log_sum_exp_lane(lane));
reduce_kernel!(
    /// `(sum |x|^p)^(1/p)`
    norm_p,
    |lane, p| sum_of(lane, |v| v.abs().powf(p[0])).powf(p[0].recip())
);
reduce_kernel!(squared_norm, |lane, _p| sum_of(lane, |v| v * v));
reduce_kernel!(count_non_zero, |lane, _p| count_of(lane, |v| v != T::zero()));
reduce_kernel!(count_zero, |lane, _p| count_of(lane, |v| v == T::zero()));

/// Max-shifted so large inputs do not overflow.
fn log_sum_exp_lane<T: Element>(lane: Lane<'_, T>) -> T {
    let m = lane.iter().fold(T::neg_infinity(), T::max);
    if m.is_infinite() {
        return m;
    }
    m + sum_of(lane, |v| (v - m).exp()).ln()
}

/// Reduce family table. Opcodes 2, 9, 10, 17, 18 and 20 are unassigned.
pub fn table<T: Element>() -> KernelTable<ReduceKernel<T>> {
    let mut t: KernelTable<ReduceKernel<T>> = KernelTable::new(OpFamily::Reduce);
    t.register(0, "mean", ExtrasSpec::NONE, mean::<T>)
        .register(1, "sum", ExtrasSpec::NONE, sum::<T>)
        .register(3, "max", ExtrasSpec::NONE, max::<T>)
        .register(4, "min", ExtrasSpec::NONE, min::<T>)
        .register(5, "norm1", ExtrasSpec::NONE, norm1::<T>)
        .register(6, "norm2", ExtrasSpec::NONE, norm2::<T>)
        .register(7, "norm_max", ExtrasSpec::NONE, norm_max::<T>)
        .register(8, "prod", ExtrasSpec::NONE, prod::<T>)
        .register(11, "asum", ExtrasSpec::NONE, asum::<T>)
        .register(
            12,
            "match_condition",
            ExtrasSpec::named(&["target", "eps"]),
            match_condition::<T>,
        )
        .register(13, "amax", ExtrasSpec::NONE, amax::<T>)
        .register(14, "amin", ExtrasSpec::NONE, amin::<T>)
        .register(15, "amean", ExtrasSpec::NONE, amean::<T>)
        .register(16, "entropy", ExtrasSpec::NONE, entropy::<T>)
        .register(19, "log_sum_exp", ExtrasSpec::NONE, log_sum_exp::<T>)
        .register(21, "norm_p", ExtrasSpec::named(&["p"]), norm_p::<T>)
        .register(22, "squared_norm", ExtrasSpec::NONE, squared_norm::<T>)
        .register(23, "count_non_zero", ExtrasSpec::NONE, count_non_zero::<T>)
        .register(24, "count_zero", ExtrasSpec::NONE, count_zero::<T>);
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn whole(opcode: i32, x: &[f64], extras: &[f64]) -> f64 {
        let t = table::<f64>();
        let entry = t.resolve(opcode).unwrap();
        let p = entry.extras.bind(OpFamily::Reduce, entry.name, extras).unwrap();
        let mut z = [0.0];
        (entry.kernel)(&LaunchContext::default(), &Lanes::whole(x), p, &mut z);
        z[0]
    }

    #[test]
    fn test_basic_accumulators() {
        let x = [1.0, -2.0, 3.0, 4.0];
        assert_eq!(whole(1, &x, &[]), 6.0);
        assert_eq!(whole(0, &x, &[]), 1.5);
        assert_eq!(whole(3, &x, &[]), 4.0);
        assert_eq!(whole(4, &x, &[]), -2.0);
        assert_eq!(whole(5, &x, &[]), 10.0);
        assert_eq!(whole(8, &x, &[]), -24.0);
        assert_eq!(whole(14, &x, &[]), 1.0);
        assert_relative_eq!(whole(6, &[3.0, 4.0], &[]), 5.0);
    }

    #[test]
    fn test_empty_lane_identities() {
        assert_eq!(whole(1, &[], &[]), 0.0);
        assert_eq!(whole(8, &[], &[]), 1.0);
        assert_eq!(whole(3, &[], &[]), f64::NEG_INFINITY);
        assert!(whole(0, &[], &[]).is_nan());
        assert_eq!(whole(23, &[], &[]), 0.0);
    }

    #[test]
    fn test_parameterised() {
        assert_eq!(whole(12, &[1.0, 1.01, 2.0, 0.995], &[1.0, 0.02]), 3.0);
        assert_relative_eq!(whole(21, &[3.0, 4.0], &[2.0]), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_sum_exp_is_stable() {
        let v = whole(19, &[1000.0, 1000.0], &[]);
        assert_relative_eq!(v, 1000.0 + 2f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_counts() {
        let x = [0.0, 1.0, 0.0, -3.0];
        assert_eq!(whole(23, &x, &[]), 2.0);
        assert_eq!(whole(24, &x, &[]), 2.0);
    }

    #[test]
    fn test_strided_lanes() {
        use crate::kernels::lane::Walk;

        // 2x3, one lane per column
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let outer = Walk::new(&[3], &[1]);
        let inner = Walk::new(&[2], &[3]);
        let lanes = Lanes::new(&data[..], &outer, &inner);
        let mut z = [0.0; 3];
        sum::<f64>(&LaunchContext::default(), &lanes, Params::none(), &mut z);
        assert_eq!(z, [5.0, 7.0, 9.0]);
        max::<f64>(&LaunchContext::default(), &lanes, Params::none(), &mut z);
        assert_eq!(z, [4.0, 5.0, 6.0]);
    }
}
