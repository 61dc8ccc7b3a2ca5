// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Reduce3 Kernels
//!
//! Dual-array reductions: distances and similarities between a lane of `x`
//! and the matching lane of `y`.

use crate::enums::family::OpFamily;
use crate::kernels::lane::{Lane, Lanes};
use crate::kernels::map_lane_pairs;
use crate::kernels::table::{KernelTable, Reduce3Kernel};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

#[inline]
fn fold_pairs<T: Element>(a: Lane<'_, T>, b: Lane<'_, T>, f: impl Fn(T, T) -> T) -> T {
    a.iter().zip(b.iter()).fold(T::zero(), |acc, (u, v)| acc + f(u, v))
}

fn dot_lanes<T: Element>(a: Lane<'_, T>, b: Lane<'_, T>) -> T {
    fold_pairs(a, b, |u, v| u * v)
}

fn cosine_similarity_lanes<T: Element>(a: Lane<'_, T>, b: Lane<'_, T>) -> T {
    let norm_a = dot_lanes(a, a).sqrt();
    let norm_b = dot_lanes(b, b).sqrt();
    dot_lanes(a, b) / (norm_a * norm_b)
}

reduce3_kernel!(manhattan, |a, b, _p| fold_pairs(a, b, |u, v| (u - v).abs()));
reduce3_kernel!(euclidean, |a, b, _p| fold_pairs(a, b, |u, v| (u - v) * (u - v)).sqrt());
reduce3_kernel!(cosine_similarity, |a, b, _p| cosine_similarity_lanes(a, b));
reduce3_kernel!(dot, |a, b, _p| dot_lanes(a, b));
reduce3_kernel!(
    /// Number of positions differing by more than `eps`.
    equals_with_eps,
    |a, b, p| fold_pairs(a, b, |u, v| T::from_bool((u - v).abs() > p[0]))
);
reduce3_kernel!(cosine_distance, |a, b, _p| T::one() - cosine_similarity_lanes(a, b));
reduce3_kernel!(
    /// `1 - sum(min) / sum(max)`
    jaccard_distance,
    |a, b, _p| T::one() - fold_pairs(a, b, T::min) / fold_pairs(a, b, T::max)
);
reduce3_kernel!(
    /// Fraction of positions that differ.
    hamming_distance,
    |a, b, _p| fold_pairs(a, b, |u, v| T::from_bool(u != v)) / T::from_len(a.len())
);

/// Reduce3 family table.
pub fn table<T: Element>() -> KernelTable<Reduce3Kernel<T>> {
    let mut t: KernelTable<Reduce3Kernel<T>> = KernelTable::new(OpFamily::Reduce3);
    t.register(0, "manhattan", ExtrasSpec::NONE, manhattan::<T>)
        .register(1, "euclidean", ExtrasSpec::NONE, euclidean::<T>)
        .register(2, "cosine_similarity", ExtrasSpec::NONE, cosine_similarity::<T>)
        .register(3, "dot", ExtrasSpec::NONE, dot::<T>)
        .register(4, "equals_with_eps", ExtrasSpec::named(&["eps"]), equals_with_eps::<T>)
        .register(5, "cosine_distance", ExtrasSpec::NONE, cosine_distance::<T>)
        .register(6, "jaccard_distance", ExtrasSpec::NONE, jaccard_distance::<T>)
        .register(7, "hamming_distance", ExtrasSpec::NONE, hamming_distance::<T>);
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair(opcode: i32, x: &[f64], y: &[f64], extras: &[f64]) -> f64 {
        let t = table::<f64>();
        let entry = t.resolve(opcode).unwrap();
        let p = entry.extras.bind(OpFamily::Reduce3, entry.name, extras).unwrap();
        let mut z = [0.0];
        (entry.kernel)(
            &LaunchContext::default(),
            &Lanes::whole(x),
            &Lanes::whole(y),
            p,
            &mut z,
        );
        z[0]
    }

    #[test]
    fn test_distances() {
        let x = [0.0, 0.0];
        let y = [3.0, 4.0];
        assert_eq!(pair(0, &x, &y, &[]), 7.0);
        assert_relative_eq!(pair(1, &x, &y, &[]), 5.0);
        assert_eq!(pair(3, &[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[]), 32.0);
    }

    #[test]
    fn test_cosine() {
        assert_relative_eq!(pair(2, &[1.0, 0.0], &[0.0, 1.0], &[]), 0.0);
        assert_relative_eq!(pair(2, &[1.0, 1.0], &[2.0, 2.0], &[]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pair(5, &[1.0, 1.0], &[2.0, 2.0], &[]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_counting_kernels() {
        assert_eq!(pair(4, &[1.0, 2.0, 3.0], &[1.0, 2.5, 3.05], &[0.1]), 1.0);
        assert_eq!(pair(7, &[1.0, 2.0, 3.0, 4.0], &[1.0, 0.0, 3.0, 0.0], &[]), 0.5);
        assert_relative_eq!(pair(6, &[1.0, 2.0], &[2.0, 2.0], &[]), 0.25);
    }
}
