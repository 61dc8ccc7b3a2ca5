// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Scalar Kernels
//!
//! `z[i] = f(x[i], scalar)` kernels. Comparison kernels write `1` or `0`.

use crate::enums::family::OpFamily;
use crate::kernels::map_unary;
use crate::kernels::table::{KernelTable, ScalarKernel};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

scalar_kernel!(add, |v, s, _p| v + s);
scalar_kernel!(subtract, |v, s, _p| v - s);
scalar_kernel!(multiply, |v, s, _p| v * s);
scalar_kernel!(divide, |v, s, _p| v / s);
scalar_kernel!(reverse_divide, |v, s, _p| s / v);
scalar_kernel!(reverse_subtract, |v, s, _p| s - v);
scalar_kernel!(max, |v, s, _p| v.max(s));
scalar_kernel!(min, |v, s, _p| v.min(s));
scalar_kernel!(less_than, |v, s, _p| T::from_bool(v < s));
scalar_kernel!(greater_than, |v, s, _p| T::from_bool(v > s));
scalar_kernel!(equal_to, |v, s, _p| T::from_bool(v == s));
scalar_kernel!(less_than_or_equal, |v, s, _p| T::from_bool(v <= s));
scalar_kernel!(greater_than_or_equal, |v, s, _p| T::from_bool(v >= s));
scalar_kernel!(not_equal_to, |v, s, _p| T::from_bool(v != s));
scalar_kernel!(set, |_v, s, _p| s);
scalar_kernel!(modulo, |v, s, _p| v % s);
scalar_kernel!(reverse_modulo, |v, s, _p| s % v);
scalar_kernel!(pow, |v, s, _p| v.powf(s));
scalar_kernel!(
    /// Replaces elements within `eps` of the scalar with `replacement`.
    set_if_close,
    |v, s, p| if (v - s).abs() <= p[1] { p[0] } else { v }
);

/// Scalar family table.
pub fn table<T: Element>() -> KernelTable<ScalarKernel<T>> {
    let mut t: KernelTable<ScalarKernel<T>> = KernelTable::new(OpFamily::Scalar);
    t.register(0, "add", ExtrasSpec::NONE, add::<T>)
        .register(1, "subtract", ExtrasSpec::NONE, subtract::<T>)
        .register(2, "multiply", ExtrasSpec::NONE, multiply::<T>)
        .register(3, "divide", ExtrasSpec::NONE, divide::<T>)
        .register(4, "reverse_divide", ExtrasSpec::NONE, reverse_divide::<T>)
        .register(5, "reverse_subtract", ExtrasSpec::NONE, reverse_subtract::<T>)
        .register(6, "max", ExtrasSpec::NONE, max::<T>)
        .register(7, "less_than", ExtrasSpec::NONE, less_than::<T>)
        .register(8, "greater_than", ExtrasSpec::NONE, greater_than::<T>)
        .register(9, "equal_to", ExtrasSpec::NONE, equal_to::<T>)
        .register(10, "less_than_or_equal", ExtrasSpec::NONE, less_than_or_equal::<T>)
        .register(11, "not_equal_to", ExtrasSpec::NONE, not_equal_to::<T>)
        .register(12, "min", ExtrasSpec::NONE, min::<T>)
        .register(13, "set", ExtrasSpec::NONE, set::<T>)
        .register(14, "modulo", ExtrasSpec::NONE, modulo::<T>)
        .register(15, "reverse_modulo", ExtrasSpec::NONE, reverse_modulo::<T>)
        .register(16, "greater_than_or_equal", ExtrasSpec::NONE, greater_than_or_equal::<T>)
        .register(17, "pow", ExtrasSpec::NONE, pow::<T>)
        .register(
            18,
            "set_if_close",
            ExtrasSpec::named(&["replacement", "eps"]),
            set_if_close::<T>,
        );
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kernel: ScalarKernel<f64>, x: &[f64], s: f64, extras: &[f64]) -> Vec<f64> {
        let ctx = LaunchContext::default();
        let spec = ExtrasSpec::named(&["replacement", "eps"]);
        let params = if extras.is_empty() {
            Params::none()
        } else {
            spec.bind(OpFamily::Scalar, "test", extras).unwrap()
        };
        let mut z = vec![0.0; x.len()];
        kernel(&ctx, x, s, params, &mut z);
        z
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run(add::<f64>, &[1.0, 2.0, 3.0], 5.0, &[]), vec![6.0, 7.0, 8.0]);
        assert_eq!(run(reverse_subtract::<f64>, &[1.0, 2.0], 5.0, &[]), vec![4.0, 3.0]);
        assert_eq!(run(reverse_divide::<f64>, &[2.0, 4.0], 8.0, &[]), vec![4.0, 2.0]);
        assert_eq!(run(modulo::<f64>, &[5.0, 7.0], 3.0, &[]), vec![2.0, 1.0]);
    }

    #[test]
    fn test_comparisons_write_ones_and_zeros() {
        assert_eq!(run(greater_than::<f64>, &[1.0, 5.0, 9.0], 5.0, &[]), vec![0.0, 0.0, 1.0]);
        assert_eq!(
            run(greater_than_or_equal::<f64>, &[1.0, 5.0, 9.0], 5.0, &[]),
            vec![0.0, 1.0, 1.0]
        );
        assert_eq!(run(not_equal_to::<f64>, &[1.0, 5.0], 5.0, &[]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_set_if_close() {
        let z = run(set_if_close::<f64>, &[1.0, 1.05, 2.0], 1.0, &[-1.0, 0.1]);
        assert_eq!(z, vec![-1.0, -1.0, 2.0]);
    }

    #[test]
    fn test_table_layout() {
        let t = table::<f32>();
        assert_eq!(t.len(), 19);
        assert_eq!(t.resolve(0).map(|e| e.name), Some("add"));
        assert_eq!(t.resolve(18).map(|e| e.extras.arity()), Some(2));
        assert!(t.resolve(19).is_none());
    }
}
