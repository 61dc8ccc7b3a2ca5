// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Pairwise Kernels
//!
//! `z[i] = f(x[i], y[i])` kernels. The routing layer lays `y` out over the
//! shape of `x`, so a kernel only ever sees two lanes of the output length.
//!
//! The element functions here are also registered in the broadcast table.

use crate::enums::family::OpFamily;
use crate::kernels::lane::Lane;
use crate::kernels::map_binary;
use crate::kernels::table::{BinaryKernel, KernelTable};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

binary_kernel!(add, |a, b, _p| a + b);
binary_kernel!(subtract, |a, b, _p| a - b);
binary_kernel!(multiply, |a, b, _p| a * b);
binary_kernel!(divide, |a, b, _p| a / b);
binary_kernel!(reverse_divide, |a, b, _p| b / a);
binary_kernel!(reverse_subtract, |a, b, _p| b - a);
binary_kernel!(copy, |_a, b, _p| b);
binary_kernel!(equal_to, |a, b, _p| T::from_bool(a == b));
binary_kernel!(not_equal_to, |a, b, _p| T::from_bool(a != b));
binary_kernel!(greater_than, |a, b, _p| T::from_bool(a > b));
binary_kernel!(greater_than_or_equal, |a, b, _p| T::from_bool(a >= b));
binary_kernel!(less_than, |a, b, _p| T::from_bool(a < b));
binary_kernel!(less_than_or_equal, |a, b, _p| T::from_bool(a <= b));
binary_kernel!(max, |a, b, _p| a.max(b));
binary_kernel!(min, |a, b, _p| a.min(b));
binary_kernel!(pow, |a, b, _p| a.powf(b));
binary_kernel!(squared_difference, |a, b, _p| (a - b) * (a - b));
binary_kernel!(eps_equals, |a, b, p| T::from_bool((a - b).abs() <= p[0]));
binary_kernel!(
    /// `alpha * x + y`
    axpy,
    |a, b, p| p[0] * a + b
);

/// Pairwise family table.
pub fn table<T: Element>() -> KernelTable<BinaryKernel<T>> {
    let mut t: KernelTable<BinaryKernel<T>> = KernelTable::new(OpFamily::Pairwise);
    t.register(0, "add", ExtrasSpec::NONE, add::<T>)
        .register(1, "copy", ExtrasSpec::NONE, copy::<T>)
        .register(2, "divide", ExtrasSpec::NONE, divide::<T>)
        .register(3, "equal_to", ExtrasSpec::NONE, equal_to::<T>)
        .register(4, "greater_than", ExtrasSpec::NONE, greater_than::<T>)
        .register(5, "less_than", ExtrasSpec::NONE, less_than::<T>)
        .register(6, "multiply", ExtrasSpec::NONE, multiply::<T>)
        .register(7, "reverse_divide", ExtrasSpec::NONE, reverse_divide::<T>)
        .register(8, "reverse_subtract", ExtrasSpec::NONE, reverse_subtract::<T>)
        .register(9, "subtract", ExtrasSpec::NONE, subtract::<T>)
        .register(10, "eps_equals", ExtrasSpec::named(&["eps"]), eps_equals::<T>)
        .register(11, "greater_than_or_equal", ExtrasSpec::NONE, greater_than_or_equal::<T>)
        .register(12, "less_than_or_equal", ExtrasSpec::NONE, less_than_or_equal::<T>)
        .register(13, "max", ExtrasSpec::NONE, max::<T>)
        .register(14, "min", ExtrasSpec::NONE, min::<T>)
        .register(15, "not_equal_to", ExtrasSpec::NONE, not_equal_to::<T>)
        .register(16, "axpy", ExtrasSpec::named(&["alpha"]), axpy::<T>)
        .register(17, "pow", ExtrasSpec::NONE, pow::<T>)
        .register(18, "squared_difference", ExtrasSpec::NONE, squared_difference::<T>);
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::lane::Walk;

    #[test]
    fn test_contiguous_lanes() {
        let ctx = LaunchContext::default();
        let x = [1.0, 2.0, 3.0];
        let y = [10.0, 20.0, 30.0];
        let mut z = [0.0; 3];
        add::<f64>(&ctx, Lane::contiguous(&x), Lane::contiguous(&y), Params::none(), &mut z);
        assert_eq!(z, [11.0, 22.0, 33.0]);
        reverse_subtract::<f64>(&ctx, Lane::contiguous(&x), Lane::contiguous(&y), Params::none(), &mut z);
        assert_eq!(z, [9.0, 18.0, 27.0]);
    }

    #[test]
    fn test_broadcast_lane() {
        let ctx = LaunchContext::default();
        let x = [1.0, 2.0, 3.0];
        let y = [2.0];
        let walk = Walk::new(&[3], &[0]);
        let mut z = [0.0; 3];
        multiply::<f64>(&ctx, Lane::contiguous(&x), Lane::strided(&y, &walk), Params::none(), &mut z);
        assert_eq!(z, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_axpy_reads_alpha() {
        let ctx = LaunchContext::default();
        let spec = ExtrasSpec::named(&["alpha"]);
        let p = spec.bind(OpFamily::Pairwise, "axpy", &[2.0]).unwrap();
        let x = [1.0, 2.0];
        let y = [1.0, 1.0];
        let mut z = [0.0; 2];
        axpy::<f64>(&ctx, Lane::contiguous(&x), Lane::contiguous(&y), p, &mut z);
        assert_eq!(z, [3.0, 5.0]);
    }
}
