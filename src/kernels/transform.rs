// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Transform Kernels
//!
//! `z[i] = f(x[i])` kernels, some parameterised through extras.

use crate::enums::family::OpFamily;
use crate::kernels::map_unary;
use crate::kernels::table::{KernelTable, TransformKernel};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

transform_kernel!(abs, |v, _p| v.abs());
transform_kernel!(ceil, |v, _p| v.ceil());
transform_kernel!(cos, |v, _p| v.cos());
transform_kernel!(exp, |v, _p| v.exp());
transform_kernel!(floor, |v, _p| v.floor());
transform_kernel!(log, |v, _p| v.ln());
transform_kernel!(neg, |v, _p| -v);
transform_kernel!(pow, |v, p| v.powf(p[0]));
transform_kernel!(round, |v, _p| v.round());
transform_kernel!(clip, |v, p| v.max(p[0]).min(p[1]));
transform_kernel!(sigmoid, |v, _p| T::one() / (T::one() + (-v).exp()));
transform_kernel!(
    /// `-1`, `0` or `1`; NaN stays NaN.
    sign,
    |v, _p| if v == T::zero() { T::zero() } else { v.signum() }
);
transform_kernel!(sin, |v, _p| v.sin());
transform_kernel!(softplus, |v, _p| v.exp().ln_1p());
transform_kernel!(sqrt, |v, _p| v.sqrt());
transform_kernel!(tanh, |v, _p| v.tanh());
transform_kernel!(identity, |v, _p| v);
transform_kernel!(relu, |v, p| if v < p[0] { T::zero() } else { v });
transform_kernel!(square, |v, _p| v * v);
transform_kernel!(reciprocal, |v, _p| v.recip());
transform_kernel!(leaky_relu, |v, p| if v < T::zero() { p[0] * v } else { v });
transform_kernel!(log1p, |v, _p| v.ln_1p());
transform_kernel!(expm1, |v, _p| v.exp_m1());
transform_kernel!(step, |v, p| T::from_bool(v > p[0]));

/// Transform family table.
pub fn table<T: Element>() -> KernelTable<TransformKernel<T>> {
    let mut t: KernelTable<TransformKernel<T>> = KernelTable::new(OpFamily::Transform);
    t.register(0, "abs", ExtrasSpec::NONE, abs::<T>)
        .register(1, "ceil", ExtrasSpec::NONE, ceil::<T>)
        .register(2, "cos", ExtrasSpec::NONE, cos::<T>)
        .register(3, "exp", ExtrasSpec::NONE, exp::<T>)
        .register(4, "floor", ExtrasSpec::NONE, floor::<T>)
        .register(5, "log", ExtrasSpec::NONE, log::<T>)
        .register(6, "neg", ExtrasSpec::NONE, neg::<T>)
        .register(7, "pow", ExtrasSpec::named(&["exponent"]), pow::<T>)
        .register(8, "round", ExtrasSpec::NONE, round::<T>)
        .register(9, "clip", ExtrasSpec::named(&["min", "max"]), clip::<T>)
        .register(10, "sigmoid", ExtrasSpec::NONE, sigmoid::<T>)
        .register(11, "sign", ExtrasSpec::NONE, sign::<T>)
        .register(12, "sin", ExtrasSpec::NONE, sin::<T>)
        .register(13, "softplus", ExtrasSpec::NONE, softplus::<T>)
        .register(14, "sqrt", ExtrasSpec::NONE, sqrt::<T>)
        .register(15, "tanh", ExtrasSpec::NONE, tanh::<T>)
        .register(16, "identity", ExtrasSpec::NONE, identity::<T>)
        .register(17, "relu", ExtrasSpec::named(&["cutoff"]), relu::<T>)
        .register(18, "square", ExtrasSpec::NONE, square::<T>)
        .register(19, "reciprocal", ExtrasSpec::NONE, reciprocal::<T>)
        .register(20, "leaky_relu", ExtrasSpec::named(&["alpha"]), leaky_relu::<T>)
        .register(21, "log1p", ExtrasSpec::NONE, log1p::<T>)
        .register(22, "expm1", ExtrasSpec::NONE, expm1::<T>)
        .register(23, "step", ExtrasSpec::named(&["cutoff"]), step::<T>);
    t
}
