// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Dispatch Module
//!
//! One routing entry point per legacy op family.
//!
//! Every entry point follows the same sequence:
//! 1. Resolve the opcode in the element type's table for the family
//!    (`InvalidOpcode` when absent).
//! 2. Bind the extras to the kernel's declared parameters
//!    (`InvalidAuxiliaryArity`).
//! 3. Validate operand shapes and axes (`ShapeMismatch`).
//! 4. Invoke the kernel exactly once, writing into `z`.
//!
//! Nothing is written before step 4, so `z` is untouched on every error.
//! The entry points hold no state and are safe to call from any thread.
//! Lane geometry lives on the stack; an accepted call allocates nothing.

use crate::enums::error::DispatchError;
use crate::enums::family::OpFamily;
use crate::kernels::lane::{Lane, Lanes, SCALAR_WALK};
use crate::kernels::routing::axes::{
    align_to_axes, check_reduced_output, check_scalar_output, dims_of, normalize_axes,
};
use crate::kernels::routing::broadcast::{
    broadcast_shape, broadcast_strides, broadcast_walk, can_broadcast_into, reduction_walks,
};
use crate::kernels::table::{KernelEntry, KernelTable};
use crate::structs::context::LaunchContext;
use crate::structs::ndarray::NdArray;
use crate::traits::element::Element;
use crate::traits::shape::Shape;

/// Runs `f`, logging a rejected call.
#[inline]
fn route<F>(family: OpFamily, opcode: i32, f: F) -> Result<(), DispatchError>
where
    F: FnOnce() -> Result<(), DispatchError>,
{
    f().inspect_err(|e| tracing::debug!(%family, opcode, error = %e, "dispatch rejected"))
}

#[inline]
fn resolve<T: Element, K: Copy>(
    table: &KernelTable<K>,
    opcode: i32,
) -> Result<&KernelEntry<K>, DispatchError> {
    table.resolve(opcode).ok_or(DispatchError::InvalidOpcode {
        family: table.family(),
        opcode,
        dtype: T::DTYPE,
    })
}

/// Logs a validated call. Emitted immediately before the kernel runs.
#[inline]
fn launch<T: Element, K>(family: OpFamily, entry: &KernelEntry<K>) {
    tracing::trace!(
        %family,
        opcode = entry.opcode,
        kernel = entry.name,
        dtype = %T::DTYPE,
        "dispatch"
    );
}

fn check_same_shape<T: Element>(
    family: OpFamily,
    x: &NdArray<T>,
    z: &NdArray<T>,
) -> Result<(), DispatchError> {
    if x.shape() == z.shape() {
        Ok(())
    } else {
        Err(DispatchError::shape(
            family,
            format!("output shape {:?} differs from input shape {:?}", z.shape(), x.shape()),
        ))
    }
}

fn check_broadcasts_into(
    family: OpFamily,
    y: &[usize],
    x: &[usize],
) -> Result<(), DispatchError> {
    if can_broadcast_into(y, x) {
        Ok(())
    } else {
        Err(DispatchError::shape(
            family,
            format!("operand y of shape {y:?} does not broadcast into x of shape {x:?}"),
        ))
    }
}

/// `z = op(x, scalar)` elementwise.
pub fn exec_scalar<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    scalar: T,
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Scalar;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().scalar, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        check_same_shape(FAMILY, x, z)?;
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, x.as_slice(), scalar, params, z.as_mut_slice());
        Ok(())
    })
}

/// `z = op(x)` elementwise.
pub fn exec_transform<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Transform;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().transform, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        check_same_shape(FAMILY, x, z)?;
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, x.as_slice(), params, z.as_mut_slice());
        Ok(())
    })
}

/// Summary statistic over all of `x` into a one-element `z`.
pub fn exec_summary_stats_scalar<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    extras: &[T],
    bias_corrected: bool,
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::SummaryStats;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().summary_stats, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        check_scalar_output(FAMILY, z.shape())?;
        let lanes = Lanes::whole(x.as_slice());
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &lanes, bias_corrected, params, z.as_mut_slice());
        Ok(())
    })
}

/// Summary statistic along `axis` of `x`.
pub fn exec_summary_stats<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    axis: &[i32],
    extras: &[T],
    bias_corrected: bool,
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::SummaryStats;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().summary_stats, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        let xd = dims_of(FAMILY, x.shape())?;
        let axes = normalize_axes(FAMILY, axis, xd.rank())?;
        check_reduced_output(FAMILY, &xd, &axes, z.shape())?;
        let (outer, inner) = reduction_walks(&xd, &xd.contiguous_strides(), &axes);
        let lanes = Lanes::new(x.as_slice(), &outer, &inner);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &lanes, bias_corrected, params, z.as_mut_slice());
        Ok(())
    })
}

/// Reduction over all of `x` into a one-element `z`.
pub fn exec_reduce_scalar<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Reduce;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().reduce, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        check_scalar_output(FAMILY, z.shape())?;
        let lanes = Lanes::whole(x.as_slice());
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &lanes, params, z.as_mut_slice());
        Ok(())
    })
}

/// Reduction along `axis` of `x`.
pub fn exec_reduce<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    axis: &[i32],
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Reduce;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().reduce, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        let xd = dims_of(FAMILY, x.shape())?;
        let axes = normalize_axes(FAMILY, axis, xd.rank())?;
        check_reduced_output(FAMILY, &xd, &axes, z.shape())?;
        let (outer, inner) = reduction_walks(&xd, &xd.contiguous_strides(), &axes);
        let lanes = Lanes::new(x.as_slice(), &outer, &inner);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &lanes, params, z.as_mut_slice());
        Ok(())
    })
}

/// Dual-array reduction over all of `x` and `y` into a one-element `z`.
/// `y` must broadcast into the shape of `x`.
pub fn exec_reduce3_scalar<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    y: &NdArray<T>,
    z: &mut NdArray<T>,
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Reduce3;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().reduce3, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        let xd = dims_of(FAMILY, x.shape())?;
        check_broadcasts_into(FAMILY, y.shape(), &xd)?;
        check_scalar_output(FAMILY, z.shape())?;
        let y_walk = broadcast_walk(y.shape(), &xd);
        let x_lanes = Lanes::whole(x.as_slice());
        let y_lanes = Lanes::new(y.as_slice(), &SCALAR_WALK, &y_walk);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &x_lanes, &y_lanes, params, z.as_mut_slice());
        Ok(())
    })
}

/// Dual-array reduction along `axis`. Lanes of `y`, broadcast into the
/// shape of `x`, pair with the matching lanes of `x`.
pub fn exec_reduce3<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    y: &NdArray<T>,
    z: &mut NdArray<T>,
    axis: &[i32],
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Reduce3;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().reduce3, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        let xd = dims_of(FAMILY, x.shape())?;
        check_broadcasts_into(FAMILY, y.shape(), &xd)?;
        let axes = normalize_axes(FAMILY, axis, xd.rank())?;
        check_reduced_output(FAMILY, &xd, &axes, z.shape())?;
        let (x_outer, x_inner) = reduction_walks(&xd, &xd.contiguous_strides(), &axes);
        let (y_outer, y_inner) = reduction_walks(&xd, &broadcast_strides(y.shape(), &xd), &axes);
        let x_lanes = Lanes::new(x.as_slice(), &x_outer, &x_inner);
        let y_lanes = Lanes::new(y.as_slice(), &y_outer, &y_inner);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &x_lanes, &y_lanes, params, z.as_mut_slice());
        Ok(())
    })
}

/// Index selection over all of `x`, written as `T` into a one-element `z`.
pub fn exec_index_reduce_scalar<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::IndexReduce;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().index_reduce, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        check_scalar_output(FAMILY, z.shape())?;
        let lanes = Lanes::whole(x.as_slice());
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &lanes, params, z.as_mut_slice());
        Ok(())
    })
}

/// Index selection along `axis`. Each output holds a position within its
/// lane, counted in row-major order over the reduced dimensions.
pub fn exec_index_reduce<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    z: &mut NdArray<T>,
    axis: &[i32],
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::IndexReduce;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().index_reduce, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        let xd = dims_of(FAMILY, x.shape())?;
        let axes = normalize_axes(FAMILY, axis, xd.rank())?;
        check_reduced_output(FAMILY, &xd, &axes, z.shape())?;
        let (outer, inner) = reduction_walks(&xd, &xd.contiguous_strides(), &axes);
        let lanes = Lanes::new(x.as_slice(), &outer, &inner);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, &lanes, params, z.as_mut_slice());
        Ok(())
    })
}

/// `z = op(x, y)` elementwise, `y` broadcast into the shape of `x`.
pub fn exec_pairwise<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    y: &NdArray<T>,
    z: &mut NdArray<T>,
    extras: &[T],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Pairwise;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().pairwise, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, extras)?;
        let xd = dims_of(FAMILY, x.shape())?;
        check_broadcasts_into(FAMILY, y.shape(), &xd)?;
        check_same_shape(FAMILY, x, z)?;
        let y_walk = broadcast_walk(y.shape(), &xd);
        let y_lane = Lane::strided(y.as_slice(), &y_walk);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, Lane::contiguous(x.as_slice()), y_lane, params, z.as_mut_slice());
        Ok(())
    })
}

/// `z = op(x, y)` over the broadcast shape of `x` and `y`.
///
/// With an empty `axis`, shapes align on trailing dimensions and `z` takes
/// their broadcast shape. Otherwise y's dimensions are placed onto the
/// strictly increasing `axis` dimensions of `x`, and `z` takes the shape
/// of `x`.
pub fn exec_broadcast<T: Element>(
    ctx: &LaunchContext,
    opcode: i32,
    x: &NdArray<T>,
    y: &NdArray<T>,
    z: &mut NdArray<T>,
    axis: &[i32],
) -> Result<(), DispatchError> {
    const FAMILY: OpFamily = OpFamily::Broadcast;
    route(FAMILY, opcode, || {
        let entry = resolve::<T, _>(&T::registry().broadcast, opcode)?;
        let params = entry.extras.bind(FAMILY, entry.name, &[])?;
        let xd = dims_of(FAMILY, x.shape())?;
        let y_shape = if axis.is_empty() {
            dims_of(FAMILY, y.shape())?
        } else {
            align_to_axes(FAMILY, y.shape(), axis, &xd)?
        };
        let out = broadcast_shape(&xd, &y_shape).ok_or_else(|| {
            DispatchError::shape(
                FAMILY,
                format!("shapes {:?} and {:?} are not broadcast-compatible", x.shape(), y.shape()),
            )
        })?;
        if z.shape() != out.as_slice() {
            return Err(DispatchError::shape(
                FAMILY,
                format!("output shape {:?} differs from broadcast shape {:?}", z.shape(), out),
            ));
        }
        let x_walk = broadcast_walk(&xd, &out);
        let y_walk = broadcast_walk(&y_shape, &out);
        let x_lane = Lane::strided(x.as_slice(), &x_walk);
        let y_lane = Lane::strided(y.as_slice(), &y_walk);
        launch::<T, _>(FAMILY, entry);
        (entry.kernel)(ctx, x_lane, y_lane, params, z.as_mut_slice());
        Ok(())
    })
}
