// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Axis Routing Module
//!
//! Validation of caller-supplied axis sequences and of the output shapes
//! the axed entry points accept.

use crate::enums::error::DispatchError;
use crate::enums::family::OpFamily;
use crate::kernels::routing::broadcast::can_broadcast_into;
use crate::structs::dims::{Dims, MAX_RANK};
use crate::traits::shape::Shape;

/// Copies `shape` inline, rejecting ranks above [`MAX_RANK`].
pub fn dims_of(family: OpFamily, shape: &[usize]) -> Result<Dims, DispatchError> {
    Dims::from_slice(shape).ok_or_else(|| {
        DispatchError::shape(
            family,
            format!("rank {} exceeds the supported maximum of {MAX_RANK}", shape.len()),
        )
    })
}

/// Validates `axes` against `rank` and returns them sorted.
///
/// Every axis must satisfy `0 <= axis < rank` and appear once. An empty
/// sequence selects every dimension.
pub fn normalize_axes(family: OpFamily, axes: &[i32], rank: usize) -> Result<Dims, DispatchError> {
    if rank > MAX_RANK {
        return Err(DispatchError::shape(
            family,
            format!("rank {rank} exceeds the supported maximum of {MAX_RANK}"),
        ));
    }
    let mut out = Dims::empty();
    if axes.is_empty() {
        (0..rank).for_each(|d| out.push(d));
        return Ok(out);
    }
    if axes.len() > rank {
        return Err(DispatchError::shape(
            family,
            format!("{} axes given for an operand of rank {rank}", axes.len()),
        ));
    }
    for &axis in axes {
        let dim = usize::try_from(axis)
            .ok()
            .filter(|&d| d < rank)
            .ok_or_else(|| {
                DispatchError::shape(
                    family,
                    format!("axis {axis} is out of range for an operand of rank {rank}"),
                )
            })?;
        out.push(dim);
    }
    out.sort_unstable();
    if let Some(w) = out.windows(2).find(|w| w[0] == w[1]) {
        return Err(DispatchError::shape(
            family,
            format!("axis {} appears more than once", w[0]),
        ));
    }
    Ok(out)
}

/// `shape` with the dimensions in `axes` removed.
pub fn reduced_shape(shape: &[usize], axes: &[usize]) -> Dims {
    let mut out = Dims::empty();
    for (d, &n) in shape.iter().enumerate() {
        if axes.binary_search(&d).is_err() {
            out.push(n);
        }
    }
    out
}

/// `shape` with the dimensions in `axes` set to 1.
pub fn reduced_shape_keep_dims(shape: &[usize], axes: &[usize]) -> Dims {
    let mut out = Dims::empty();
    for (d, &n) in shape.iter().enumerate() {
        out.push(if axes.binary_search(&d).is_ok() { 1 } else { n });
    }
    out
}

/// Checks `z` against the shape an axed reduction of `x` over `axes`
/// produces. Reduced dimensions may be dropped or kept as 1. When every
/// dimension is reduced, any one-element `z` is accepted.
pub fn check_reduced_output(
    family: OpFamily,
    x: &[usize],
    axes: &[usize],
    z: &[usize],
) -> Result<(), DispatchError> {
    let dropped = reduced_shape(x, axes);
    if z == dropped.as_slice() || z == reduced_shape_keep_dims(x, axes).as_slice() {
        return Ok(());
    }
    if dropped.is_empty() && z.is_scalar_shaped() {
        return Ok(());
    }
    Err(DispatchError::shape(
        family,
        format!("output shape {z:?} does not match reduction of {x:?} over axes {axes:?}, expected {dropped:?}"),
    ))
}

/// Checks that a scalar-shaped reduction has a one-element output.
pub fn check_scalar_output(family: OpFamily, z: &[usize]) -> Result<(), DispatchError> {
    if z.is_scalar_shaped() {
        Ok(())
    } else {
        Err(DispatchError::shape(
            family,
            format!(
                "scalar reduction needs a one-element output, found shape {z:?} ({} elements)",
                z.numel()
            ),
        ))
    }
}

/// Places `y` onto the dimensions of an `x` of rank `x_rank` named by
/// `axes`, returning y's shape at that rank with 1 elsewhere.
///
/// Axes must be strictly increasing and in range, and y must carry one
/// dimension per axis (extra leading size-1 dimensions are ignored).
pub fn align_to_axes(
    family: OpFamily,
    y: &[usize],
    axes: &[i32],
    x: &[usize],
) -> Result<Dims, DispatchError> {
    let sorted = normalize_axes(family, axes, x.len())?;
    if sorted.iter().zip(axes).any(|(&s, &a)| s as i32 != a) {
        return Err(DispatchError::shape(
            family,
            format!("broadcast axes {axes:?} must be strictly increasing"),
        ));
    }
    let mut y_dims = y;
    while y_dims.len() > axes.len() && y_dims[0] == 1 {
        y_dims = &y_dims[1..];
    }
    if y_dims.len() != axes.len() {
        return Err(DispatchError::shape(
            family,
            format!("operand y of shape {y:?} cannot be aligned onto axes {axes:?}"),
        ));
    }
    let mut aligned = Dims::filled(x.len(), 1);
    for (&d, &n) in sorted.iter().zip(y_dims) {
        aligned[d] = n;
    }
    if !can_broadcast_into(&aligned, x) {
        return Err(DispatchError::shape(
            family,
            format!("operand y of shape {y:?} does not match x {x:?} along axes {axes:?}"),
        ));
    }
    Ok(aligned)
}
