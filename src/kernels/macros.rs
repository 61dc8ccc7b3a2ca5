// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! Kernel-definition macros shared by the family modules.
//!
//! Each expands an element expression into a kernel function matching the
//! family's table signature in [`crate::kernels::table`].

/// `z = f(x, scalar)`
macro_rules! scalar_kernel {
    ($(#[$meta:meta])* $name:ident, |$v:ident, $s:ident, $p:ident| $body:expr) => {
        $(#[$meta])*
        pub(crate) fn $name<T: Element>(
            ctx: &LaunchContext,
            x: &[T],
            $s: T,
            $p: Params<'_, T>,
            z: &mut [T],
        ) {
            map_unary(ctx, x, z, |$v| $body)
        }
    };
}

/// `z = f(x)`
macro_rules! transform_kernel {
    ($(#[$meta:meta])* $name:ident, |$v:ident, $p:ident| $body:expr) => {
        $(#[$meta])*
        pub(crate) fn $name<T: Element>(
            ctx: &LaunchContext,
            x: &[T],
            $p: Params<'_, T>,
            z: &mut [T],
        ) {
            map_unary(ctx, x, z, |$v| $body)
        }
    };
}

/// `z = f(x, y)`, shared by the pairwise and broadcast tables.
macro_rules! binary_kernel {
    ($(#[$meta:meta])* $name:ident, |$a:ident, $b:ident, $p:ident| $body:expr) => {
        $(#[$meta])*
        pub(crate) fn $name<T: Element>(
            ctx: &LaunchContext,
            x: Lane<'_, T>,
            y: Lane<'_, T>,
            $p: Params<'_, T>,
            z: &mut [T],
        ) {
            map_binary(ctx, x, y, z, |$a, $b| $body)
        }
    };
}

/// One value per lane.
macro_rules! reduce_kernel {
    ($(#[$meta:meta])* $name:ident, |$lane:ident, $p:ident| $body:expr) => {
        $(#[$meta])*
        pub(crate) fn $name<T: Element>(
            ctx: &LaunchContext,
            lanes: &Lanes<'_, T>,
            $p: Params<'_, T>,
            z: &mut [T],
        ) {
            map_lanes(ctx, lanes, z, |$lane| $body)
        }
    };
}

/// One value per pair of lanes.
macro_rules! reduce3_kernel {
    ($(#[$meta:meta])* $name:ident, |$a:ident, $b:ident, $p:ident| $body:expr) => {
        $(#[$meta])*
        pub(crate) fn $name<T: Element>(
            ctx: &LaunchContext,
            x: &Lanes<'_, T>,
            y: &Lanes<'_, T>,
            $p: Params<'_, T>,
            z: &mut [T],
        ) {
            map_lane_pairs(ctx, x, y, z, |$a, $b| $body)
        }
    };
}
