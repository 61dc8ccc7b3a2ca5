// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! Heap allocations made while routing accepted calls.
//!
//! A counting global allocator tallies allocations per thread. Every entry
//! point is called once to build the kernel registry, then again under the
//! counter, which must stay at zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use legacy_ops::{
    LaunchContext, NdArray, exec_broadcast, exec_index_reduce, exec_pairwise, exec_reduce,
    exec_reduce3, exec_reduce3_scalar, exec_reduce_scalar, exec_scalar, exec_summary_stats,
    exec_transform,
};

struct Counting;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn bump() {
    let _ = ALLOCATIONS.try_with(|c| c.set(c.get() + 1));
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump();
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        bump();
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        bump();
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

/// Runs `f` twice and returns the allocations made by the second run.
fn allocations_after_warm_up(mut f: impl FnMut()) -> usize {
    f();
    let before = ALLOCATIONS.with(Cell::get);
    f();
    ALLOCATIONS.with(Cell::get) - before
}

fn sequential() -> LaunchContext {
    LaunchContext::default().with_parallel_threshold(usize::MAX)
}

fn iota(shape: &[usize]) -> NdArray<f64> {
    let n: usize = shape.iter().product();
    let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
    NdArray::from_slice(&values, shape)
}

#[test]
fn elementwise_calls_do_not_allocate() {
    let ctx = sequential();
    let x = iota(&[3, 4]);
    let mut z = NdArray::zeros(&[3, 4]);
    let n = allocations_after_warm_up(|| {
        exec_scalar(&ctx, 0, &x, &mut z, 2.0, &[]).unwrap();
        exec_transform(&ctx, 7, &x, &mut z, &[2.0]).unwrap();
    });
    assert_eq!(n, 0);
}

#[test]
fn broadcast_calls_do_not_allocate() {
    let ctx = sequential();
    let x = iota(&[3, 4]);
    let row = iota(&[4]);
    let col = iota(&[3, 1]);
    let col_y = iota(&[1, 5]);
    let along = iota(&[3]);
    let mut z = NdArray::zeros(&[3, 4]);
    let mut outer = NdArray::zeros(&[3, 5]);
    let n = allocations_after_warm_up(|| {
        exec_pairwise(&ctx, 0, &x, &row, &mut z, &[]).unwrap();
        exec_broadcast(&ctx, 2, &col, &col_y, &mut outer, &[]).unwrap();
        exec_broadcast(&ctx, 0, &x, &along, &mut z, &[0]).unwrap();
    });
    assert_eq!(n, 0);
}

#[test]
fn reductions_do_not_allocate() {
    let ctx = sequential();
    let x = iota(&[2, 3, 4]);
    let y = iota(&[3, 4]);
    let mut per_mid = NdArray::zeros(&[3]);
    let mut per_row = NdArray::zeros(&[2, 3]);
    let mut one = NdArray::zeros(&[1]);
    let n = allocations_after_warm_up(|| {
        exec_reduce(&ctx, 1, &x, &mut per_mid, &[0, 2], &[]).unwrap();
        exec_reduce(&ctx, 3, &x, &mut per_row, &[2], &[]).unwrap();
        exec_reduce_scalar(&ctx, 1, &x, &mut one, &[]).unwrap();
        exec_summary_stats(&ctx, 0, &x, &mut per_mid, &[0, 2], &[], true).unwrap();
        exec_index_reduce(&ctx, 0, &x, &mut per_row, &[2], &[]).unwrap();
        exec_reduce3(&ctx, 3, &x, &y, &mut per_row, &[2], &[]).unwrap();
        exec_reduce3_scalar(&ctx, 1, &x, &y, &mut one, &[]).unwrap();
    });
    assert_eq!(n, 0);
}
