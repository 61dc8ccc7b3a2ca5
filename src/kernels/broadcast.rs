// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Broadcast Kernels
//!
//! The broadcast family reuses the pairwise element functions. It differs
//! only in how the routing layer lays out the operands: both sides may be
//! stretched, and the output takes the broadcast shape. Broadcast kernels
//! take no extras.

use crate::enums::family::OpFamily;
use crate::kernels::pairwise::{
    add, copy, divide, equal_to, greater_than, greater_than_or_equal, less_than,
    less_than_or_equal, max, min, multiply, not_equal_to, pow, reverse_divide, reverse_subtract,
    squared_difference, subtract,
};
use crate::kernels::table::{BinaryKernel, KernelTable};
use crate::structs::params::ExtrasSpec;
use crate::traits::element::Element;

/// Broadcast family table.
pub fn table<T: Element>() -> KernelTable<BinaryKernel<T>> {
    let mut t: KernelTable<BinaryKernel<T>> = KernelTable::new(OpFamily::Broadcast);
    t.register(0, "add", ExtrasSpec::NONE, add::<T>)
        .register(1, "subtract", ExtrasSpec::NONE, subtract::<T>)
        .register(2, "multiply", ExtrasSpec::NONE, multiply::<T>)
        .register(3, "divide", ExtrasSpec::NONE, divide::<T>)
        .register(4, "reverse_divide", ExtrasSpec::NONE, reverse_divide::<T>)
        .register(5, "reverse_subtract", ExtrasSpec::NONE, reverse_subtract::<T>)
        .register(6, "copy", ExtrasSpec::NONE, copy::<T>)
        .register(7, "equal_to", ExtrasSpec::NONE, equal_to::<T>)
        .register(8, "greater_than", ExtrasSpec::NONE, greater_than::<T>)
        .register(9, "greater_than_or_equal", ExtrasSpec::NONE, greater_than_or_equal::<T>)
        .register(10, "less_than", ExtrasSpec::NONE, less_than::<T>)
        .register(11, "less_than_or_equal", ExtrasSpec::NONE, less_than_or_equal::<T>)
        .register(12, "not_equal_to", ExtrasSpec::NONE, not_equal_to::<T>)
        .register(13, "max", ExtrasSpec::NONE, max::<T>)
        .register(14, "min", ExtrasSpec::NONE, min::<T>)
        .register(15, "pow", ExtrasSpec::NONE, pow::<T>)
        .register(16, "squared_difference", ExtrasSpec::NONE, squared_difference::<T>);
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_broadcast_kernel_takes_extras() {
        let t = table::<f64>();
        assert_eq!(t.len(), 17);
        assert!(t.iter().all(|e| e.extras.arity() == 0));
    }

    #[test]
    fn test_shares_pairwise_names() {
        let b = table::<f64>();
        let p = crate::kernels::pairwise::table::<f64>();
        for entry in b.iter() {
            assert!(p.opcode_of(entry.name).is_some(), "{} missing", entry.name);
        }
    }
}
