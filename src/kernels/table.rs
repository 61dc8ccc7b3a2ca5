// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Kernel Table Module
//!
//! Opcode-indexed kernel tables, one per family and element type.
//!
//! Tables are built once, on first use of an element type, and are read
//! only afterwards. Resolution is a bounds-checked vector index: a
//! `(family, opcode, element type)` triple maps to one entry or to nothing.

use crate::enums::family::OpFamily;
use crate::kernels::lane::{Lane, Lanes};
use crate::kernels::{
    broadcast, index_reduce, pairwise, reduce, reduce3, scalar, summary_stats, transform,
};
use crate::structs::context::LaunchContext;
use crate::structs::params::{ExtrasSpec, Params};
use crate::traits::element::Element;

/// `z = f(x, scalar)` over contiguous buffers of equal length.
pub type ScalarKernel<T> = fn(&LaunchContext, &[T], T, Params<'_, T>, &mut [T]);

/// `z = f(x)` over contiguous buffers of equal length.
pub type TransformKernel<T> = fn(&LaunchContext, &[T], Params<'_, T>, &mut [T]);

/// `z[i] = f(x[i], y[i])` where both lanes are laid out over `z`.
pub type BinaryKernel<T> = fn(&LaunchContext, Lane<'_, T>, Lane<'_, T>, Params<'_, T>, &mut [T]);

/// One output element per lane.
pub type ReduceKernel<T> = fn(&LaunchContext, &Lanes<'_, T>, Params<'_, T>, &mut [T]);

/// One output element per pair of lanes.
pub type Reduce3Kernel<T> =
    fn(&LaunchContext, &Lanes<'_, T>, &Lanes<'_, T>, Params<'_, T>, &mut [T]);

/// One output element per lane, with the bias correction flag.
pub type SummaryStatsKernel<T> = fn(&LaunchContext, &Lanes<'_, T>, bool, Params<'_, T>, &mut [T]);

/// One index, written as `T`, per lane.
pub type IndexReduceKernel<T> = fn(&LaunchContext, &Lanes<'_, T>, Params<'_, T>, &mut [T]);

/// A registered kernel and its calling metadata.
#[derive(Debug, Clone, Copy)]
pub struct KernelEntry<K> {
    pub opcode: i32,
    pub name: &'static str,
    pub extras: ExtrasSpec,
    pub kernel: K,
}

/// Kernels of one family for one element type, indexed by opcode.
#[derive(Debug, Clone)]
pub struct KernelTable<K> {
    family: OpFamily,
    entries: Vec<Option<KernelEntry<K>>>,
}

impl<K: Copy> KernelTable<K> {
    pub fn new(family: OpFamily) -> Self {
        KernelTable {
            family,
            entries: Vec::new(),
        }
    }

    /// Registers `kernel` under `opcode`.
    ///
    /// Panics on a negative or already taken opcode. Tables are assembled
    /// once during registry construction, so either is a build defect.
    pub fn register(
        &mut self,
        opcode: i32,
        name: &'static str,
        extras: ExtrasSpec,
        kernel: K,
    ) -> &mut Self {
        let slot = usize::try_from(opcode)
            .unwrap_or_else(|_| panic!("{} opcode {} is negative", self.family, opcode));
        if slot >= self.entries.len() {
            self.entries.resize_with(slot + 1, || None);
        }
        assert!(
            self.entries[slot].is_none(),
            "{} opcode {} registered twice",
            self.family,
            opcode
        );
        self.entries[slot] = Some(KernelEntry {
            opcode,
            name,
            extras,
            kernel,
        });
        self
    }

    /// The entry registered under `opcode`, if any.
    #[inline]
    pub fn resolve(&self, opcode: i32) -> Option<&KernelEntry<K>> {
        usize::try_from(opcode)
            .ok()
            .and_then(|slot| self.entries.get(slot))
            .and_then(Option::as_ref)
    }

    pub fn family(&self) -> OpFamily {
        self.family
    }

    /// Registered entries in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &KernelEntry<K>> {
        self.entries.iter().flatten()
    }

    /// Number of registered kernels.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn opcodes(&self) -> Vec<i32> {
        self.iter().map(|e| e.opcode).collect()
    }

    /// Opcode of the kernel registered as `name`.
    pub fn opcode_of(&self, name: &str) -> Option<i32> {
        self.iter().find(|e| e.name == name).map(|e| e.opcode)
    }
}

/// Every family's kernel table for element type `T`.
///
/// Obtain the shared instance through [`Element::registry`].
#[derive(Debug, Clone)]
pub struct KernelRegistry<T: Element> {
    pub scalar: KernelTable<ScalarKernel<T>>,
    pub transform: KernelTable<TransformKernel<T>>,
    pub summary_stats: KernelTable<SummaryStatsKernel<T>>,
    pub reduce: KernelTable<ReduceKernel<T>>,
    pub reduce3: KernelTable<Reduce3Kernel<T>>,
    pub index_reduce: KernelTable<IndexReduceKernel<T>>,
    pub pairwise: KernelTable<BinaryKernel<T>>,
    pub broadcast: KernelTable<BinaryKernel<T>>,
}

impl<T: Element> KernelRegistry<T> {
    /// Builds every table. Called once per element type.
    pub fn new() -> Self {
        let registry = KernelRegistry {
            scalar: scalar::table(),
            transform: transform::table(),
            summary_stats: summary_stats::table(),
            reduce: reduce::table(),
            reduce3: reduce3::table(),
            index_reduce: index_reduce::table(),
            pairwise: pairwise::table(),
            broadcast: broadcast::table(),
        };
        tracing::debug!(
            dtype = %T::DTYPE,
            kernels = registry.kernel_count(),
            "kernel registry initialised"
        );
        registry
    }

    /// Registered opcodes of `family`.
    pub fn opcodes(&self, family: OpFamily) -> Vec<i32> {
        match family {
            OpFamily::Scalar => self.scalar.opcodes(),
            OpFamily::Transform => self.transform.opcodes(),
            OpFamily::SummaryStats => self.summary_stats.opcodes(),
            OpFamily::Reduce => self.reduce.opcodes(),
            OpFamily::Reduce3 => self.reduce3.opcodes(),
            OpFamily::IndexReduce => self.index_reduce.opcodes(),
            OpFamily::Pairwise => self.pairwise.opcodes(),
            OpFamily::Broadcast => self.broadcast.opcodes(),
        }
    }

    /// Name of the kernel `(family, opcode)` resolves to.
    pub fn kernel_name(&self, family: OpFamily, opcode: i32) -> Option<&'static str> {
        match family {
            OpFamily::Scalar => self.scalar.resolve(opcode).map(|e| e.name),
            OpFamily::Transform => self.transform.resolve(opcode).map(|e| e.name),
            OpFamily::SummaryStats => self.summary_stats.resolve(opcode).map(|e| e.name),
            OpFamily::Reduce => self.reduce.resolve(opcode).map(|e| e.name),
            OpFamily::Reduce3 => self.reduce3.resolve(opcode).map(|e| e.name),
            OpFamily::IndexReduce => self.index_reduce.resolve(opcode).map(|e| e.name),
            OpFamily::Pairwise => self.pairwise.resolve(opcode).map(|e| e.name),
            OpFamily::Broadcast => self.broadcast.resolve(opcode).map(|e| e.name),
        }
    }

    /// Opcode registered as `name` within `family`.
    pub fn opcode_of(&self, family: OpFamily, name: &str) -> Option<i32> {
        match family {
            OpFamily::Scalar => self.scalar.opcode_of(name),
            OpFamily::Transform => self.transform.opcode_of(name),
            OpFamily::SummaryStats => self.summary_stats.opcode_of(name),
            OpFamily::Reduce => self.reduce.opcode_of(name),
            OpFamily::Reduce3 => self.reduce3.opcode_of(name),
            OpFamily::IndexReduce => self.index_reduce.opcode_of(name),
            OpFamily::Pairwise => self.pairwise.opcode_of(name),
            OpFamily::Broadcast => self.broadcast.opcode_of(name),
        }
    }

    /// Total kernels across all families.
    pub fn kernel_count(&self) -> usize {
        OpFamily::ALL.iter().map(|f| self.opcodes(*f).len()).sum()
    }
}

impl<T: Element> Default for KernelRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
