// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Params Module
//!
//! Auxiliary scalar parameters ("extras") for kernels.
//!
//! Callers pass a plain slice. Each registered kernel declares the named
//! parameters it consumes through an [`ExtrasSpec`]; the dispatcher checks
//! the slice against it and hands the kernel a bound [`Params`], so a
//! kernel never sees an extras slice of the wrong length.

use std::ops::Index;

use crate::enums::error::DispatchError;
use crate::enums::family::OpFamily;

/// Named, ordered parameter list of one kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtrasSpec {
    names: &'static [&'static str],
}

impl ExtrasSpec {
    /// Kernel takes no extras.
    pub const NONE: ExtrasSpec = ExtrasSpec { names: &[] };

    pub const fn named(names: &'static [&'static str]) -> Self {
        ExtrasSpec { names }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    /// Checks `values` against the declared arity.
    pub fn bind<'a, T: Copy>(
        &self,
        family: OpFamily,
        kernel: &'static str,
        values: &'a [T],
    ) -> Result<Params<'a, T>, DispatchError> {
        if values.len() != self.arity() {
            return Err(DispatchError::InvalidAuxiliaryArity {
                family,
                kernel,
                expected: self.arity(),
                found: values.len(),
            });
        }
        Ok(Params { spec: *self, values })
    }
}

/// Extras bound to a kernel's [`ExtrasSpec`].
///
/// Indexing by position cannot go out of range once bound.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a, T: Copy> {
    spec: ExtrasSpec,
    values: &'a [T],
}

impl<'a, T: Copy> Params<'a, T> {
    /// Empty parameter set.
    pub fn none() -> Params<'static, T> {
        Params {
            spec: ExtrasSpec::NONE,
            values: &[],
        }
    }

    /// Looks a parameter up by its declared name.
    pub fn named(&self, name: &str) -> Option<T> {
        self.spec.position(name).map(|i| self.values[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.values
    }
}

impl<T: Copy> Index<usize> for Params<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}
