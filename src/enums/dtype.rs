// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # DType Enum Module
//!
//! Runtime tag for the element types the dispatcher is instantiated over.
//! Generic entry points read it from [`crate::Element::DTYPE`]; the dynamic
//! layer reads it from [`crate::Tensor::dtype`].

use std::fmt;

/// Element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Float32,
    Float64,
}

impl DType {
    /// Width of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            DType::Float32 => 4,
            DType::Float64 => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Float32 => "f32",
            DType::Float64 => "f64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
