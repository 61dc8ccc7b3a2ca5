//! # Shape Trait Module
//!
//! Unified way to describe the dimensionality "shape" of an operand.
//!
//! Shapes are row-major dimension lists. A rank-0 shape (`[]`) holds one
//! element.

/// Shape trait.
///
/// Returns the dimension list for the receiver.
///
/// Includes accessors for common use cases e.g., rank, numel, which are
/// automatic provided the implementor implements `shape`.
pub trait Shape {
    /// Returns the dimension list, outermost first.
    fn shape(&self) -> &[usize];

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.shape().len()
    }

    /// Total element count implied by the shape.
    fn numel(&self) -> usize {
        self.shape().iter().product()
    }

    /// True when the shape holds exactly one element, whatever its rank.
    fn is_scalar_shaped(&self) -> bool {
        self.numel() == 1
    }
}

impl Shape for [usize] {
    fn shape(&self) -> &[usize] {
        self
    }
}

impl Shape for Vec<usize> {
    fn shape(&self) -> &[usize] {
        self
    }
}
