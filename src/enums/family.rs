// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # OpFamily Enum Module
//!
//! Names the legacy operation families. A family groups the kernels that
//! share one calling shape: operand count, auxiliary parameter kind and
//! output shape rule.

use std::fmt;

/// Legacy operation family.
///
/// The family, together with an integer opcode and the element type,
/// identifies exactly one kernel in the [`crate::KernelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpFamily {
    /// `z = f(x, scalar)` elementwise.
    Scalar,
    /// `z = f(x)` elementwise.
    Transform,
    /// Variance-like statistics with an optional bias correction.
    SummaryStats,
    /// Axis-collapsing accumulation over one array.
    Reduce,
    /// Axis-collapsing accumulation over a pair of arrays, e.g. distances.
    Reduce3,
    /// Axis-collapsing selection that yields an index rather than a value.
    IndexReduce,
    /// `z = f(x, y)` elementwise, `y` broadcast into the shape of `x`.
    Pairwise,
    /// `z = f(x, y)` over the broadcast shape of both operands.
    Broadcast,
}

impl OpFamily {
    /// Every family, in registry order.
    pub const ALL: [OpFamily; 8] = [
        OpFamily::Scalar,
        OpFamily::Transform,
        OpFamily::SummaryStats,
        OpFamily::Reduce,
        OpFamily::Reduce3,
        OpFamily::IndexReduce,
        OpFamily::Pairwise,
        OpFamily::Broadcast,
    ];

    /// Stable lower-case name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            OpFamily::Scalar => "scalar",
            OpFamily::Transform => "transform",
            OpFamily::SummaryStats => "summary_stats",
            OpFamily::Reduce => "reduce",
            OpFamily::Reduce3 => "reduce3",
            OpFamily::IndexReduce => "index_reduce",
            OpFamily::Pairwise => "pairwise",
            OpFamily::Broadcast => "broadcast",
        }
    }

    /// Whether the family has an entry point taking an axis sequence.
    pub fn takes_axes(&self) -> bool {
        matches!(
            self,
            OpFamily::SummaryStats
                | OpFamily::Reduce
                | OpFamily::Reduce3
                | OpFamily::IndexReduce
                | OpFamily::Broadcast
        )
    }
}

impl fmt::Display for OpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_taking_families() {
        let axed: Vec<_> = OpFamily::ALL.iter().filter(|f| f.takes_axes()).collect();
        assert_eq!(axed.len(), 5);
        assert!(!OpFamily::Pairwise.takes_axes());
        assert!(!OpFamily::Transform.takes_axes());
    }

    #[test]
    fn test_display_matches_name() {
        for family in OpFamily::ALL {
            assert_eq!(family.to_string(), family.name());
        }
    }
}
