//! Copyright © 2025 Peter Garfield Bower. All rights reserved.
//!
//! # legacy-ops
//!
//! Type-generic opcode dispatch for legacy tensor operations.
//!
//! A call names an op family, an integer opcode and operands of one element
//! type. The dispatcher resolves the triple to exactly one registered
//! kernel, validates extras arity, shapes and axes at the boundary, and
//! invokes the kernel once. Nothing is written to the output on error.
//!
//! ```
//! use legacy_ops::{LaunchContext, NdArray, exec_scalar};
//!
//! let ctx = LaunchContext::default();
//! let x = NdArray::<f64>::vector(&[1.0, 2.0, 3.0]);
//! let mut z = NdArray::zeros(&[3]);
//! exec_scalar(&ctx, 0, &x, &mut z, 5.0, &[]).unwrap();
//! assert_eq!(z.as_slice(), &[6.0, 7.0, 8.0]);
//! ```

pub mod enums {
    pub mod dtype;
    pub mod error;
    pub mod family;
    pub mod tensor;
}

pub mod structs {
    pub mod context;
    pub mod dims;
    pub mod ndarray;
    pub mod params;
}

pub mod traits {
    pub mod element;
    pub mod shape;
}

pub mod kernels;

pub use enums::dtype::DType;
pub use enums::error::DispatchError;
pub use enums::family::OpFamily;
pub use enums::tensor::{ExtraArgs, ScalarValue, Tensor, TensorElement};

pub use structs::context::{DEFAULT_PARALLEL_THRESHOLD, Device, LaunchContext};
pub use structs::dims::{Dims, MAX_RANK};
pub use structs::ndarray::NdArray;
pub use structs::params::{ExtrasSpec, Params};

pub use traits::element::Element;
pub use traits::shape::Shape;

pub use kernels::lane::{Lane, Lanes, Walk};
pub use kernels::routing::{
    OpCall, exec_broadcast, exec_index_reduce, exec_index_reduce_scalar, exec_pairwise,
    exec_reduce, exec_reduce3, exec_reduce3_scalar, exec_reduce_scalar, exec_scalar,
    exec_summary_stats, exec_summary_stats_scalar, exec_transform, execute,
};
pub use kernels::table::{KernelEntry, KernelRegistry, KernelTable};

pub use vec64::Vec64;
