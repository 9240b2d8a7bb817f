//! # ndr
//!
//! **Device-backed n-dimensional arrays with a strided layout and join engine.**
//!
//! ndr provides the layout core of an accelerator array runtime: shape and
//! stride reasoning, zero-copy views, reshape-without-copy resolution, and
//! the join operations (`concatenate`, `stack`, `hstack`, `vstack`,
//! `dstack`, `column_stack`) that combine arrays into one contiguous buffer.
//!
//! ## Design
//!
//! - **Layouts are values**: shape, strides and offset are immutable; every
//!   view produces a new descriptor over shared storage.
//! - **Backends are injected**: the engine talks to device memory only
//!   through the [`runtime::Runtime`] trait (allocation plus strided copy
//!   submission) and never reads ambient global state. The CPU runtime is
//!   the synchronous reference implementation.
//! - **Validation is fail-fast**: axis and shape errors surface before any
//!   allocation; a join is either fully submitted or fails clean.
//!
//! ## Quick Start
//!
//! ```
//! use ndr::ops::JoinOps;
//! use ndr::runtime::cpu::{CpuDevice, CpuRuntime};
//! use ndr::runtime::Runtime;
//! use ndr::tensor::Tensor;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0], &[2], &device);
//! let b = Tensor::<CpuRuntime>::from_slice(&[3.0f32, 4.0], &[2], &device);
//!
//! let stacked = client.stack(&[&a, &b], 0).unwrap();
//! assert_eq!(stacked.shape(), &[2, 2]);
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded CPU copy kernels

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::DType;
    pub use crate::error::{Error, Result};
    pub use crate::ops::JoinOps;
    pub use crate::runtime::cpu::CpuRuntime;
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
    pub use crate::tensor::{can_reshape_without_copy, Layout, Tensor};
}
