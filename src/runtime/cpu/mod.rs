//! CPU runtime: the reference execution engine
//!
//! Memory lives on the heap and every copy submission completes before the
//! call returns, which makes this backend the oracle the layout and join
//! engine is tested against.

mod client;
mod device;
mod runtime;

pub use client::{CpuAllocator, CpuClient};
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
