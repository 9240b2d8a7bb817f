//! Runtime backends for array storage and data movement
//!
//! This module defines the `Runtime` trait and provides the CPU reference
//! implementation.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a specific compute unit)
//! ├── Client (dispatches operations, owns the submission queue)
//! └── Allocator (injected memory management surface)
//! ```
//!
//! The layout and join engine is backend-agnostic: it reasons about shapes
//! and strides on the host and talks to the device exclusively through
//! `allocate` and the copy primitives below. Copy submissions may complete
//! asynchronously on a backend's queue; the only ordering guarantee the
//! engine relies on is that submission order is preserved.

mod allocator;
pub mod shape_ops;

pub mod cpu;

pub use allocator::{Allocator, DefaultAllocator};

use crate::error::Result;

/// Core trait for compute backends
///
/// `Runtime` abstracts over different compute devices. It uses static
/// dispatch via generics for zero-cost abstraction.
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Memory allocator type
    type Allocator: Allocator;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Allocate device memory
    ///
    /// Returns a device pointer (u64) usable with the copy primitives.
    /// Fails with `Error::Allocation` when the device is out of memory.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64>;

    /// Deallocate device memory
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy data from host to device
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device) -> Result<()>;

    /// Copy data from device to host
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device) -> Result<()>;

    /// Submit a strided region copy into a contiguous destination
    ///
    /// Copies the full contents of a (possibly non-contiguous) source view
    /// into a contiguous destination buffer of shape `dst_shape`, placed at
    /// `axis_offset` along `axis`. This is the primitive the join executor
    /// submits one copy per member through; the source's own strides are
    /// honored, it is never required to be contiguous.
    ///
    /// # Parameters
    /// - `src`: source buffer handle
    /// - `src_offset`: element offset of the source view start
    /// - `shape`: shape of the source view (equals the destination region)
    /// - `strides`: strides of the source view, in elements
    /// - `dst`: destination buffer handle (contiguous, row-major)
    /// - `dst_shape`: full shape of the destination buffer
    /// - `axis`: axis along which the region is placed
    /// - `axis_offset`: element offset along `axis` of the region start
    /// - `elem_size`: size of one element in bytes
    #[allow(clippy::too_many_arguments)]
    fn copy_region(
        src: u64,
        src_offset: usize,
        shape: &[usize],
        strides: &[isize],
        dst: u64,
        dst_shape: &[usize],
        axis: usize,
        axis_offset: usize,
        elem_size: usize,
        device: &Self::Device,
    ) -> Result<()>;

    /// Copy a strided view into an identically-shaped contiguous buffer
    ///
    /// This is the degenerate `copy_region` used to materialize a
    /// non-contiguous view (`Tensor::contiguous`).
    fn copy_strided(
        src: u64,
        src_offset: usize,
        dst: u64,
        shape: &[usize],
        strides: &[isize],
        elem_size: usize,
        device: &Self::Device,
    ) -> Result<()> {
        Self::copy_region(
            src, src_offset, shape, strides, dst, shape, 0, 0, elem_size, device,
        )
    }

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that handle operation dispatch
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all submitted copies to complete
    fn synchronize(&self);

    /// Get the allocator for this client
    fn allocator(&self) -> &R::Allocator;
}
