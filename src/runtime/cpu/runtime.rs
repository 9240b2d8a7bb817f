//! CPU runtime implementation

use super::client::CpuClient;
use super::device::CpuDevice;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::alloc::{alloc_zeroed, dealloc, Layout as AllocLayout};

/// Allocation alignment, wide enough for any SIMD load
pub(crate) const ALLOC_ALIGN: usize = 64;

/// Elements below this count are copied on the calling thread even with the
/// `rayon` feature enabled
#[cfg(feature = "rayon")]
const PAR_THRESHOLD: usize = 4096;

/// CPU compute runtime
///
/// The default runtime, available on any platform. Memory is allocated on
/// the heap with the system allocator; copy submissions complete before
/// returning.
#[derive(Clone, Debug, Default)]
pub struct CpuRuntime;

impl Runtime for CpuRuntime {
    type Device = CpuDevice;
    type Client = CpuClient;
    type Allocator = super::client::CpuAllocator;

    fn name() -> &'static str {
        "cpu"
    }

    fn allocate(size_bytes: usize, _device: &Self::Device) -> Result<u64> {
        if size_bytes == 0 {
            return Ok(0);
        }

        let layout = AllocLayout::from_size_align(size_bytes, ALLOC_ALIGN)
            .map_err(|_| Error::Allocation { size: size_bytes })?;

        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(Error::Allocation { size: size_bytes });
        }

        Ok(ptr as u64)
    }

    fn deallocate(ptr: u64, size_bytes: usize, _device: &Self::Device) {
        if ptr == 0 || size_bytes == 0 {
            return;
        }

        let layout = AllocLayout::from_size_align(size_bytes, ALLOC_ALIGN)
            .expect("invalid allocation layout");

        unsafe {
            dealloc(ptr as *mut u8, layout);
        }
    }

    fn copy_to_device(src: &[u8], dst: u64, _device: &Self::Device) -> Result<()> {
        if src.is_empty() || dst == 0 {
            return Ok(());
        }

        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), dst as *mut u8, src.len());
        }
        Ok(())
    }

    fn copy_from_device(src: u64, dst: &mut [u8], _device: &Self::Device) -> Result<()> {
        if dst.is_empty() || src == 0 {
            return Ok(());
        }

        unsafe {
            std::ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }

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
        _device: &Self::Device,
    ) -> Result<()> {
        debug_assert_eq!(shape.len(), strides.len());
        debug_assert_eq!(shape.len(), dst_shape.len());

        let numel: usize = shape.iter().product();
        if numel == 0 || src == 0 || dst == 0 {
            return Ok(());
        }

        let ndim = shape.len();
        if ndim == 0 {
            // Scalar region: one element at the view start.
            unsafe {
                std::ptr::copy_nonoverlapping(
                    (src as *const u8).offset(src_offset as isize * elem_size as isize),
                    dst as *mut u8,
                    elem_size,
                );
            }
            return Ok(());
        }

        // Row-major strides of the iteration space and of the destination.
        let mut iter_strides = vec![1usize; ndim];
        let mut dst_strides = vec![1usize; ndim];
        for i in (0..ndim - 1).rev() {
            iter_strides[i] = iter_strides[i + 1] * shape[i + 1];
            dst_strides[i] = dst_strides[i + 1] * dst_shape[i + 1];
        }
        let dst_region_start = axis_offset * dst_strides[axis];

        let copy_one = |flat: usize| {
            let mut rem = flat;
            let mut src_elem = src_offset as isize;
            let mut dst_elem = dst_region_start;
            for d in 0..ndim {
                let coord = rem / iter_strides[d];
                rem %= iter_strides[d];
                src_elem += coord as isize * strides[d];
                dst_elem += coord * dst_strides[d];
            }
            unsafe {
                std::ptr::copy_nonoverlapping(
                    (src as *const u8).offset(src_elem * elem_size as isize),
                    (dst as *mut u8).add(dst_elem * elem_size),
                    elem_size,
                );
            }
        };

        #[cfg(feature = "rayon")]
        if numel >= PAR_THRESHOLD {
            use rayon::prelude::*;
            (0..numel).into_par_iter().for_each(copy_one);
            return Ok(());
        }

        for flat in 0..numel {
            copy_one(flat);
        }
        Ok(())
    }

    fn default_device() -> Self::Device {
        CpuDevice::new()
    }

    fn default_client(device: &Self::Device) -> Self::Client {
        CpuClient::new(device.clone())
    }
}
