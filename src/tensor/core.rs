//! Core Tensor type

use super::{Layout, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::{shape_ops, Runtime};
use std::fmt;

/// N-dimensional array stored on a compute device
///
/// `Tensor` consists of:
/// - **Storage**: Reference-counted device memory
/// - **Layout**: Shape, strides, and offset defining the view into storage
///
/// # Zero-Copy Views
///
/// Operations like `transpose`, `narrow`, and (when the layout permits)
/// `reshape` create new tensors that share the same underlying storage:
/// Arc-wrapped storage plus a modified layout. Tensors are never mutated
/// in place; every operation that changes geometry returns a new value.
pub struct Tensor<R: Runtime> {
    /// Device memory
    storage: Storage<R>,
    /// Shape, strides, offset
    layout: Layout,
}

impl<R: Runtime> Tensor<R> {
    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape`
    /// dimensions. For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_slice(data, shape, device).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the
    /// `shape` dimensions, or if memory allocation fails.
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let storage = Storage::from_slice(data, device)?;
        let layout = Layout::contiguous(shape);

        Ok(Self { storage, layout })
    }

    /// Create an uninitialized tensor
    ///
    /// The contents are whatever the allocator returns; callers are expected
    /// to overwrite every element before reading.
    pub fn try_empty(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len: usize = shape.iter().product();
        let storage = Storage::new(len, dtype, device)?;
        let layout = Layout::contiguous(shape);

        Ok(Self { storage, layout })
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::try_zeros(shape, dtype, device).expect("Tensor::zeros failed")
    }

    /// Create a tensor filled with zeros (fallible version)
    pub fn try_zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len: usize = shape.iter().product();
        let bytes = vec![0u8; len * dtype.size_in_bytes()];
        let storage = Storage::from_bytes(&bytes, dtype, device)?;
        let layout = Layout::contiguous(shape);

        Ok(Self { storage, layout })
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Check if the tensor is contiguous in memory
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    // ===== View Operations (Zero-Copy) =====

    /// Transpose two axes (zero-copy)
    pub fn transpose(&self, axis0: isize, axis1: isize) -> Result<Self> {
        let new_layout =
            self.layout
                .transpose(axis0, axis1)
                .ok_or_else(|| Error::AxisOutOfBounds {
                    axis: axis0,
                    ndim: self.ndim(),
                })?;

        Ok(Self {
            storage: self.storage.clone(),
            layout: new_layout,
        })
    }

    /// Reshape to a new shape
    ///
    /// When the current layout can be reinterpreted under the new shape
    /// (probed via [`Layout::nocopy_reshape`]) this is a zero-copy view.
    /// Otherwise the data is packed into a fresh contiguous buffer first.
    /// An element count mismatch is an error either way.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        match self.layout.nocopy_reshape(shape)? {
            Some(layout) => Ok(Self {
                storage: self.storage.clone(),
                layout,
            }),
            None => {
                let packed = self.contiguous()?;
                Ok(Self {
                    storage: packed.storage,
                    layout: Layout::contiguous(shape),
                })
            }
        }
    }

    /// Flatten to 1D
    pub fn flatten(&self) -> Result<Self> {
        self.reshape(&[self.numel()])
    }

    /// Remove axes of extent 1 (zero-copy)
    pub fn squeeze(&self, axis: Option<isize>) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.squeeze(axis),
        }
    }

    /// Insert an axis of extent 1 (zero-copy)
    pub fn unsqueeze(&self, axis: isize) -> Result<Self> {
        let new_layout = self
            .layout
            .unsqueeze(axis)
            .ok_or_else(|| Error::AxisOutOfBounds {
                axis,
                ndim: self.ndim() + 1,
            })?;

        Ok(Self {
            storage: self.storage.clone(),
            layout: new_layout,
        })
    }

    /// View with at least one dimension (zero-copy)
    ///
    /// Scalars become shape `[1]`; everything else passes through.
    pub fn atleast_1d(&self) -> Result<Self> {
        if self.ndim() >= 1 {
            Ok(self.clone())
        } else {
            self.unsqueeze(0)
        }
    }

    /// View with at least two dimensions (zero-copy)
    ///
    /// A rank-1 array of shape `(n,)` becomes a single row `(1, n)`.
    pub fn atleast_2d(&self) -> Result<Self> {
        match self.ndim() {
            0 => self.unsqueeze(0)?.unsqueeze(0),
            1 => self.unsqueeze(0),
            _ => Ok(self.clone()),
        }
    }

    /// View with at least three dimensions (zero-copy)
    ///
    /// `()` becomes `(1, 1, 1)`, `(n,)` becomes `(1, n, 1)` and `(r, c)`
    /// becomes `(r, c, 1)`.
    pub fn atleast_3d(&self) -> Result<Self> {
        match self.ndim() {
            0 => self.unsqueeze(0)?.unsqueeze(0)?.unsqueeze(0),
            1 => self.unsqueeze(0)?.unsqueeze(2),
            2 => self.unsqueeze(2),
            _ => Ok(self.clone()),
        }
    }

    /// Narrow an axis (zero-copy slice)
    ///
    /// Returns a view narrowed to `length` elements starting at `start`
    /// along `axis` (negative indexing supported).
    pub fn narrow(&self, axis: isize, start: usize, length: usize) -> Result<Self> {
        let axis_idx = self
            .layout
            .normalize_axis(axis)
            .ok_or(Error::AxisOutOfBounds {
                axis,
                ndim: self.ndim(),
            })?;

        let new_layout =
            self.layout
                .narrow(axis_idx, start, length)
                .ok_or_else(|| Error::ShapeMismatch {
                    expected: vec![self.shape()[axis_idx]],
                    got: vec![start, length],
                })?;

        Ok(Self {
            storage: self.storage.clone(),
            layout: new_layout,
        })
    }

    /// Broadcast to a target shape (zero-copy)
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let new_layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::shape_mismatch(self.shape(), shape))?;

        Ok(Self {
            storage: self.storage.clone(),
            layout: new_layout,
        })
    }

    /// Split into chunks of `split_size` along an axis (zero-copy views)
    ///
    /// The last chunk is smaller when the extent is not evenly divisible.
    pub fn split(&self, split_size: usize, axis: isize) -> Result<Vec<Self>> {
        shape_ops::split_impl(self, split_size, axis)
    }

    /// Make the tensor contiguous (copy if needed)
    ///
    /// If the tensor is already stride-contiguous this is a zero-copy view.
    /// Otherwise new storage is allocated and the strided view materialized
    /// through the runtime's `copy_strided` primitive.
    pub fn contiguous(&self) -> Result<Self> {
        if self.is_contiguous() && self.layout.offset() == 0 {
            return Ok(self.clone());
        }

        let dtype = self.dtype();
        let device = self.storage.device();
        let new_storage = Storage::new(self.numel(), dtype, device)?;
        let new_layout = Layout::contiguous(self.shape());

        R::copy_strided(
            self.storage.ptr(),
            self.layout.offset(),
            new_storage.ptr(),
            self.shape(),
            self.strides(),
            dtype.size_in_bytes(),
            device,
        )?;

        Ok(Self {
            storage: new_storage,
            layout: new_layout,
        })
    }

    // ===== Data Access =====

    /// Copy tensor data to a Vec on the host
    ///
    /// # Panics
    ///
    /// Panics if the tensor is not contiguous (materialize the view with
    /// [`Self::contiguous`] first) or if the device readback fails.
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        assert!(
            self.is_contiguous(),
            "tensor must be contiguous to copy to vec"
        );

        let numel = self.numel();
        let elem_size = std::mem::size_of::<T>();
        let byte_offset = self.layout.offset() * elem_size;

        // Allocate with correct alignment for T, then cast to bytes for the
        // copy. A Vec<u8> cast to a stricter-aligned type would violate
        // alignment.
        let mut result = vec![T::zeroed(); numel];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        let src_ptr = self.storage.ptr() as usize + byte_offset;
        R::copy_from_device(src_ptr as u64, bytes, self.storage.device())
            .expect("copy_from_device failed in to_vec()");
        result
    }
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("contiguous", &self.is_contiguous())
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::{CpuDevice, CpuRuntime};

    #[test]
    fn test_from_slice() {
        let device = CpuDevice::new();
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[2, 3], &device);

        assert_eq!(tensor.shape(), &[2, 3]);
        assert_eq!(tensor.dtype(), DType::F32);
        assert!(tensor.is_contiguous());
        assert_eq!(tensor.numel(), 6);

        let result: Vec<f32> = tensor.to_vec();
        assert_eq!(result, data);
    }

    #[test]
    fn test_from_slice_count_mismatch() {
        let device = CpuDevice::new();
        let result = Tensor::<CpuRuntime>::try_from_slice(&[1.0f32, 2.0], &[3], &device);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_transpose_not_contiguous() {
        let device = CpuDevice::new();
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[2, 3], &device);

        let transposed = tensor.transpose(0, 1).unwrap();
        assert_eq!(transposed.shape(), &[3, 2]);
        assert!(!transposed.is_contiguous());
    }

    #[test]
    fn test_contiguous_from_transpose() {
        let device = CpuDevice::new();
        // [[1, 2, 3], [4, 5, 6]]
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[2, 3], &device);

        let transposed = tensor.transpose(0, 1).unwrap();
        let packed = transposed.contiguous().unwrap();
        assert!(packed.is_contiguous());
        assert_eq!(packed.shape(), &[3, 2]);

        let result: Vec<f32> = packed.to_vec();
        assert_eq!(result, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_reshape_zero_copy() {
        let device = CpuDevice::new();
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[2, 3], &device);

        let reshaped = tensor.reshape(&[3, 2]).unwrap();
        assert_eq!(reshaped.shape(), &[3, 2]);
        // Same buffer, reinterpreted.
        assert_eq!(reshaped.storage().ptr(), tensor.storage().ptr());
        let result: Vec<f32> = reshaped.to_vec();
        assert_eq!(result, data);
    }

    #[test]
    fn test_reshape_copy_fallback() {
        let device = CpuDevice::new();
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[2, 3], &device);

        // A transposed view cannot be flattened in place; reshape packs it.
        let transposed = tensor.transpose(0, 1).unwrap();
        let flat = transposed.reshape(&[6]).unwrap();
        assert_ne!(flat.storage().ptr(), tensor.storage().ptr());
        let result: Vec<f32> = flat.to_vec();
        assert_eq!(result, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_squeeze_unsqueeze() {
        let device = CpuDevice::new();
        let data = [1.0f32, 2.0, 3.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[1, 3, 1], &device);

        let squeezed = tensor.squeeze(None);
        assert_eq!(squeezed.shape(), &[3]);

        let unsqueezed = squeezed.unsqueeze(0).unwrap();
        assert_eq!(unsqueezed.shape(), &[1, 3]);
    }

    #[test]
    fn test_atleast_promotions() {
        let device = CpuDevice::new();
        let scalar = Tensor::<CpuRuntime>::from_slice(&[5.0f32], &[], &device);
        assert_eq!(scalar.atleast_1d().unwrap().shape(), &[1]);
        assert_eq!(scalar.atleast_2d().unwrap().shape(), &[1, 1]);
        assert_eq!(scalar.atleast_3d().unwrap().shape(), &[1, 1, 1]);

        let vector = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0], &[3], &device);
        assert_eq!(vector.atleast_2d().unwrap().shape(), &[1, 3]);
        assert_eq!(vector.atleast_3d().unwrap().shape(), &[1, 3, 1]);

        let matrix =
            Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2], &device);
        assert_eq!(matrix.atleast_3d().unwrap().shape(), &[2, 2, 1]);
    }

    #[test]
    fn test_narrow_view_data() {
        let device = CpuDevice::new();
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = Tensor::<CpuRuntime>::from_slice(&data, &[3, 2], &device);

        let rows = tensor.narrow(0, 1, 2).unwrap();
        assert_eq!(rows.shape(), &[2, 2]);
        let result: Vec<f32> = rows.contiguous().unwrap().to_vec();
        assert_eq!(result, [3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_zeros() {
        let device = CpuDevice::new();
        let tensor = Tensor::<CpuRuntime>::zeros(&[2, 3], DType::F32, &device);
        assert_eq!(tensor.shape(), &[2, 3]);
        let result: Vec<f32> = tensor.to_vec();
        assert_eq!(result, [0.0; 6]);
    }
}
