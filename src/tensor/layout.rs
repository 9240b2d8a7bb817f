//! Layout: shape, strides, and offset for array memory geometry

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Most arrays have 4 or fewer dimensions, so we stack-allocate up to 4
const STACK_DIMS: usize = 4;

/// Shape type: dimensions of an array
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Strides type: element offsets between consecutive elements along each dimension
/// Signed to support negative strides
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Layout describes the memory geometry of an array
///
/// An array's elements live in a device buffer, but not necessarily in
/// row-major order. The layout specifies how to compute the element offset
/// of any index tuple:
///
/// Offset of element at indices [i0, i1, ..., in]:
///   offset + i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
///
/// Layouts are immutable value types: every view operation (transpose,
/// narrow, unsqueeze, reshape) produces a new layout, never mutates one
/// in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    /// Shape: extent along each axis
    shape: Shape,
    /// Strides: offset (in elements) between consecutive elements along each axis
    strides: Strides,
    /// Offset: starting element index in the underlying storage
    offset: usize,
}

impl Layout {
    /// Create a new contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use ndr::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.iter().copied().collect();
        let strides = Self::contiguous_strides(&shape);
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Create a layout with explicit shape, strides, and offset
    pub fn new(shape: Shape, strides: Strides, offset: usize) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape,
            strides,
            offset,
        }
    }

    /// Create a scalar (0-dimensional) layout
    pub fn scalar() -> Self {
        Self {
            shape: SmallVec::new(),
            strides: SmallVec::new(),
            offset: 0,
        }
    }

    /// Compute canonical row-major strides for a shape
    fn contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::with_capacity(shape.len());
        let mut stride = 1isize;
        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim as isize;
        }
        strides.reverse();
        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Get the offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements (0 if any extent is 0)
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check if the array is a scalar (0 dimensions)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Check if memory is contiguous (row-major order)
    ///
    /// Derived purely from strides: an axis of extent 0 or 1 places no
    /// constraint on its stride, so such axes are skipped. A zero-size
    /// layout is trivially contiguous. The offset does not participate;
    /// copy paths account for it separately.
    pub fn is_contiguous(&self) -> bool {
        if self.elem_count() == 0 {
            return true;
        }
        let mut expected = 1isize;
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            if dim > 1 {
                if stride != expected {
                    return false;
                }
                expected *= dim as isize;
            }
        }
        true
    }

    /// Normalize an axis index (handle negative indices)
    pub fn normalize_axis(&self, axis: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if axis < 0 { ndim + axis } else { axis };
        if idx >= 0 && idx < ndim {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Create a transposed layout (swap two axes)
    pub fn transpose(&self, axis0: isize, axis1: isize) -> Option<Self> {
        let a0 = self.normalize_axis(axis0)?;
        let a1 = self.normalize_axis(axis1)?;

        let mut new_shape = self.shape.clone();
        let mut new_strides = self.strides.clone();
        new_shape.swap(a0, a1);
        new_strides.swap(a0, a1);

        Some(Self {
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
        })
    }

    /// Resolve strides for a reshape that reuses the underlying buffer
    ///
    /// Returns:
    /// - `Err(ShapeMismatch)` if the element counts differ (the reshape is
    ///   invalid regardless of copying);
    /// - `Ok(None)` if the data cannot be reinterpreted under the new shape
    ///   without moving it (the caller falls back to a copy) — this is a
    ///   normal negative probe result, not an error;
    /// - `Ok(Some(layout))` with the new strides otherwise. The offset is
    ///   preserved, so the layout views the same buffer region.
    ///
    /// The resolver walks runs of source axes whose extents multiply to the
    /// next group of target extents, requiring every interior axis of a run
    /// to be stride-contiguous with its neighbor
    /// (`stride[k-1] == shape[k] * stride[k]`). Axes of extent 1 are
    /// unconstrained and skipped on the source side; on the target side they
    /// receive the stride of the run they fall into.
    pub fn nocopy_reshape(&self, new_shape: &[usize]) -> Result<Option<Self>> {
        let new_count: usize = new_shape.iter().product();
        if new_count != self.elem_count() {
            return Err(Error::shape_mismatch(&self.shape, new_shape));
        }

        // Zero-size arrays hold no data; any stride assignment works.
        if new_count == 0 {
            let strides = Self::contiguous_strides(new_shape);
            return Ok(Some(Self::new(
                new_shape.iter().copied().collect(),
                strides,
                self.offset,
            )));
        }

        // Source axes of extent 1 carry no layout information.
        let mut old_dims: Shape = SmallVec::new();
        let mut old_strides: Strides = SmallVec::new();
        for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()) {
            if dim != 1 {
                old_dims.push(dim);
                old_strides.push(stride);
            }
        }

        let new_ndim = new_shape.len();
        let mut new_strides: Strides = smallvec::smallvec![0; new_ndim];

        let (mut oi, mut ni) = (0usize, 0usize);
        while ni < new_ndim && oi < old_dims.len() {
            let mut np = new_shape[ni];
            let mut op = old_dims[oi];
            let mut nj = ni + 1;
            let mut oj = oi + 1;

            // Grow the smaller side until the run products agree. Total
            // element counts match, so this always terminates in bounds.
            while np != op {
                if np < op {
                    np *= new_shape[nj];
                    nj += 1;
                } else {
                    op *= old_dims[oj];
                    oj += 1;
                }
            }

            // Every interior axis of the source run must be contiguous with
            // its faster neighbor, or the run cannot be regrouped in place.
            for k in oi + 1..oj {
                if old_strides[k - 1] != old_dims[k] as isize * old_strides[k] {
                    return Ok(None);
                }
            }

            new_strides[nj - 1] = old_strides[oj - 1];
            for k in (ni..nj - 1).rev() {
                new_strides[k] = new_strides[k + 1] * new_shape[k + 1] as isize;
            }

            ni = nj;
            oi = oj;
        }

        // Any remaining target axes have extent 1; their stride value is
        // irrelevant. Mirror the stride of the last resolved run (1 when the
        // source itself is a single element).
        let tail = if ni > 0 { new_strides[ni - 1] } else { 1 };
        for s in new_strides.iter_mut().skip(ni) {
            *s = tail;
        }

        Ok(Some(Self::new(
            new_shape.iter().copied().collect(),
            new_strides,
            self.offset,
        )))
    }

    /// Create a squeezed layout (remove axes of extent 1)
    pub fn squeeze(&self, axis: Option<isize>) -> Self {
        match axis {
            Some(a) => {
                if let Some(idx) = self.normalize_axis(a) {
                    if self.shape[idx] == 1 {
                        let mut new_shape = self.shape.clone();
                        let mut new_strides = self.strides.clone();
                        new_shape.remove(idx);
                        new_strides.remove(idx);
                        return Self::new(new_shape, new_strides, self.offset);
                    }
                }
                self.clone()
            }
            None => {
                let mut new_shape = Shape::new();
                let mut new_strides = Strides::new();
                for (&dim, &stride) in self.shape.iter().zip(self.strides.iter()) {
                    if dim != 1 {
                        new_shape.push(dim);
                        new_strides.push(stride);
                    }
                }
                Self::new(new_shape, new_strides, self.offset)
            }
        }
    }

    /// Create an unsqueezed layout (insert an axis of extent 1)
    ///
    /// Inserting a unit axis is always stride-representable: the new axis
    /// takes the position stride the displaced axis spans, or 1 past the
    /// last axis.
    pub fn unsqueeze(&self, axis: isize) -> Option<Self> {
        let ndim = self.ndim();
        let idx = if axis < 0 {
            let adjusted = ndim as isize + axis + 1;
            if adjusted < 0 {
                return None;
            }
            adjusted as usize
        } else {
            axis as usize
        };

        if idx > ndim {
            return None;
        }

        let new_stride = if idx < ndim {
            self.strides[idx] * self.shape[idx] as isize
        } else {
            1
        };

        let mut new_shape = self.shape.clone();
        let mut new_strides = self.strides.clone();
        new_shape.insert(idx, 1);
        new_strides.insert(idx, new_stride);

        Some(Self::new(new_shape, new_strides, self.offset))
    }

    /// Narrow an axis to `[start, start + length)` (zero-copy slice)
    ///
    /// Returns `None` if the requested range falls outside the axis.
    pub fn narrow(&self, axis: usize, start: usize, length: usize) -> Option<Self> {
        if axis >= self.ndim() {
            return None;
        }
        if start + length > self.shape[axis] {
            return None;
        }

        let mut new_shape = self.shape.clone();
        new_shape[axis] = length;
        let stride = self.strides[axis];
        let new_offset = self.offset as isize + start as isize * stride;

        Some(Self::new(
            new_shape,
            self.strides.clone(),
            new_offset as usize,
        ))
    }

    /// Create a broadcast layout to a target shape
    ///
    /// Returns `None` if the shapes are not broadcast-compatible.
    /// Broadcast axes get stride 0.
    pub fn broadcast_to(&self, target: &[usize]) -> Option<Self> {
        if target.len() < self.ndim() {
            return None;
        }

        let mut new_shape = Shape::new();
        let mut new_strides = Strides::new();

        let pad = target.len() - self.ndim();
        for &t in &target[..pad] {
            new_shape.push(t);
            new_strides.push(0);
        }

        for ((&dim, &stride), &t) in self
            .shape
            .iter()
            .zip(self.strides.iter())
            .zip(&target[pad..])
        {
            if dim == t {
                new_shape.push(t);
                new_strides.push(stride);
            } else if dim == 1 {
                new_shape.push(t);
                new_strides.push(0);
            } else {
                return None;
            }
        }

        Some(Self::new(new_shape, new_strides, self.offset))
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}
