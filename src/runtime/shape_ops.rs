//! Shared axis resolution and join validation
//!
//! This module is the single source of truth for axis arithmetic and
//! cross-array compatibility checks. Every check here runs before any
//! device allocation: a join either validates completely or fails without
//! touching the allocator.

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Resolve an axis index against a rank, supporting negative indexing
///
/// Returns `None` if the axis falls outside `[-ndim, ndim)`. Rank 0 accepts
/// no axis at all.
#[inline]
pub fn resolve_axis(axis: isize, ndim: usize) -> Option<usize> {
    if ndim == 0 {
        return None;
    }
    let idx = if axis < 0 {
        let adjusted = ndim as isize + axis;
        if adjusted < 0 {
            return None;
        }
        adjusted as usize
    } else {
        axis as usize
    };
    if idx < ndim {
        Some(idx)
    } else {
        None
    }
}

/// Validated parameters for one join (concatenate) call
#[derive(Debug, Clone)]
pub struct JoinParams {
    /// Resolved join axis
    pub axis: usize,
    /// Common dtype of all members
    pub dtype: DType,
    /// Output shape (join-axis extent is the sum of all members' extents)
    pub out_shape: Vec<usize>,
}

/// Validate a join group and compute output parameters
///
/// Checks, in order: at least one member; axis within the first member's
/// rank; per member, matching dtype, matching rank, and pairwise-equal
/// extents on every axis other than the join axis (the offending axis is
/// named in the error). Nothing is allocated here.
pub fn validate_join<R: Runtime>(
    arrays: &[&Tensor<R>],
    axis: isize,
    op: &'static str,
) -> Result<JoinParams> {
    let first = *arrays.first().ok_or(Error::EmptyInput { op })?;
    let dtype = first.dtype();
    let ndim = first.ndim();

    let axis_idx = resolve_axis(axis, ndim).ok_or(Error::AxisOutOfBounds { axis, ndim })?;

    let mut join_total = first.shape()[axis_idx];
    for &array in &arrays[1..] {
        if array.dtype() != dtype {
            return Err(Error::DTypeMismatch {
                lhs: dtype,
                rhs: array.dtype(),
            });
        }
        if array.ndim() != ndim {
            return Err(Error::shape_mismatch(first.shape(), array.shape()));
        }
        for (i, (&a, &b)) in first.shape().iter().zip(array.shape().iter()).enumerate() {
            if i != axis_idx && a != b {
                return Err(Error::extent_mismatch(i, a, b));
            }
        }
        join_total += array.shape()[axis_idx];
    }

    let mut out_shape = first.shape().to_vec();
    out_shape[axis_idx] = join_total;

    Ok(JoinParams {
        axis: axis_idx,
        dtype,
        out_shape,
    })
}

/// Validate a stack axis against each input's own rank
///
/// Stacking bounds-checks `-ndim <= axis < ndim` per input BEFORE the unit
/// axis is inserted, so `axis == ndim` is rejected even though the output
/// has rank `ndim + 1`. The insertion position for `axis == -1` therefore
/// lands one before the end of the output.
pub fn validate_stack_axis<R: Runtime>(arrays: &[&Tensor<R>], axis: isize) -> Result<()> {
    for &array in arrays {
        let ndim = array.ndim();
        if axis < -(ndim as isize) || axis >= ndim as isize {
            return Err(Error::AxisOutOfBounds { axis, ndim });
        }
    }
    Ok(())
}

/// Split a tensor into chunks of a given size along an axis
///
/// Zero-copy: returns narrowed views into the original tensor. The last
/// chunk is smaller when the extent is not evenly divisible.
pub fn split_impl<R: Runtime>(
    tensor: &Tensor<R>,
    split_size: usize,
    axis: isize,
) -> Result<Vec<Tensor<R>>> {
    if split_size == 0 {
        return Err(Error::InvalidArgument {
            arg: "split_size",
            reason: "split_size must be greater than zero".to_string(),
        });
    }

    let ndim = tensor.ndim();
    let axis_idx = resolve_axis(axis, ndim).ok_or(Error::AxisOutOfBounds { axis, ndim })?;
    let extent = tensor.shape()[axis_idx];

    let mut result = Vec::new();
    let mut start = 0;
    while start < extent {
        let length = (extent - start).min(split_size);
        result.push(tensor.narrow(axis, start, length)?);
        start += length;
    }

    Ok(result)
}
