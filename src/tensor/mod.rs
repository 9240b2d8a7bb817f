//! Tensor types
//!
//! This module provides the core `Tensor` type, an n-dimensional array
//! stored on a compute device, together with its memory geometry (`Layout`)
//! and the reference-counted device buffer (`Storage`).

mod core;
mod layout;
mod storage;

pub use self::core::Tensor;
pub use layout::{Layout, Shape, Strides};
pub use storage::Storage;

use crate::error::Result;

/// Probe whether a layout can be reinterpreted under a new shape without
/// moving data
///
/// Returns the resolved strides on success and `None` when only a copying
/// reshape is possible — the negative probe result is not an error. An
/// element count mismatch is a [`ShapeMismatch`](crate::error::Error) error.
///
/// # Example
/// ```
/// use ndr::tensor::{can_reshape_without_copy, Layout};
/// let layout = Layout::contiguous(&[2, 3]);
/// assert!(can_reshape_without_copy(&layout, &[6]).unwrap().is_some());
/// let transposed = layout.transpose(0, 1).unwrap();
/// assert!(can_reshape_without_copy(&transposed, &[6]).unwrap().is_none());
/// ```
pub fn can_reshape_without_copy(layout: &Layout, new_shape: &[usize]) -> Result<Option<Strides>> {
    Ok(layout
        .nocopy_reshape(new_shape)?
        .map(|l| l.strides().iter().copied().collect()))
}
