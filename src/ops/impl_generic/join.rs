//! Generic implementations of the join operations.
//!
//! The stacking variants are normalization rules (rank promotion plus an
//! axis choice) over the concatenate primitive; the primitive itself
//! validates the join group, performs the single output allocation, and
//! submits one strided copy per member in input order.

use crate::error::{Error, Result};
use crate::runtime::{shape_ops, Runtime, RuntimeClient};
use crate::tensor::Tensor;
use log::trace;

/// Concatenate primitive: join arrays along a resolved axis
///
/// Validation runs to completion before the output buffer is allocated, so
/// a failing join never touches the allocator. Each member is then copied
/// through `Runtime::copy_region` at its cumulative offset along the join
/// axis, honoring the member's own strides. Submission order is input
/// order.
pub fn concatenate_impl<R, C>(client: &C, arrays: &[&Tensor<R>], axis: isize) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    let params = shape_ops::validate_join(arrays, axis, "concatenate")?;

    let out = Tensor::<R>::try_empty(&params.out_shape, params.dtype, client.device())?;
    let elem_size = params.dtype.size_in_bytes();

    let mut axis_offset = 0usize;
    for &array in arrays {
        trace!(
            "join: copy member {:?} -> {:?} at axis {} offset {}",
            array.shape(),
            params.out_shape,
            params.axis,
            axis_offset,
        );
        R::copy_region(
            array.storage().ptr(),
            array.layout().offset(),
            array.shape(),
            array.strides(),
            out.storage().ptr(),
            &params.out_shape,
            params.axis,
            axis_offset,
            elem_size,
            client.device(),
        )?;
        axis_offset += array.shape()[params.axis];
    }

    Ok(out)
}

/// Stack arrays along a new unit axis
///
/// The axis is bounds-checked against each input's own rank before the unit
/// axis is inserted; the insertion itself is always stride-representable,
/// so `unsqueeze` cannot fail afterwards.
pub fn stack_impl<R, C>(client: &C, arrays: &[&Tensor<R>], axis: isize) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    shape_ops::validate_stack_axis(arrays, axis)?;

    let expanded: Vec<Tensor<R>> = arrays
        .iter()
        .map(|a| a.unsqueeze(axis))
        .collect::<Result<_>>()?;
    let refs: Vec<&Tensor<R>> = expanded.iter().collect();

    concatenate_impl(client, &refs, axis)
}

/// Stack arrays horizontally: axis 0 for rank-1 inputs, axis 1 otherwise
pub fn hstack_impl<R, C>(client: &C, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    if arrays.is_empty() {
        return Err(Error::EmptyInput { op: "hstack" });
    }

    let promoted: Vec<Tensor<R>> = arrays
        .iter()
        .map(|a| a.atleast_1d())
        .collect::<Result<_>>()?;
    let refs: Vec<&Tensor<R>> = promoted.iter().collect();

    let axis = if promoted[0].ndim() == 1 { 0 } else { 1 };
    concatenate_impl(client, &refs, axis)
}

/// Stack arrays vertically: promote to rank 2, join along axis 0
pub fn vstack_impl<R, C>(client: &C, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    let promoted: Vec<Tensor<R>> = arrays
        .iter()
        .map(|a| a.atleast_2d())
        .collect::<Result<_>>()?;
    let refs: Vec<&Tensor<R>> = promoted.iter().collect();

    concatenate_impl(client, &refs, 0)
}

/// Stack arrays depthwise: promote to rank 3, join along axis 2
pub fn dstack_impl<R, C>(client: &C, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    let promoted: Vec<Tensor<R>> = arrays
        .iter()
        .map(|a| a.atleast_3d())
        .collect::<Result<_>>()?;
    let refs: Vec<&Tensor<R>> = promoted.iter().collect();

    concatenate_impl(client, &refs, 2)
}

/// Stack 1-D and 2-D arrays as columns of a 2-D array
pub fn column_stack_impl<R, C>(client: &C, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    let mut columns: Vec<Tensor<R>> = Vec::with_capacity(arrays.len());
    for &array in arrays {
        match array.ndim() {
            1 => columns.push(array.unsqueeze(1)?),
            2 => columns.push(array.clone()),
            ndim => {
                return Err(Error::UnsupportedRank {
                    op: "column_stack",
                    ndim,
                });
            }
        }
    }
    let refs: Vec<&Tensor<R>> = columns.iter().collect();

    concatenate_impl(client, &refs, 1)
}
