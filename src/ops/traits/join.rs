//! Join operations trait: combining arrays along an axis.

use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Join operations
///
/// All six variants are normalization rules over one primitive: concatenate
/// N arrays along a resolved axis into a freshly allocated contiguous
/// output. Inputs may be arbitrary strided views; they are never aliased or
/// mutated, and their data is placed in input order.
pub trait JoinOps<R: Runtime> {
    /// Join arrays along an existing axis
    ///
    /// All arrays must share rank and dtype, and agree on every extent
    /// except the join axis. Negative axes count from the end.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let a = Tensor::from_slice(&[1.0, 2.0], &[1, 2], &device);
    /// let b = Tensor::from_slice(&[3.0, 4.0], &[1, 2], &device);
    /// let c = client.concatenate(&[&a, &b], 0)?; // Shape: [2, 2]
    /// ```
    fn concatenate(&self, arrays: &[&Tensor<R>], axis: isize) -> Result<Tensor<R>>;

    /// Join arrays along a new unit axis inserted at `axis`
    ///
    /// All arrays must have exactly the same shape. The axis is
    /// bounds-checked against each input's own rank before insertion, so
    /// `axis == rank` is rejected; use `axis = -1` to stack along a new
    /// trailing axis.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let a = Tensor::from_slice(&[1.0, 2.0], &[2], &device);
    /// let b = Tensor::from_slice(&[3.0, 4.0], &[2], &device);
    /// let c = client.stack(&[&a, &b], 0)?; // Shape: [2, 2]
    /// ```
    fn stack(&self, arrays: &[&Tensor<R>], axis: isize) -> Result<Tensor<R>>;

    /// Stack arrays horizontally
    ///
    /// Rank-1 arrays are joined along axis 0; everything else along axis 1.
    /// Inputs are promoted to at least rank 1 first.
    fn hstack(&self, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>;

    /// Stack arrays vertically
    ///
    /// Inputs are promoted to at least rank 2 (a rank-1 array becomes a
    /// single row), then joined along axis 0.
    fn vstack(&self, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>;

    /// Stack arrays along the third axis
    ///
    /// Inputs are promoted to at least rank 3 (`(n,)` becomes `(1, n, 1)`,
    /// `(r, c)` becomes `(r, c, 1)`), then joined along axis 2.
    fn dstack(&self, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>;

    /// Stack 1-D and 2-D arrays as columns into a 2-D array
    ///
    /// A rank-1 array is first converted to a column (trailing unit axis);
    /// rank-2 arrays pass through. Any other rank is rejected. The columns
    /// are then joined along axis 1.
    fn column_stack(&self, arrays: &[&Tensor<R>]) -> Result<Tensor<R>>;
}
