//! Error types for ndr

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using ndr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ndr operations
///
/// Every layout/validation error is raised before any device allocation
/// happens. `Allocation` and `Copy` are surfaced verbatim from the runtime
/// backend and are never retried here.
#[derive(Error, Debug)]
pub enum Error {
    /// Axis argument outside the valid range for an array's rank
    #[error("axis {axis} out of bounds for rank {ndim} (valid range [-{ndim}, {ndim}))")]
    AxisOutOfBounds {
        /// The requested axis
        axis: isize,
        /// Rank the axis was resolved against
        ndim: usize,
    },

    /// Shape mismatch in an operation (differing ranks, or reshape element
    /// count mismatch)
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Extents differ on an axis that must agree across join members
    #[error("extent mismatch on axis {axis}: expected {expected}, got {got}")]
    ExtentMismatch {
        /// The offending axis
        axis: usize,
        /// Extent of the first member on that axis
        expected: usize,
        /// Extent of the mismatching member
        got: usize,
    },

    /// DType mismatch between operands
    #[error("dtype mismatch: {lhs} vs {rhs}")]
    DTypeMismatch {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
    },

    /// An array of a rank the operation does not accept
    #[error("{op} requires arrays of rank 1 or 2, got rank {ndim}")]
    UnsupportedRank {
        /// The operation name
        op: &'static str,
        /// Rank of the offending array
        ndim: usize,
    },

    /// Zero arrays supplied where at least one is required
    #[error("{op} requires at least one input array")]
    EmptyInput {
        /// The operation name
        op: &'static str,
    },

    /// Invalid argument provided to an operation
    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Device memory allocation failed
    #[error("out of memory: failed to allocate {size} bytes")]
    Allocation {
        /// Requested size in bytes
        size: usize,
    },

    /// A copy submission was rejected by the runtime backend
    #[error("copy failed: {0}")]
    Copy(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an extent mismatch error for a join axis check
    pub fn extent_mismatch(axis: usize, expected: usize, got: usize) -> Self {
        Self::ExtentMismatch {
            axis,
            expected,
            got,
        }
    }
}
