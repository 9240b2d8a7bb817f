//! Integration tests for the nocopy-reshape capability probe and the
//! reshape/view surface built on top of it.

use ndr::error::Error;
use ndr::runtime::cpu::{CpuDevice, CpuRuntime};
use ndr::tensor::{can_reshape_without_copy, Layout, Tensor};

// ============================================================================
// Capability probe
// ============================================================================

#[test]
fn test_probe_contiguous_succeeds() {
    let layout = Layout::contiguous(&[2, 3]);

    let strides = can_reshape_without_copy(&layout, &[1, 2, 3])
        .unwrap()
        .unwrap();
    assert_eq!(strides.as_slice(), &[6, 3, 1]);

    let strides = can_reshape_without_copy(&layout, &[6]).unwrap().unwrap();
    assert_eq!(strides.as_slice(), &[1]);
}

#[test]
fn test_probe_transposed_fails() {
    let layout = Layout::contiguous(&[2, 3]);
    let transposed = layout.transpose(0, 1).unwrap();

    // The probe result is a plain None, not an error: callers fall back to
    // a copying reshape.
    assert!(can_reshape_without_copy(&transposed, &[6])
        .unwrap()
        .is_none());
}

#[test]
fn test_probe_count_mismatch_is_error() {
    let layout = Layout::contiguous(&[2, 3]);

    let err = can_reshape_without_copy(&layout, &[1, 5]).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn test_probe_unit_axes() {
    let layout = Layout::contiguous(&[1]);

    let strides = can_reshape_without_copy(&layout, &[1, 1, 1])
        .unwrap()
        .unwrap();
    assert_eq!(strides.as_slice(), &[1, 1, 1]);
}

#[test]
fn test_probe_zero_extent_always_succeeds() {
    let layout = Layout::contiguous(&[0, 3]);

    assert!(can_reshape_without_copy(&layout, &[3, 0])
        .unwrap()
        .is_some());
    assert!(can_reshape_without_copy(&layout, &[0])
        .unwrap()
        .is_some());
}

#[test]
fn test_probe_identity_on_strided_view() {
    let layout = Layout::contiguous(&[2, 3]);
    let transposed = layout.transpose(0, 1).unwrap();

    // Reinterpreting a view under its own shape never requires a copy.
    let strides = can_reshape_without_copy(&transposed, &[3, 2])
        .unwrap()
        .unwrap();
    assert_eq!(strides.as_slice(), transposed.strides());
}

// ============================================================================
// Tensor::reshape on top of the probe
// ============================================================================

#[test]
fn test_reshape_shares_storage_when_possible() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], &device);

    let lifted = t.reshape(&[1, 2, 3]).unwrap();
    assert_eq!(lifted.storage().ptr(), t.storage().ptr());

    let flat = t.flatten().unwrap();
    assert_eq!(flat.storage().ptr(), t.storage().ptr());
}

#[test]
fn test_reshape_falls_back_to_copy() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], &device);
    let transposed = t.transpose(0, 1).unwrap();

    let flat = transposed.reshape(&[6]).unwrap();
    assert_ne!(flat.storage().ptr(), t.storage().ptr());
    let data: Vec<f32> = flat.to_vec();
    assert_eq!(data, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn test_reshape_of_narrowed_view() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(
        &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        &[4, 2],
        &device,
    );

    // Rows 1..3 form a compact block; flattening them is a zero-copy view
    // at a nonzero storage offset.
    let rows = t.narrow(0, 1, 2).unwrap();
    let flat = rows.reshape(&[4]).unwrap();
    assert_eq!(flat.storage().ptr(), t.storage().ptr());
    let data: Vec<f32> = flat.to_vec();
    assert_eq!(data, [3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_broadcast_then_pack() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0], &[3, 1], &device);

    let wide = t.broadcast_to(&[3, 2]).unwrap();
    assert_eq!(wide.shape(), &[3, 2]);
    assert!(!wide.is_contiguous());

    let packed = wide.contiguous().unwrap();
    let data: Vec<f32> = packed.to_vec();
    assert_eq!(data, [1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
}
