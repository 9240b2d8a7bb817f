//! CPU implementation of the join operations.

use crate::error::Result;
use crate::ops::impl_generic::{
    column_stack_impl, concatenate_impl, dstack_impl, hstack_impl, stack_impl, vstack_impl,
};
use crate::ops::JoinOps;
use crate::runtime::cpu::{CpuClient, CpuRuntime};
use crate::tensor::Tensor;

impl JoinOps<CpuRuntime> for CpuClient {
    fn concatenate(
        &self,
        arrays: &[&Tensor<CpuRuntime>],
        axis: isize,
    ) -> Result<Tensor<CpuRuntime>> {
        concatenate_impl(self, arrays, axis)
    }

    fn stack(&self, arrays: &[&Tensor<CpuRuntime>], axis: isize) -> Result<Tensor<CpuRuntime>> {
        stack_impl(self, arrays, axis)
    }

    fn hstack(&self, arrays: &[&Tensor<CpuRuntime>]) -> Result<Tensor<CpuRuntime>> {
        hstack_impl(self, arrays)
    }

    fn vstack(&self, arrays: &[&Tensor<CpuRuntime>]) -> Result<Tensor<CpuRuntime>> {
        vstack_impl(self, arrays)
    }

    fn dstack(&self, arrays: &[&Tensor<CpuRuntime>]) -> Result<Tensor<CpuRuntime>> {
        dstack_impl(self, arrays)
    }

    fn column_stack(&self, arrays: &[&Tensor<CpuRuntime>]) -> Result<Tensor<CpuRuntime>> {
        column_stack_impl(self, arrays)
    }
}
