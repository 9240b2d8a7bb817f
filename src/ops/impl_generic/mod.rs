//! Generic operation implementations shared by all backends

mod join;

pub use join::{
    column_stack_impl, concatenate_impl, dstack_impl, hstack_impl, stack_impl, vstack_impl,
};
