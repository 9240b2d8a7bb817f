//! CPU implementations of operation traits

mod join;
