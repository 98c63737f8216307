//! Foundation layer: math types and logging utilities shared by the rest of
//! the crate.

pub mod logging;
pub mod math;
