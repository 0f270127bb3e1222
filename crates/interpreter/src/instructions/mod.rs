//! Built-in instruction implementations.
//!
//! Pop order is always top first. Instructions that "replace" a cell
//! overwrite stack index 0 in place instead of popping and pushing.

pub mod control;
pub mod generic;
pub mod math;
pub mod misc;
pub mod variables;
