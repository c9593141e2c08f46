//! RT-safe motion filters for OpenPad
//!
//! This crate provides the stateful filters used by the remapping engine's
//! per-tick pipeline. Today that is the mouse motion filter: raw relative
//! motion samples are merged into a fixed-capacity circular buffer and
//! smoothed with a weighted trailing-window sum, with sub-unit residue
//! carried between ticks.
//!
//! # RT Safety
//!
//! - No heap allocations after construction
//! - O(buffer window) per-tick cost, bounded by [`MOTION_BUFFER_LEN`]
//! - No syscalls or I/O

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod motion;

pub use motion::{MOTION_BUFFER_LEN, MotionFilter};
