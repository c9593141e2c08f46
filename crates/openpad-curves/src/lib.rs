//! Response-curve math for the OpenPad remapping pipeline
//!
//! This crate provides the pure math used when a bound input source is
//! translated into a virtual controller axis value:
//!
//! - **Power response**: sign-preserving `multiplier * |v|^exponent` curves
//!   for analog-to-analog bindings.
//! - **Thresholding**: signed comparison for analog-to-digital bindings.
//! - **Dead-zone geometry**: per-component apportioning of a circular dead
//!   zone and signed dead-zone offsets.
//! - **Motion residue**: the sub-unit motion lost to integer conversion,
//!   carried to the next tick for sub-position precision.
//!
//! # RT Safety
//!
//! Everything here is allocation-free, O(1), and bounded; all functions are
//! safe to call from the per-tick control loop.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod dead_zone;
pub mod residue;
pub mod response;

pub use dead_zone::{apportion, signed_offset};
pub use residue::{RESIDUE_EPSILON, motion_residue};
pub use response::{power_response, threshold_crossed};
