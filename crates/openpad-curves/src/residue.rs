//! Sub-unit motion residue.
//!
//! Axis values written to the adapter are integers, so part of each motion
//! step is lost to truncation. The residue is the input-side motion that
//! the truncated output accounts for, subtracted from the full input; it is
//! replayed into the next tick's sample to preserve sub-unit precision
//! over time.

/// Residue magnitudes below this are snapped to zero.
///
/// One unit of motion is divided into 256 sub-positions; anything smaller
/// is numerical noise.
pub const RESIDUE_EPSILON: f64 = 0.0039;

/// Compute the motion residue left after an axis write.
///
/// `val` is the curve input (scaled motion component), `ztrunk` the portion
/// of the curve output that actually reached the axis after integer
/// truncation, and `multiplier`/`exponent` the response-curve parameters.
/// Inverting the curve over `ztrunk` gives the input motion that was
/// honored; the difference is returned, sign-matched to `val`.
///
/// Returns zero when there was no motion, when nothing was truncated, or
/// when the residue falls below [`RESIDUE_EPSILON`].
#[inline]
pub fn motion_residue(val: f64, ztrunk: f64, multiplier: f64, exponent: f64) -> f64 {
    if val == 0.0 || ztrunk == 0.0 {
        return 0.0;
    }
    let honored = (ztrunk.abs() / multiplier).powf(1.0 / exponent);
    let residue = val.signum() * (val.abs() - honored);
    if residue.abs() < RESIDUE_EPSILON { 0.0 } else { residue }
}
