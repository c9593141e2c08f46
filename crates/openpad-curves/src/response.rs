//! Sign-preserving power response curves and analog thresholding.

/// Apply a power response curve to a signed input value.
///
/// Computes `sign(value) * multiplier * |value|^exponent`. An exponent of
/// `1.0` gives a linear response; exponents below one expand small motions,
/// exponents above one compress them.
///
/// # Example
///
/// ```
/// use openpad_curves::power_response;
///
/// let out = power_response(2.0, 8.0, 1.0);
/// assert!((out - 16.0).abs() < 1e-9);
///
/// let out = power_response(-3.0, 1.0, 2.0);
/// assert!((out + 9.0).abs() < 1e-9);
/// ```
#[inline]
pub fn power_response(value: f64, multiplier: f64, exponent: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    value.signum() * multiplier * value.abs().powf(exponent)
}

/// Signed threshold test for analog-to-digital bindings.
///
/// A positive threshold fires when the value exceeds it; a negative
/// threshold fires when the value falls below it. A zero threshold never
/// fires.
#[inline]
pub fn threshold_crossed(value: f64, threshold: i32) -> bool {
    let threshold_f = f64::from(threshold);
    (threshold > 0 && value > threshold_f) || (threshold < 0 && value < threshold_f)
}
