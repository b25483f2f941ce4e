//! Precision policies.
//!
//! Deterministic float ordering for tie-breaks, and the fixed display
//! rounding applied to every picked coordinate.

use core::cmp::Ordering;

/// Decimal places kept on picked coordinates.
pub const DISPLAY_DECIMALS: u32 = 2;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or use them in ordered keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Round to `places` decimals, half away from zero.
///
/// The result is canonical, so a value that rounds to zero from below never
/// displays as `-0.00`.
pub fn round_to_decimals(v: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    canonical_f64((v * scale).round() / scale)
}

/// Round with the fixed display precision.
pub fn round_for_display(v: f64) -> f64 {
    round_to_decimals(v, DISPLAY_DECIMALS)
}
