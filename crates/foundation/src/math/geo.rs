use std::fmt;

use super::precision::round_for_display;

/// A point on the body surface in degrees.
///
/// Only the pickers construct these; absence of a pick is `Option::None`
/// because `(0, 0)` is a perfectly valid coordinate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoordinate {
    /// Builds a display-stable coordinate: both components rounded to
    /// [`DISPLAY_DECIMALS`](super::DISPLAY_DECIMALS).
    ///
    /// Returns `None` for non-finite input or a latitude outside [-90, 90].
    /// Longitude is wrapped into [-180, 180].
    pub fn rounded(longitude: f64, latitude: f64) -> Option<Self> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return None;
        }
        Some(Self {
            longitude: round_for_display(wrap_lon_deg(longitude)),
            latitude: round_for_display(latitude),
        })
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {:.2}°, lon {:.2}°", self.latitude, self.longitude)
    }
}

/// Wrap a longitude in degrees into [-180, 180].
///
/// Values already inside [-180, 180] are returned untouched so that the
/// antimeridian keeps whichever sign the caller produced.
pub fn wrap_lon_deg(lon_deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon_deg) {
        lon_deg
    } else {
        (lon_deg + 180.0).rem_euclid(360.0) - 180.0
    }
}
