//! Spherical coordinates for points on (or around) a sphere.
//!
//! Convention, matching Y-up scene graphs:
//! - `phi` is the polar angle measured from +Y, in [0, π].
//! - `theta` is the azimuth `atan2(x, z)`, normalised into [0, 2π).
//!
//! The geographic mapping used by the pickers is
//! `latitude = 90 - phi°` and `longitude = theta° - 180`.

use std::f64::consts::{PI, TAU};

use super::{GeoCoordinate, Vec3};

/// Polar angles closer than this to a pole are clamped before conversion.
pub const POLE_EPSILON_RAD: f64 = 1.0e-9;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    pub phi: f64,
    pub theta: f64,
}

impl Spherical {
    pub fn new(radius: f64, phi: f64, theta: f64) -> Self {
        Self { radius, phi, theta }
    }

    /// Decompose a point relative to the sphere centre.
    ///
    /// A zero-length (or non-finite) point has no direction; it maps to the
    /// north pole with zero radius rather than producing NaN.
    pub fn from_vec3(p: Vec3) -> Self {
        let radius = p.length();
        if !(radius > 0.0) || !radius.is_finite() {
            return Self::new(0.0, 0.0, 0.0);
        }
        let theta = p.x.atan2(p.z).rem_euclid(TAU);
        let phi = (p.y / radius).clamp(-1.0, 1.0).acos();
        // rem_euclid may return TAU itself for tiny negative inputs.
        let theta = if theta >= TAU { 0.0 } else { theta };
        Self::new(radius, phi, theta)
    }

    /// Inverse of [`Spherical::from_vec3`].
    pub fn to_vec3(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    /// Same point with `phi` kept at least [`POLE_EPSILON_RAD`] away from
    /// either pole.
    pub fn clamped_to_poles(self) -> Self {
        Self {
            phi: self.phi.clamp(POLE_EPSILON_RAD, PI - POLE_EPSILON_RAD),
            ..self
        }
    }

    pub fn latitude_deg(self) -> f64 {
        90.0 - self.phi.to_degrees()
    }

    pub fn longitude_deg(self) -> f64 {
        self.theta.to_degrees() - 180.0
    }

    /// Pole-safe, display-rounded geographic coordinate.
    pub fn to_geo(self) -> Option<GeoCoordinate> {
        let s = self.clamped_to_poles();
        GeoCoordinate::rounded(s.longitude_deg(), s.latitude_deg())
    }
}
