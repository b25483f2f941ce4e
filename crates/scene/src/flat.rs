//! Picking on flat, projected maps.
//!
//! The host mapping engine owns the pixel -> geographic inverse projection;
//! this module only folds "nothing under the cursor" and "coordinate under
//! the cursor" into the same `Option<GeoCoordinate>` the sphere picker
//! returns.

use std::f64::consts::PI;

use foundation::math::GeoCoordinate;

/// Latitude limit of the square Web Mercator world.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Host capability: screen pixel to `(lon_deg, lat_deg)`, or `None` when no
/// map is under the pixel.
pub trait InverseProjection {
    fn screen_to_lon_lat(&self, x_px: f64, y_px: f64) -> Option<(f64, f64)>;
}

impl<F> InverseProjection for F
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    fn screen_to_lon_lat(&self, x_px: f64, y_px: f64) -> Option<(f64, f64)> {
        self(x_px, y_px)
    }
}

/// Flat-map counterpart of [`crate::picking::pick`].
///
/// Non-finite output or a latitude outside [-90, 90] counts as no hit.
/// Longitudes are wrapped into [-180, 180] and both components get the same
/// display rounding as sphere picks.
pub fn pick_flat<P>(projection: &P, x_px: f64, y_px: f64) -> Option<GeoCoordinate>
where
    P: InverseProjection + ?Sized,
{
    let (lon, lat) = projection.screen_to_lon_lat(x_px, y_px)?;
    GeoCoordinate::rounded(lon, lat)
}

/// Slippy-map view in spherical Web Mercator (EPSG:3857), the projection of
/// the tiled base layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercatorView {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
    pub tile_size: f64,
}

impl WebMercatorView {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width_px: f64, height_px: f64) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width_px,
            height_px,
            tile_size: 256.0,
        }
    }

    fn world_px(&self) -> f64 {
        self.tile_size * self.zoom.exp2()
    }

    /// Forward projection to screen pixels. The x offset is taken the short
    /// way round the world so the wrap seam never lands mid-screen.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let world = self.world_px();
        let (cx, cy) = mercator_unit(self.center_lon, self.center_lat);
        let (px, py) = mercator_unit(lon_deg, lat_deg);
        let dx = (px - cx + 0.5).rem_euclid(1.0) - 0.5;
        (
            self.width_px * 0.5 + dx * world,
            self.height_px * 0.5 + (py - cy) * world,
        )
    }
}

impl InverseProjection for WebMercatorView {
    fn screen_to_lon_lat(&self, x_px: f64, y_px: f64) -> Option<(f64, f64)> {
        if !(x_px >= 0.0 && x_px <= self.width_px && y_px >= 0.0 && y_px <= self.height_px) {
            return None;
        }
        let world = self.world_px();
        if !(world > 0.0) || !world.is_finite() {
            return None;
        }
        let (cx, cy) = mercator_unit(self.center_lon, self.center_lat);
        let ux = cx + (x_px - self.width_px * 0.5) / world;
        let uy = cy + (y_px - self.height_px * 0.5) / world;
        if !(0.0..=1.0).contains(&uy) {
            // Above or below the square world: no tiles there.
            return None;
        }
        let lon = ux * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * uy)).sinh().atan().to_degrees();
        Some((lon, lat))
    }
}

/// `(lon, lat)` to unit-square Mercator coordinates, y growing south.
fn mercator_unit(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    let x = (lon_deg + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}
