use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{GeoCoordinate, Spherical, Vec2, Vec3};

use crate::camera::{Camera, Ray};
use crate::surface::{Scene, SurfaceId};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub surface: SurfaceId,
    pub distance: f64,
    /// World-space hit point.
    pub point: Vec3,
    /// Hit point relative to the surface centre.
    pub local: Vec3,
}

impl PickHit {
    /// Pole-safe, display-rounded coordinate of the hit.
    pub fn to_geo(&self) -> Option<GeoCoordinate> {
        Spherical::from_vec3(self.local).to_geo()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

impl PickOptions {
    /// Limit picks to the camera's far plane.
    pub fn for_camera(camera: &Camera) -> Self {
        Self {
            max_distance: camera.far,
        }
    }
}

/// Deterministic ray picking against the base surfaces of `scene`.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If several surfaces are hit at the same distance, the lower
///   `SurfaceId::index()` wins.
///
/// Overlay shells and hidden surfaces are never tested.
pub fn pick_ray(scene: &Scene, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalize()?;
    let ray = Ray::new(ray.origin, dir);

    let mut best: Option<(f64, SurfaceId)> = None;
    for (id, surface) in scene.pickable() {
        let Some(t) = surface.sphere.intersect(&ray, opts.max_distance) else {
            continue;
        };
        best = match best {
            None => Some((t, id)),
            Some((bt, bid)) => {
                let ord = stable_total_cmp_f64(t, bt).then_with(|| id.cmp(&bid));
                if ord.is_lt() {
                    Some((t, id))
                } else {
                    Some((bt, bid))
                }
            }
        };
    }

    let (t, id) = best?;
    let center = scene.surface(id)?.sphere.center;
    let point = ray.at(t);
    Some(PickHit {
        surface: id,
        distance: t,
        point,
        local: point - center,
    })
}

/// Resolve a pointer in normalized device coordinates to a surface
/// coordinate, or `None` when nothing is under the pointer.
///
/// Pure function of its arguments; safe to call every frame.
pub fn pick(scene: &Scene, camera: &Camera, ndc: Vec2, opts: PickOptions) -> Option<GeoCoordinate> {
    let ray = camera.ray_from_ndc(ndc)?;
    pick_ray(scene, ray, opts)?.to_geo()
}
