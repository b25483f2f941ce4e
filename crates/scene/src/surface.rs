use foundation::math::Vec3;

use crate::camera::Ray;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u32);

impl SurfaceId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// What a surface is for. Only `Base` surfaces take part in picking; overlay
/// shells are transparent and would otherwise swallow every pick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    Base,
    Overlay,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn at_origin(radius: f64) -> Self {
        Self::new(Vec3::ZERO, radius)
    }

    /// Same centre, radius multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.center, self.radius * factor)
    }

    /// Distance along `ray` to the nearest intersection in `(0, max_distance]`.
    ///
    /// `ray.dir` must be unit length.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        if !(self.radius > 0.0) {
            return None;
        }
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.dir);
        let c = oc.dot(oc) - self.radius * self.radius;
        let disc = b * b - c;
        if !(disc >= 0.0) {
            return None;
        }
        let sdisc = disc.sqrt();
        let t0 = -b - sdisc;
        let t1 = -b + sdisc;

        // Choose the nearest positive hit.
        let t = if t0 > 0.0 {
            t0
        } else if t1 > 0.0 {
            t1
        } else {
            return None;
        };
        (t <= max_distance).then_some(t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Surface {
    pub role: SurfaceRole,
    pub sphere: Sphere,
    pub visible: bool,
}

/// The renderable surfaces the picker can see: the body and any overlay
/// shells stacked around it.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    surfaces: Vec<Surface>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene holding a single base sphere.
    pub fn with_base(sphere: Sphere) -> Self {
        let mut scene = Self::new();
        scene.spawn(SurfaceRole::Base, sphere);
        scene
    }

    pub fn spawn(&mut self, role: SurfaceRole, sphere: Sphere) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(Surface {
            role,
            sphere,
            visible: true,
        });
        id
    }

    /// Add an overlay shell around `base`, `scale` times its radius.
    pub fn add_overlay_shell(&mut self, base: SurfaceId, scale: f64) -> Option<SurfaceId> {
        let sphere = self.surface(base)?.sphere.scaled(scale);
        Some(self.spawn(SurfaceRole::Overlay, sphere))
    }

    /// Drop every overlay shell.
    ///
    /// Ids of surfaces spawned after the first overlay shell are invalidated.
    pub fn clear_overlays(&mut self) {
        self.surfaces.retain(|s| s.role == SurfaceRole::Base);
    }

    pub fn set_visible(&mut self, id: SurfaceId, visible: bool) {
        if let Some(s) = self.surfaces.get_mut(id.index() as usize) {
            s.visible = visible;
        }
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Visible base surfaces in ascending id order.
    pub fn pickable(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible && s.role == SurfaceRole::Base)
            .map(|(i, s)| (SurfaceId(i as u32), s))
    }
}

#[cfg(test)]
mod tests {
    use super::{Scene, Sphere, SurfaceRole};
    use crate::camera::Ray;
    use foundation::math::Vec3;

    #[test]
    fn ray_hits_front_of_sphere() {
        let s = Sphere::at_origin(2.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(s.intersect(&ray, f64::MAX), Some(8.0));
        assert_eq!(s.intersect(&ray, 5.0), None);
    }

    #[test]
    fn ray_misses_or_points_away() {
        let s = Sphere::at_origin(2.0);
        let miss = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(s.intersect(&miss, f64::MAX), None);
        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(s.intersect(&away, f64::MAX), None);
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let s = Sphere::at_origin(2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(s.intersect(&ray, f64::MAX), Some(2.0));
    }

    #[test]
    fn overlay_shells_are_not_pickable() {
        let mut scene = Scene::with_base(Sphere::at_origin(504.0));
        let base = scene.pickable().next().expect("base").0;
        let shell = scene.add_overlay_shell(base, 1.002).expect("shell");

        let shell_surface = scene.surface(shell).expect("shell surface");
        assert_eq!(shell_surface.role, SurfaceRole::Overlay);
        assert!((shell_surface.sphere.radius - 504.0 * 1.002).abs() < 1e-9);

        let pickable: Vec<_> = scene.pickable().map(|(id, _)| id).collect();
        assert_eq!(pickable, vec![base]);

        scene.clear_overlays();
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn hidden_base_is_not_pickable() {
        let mut scene = Scene::with_base(Sphere::at_origin(1.0));
        let base = scene.pickable().next().expect("base").0;
        scene.set_visible(base, false);
        assert_eq!(scene.pickable().count(), 0);
    }
}
