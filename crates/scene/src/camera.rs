use foundation::math::{Vec2, Vec3};

/// Pointer rectangle in client pixels (the canvas bounding rect).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Convert a client-space pointer position to normalized device coordinates.
///
/// x grows right and y grows up, both in [-1, 1] while the pointer is inside
/// the viewport. Returns `None` for an empty or non-finite viewport.
pub fn pointer_to_ndc(client_x: f64, client_y: f64, viewport: Viewport) -> Option<Vec2> {
    if !(viewport.width > 0.0) || !(viewport.height > 0.0) {
        return None;
    }
    let ndc = Vec2::new(
        ((client_x - viewport.left) / viewport.width) * 2.0 - 1.0,
        -((client_y - viewport.top) / viewport.height) * 2.0 + 1.0,
    );
    ndc.is_finite().then_some(ndc)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

/// Perspective camera looking from `eye` at `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(500.0, 500.0, 500.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: 50.0,
            aspect: 1.0,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

impl Camera {
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            ..Self::default()
        }
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn distance(&self) -> f64 {
        (self.eye - self.target).length()
    }

    /// Clamp the eye distance to the target the way orbit controls do,
    /// keeping the viewing direction.
    pub fn with_orbit_limits(mut self, min_distance: f64, max_distance: f64) -> Self {
        let offset = self.eye - self.target;
        let Some(dir) = offset.normalize() else {
            return self;
        };
        let d = offset.length().clamp(min_distance, max_distance.max(min_distance));
        self.eye = self.target + dir.scale(d);
        self
    }

    /// Ray from the eye through the pointer at `ndc`.
    ///
    /// Returns `None` when the pointer is outside [-1, 1]², or the camera is
    /// degenerate (eye on the target, or a non-positive field of view /
    /// aspect). Looking along `up` itself falls back to another up axis.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() || ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            return None;
        }
        if !(self.fov_y_deg > 0.0 && self.fov_y_deg < 180.0) || !(self.aspect > 0.0) {
            return None;
        }

        let forward = (self.target - self.eye).normalize()?;
        let right = forward.cross(self.up).normalize().or_else(|| {
            let fallback = if forward.z.abs() > 0.9 {
                Vec3::new(1.0, 0.0, 0.0)
            } else {
                Vec3::new(0.0, 0.0, -1.0)
            };
            forward.cross(fallback).normalize()
        })?;
        let up = right.cross(forward);

        let tan = (0.5 * self.fov_y_deg.to_radians()).tan();
        let px = ndc.x * tan * self.aspect;
        let py = ndc.y * tan;

        let dir = (forward + right.scale(px) + up.scale(py)).normalize()?;
        Some(Ray::new(self.eye, dir))
    }
}
