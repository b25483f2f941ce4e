use foundation::bounds::Extent;

/// Number of world copies on each side of a flat overlay's base extent.
pub const DEFAULT_WRAP_REPEATS: u32 = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
}

impl BlendMode {
    pub fn label(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
        }
    }
}

/// Placement of an overlay shell around the base sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereWrap {
    /// Shell radius relative to the base sphere radius. Stacked shells use
    /// slightly different scales so they never z-fight.
    pub scale: f64,
    /// Rotation of the shell texture about +Y, degrees.
    pub yaw_deg: f64,
}

impl SphereWrap {
    pub const fn new(scale: f64) -> Self {
        Self {
            scale,
            yaw_deg: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Placement {
    Extent(Extent),
    Sphere(SphereWrap),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlatStyle {
    pub extent: Extent,
    pub repeats: u32,
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl FlatStyle {
    pub const fn new(extent: Extent) -> Self {
        Self {
            extent,
            repeats: DEFAULT_WRAP_REPEATS,
            opacity: 0.5,
            blend_mode: BlendMode::Normal,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereStyle {
    pub wrap: SphereWrap,
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl SphereStyle {
    pub const fn new(wrap: SphereWrap) -> Self {
        Self {
            wrap,
            opacity: 0.6,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// Fixed per-layer style: not user controlled, so stacking and blending are
/// reproducible across sessions. A layer without a style for a view mode is
/// not shown in that mode.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LayerStyle {
    pub flat: Option<FlatStyle>,
    pub sphere: Option<SphereStyle>,
}

impl LayerStyle {
    /// Describes the first problem found, if any.
    pub fn problem(&self) -> Option<String> {
        if let Some(flat) = &self.flat {
            if !flat.extent.is_valid() {
                return Some(format!("invalid flat extent {:?}", flat.extent.as_array()));
            }
            if !valid_opacity(flat.opacity) {
                return Some(format!("flat opacity {} outside [0, 1]", flat.opacity));
            }
        }
        if let Some(sphere) = &self.sphere {
            if !(sphere.wrap.scale > 0.0) || !sphere.wrap.scale.is_finite() {
                return Some(format!("sphere wrap scale {} must be positive", sphere.wrap.scale));
            }
            if !sphere.wrap.yaw_deg.is_finite() {
                return Some("sphere yaw must be finite".to_string());
            }
            if !valid_opacity(sphere.opacity) {
                return Some(format!("sphere opacity {} outside [0, 1]", sphere.opacity));
            }
        }
        None
    }
}

fn valid_opacity(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}
