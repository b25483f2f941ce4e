use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::Extent;
use foundation::math::Vec3;
use layers::{
    BlendMode, CatalogError, FlatStyle, LayerSpec, LayerStyle, OverlayCatalog,
    OverlaySelection, ResourceLocator, Selections, SphereStyle, SphereWrap, TableEntry,
    ViewMode, ViewerState, VisibilityToggle,
};
use scene::{Camera, Scene, Sphere, WebMercatorView};
use tracing::{debug, info, warn};

use crate::manifest::{
    BlendLabel, LayerEntry, MANIFEST_VERSION, ModeLabel, OverlayManifest, StyleEntry,
};
use crate::tile::TileTemplate;

pub const MANIFEST_FILE_NAME: &str = "moon.overlays.json";

const BUILTIN_MANIFEST: &str = include_str!("../assets/moon.overlays.json");

#[derive(Debug)]
pub enum ManifestError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Encode(serde_json::Error),
    UnsupportedVersion { found: String },
    Catalog(CatalogError),
    InvalidBase { reason: String },
    InvalidDefault { reason: String },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io(err) => write!(f, "I/O error: {err}"),
            ManifestError::Parse(err) => write!(f, "Manifest parse error: {err}"),
            ManifestError::Encode(err) => write!(f, "Manifest encode error: {err}"),
            ManifestError::UnsupportedVersion { found } => {
                write!(f, "Unsupported manifest version: {found}")
            }
            ManifestError::Catalog(err) => write!(f, "Invalid overlay catalog: {err}"),
            ManifestError::InvalidBase { reason } => write!(f, "Invalid base layer: {reason}"),
            ManifestError::InvalidDefault { reason } => write!(f, "Invalid default: {reason}"),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io(err) => Some(err),
            ManifestError::Parse(err) | ManifestError::Encode(err) => Some(err),
            ManifestError::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for ManifestError {
    fn from(err: CatalogError) -> Self {
        ManifestError::Catalog(err)
    }
}

impl From<ModeLabel> for ViewMode {
    fn from(label: ModeLabel) -> Self {
        match label {
            ModeLabel::Flat => ViewMode::Flat,
            ModeLabel::Sphere => ViewMode::Sphere,
        }
    }
}

impl From<ViewMode> for ModeLabel {
    fn from(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Flat => ModeLabel::Flat,
            ViewMode::Sphere => ModeLabel::Sphere,
        }
    }
}

impl From<BlendLabel> for BlendMode {
    fn from(label: BlendLabel) -> Self {
        match label {
            BlendLabel::Normal => BlendMode::Normal,
            BlendLabel::Multiply => BlendMode::Multiply,
        }
    }
}

fn layer_style(style: &StyleEntry) -> LayerStyle {
    LayerStyle {
        flat: style.flat.as_ref().map(|s| FlatStyle {
            extent: Extent::from_array(s.extent),
            repeats: s.repeats,
            opacity: s.opacity,
            blend_mode: s.blend.into(),
        }),
        sphere: style.sphere.as_ref().map(|s| SphereStyle {
            wrap: SphereWrap {
                scale: s.scale,
                yaw_deg: s.yaw_deg,
            },
            opacity: s.opacity,
            blend_mode: s.blend.into(),
        }),
    }
}

fn layer_spec(layer: &LayerEntry) -> LayerSpec {
    LayerSpec {
        name: layer.name.clone(),
        inputs: layer.inputs.clone(),
        toggle: layer.toggle.as_ref().map(|t| VisibilityToggle {
            flag: t.flag.clone(),
            default_on: t.default_on,
        }),
        style: layer_style(&layer.style),
        entries: layer
            .entries
            .iter()
            .map(|e| {
                let modes: Vec<ViewMode> = e.modes.iter().map(|&m| m.into()).collect();
                TableEntry::new(e.elements.iter().cloned(), e.resource.as_deref())
                    .in_modes(&modes)
            })
            .collect(),
    }
}

impl OverlayManifest {
    pub fn from_json_str(payload: &str) -> Result<Self, ManifestError> {
        let manifest: OverlayManifest =
            serde_json::from_str(payload).map_err(ManifestError::Parse)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: manifest.version,
            });
        }
        Ok(manifest)
    }

    /// Manifest of the lunar element viewer shipped with the crate.
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::from_json_str(BUILTIN_MANIFEST)
    }

    /// Build the resolution and style tables. Layers keep manifest order.
    pub fn catalog(&self) -> Result<OverlayCatalog, CatalogError> {
        let mut catalog =
            OverlayCatalog::new(self.slots.iter().cloned(), self.elements.iter().cloned())?;
        for layer in &self.layers {
            catalog.add_layer(layer_spec(layer))?;
        }
        Ok(catalog)
    }

    /// Everything that would make the manifest unusable beyond the catalog
    /// tables themselves.
    pub fn validate(&self, catalog: &OverlayCatalog) -> Result<(), ManifestError> {
        let flat = &self.base.flat;
        if !flat.tile_url.is_empty() && !self.tile_template().is_complete() {
            return Err(ManifestError::InvalidBase {
                reason: format!("tile url {:?} lacks a {{z}}/{{x}}/{{y}} placeholder", flat.tile_url),
            });
        }
        if flat.min_zoom > flat.max_zoom {
            return Err(ManifestError::InvalidBase {
                reason: format!("min zoom {} above max zoom {}", flat.min_zoom, flat.max_zoom),
            });
        }
        let sphere = &self.base.sphere;
        if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
            return Err(ManifestError::InvalidBase {
                reason: format!("sphere radius must be positive, got {}", sphere.radius),
            });
        }
        let cam = &sphere.camera;
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ManifestError::InvalidBase {
                reason: format!("camera clip range {}..{} is empty", cam.near, cam.far),
            });
        }
        let orbit = &sphere.orbit;
        if !(orbit.min_distance >= 0.0 && orbit.max_distance >= orbit.min_distance) {
            return Err(ManifestError::InvalidBase {
                reason: format!(
                    "orbit range {}..{} is empty",
                    orbit.min_distance, orbit.max_distance
                ),
            });
        }

        for (slot, element) in &self.defaults.selections {
            if !catalog.is_slot(slot) {
                return Err(ManifestError::InvalidDefault {
                    reason: format!("selection for unknown slot {slot:?}"),
                });
            }
            if !catalog.elements().contains(element) {
                return Err(ManifestError::InvalidDefault {
                    reason: format!("slot {slot:?} selects unknown element {element:?}"),
                });
            }
        }
        let flags = catalog.flags();
        if let Some(flag) = self
            .defaults
            .visibility
            .keys()
            .find(|f| !flags.contains(f.as_str()))
        {
            return Err(ManifestError::InvalidDefault {
                reason: format!("no layer listens to visibility flag {flag:?}"),
            });
        }
        Ok(())
    }

    pub fn locator(&self) -> ResourceLocator {
        ResourceLocator::new(self.assets.base.as_str(), self.assets.extension.as_str())
    }

    pub fn tile_template(&self) -> TileTemplate {
        TileTemplate::new(self.base.flat.tile_url.as_str())
    }

    /// Start-up camera, clamped to the orbit range.
    pub fn camera(&self) -> Camera {
        let cam = &self.base.sphere.camera;
        let orbit = &self.base.sphere.orbit;
        Camera {
            eye: Vec3::from_array(cam.position),
            target: Vec3::from_array(cam.target),
            fov_y_deg: cam.fov_deg,
            near: cam.near,
            far: cam.far,
            ..Camera::default()
        }
        .with_orbit_limits(orbit.min_distance, orbit.max_distance)
    }

    /// Pickable scene: the base sphere plus one shell per sphere-styled layer.
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        let base = scene.spawn(
            scene::SurfaceRole::Base,
            Sphere::at_origin(self.base.sphere.radius),
        );
        for layer in &self.layers {
            if let Some(style) = &layer.style.sphere {
                scene.add_overlay_shell(base, style.scale);
            }
        }
        scene
    }

    /// Flat view centred where the manifest says, for a canvas of the given size.
    pub fn flat_view(&self, width_px: f64, height_px: f64) -> WebMercatorView {
        let flat = &self.base.flat;
        WebMercatorView::new(flat.center[0], flat.center[1], flat.zoom, width_px, height_px)
    }

    pub fn viewer_state(&self) -> ViewerState {
        let selections: Selections = self
            .defaults
            .selections
            .iter()
            .map(|(slot, element)| OverlaySelection::new(slot.as_str(), element.as_str()))
            .collect();
        let mut state = ViewerState::new(self.defaults.view_mode.into(), selections);
        for (flag, on) in &self.defaults.visibility {
            state.visibility.set(flag.as_str(), *on);
        }
        state
    }
}

/// A manifest that parsed, validated and produced a catalog.
#[derive(Debug, Clone)]
pub struct OverlayPackage {
    root: Option<PathBuf>,
    hash: String,
    manifest: OverlayManifest,
    catalog: OverlayCatalog,
}

impl OverlayPackage {
    /// Load `moon.overlays.json` from `root`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let payload = fs::read_to_string(&manifest_path).map_err(ManifestError::Io)?;
        let manifest = OverlayManifest::from_json_str(&payload)?;
        info!(path = %manifest_path.display(), "loaded overlay manifest");
        Self::from_manifest(Some(root), manifest)
    }

    pub fn builtin() -> Result<Self, ManifestError> {
        Self::from_manifest(None, OverlayManifest::builtin()?)
    }

    pub fn from_manifest(
        root: Option<PathBuf>,
        manifest: OverlayManifest,
    ) -> Result<Self, ManifestError> {
        let catalog = manifest.catalog()?;
        manifest.validate(&catalog)?;

        let gaps = catalog.coverage_gaps();
        if !gaps.is_empty() {
            warn!(
                count = gaps.len(),
                "overlay manifest leaves element combinations unmapped"
            );
            for gap in &gaps {
                debug!(%gap, "unmapped combination");
            }
        }
        let hash = manifest.content_hash().map_err(ManifestError::Encode)?;
        info!(
            layers = catalog.layers().len(),
            elements = catalog.elements().len(),
            %hash,
            "overlay catalog ready"
        );

        Ok(Self {
            root,
            hash,
            manifest,
            catalog,
        })
    }

    pub fn manifest(&self) -> &OverlayManifest {
        &self.manifest
    }

    pub fn catalog(&self) -> &OverlayCatalog {
        &self.catalog
    }

    /// [`OverlayManifest::content_hash`] as computed at load time.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Directory the manifest came from; `None` for the built-in one.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
