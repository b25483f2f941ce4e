//! Declarative overlay manifest.
//!
//! The manifest carries everything about a viewer that is data rather than
//! logic: the known elements and selection slots, the per-layer resolution
//! and style tables, base-layer settings and start-up defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayManifest {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub elements: Vec<String>,
    pub slots: Vec<String>,
    #[serde(default)]
    pub assets: AssetsEntry,
    #[serde(default)]
    pub base: BaseEntry,
    #[serde(default)]
    pub defaults: DefaultsEntry,
    pub layers: Vec<LayerEntry>,
}

/// View mode as written in manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeLabel {
    #[serde(rename = "2D")]
    Flat,
    #[serde(rename = "3D")]
    Sphere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendLabel {
    #[default]
    Normal,
    Multiply,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerEntry {
    pub name: String,
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle: Option<ToggleEntry>,
    #[serde(default)]
    pub style: StyleEntry,
    #[serde(default)]
    pub entries: Vec<ResolutionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleEntry {
    pub flag: String,
    #[serde(default)]
    pub default_on: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<FlatStyleEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere: Option<SphereStyleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatStyleEntry {
    /// `[min_lon, min_lat, max_lon, max_lat]` in degrees.
    pub extent: [f64; 4],
    #[serde(default = "default_repeats")]
    pub repeats: u32,
    pub opacity: f32,
    #[serde(default)]
    pub blend: BlendLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SphereStyleEntry {
    pub scale: f64,
    #[serde(default)]
    pub yaw_deg: f64,
    pub opacity: f32,
    #[serde(default)]
    pub blend: BlendLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionEntry {
    pub elements: Vec<String>,
    /// Modes this row applies to; both when omitted.
    #[serde(default = "all_modes")]
    pub modes: Vec<ModeLabel>,
    /// `null` (or `""`) shows nothing for this combination.
    pub resource: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetsEntry {
    pub base: String,
    pub extension: String,
}

impl Default for AssetsEntry {
    fn default() -> Self {
        Self {
            base: "./".to_string(),
            extension: "png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BaseEntry {
    #[serde(default)]
    pub flat: FlatBaseEntry,
    #[serde(default)]
    pub sphere: SphereBaseEntry,
}

/// Tiled slippy-map base layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatBaseEntry {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
    /// `[lon, lat]` of the initial view centre.
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for FlatBaseEntry {
    fn default() -> Self {
        Self {
            tile_url: String::new(),
            center: [0.0, 0.0],
            zoom: 2.0,
            min_zoom: 0,
            max_zoom: 9,
        }
    }
}

/// Textured sphere base layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SphereBaseEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Base sphere radius in scene units.
    pub radius: f64,
    #[serde(default)]
    pub camera: CameraEntry,
    #[serde(default)]
    pub orbit: OrbitEntry,
}

impl Default for SphereBaseEntry {
    fn default() -> Self {
        Self {
            model: None,
            radius: 1.0,
            camera: CameraEntry::default(),
            orbit: OrbitEntry::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraEntry {
    pub position: [f64; 3],
    #[serde(default)]
    pub target: [f64; 3],
    #[serde(default = "default_fov")]
    pub fov_deg: f64,
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
}

impl Default for CameraEntry {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrbitEntry {
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for OrbitEntry {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f64::MAX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultsEntry {
    #[serde(default = "default_mode")]
    pub view_mode: ModeLabel,
    #[serde(default)]
    pub selections: BTreeMap<String, String>,
    #[serde(default)]
    pub visibility: BTreeMap<String, bool>,
}

impl Default for DefaultsEntry {
    fn default() -> Self {
        Self {
            view_mode: default_mode(),
            selections: BTreeMap::new(),
            visibility: BTreeMap::new(),
        }
    }
}

fn default_repeats() -> u32 {
    layers::DEFAULT_WRAP_REPEATS
}

fn all_modes() -> Vec<ModeLabel> {
    vec![ModeLabel::Flat, ModeLabel::Sphere]
}

fn default_mode() -> ModeLabel {
    ModeLabel::Sphere
}

fn default_fov() -> f64 {
    50.0
}

fn default_near() -> f64 {
    1.0
}

fn default_far() -> f64 {
    10_000.0
}

impl OverlayManifest {
    pub fn new(elements: Vec<String>, slots: Vec<String>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            name: None,
            elements,
            slots,
            assets: AssetsEntry::default(),
            base: BaseEntry::default(),
            defaults: DefaultsEntry::default(),
            layers: Vec::new(),
        }
    }

    /// blake3 of the compact JSON encoding, hex encoded.
    ///
    /// Field order is fixed by the struct layout and maps are ordered, so the
    /// hash only changes when the content does.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(self)?;
        Ok(blake3::hash(&payload).to_hex().to_string())
    }
}
