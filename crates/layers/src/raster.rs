use crate::layer::LayerId;
use crate::symbology::{BlendMode, Placement};

/// A description of one overlay image the host should show: which image,
/// where, and how it blends. Loading the pixels is the host's job.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayResource {
    pub layer: LayerId,
    pub layer_name: String,
    pub resource_key: String,
    pub placement: Placement,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub visible: bool,
    /// World-wrap copy index for flat placements, `0` on the sphere.
    pub wrap_index: i32,
}

/// Turns resource keys into URLs for the host's image loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    pub base: String,
    pub extension: String,
}

impl Default for ResourceLocator {
    fn default() -> Self {
        Self {
            base: "./".to_string(),
            extension: "png".to_string(),
        }
    }
}

impl ResourceLocator {
    pub fn new(base: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            extension: extension.into(),
        }
    }

    pub fn url(&self, resource_key: &str) -> String {
        let sep = if self.base.is_empty() || self.base.ends_with('/') {
            ""
        } else {
            "/"
        };
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            format!("{}{sep}{resource_key}", self.base)
        } else {
            format!("{}{sep}{resource_key}.{ext}", self.base)
        }
    }
}
