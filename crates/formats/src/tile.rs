//! URL templates for the tiled flat base layer.

/// URL template with `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileTemplate(String);

impl TileTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether every placeholder is present.
    pub fn is_complete(&self) -> bool {
        ["{z}", "{x}", "{y}"].iter().all(|p| self.0.contains(p))
    }

    pub fn url(&self, z: u8, x: u32, y: u32) -> String {
        self.0
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}
