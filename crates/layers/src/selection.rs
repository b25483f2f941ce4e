use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which base surface is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewMode {
    /// Tiled, projected slippy map.
    Flat,
    /// Textured sphere.
    Sphere,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Flat, ViewMode::Sphere];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Flat => "2D",
            ViewMode::Sphere => "3D",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

impl FromStr for ViewMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "2d" | "flat" => Ok(ViewMode::Flat),
            "3d" | "sphere" => Ok(ViewMode::Sphere),
            other => Err(ParseError(format!(
                "unknown view mode {other:?} (expected 2D or 3D)"
            ))),
        }
    }
}

/// One user pick: `element` chosen for `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlaySelection {
    pub slot: String,
    pub element: String,
}

impl OverlaySelection {
    pub fn new(slot: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            element: element.into(),
        }
    }
}

/// Parses `slot=element`.
impl FromStr for OverlaySelection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (slot, element) = s
            .split_once('=')
            .ok_or_else(|| ParseError(format!("expected slot=element, got {s:?}")))?;
        let (slot, element) = (slot.trim(), element.trim());
        if slot.is_empty() || element.is_empty() {
            return Err(ParseError(format!("expected slot=element, got {s:?}")));
        }
        Ok(Self::new(slot, element))
    }
}

/// Current element per slot. Setting a slot again replaces its element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    by_slot: BTreeMap<String, String>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the selection changed.
    pub fn set(&mut self, selection: OverlaySelection) -> bool {
        let previous = self.by_slot.insert(selection.slot, selection.element.clone());
        previous.as_deref() != Some(selection.element.as_str())
    }

    pub fn element(&self, slot: &str) -> Option<&str> {
        self.by_slot.get(slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OverlaySelection> + '_ {
        self.by_slot
            .iter()
            .map(|(slot, element)| OverlaySelection::new(slot, element))
    }
}

impl FromIterator<OverlaySelection> for Selections {
    fn from_iter<I: IntoIterator<Item = OverlaySelection>>(iter: I) -> Self {
        let mut s = Self::new();
        for sel in iter {
            s.set(sel);
        }
        s
    }
}

/// Named on/off toggles for overlay layers. A flag that was never set falls
/// back to the default its layer declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityFlags {
    flags: BTreeMap<String, bool>,
}

impl VisibilityFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the flag changed.
    pub fn set(&mut self, flag: impl Into<String>, on: bool) -> bool {
        self.flags.insert(flag.into(), on) != Some(on)
    }

    pub fn get(&self, flag: &str) -> Option<bool> {
        self.flags.get(flag).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlaySelection, Selections, ViewMode, VisibilityFlags};

    #[test]
    fn parses_view_modes() {
        assert_eq!("2D".parse::<ViewMode>(), Ok(ViewMode::Flat));
        assert_eq!("sphere".parse::<ViewMode>(), Ok(ViewMode::Sphere));
        assert!("4d".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Sphere.to_string(), "3D");
    }

    #[test]
    fn parses_selections() {
        let sel: OverlaySelection = "primary=Al".parse().expect("selection");
        assert_eq!(sel, OverlaySelection::new("primary", "Al"));
        assert!("primary".parse::<OverlaySelection>().is_err());
        assert!("=Al".parse::<OverlaySelection>().is_err());
    }

    #[test]
    fn later_selection_replaces_earlier() {
        let mut s: Selections = [
            OverlaySelection::new("primary", "Al"),
            OverlaySelection::new("primary", "Si"),
        ]
        .into_iter()
        .collect();
        assert_eq!(s.len(), 1);
        assert_eq!(s.element("primary"), Some("Si"));
        assert!(!s.set(OverlaySelection::new("primary", "Si")));
        assert!(s.set(OverlaySelection::new("primary", "Al")));
    }

    #[test]
    fn visibility_flags_report_changes() {
        let mut flags = VisibilityFlags::new();
        assert_eq!(flags.get("aluminum"), None);
        assert!(flags.set("aluminum", true));
        assert!(!flags.set("aluminum", true));
        assert_eq!(flags.get("aluminum"), Some(true));
    }
}
