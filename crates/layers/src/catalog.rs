//! Resolution and style tables for overlay layers.
//!
//! A catalog is data: it declares the selection slots, the known elements and
//! an ordered list of overlay layers. Each layer maps the elements picked in
//! its input slots, per view mode, to a resource key or to "identity"
//! (explicitly nothing shown). Combinations the table does not mention are
//! coverage gaps: they resolve to nothing at runtime and can be listed up
//! front with [`OverlayCatalog::coverage_gaps`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use foundation::math::stable_total_cmp_f64;

use crate::layer::LayerId;
use crate::selection::ViewMode;
use crate::symbology::LayerStyle;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    DuplicateSlot(String),
    DuplicateElement(String),
    DuplicateLayer(String),
    NoInputs { layer: String },
    UnknownSlot { layer: String, slot: String },
    UnknownElement { layer: String, element: String },
    ArityMismatch { layer: String, expected: usize, found: usize },
    DuplicateEntry { layer: String, mode: ViewMode, elements: Vec<String> },
    InvalidStyle { layer: String, reason: String },
    SharedShell { layer: String, other: String, scale: f64 },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateSlot(slot) => write!(f, "slot {slot:?} declared twice"),
            CatalogError::DuplicateElement(e) => write!(f, "element {e:?} declared twice"),
            CatalogError::DuplicateLayer(layer) => write!(f, "layer {layer:?} declared twice"),
            CatalogError::NoInputs { layer } => write!(f, "layer {layer:?} has no input slots"),
            CatalogError::UnknownSlot { layer, slot } => {
                write!(f, "layer {layer:?} reads unknown slot {slot:?}")
            }
            CatalogError::UnknownElement { layer, element } => {
                write!(f, "layer {layer:?} references unknown element {element:?}")
            }
            CatalogError::ArityMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "layer {layer:?} entry has {found} elements, expected {expected}"
            ),
            CatalogError::DuplicateEntry {
                layer,
                mode,
                elements,
            } => write!(
                f,
                "layer {layer:?} maps {} in {mode} twice",
                elements.join("_")
            ),
            CatalogError::InvalidStyle { layer, reason } => {
                write!(f, "layer {layer:?} has an invalid style: {reason}")
            }
            CatalogError::SharedShell {
                layer,
                other,
                scale,
            } => write!(
                f,
                "layer {layer:?} reuses sphere shell scale {scale} of layer {other:?}"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// A layer only shows while its flag is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityToggle {
    pub flag: String,
    pub default_on: bool,
}

/// One row of a layer's resolution table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// One element per input slot, in input order.
    pub elements: Vec<String>,
    pub modes: Vec<ViewMode>,
    /// `None` (or an empty key) means identity: nothing is shown.
    pub resource: Option<String>,
}

impl TableEntry {
    pub fn new<I, S>(elements: I, resource: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
            modes: ViewMode::ALL.to_vec(),
            resource: resource.map(str::to_string),
        }
    }

    pub fn in_modes(mut self, modes: &[ViewMode]) -> Self {
        self.modes = modes.to_vec();
        self
    }
}

/// Everything needed to add a layer to a catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerSpec {
    pub name: String,
    pub inputs: Vec<String>,
    pub toggle: Option<VisibilityToggle>,
    pub style: LayerStyle,
    pub entries: Vec<TableEntry>,
}

/// Outcome of a table lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lookup<'a> {
    Resource(&'a str),
    Identity,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayerDef {
    pub id: LayerId,
    pub name: String,
    pub inputs: Vec<String>,
    pub toggle: Option<VisibilityToggle>,
    pub style: LayerStyle,
    table: BTreeMap<(ViewMode, Vec<String>), Option<String>>,
}

impl OverlayLayerDef {
    pub fn lookup(&self, mode: ViewMode, elements: &[&str]) -> Lookup<'_> {
        let key: (ViewMode, Vec<String>) =
            (mode, elements.iter().map(|e| e.to_string()).collect());
        match self.table.get(&key) {
            Some(Some(resource)) => Lookup::Resource(resource),
            Some(None) => Lookup::Identity,
            None => Lookup::Unresolved,
        }
    }

    pub fn has_style_for(&self, mode: ViewMode) -> bool {
        match mode {
            ViewMode::Flat => self.style.flat.is_some(),
            ViewMode::Sphere => self.style.sphere.is_some(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.table.len()
    }
}

/// A combination a layer has a style for but no table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGap {
    pub layer: String,
    pub mode: ViewMode,
    pub elements: Vec<String>,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.layer,
            self.mode,
            self.elements.join(" + ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayCatalog {
    slots: Vec<String>,
    elements: Vec<String>,
    layers: Vec<OverlayLayerDef>,
}

impl OverlayCatalog {
    pub fn new<S, E>(slots: S, elements: E) -> Result<Self, CatalogError>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let mut catalog = Self::default();
        for slot in slots {
            let slot = slot.into();
            if catalog.slots.contains(&slot) {
                return Err(CatalogError::DuplicateSlot(slot));
            }
            catalog.slots.push(slot);
        }
        for element in elements {
            let element = element.into();
            if catalog.elements.contains(&element) {
                return Err(CatalogError::DuplicateElement(element));
            }
            catalog.elements.push(element);
        }
        Ok(catalog)
    }

    /// Validate the layer and append it; layers stack in the order added.
    pub fn add_layer(&mut self, spec: LayerSpec) -> Result<LayerId, CatalogError> {
        let LayerSpec {
            name,
            inputs,
            toggle,
            style,
            entries,
        } = spec;

        if self.layers.iter().any(|l| l.name == name) {
            return Err(CatalogError::DuplicateLayer(name));
        }
        if inputs.is_empty() {
            return Err(CatalogError::NoInputs { layer: name });
        }
        if let Some(slot) = inputs.iter().find(|s| !self.slots.contains(s)) {
            return Err(CatalogError::UnknownSlot {
                layer: name,
                slot: slot.clone(),
            });
        }
        if let Some(reason) = style.problem() {
            return Err(CatalogError::InvalidStyle {
                layer: name,
                reason,
            });
        }

        let mut table = BTreeMap::new();
        for entry in entries {
            if entry.elements.len() != inputs.len() {
                return Err(CatalogError::ArityMismatch {
                    layer: name,
                    expected: inputs.len(),
                    found: entry.elements.len(),
                });
            }
            if let Some(e) = entry.elements.iter().find(|e| !self.elements.contains(e)) {
                return Err(CatalogError::UnknownElement {
                    layer: name,
                    element: e.clone(),
                });
            }
            let resource = entry.resource.filter(|r| !r.is_empty());
            for mode in entry.modes {
                let key = (mode, entry.elements.clone());
                if table.insert(key, resource.clone()).is_some() {
                    return Err(CatalogError::DuplicateEntry {
                        layer: name,
                        mode,
                        elements: entry.elements,
                    });
                }
            }
        }

        // Shells at the same radius z-fight.
        if let Some(wrap) = style.sphere.map(|s| s.wrap) {
            let taken = self.layers.iter().find(|l| {
                l.style
                    .sphere
                    .is_some_and(|s| stable_total_cmp_f64(s.wrap.scale, wrap.scale).is_eq())
            });
            if let Some(other) = taken {
                return Err(CatalogError::SharedShell {
                    layer: name,
                    other: other.name.clone(),
                    scale: wrap.scale,
                });
            }
        }

        let id = LayerId(self.layers.len() as u64);
        self.layers.push(OverlayLayerDef {
            id,
            name,
            inputs,
            toggle,
            style,
            table,
        });
        Ok(id)
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn is_slot(&self, slot: &str) -> bool {
        self.slots.iter().any(|s| s == slot)
    }

    /// Layers in stacking order.
    pub fn layers(&self) -> &[OverlayLayerDef] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&OverlayLayerDef> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Every visibility flag some layer listens to.
    pub fn flags(&self) -> BTreeSet<&str> {
        self.layers
            .iter()
            .filter_map(|l| l.toggle.as_ref().map(|t| t.flag.as_str()))
            .collect()
    }

    /// Combinations that would silently resolve to nothing, in layer order,
    /// then view mode, then element order.
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        let mut gaps = Vec::new();
        for layer in &self.layers {
            for mode in ViewMode::ALL {
                if !layer.has_style_for(mode) {
                    continue;
                }
                for combo in combinations(&self.elements, layer.inputs.len()) {
                    let refs: Vec<&str> = combo.iter().map(String::as_str).collect();
                    if layer.lookup(mode, &refs) == Lookup::Unresolved {
                        gaps.push(CoverageGap {
                            layer: layer.name.clone(),
                            mode,
                            elements: combo,
                        });
                    }
                }
            }
        }
        gaps
    }
}

/// All `arity`-length sequences over `elements`, lexicographic in
/// declaration order.
fn combinations(elements: &[String], arity: usize) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = vec![Vec::new()];
    for _ in 0..arity {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                elements.iter().map(move |e| {
                    let mut next = prefix.clone();
                    next.push(e.clone());
                    next
                })
            })
            .collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        CatalogError, LayerSpec, Lookup, OverlayCatalog, TableEntry, VisibilityToggle,
        combinations,
    };
    use crate::selection::ViewMode;
    use crate::symbology::{FlatStyle, LayerStyle, SphereStyle, SphereWrap};
    use foundation::bounds::Extent;
    use pretty_assertions::assert_eq;

    fn pair_spec() -> LayerSpec {
        LayerSpec {
            name: "pair".to_string(),
            inputs: vec!["primary".to_string(), "secondary".to_string()],
            toggle: None,
            style: LayerStyle {
                flat: Some(FlatStyle::new(Extent::new(-180.0, 0.0, 180.0, 120.0))),
                sphere: Some(SphereStyle::new(SphereWrap::new(1.001))),
            },
            entries: vec![
                TableEntry::new(["Al", "Al"], None),
                TableEntry::new(["Al", "Si"], Some("Al_Si")),
                TableEntry::new(["Si", "Al"], Some("Al_Si")),
                TableEntry::new(["Si", "Si"], Some("")),
            ],
        }
    }

    fn catalog() -> OverlayCatalog {
        OverlayCatalog::new(["primary", "secondary", "aluminum"], ["Al", "Si", "Fe"])
            .expect("catalog")
    }

    #[test]
    fn lookup_distinguishes_resource_identity_and_gap() {
        let mut c = catalog();
        c.add_layer(pair_spec()).expect("layer");
        let layer = c.layer("pair").expect("pair");
        assert_eq!(layer.lookup(ViewMode::Flat, &["Si", "Al"]), Lookup::Resource("Al_Si"));
        assert_eq!(layer.lookup(ViewMode::Sphere, &["Al", "Al"]), Lookup::Identity);
        assert_eq!(layer.lookup(ViewMode::Sphere, &["Si", "Si"]), Lookup::Identity);
        assert_eq!(layer.lookup(ViewMode::Flat, &["Fe", "Al"]), Lookup::Unresolved);
        assert_eq!(layer.lookup(ViewMode::Flat, &["Bogus", "Al"]), Lookup::Unresolved);
        assert_eq!(layer.entry_count(), 8);
    }

    #[test]
    fn layer_ids_follow_declaration_order() {
        let mut c = catalog();
        let a = c.add_layer(pair_spec()).expect("pair");
        let b = c
            .add_layer(LayerSpec {
                name: "al".to_string(),
                inputs: vec!["aluminum".to_string()],
                toggle: Some(VisibilityToggle {
                    flag: "aluminum".to_string(),
                    default_on: false,
                }),
                style: LayerStyle::default(),
                entries: vec![TableEntry::new(["Al"], Some("pop"))],
            })
            .expect("al");
        assert!(a < b);
        assert_eq!(c.layers()[1].id, b);
        assert_eq!(c.flags().into_iter().collect::<Vec<_>>(), vec!["aluminum"]);
    }

    #[test]
    fn rejects_malformed_layers() {
        let mut c = catalog();
        c.add_layer(pair_spec()).expect("first");
        assert_eq!(
            c.add_layer(pair_spec()),
            Err(CatalogError::DuplicateLayer("pair".to_string()))
        );

        let mut spec = pair_spec();
        spec.name = "bad-slot".to_string();
        spec.inputs[1] = "tertiary".to_string();
        assert!(matches!(c.add_layer(spec), Err(CatalogError::UnknownSlot { .. })));

        let mut spec = pair_spec();
        spec.name = "bad-arity".to_string();
        spec.entries.push(TableEntry::new(["Al"], Some("x")));
        assert!(matches!(
            c.add_layer(spec),
            Err(CatalogError::ArityMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let mut spec = pair_spec();
        spec.name = "bad-element".to_string();
        spec.entries.push(TableEntry::new(["Al", "Ti"], Some("x")));
        assert!(matches!(c.add_layer(spec), Err(CatalogError::UnknownElement { .. })));

        let mut spec = pair_spec();
        spec.name = "dupe".to_string();
        spec.entries
            .push(TableEntry::new(["Al", "Si"], Some("other")).in_modes(&[ViewMode::Sphere]));
        assert!(matches!(c.add_layer(spec), Err(CatalogError::DuplicateEntry { .. })));

        let mut spec = pair_spec();
        spec.name = "no-inputs".to_string();
        spec.inputs.clear();
        assert!(matches!(c.add_layer(spec), Err(CatalogError::NoInputs { .. })));

        assert_eq!(c.layers().len(), 1);
    }

    #[test]
    fn rejects_stacked_shells_at_one_radius() {
        let mut c = catalog();
        c.add_layer(pair_spec()).expect("pair");

        let shell = |name: &str, scale: f64| LayerSpec {
            name: name.to_string(),
            inputs: vec!["aluminum".to_string()],
            toggle: None,
            style: LayerStyle {
                flat: None,
                sphere: Some(SphereStyle::new(SphereWrap::new(scale))),
            },
            entries: vec![TableEntry::new(["Al"], Some("pop"))],
        };
        assert_eq!(
            c.add_layer(shell("al", 1.001)),
            Err(CatalogError::SharedShell {
                layer: "al".to_string(),
                other: "pair".to_string(),
                scale: 1.001,
            })
        );
        c.add_layer(shell("al", 1.002)).expect("distinct radius");

        // Flat-only layers have no shell to collide with.
        let mut flat_only = shell("flat", 1.0);
        flat_only.style = LayerStyle {
            flat: Some(FlatStyle::new(Extent::new(-180.0, 0.0, 180.0, 120.0))),
            sphere: None,
        };
        c.add_layer(flat_only).expect("flat layer");
        assert_eq!(c.layers().len(), 3);
    }

    #[test]
    fn rejects_duplicate_declarations() {
        assert_eq!(
            OverlayCatalog::new(["a", "a"], ["Al"]),
            Err(CatalogError::DuplicateSlot("a".to_string()))
        );
        assert_eq!(
            OverlayCatalog::new(["a"], ["Al", "Al"]),
            Err(CatalogError::DuplicateElement("Al".to_string()))
        );
    }

    #[test]
    fn coverage_gaps_list_unmapped_pairs() {
        let mut c = catalog();
        let mut spec = pair_spec();
        spec.style.flat = None;
        c.add_layer(spec).expect("layer");

        let gaps: Vec<String> = c.coverage_gaps().iter().map(ToString::to_string).collect();
        assert_eq!(
            gaps,
            vec![
                "pair [3D]: Al + Fe",
                "pair [3D]: Si + Fe",
                "pair [3D]: Fe + Al",
                "pair [3D]: Fe + Si",
                "pair [3D]: Fe + Fe",
            ]
        );
    }

    #[test]
    fn combinations_are_lexicographic() {
        let els = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            combinations(&els, 2),
            vec![
                vec!["a".to_string(), "a".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["b".to_string(), "a".to_string()],
                vec!["b".to_string(), "b".to_string()],
            ]
        );
        assert_eq!(combinations(&els, 0), vec![Vec::<String>::new()]);
    }
}
