//! Viewer state as explicit transitions: every user input returns the
//! complete overlay list the host should now show.

use tracing::debug;

use crate::catalog::OverlayCatalog;
use crate::compositor::resolve;
use crate::raster::OverlayResource;
use crate::selection::{OverlaySelection, Selections, ViewMode, VisibilityFlags};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub view_mode: ViewMode,
    pub selections: Selections,
    pub visibility: VisibilityFlags,
}

impl ViewerState {
    pub fn new(view_mode: ViewMode, selections: Selections) -> Self {
        Self {
            view_mode,
            selections,
            visibility: VisibilityFlags::new(),
        }
    }

    pub fn resources(&self, catalog: &OverlayCatalog) -> Vec<OverlayResource> {
        resolve(catalog, &self.selections, self.view_mode, &self.visibility)
    }

    /// Selections for slots the catalog does not declare are dropped.
    pub fn on_selection_changed(
        &mut self,
        catalog: &OverlayCatalog,
        selection: OverlaySelection,
    ) -> Vec<OverlayResource> {
        if catalog.is_slot(&selection.slot) {
            self.selections.set(selection);
        } else {
            debug!(slot = %selection.slot, "ignoring selection for unknown slot");
        }
        self.resources(catalog)
    }

    pub fn on_visibility_changed(
        &mut self,
        catalog: &OverlayCatalog,
        flag: &str,
        on: bool,
    ) -> Vec<OverlayResource> {
        self.visibility.set(flag, on);
        self.resources(catalog)
    }

    pub fn on_view_mode_changed(
        &mut self,
        catalog: &OverlayCatalog,
        view_mode: ViewMode,
    ) -> Vec<OverlayResource> {
        self.view_mode = view_mode;
        self.resources(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerState;
    use crate::catalog::{LayerSpec, OverlayCatalog, TableEntry};
    use crate::host::{InMemoryHost, OverlayStack};
    use crate::selection::{OverlaySelection, Selections, ViewMode};
    use crate::symbology::{FlatStyle, LayerStyle, SphereStyle, SphereWrap};
    use foundation::bounds::Extent;

    fn catalog() -> OverlayCatalog {
        let mut c = OverlayCatalog::new(["primary", "secondary"], ["Al", "Si"]).expect("catalog");
        c.add_layer(LayerSpec {
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
                TableEntry::new(["Si", "Si"], None),
            ],
        })
        .expect("layer");
        c
    }

    #[test]
    fn transitions_drive_the_host() {
        let c = catalog();
        let defaults: Selections = [
            OverlaySelection::new("primary", "Al"),
            OverlaySelection::new("secondary", "Al"),
        ]
        .into_iter()
        .collect();
        let mut state = ViewerState::new(ViewMode::Sphere, defaults);
        let mut host = InMemoryHost::new();
        let mut stack = OverlayStack::new();

        assert!(state.resources(&c).is_empty());

        let next = state.on_selection_changed(&c, OverlaySelection::new("secondary", "Si"));
        assert!(stack.apply(&mut host, next));
        assert_eq!(host.layers().len(), 1);

        let next = state.on_view_mode_changed(&c, ViewMode::Flat);
        assert!(stack.apply(&mut host, next));
        assert_eq!(host.layers().len(), 9);

        let next = state.on_selection_changed(&c, OverlaySelection::new("primary", "Si"));
        assert!(stack.apply(&mut host, next));
        assert!(host.layers().is_empty());
    }

    #[test]
    fn unknown_slots_are_ignored() {
        let c = catalog();
        let mut state = ViewerState::new(ViewMode::Flat, Selections::new());
        let out = state.on_selection_changed(&c, OverlaySelection::new("tertiary", "Al"));
        assert!(out.is_empty());
        assert!(state.selections.is_empty());
    }

    #[test]
    fn visibility_changes_are_recorded() {
        let c = catalog();
        let mut state = ViewerState::new(ViewMode::Flat, Selections::new());
        state.on_visibility_changed(&c, "aluminum", true);
        assert_eq!(state.visibility.get("aluminum"), Some(true));
    }
}
