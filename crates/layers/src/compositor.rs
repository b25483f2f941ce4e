use tracing::{debug, trace};

use crate::catalog::{Lookup, OverlayCatalog, OverlayLayerDef};
use crate::raster::OverlayResource;
use crate::selection::{Selections, ViewMode, VisibilityFlags};
use crate::symbology::{BlendMode, Placement};

/// Decide which overlay images the host should show.
///
/// Contract:
/// - Layers contribute in catalog declaration order; flat copies of one layer
///   are ordered by ascending wrap index.
/// - A layer contributes nothing when its toggle is off, an input slot has no
///   selection, the combination maps to identity or is missing from the
///   table, or the layer has no style for `mode`.
/// - Pure: equal arguments give equal output.
pub fn resolve(
    catalog: &OverlayCatalog,
    selections: &Selections,
    mode: ViewMode,
    flags: &VisibilityFlags,
) -> Vec<OverlayResource> {
    let mut out = Vec::new();
    for layer in catalog.layers() {
        resolve_layer(layer, selections, mode, flags, &mut out);
    }
    trace!(mode = %mode, count = out.len(), "resolved overlays");
    out
}

fn resolve_layer(
    layer: &OverlayLayerDef,
    selections: &Selections,
    mode: ViewMode,
    flags: &VisibilityFlags,
    out: &mut Vec<OverlayResource>,
) {
    if let Some(toggle) = &layer.toggle {
        if !flags.get(&toggle.flag).unwrap_or(toggle.default_on) {
            return;
        }
    }

    let mut elements = Vec::with_capacity(layer.inputs.len());
    for slot in &layer.inputs {
        let Some(element) = selections.element(slot) else {
            return;
        };
        elements.push(element);
    }

    let key = match layer.lookup(mode, &elements) {
        Lookup::Resource(key) => key,
        Lookup::Identity => return,
        Lookup::Unresolved => {
            debug!(
                layer = %layer.name,
                mode = %mode,
                elements = ?elements,
                "no overlay mapped for combination"
            );
            return;
        }
    };

    let make = |placement: Placement, opacity: f32, blend_mode: BlendMode, wrap_index: i32| {
        OverlayResource {
            layer: layer.id,
            layer_name: layer.name.clone(),
            resource_key: key.to_string(),
            placement,
            opacity,
            blend_mode,
            visible: true,
            wrap_index,
        }
    };

    match mode {
        ViewMode::Flat => {
            let Some(style) = layer.style.flat else {
                return;
            };
            for (index, extent) in style.extent.world_wrapped(style.repeats) {
                out.push(make(
                    Placement::Extent(extent),
                    style.opacity,
                    style.blend_mode,
                    index,
                ));
            }
        }
        ViewMode::Sphere => {
            let Some(style) = layer.style.sphere else {
                return;
            };
            out.push(make(
                Placement::Sphere(style.wrap),
                style.opacity,
                style.blend_mode,
                0,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::catalog::{LayerSpec, OverlayCatalog, TableEntry, VisibilityToggle};
    use crate::selection::{OverlaySelection, Selections, ViewMode, VisibilityFlags};
    use crate::symbology::{BlendMode, FlatStyle, LayerStyle, Placement, SphereStyle, SphereWrap};
    use foundation::bounds::Extent;
    use pretty_assertions::assert_eq;

    fn lunar_catalog() -> OverlayCatalog {
        let mut c = OverlayCatalog::new(
            ["primary", "secondary", "aluminum", "silicon"],
            ["Al", "Si", "Fe"],
        )
        .expect("catalog");

        c.add_layer(LayerSpec {
            name: "pair".to_string(),
            inputs: vec!["primary".to_string(), "secondary".to_string()],
            toggle: None,
            style: LayerStyle {
                flat: Some(FlatStyle::new(Extent::new(-180.0, 0.0, 180.0, 120.0))),
                sphere: Some(SphereStyle {
                    wrap: SphereWrap {
                        scale: 1.001,
                        yaw_deg: 180.0,
                    },
                    opacity: 0.6,
                    blend_mode: BlendMode::Normal,
                }),
            },
            entries: vec![
                TableEntry::new(["Al", "Al"], None),
                TableEntry::new(["Al", "Si"], Some("Al_Si")),
                TableEntry::new(["Si", "Al"], Some("Al_Si")),
                TableEntry::new(["Si", "Si"], None),
            ],
        })
        .expect("pair");

        for (name, element, key, scale, opacity) in [
            ("aluminum", "Al", "pop", 1.002, 0.85),
            ("silicon", "Si", "pkj", 1.003, 0.95),
        ] {
            c.add_layer(LayerSpec {
                name: name.to_string(),
                inputs: vec![name.to_string()],
                toggle: Some(VisibilityToggle {
                    flag: name.to_string(),
                    default_on: false,
                }),
                style: LayerStyle {
                    flat: None,
                    sphere: Some(SphereStyle {
                        wrap: SphereWrap::new(scale),
                        opacity,
                        blend_mode: BlendMode::Multiply,
                    }),
                },
                entries: vec![
                    TableEntry::new([element], Some(key)).in_modes(&[ViewMode::Sphere]),
                ],
            })
            .expect("toggle layer");
        }
        c
    }

    fn select(pairs: &[(&str, &str)]) -> Selections {
        pairs
            .iter()
            .map(|(slot, element)| OverlaySelection::new(*slot, *element))
            .collect()
    }

    #[test]
    fn flat_pair_repeats_across_the_antimeridian() {
        let c = lunar_catalog();
        let sel = select(&[("primary", "Al"), ("secondary", "Si")]);
        let out = resolve(&c, &sel, ViewMode::Flat, &VisibilityFlags::new());

        assert_eq!(out.len(), 9);
        for (i, r) in out.iter().enumerate() {
            let offset = (i as i32 - 4) as f64 * 360.0;
            assert_eq!(r.resource_key, "Al_Si");
            assert_eq!(r.wrap_index, i as i32 - 4);
            assert_eq!(
                r.placement,
                Placement::Extent(Extent::new(-180.0 + offset, 0.0, 180.0 + offset, 120.0))
            );
            assert_eq!(r.opacity, 0.5);
            assert!(r.visible);
        }
        assert_eq!(
            out.first().map(|r| r.placement),
            Some(Placement::Extent(Extent::new(-1620.0, 0.0, -1260.0, 120.0)))
        );
    }

    #[test]
    fn pair_order_does_not_matter() {
        let c = lunar_catalog();
        let a = resolve(
            &c,
            &select(&[("primary", "Si"), ("secondary", "Al")]),
            ViewMode::Sphere,
            &VisibilityFlags::new(),
        );
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].resource_key, "Al_Si");
        assert_eq!(
            a[0].placement,
            Placement::Sphere(SphereWrap {
                scale: 1.001,
                yaw_deg: 180.0
            })
        );
        assert_eq!(a[0].wrap_index, 0);
    }

    #[test]
    fn identical_elements_show_nothing() {
        let c = lunar_catalog();
        let sel = select(&[("primary", "Al"), ("secondary", "Al")]);
        for mode in ViewMode::ALL {
            assert!(resolve(&c, &sel, mode, &VisibilityFlags::new()).is_empty());
        }
    }

    #[test]
    fn unknown_combinations_contribute_nothing() {
        let c = lunar_catalog();
        for pairs in [
            &[("primary", "Fe"), ("secondary", "Si")][..],
            &[("primary", "Unobtainium"), ("secondary", "Si")][..],
            &[("primary", "Al")][..],
            &[("tertiary", "Al"), ("secondary", "Si")][..],
        ] {
            let out = resolve(&c, &select(pairs), ViewMode::Flat, &VisibilityFlags::new());
            assert!(out.is_empty(), "{pairs:?}");
        }
    }

    #[test]
    fn toggles_gate_layers_and_keep_declaration_order() {
        let c = lunar_catalog();
        let sel = select(&[
            ("primary", "Al"),
            ("secondary", "Si"),
            ("aluminum", "Al"),
            ("silicon", "Si"),
        ]);

        let off = resolve(&c, &sel, ViewMode::Sphere, &VisibilityFlags::new());
        assert_eq!(off.len(), 1);

        let mut flags = VisibilityFlags::new();
        flags.set("silicon", true);
        flags.set("aluminum", true);
        let on = resolve(&c, &sel, ViewMode::Sphere, &flags);
        let keys: Vec<_> = on.iter().map(|r| r.resource_key.as_str()).collect();
        assert_eq!(keys, vec!["Al_Si", "pop", "pkj"]);
        assert_eq!(on[2].blend_mode, BlendMode::Multiply);
        assert_eq!(on[2].opacity, 0.95);

        // Sphere-only layers have no flat style.
        let flat = resolve(&c, &sel, ViewMode::Flat, &flags);
        assert!(flat.iter().all(|r| r.resource_key == "Al_Si"));
    }

    #[test]
    fn toggling_off_and_on_restores_the_same_resources() {
        let c = lunar_catalog();
        let sel = select(&[("aluminum", "Al")]);
        let mut flags = VisibilityFlags::new();
        flags.set("aluminum", true);
        let before = resolve(&c, &sel, ViewMode::Sphere, &flags);

        flags.set("aluminum", false);
        assert!(resolve(&c, &sel, ViewMode::Sphere, &flags).is_empty());

        flags.set("aluminum", true);
        assert_eq!(resolve(&c, &sel, ViewMode::Sphere, &flags), before);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn resolve_is_pure() {
        let c = lunar_catalog();
        let sel = select(&[("primary", "Si"), ("secondary", "Al"), ("silicon", "Si")]);
        let mut flags = VisibilityFlags::new();
        flags.set("silicon", true);
        for mode in ViewMode::ALL {
            assert_eq!(resolve(&c, &sel, mode, &flags), resolve(&c, &sel, mode, &flags));
        }
    }
}
