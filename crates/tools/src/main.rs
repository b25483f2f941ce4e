use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formats::OverlayPackage;
use foundation::math::{GeoCoordinate, Vec3};
use layers::{
    OverlayResource, OverlaySelection, Placement, ResourceLocator, ViewMode, ViewerState,
};
use scene::{CoordinateReadout, PickOptions, Viewport, pick, pick_flat, pointer_to_ndc};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lunar overlay picking and compositing")]
struct Args {
    /// Directory holding moon.overlays.json (built-in lunar manifest when unset)
    #[arg(long, env = "MOONLAYER_MANIFEST")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the manifest and list unmapped element combinations
    Check,

    /// Print the overlays to show for a selection
    Resolve {
        /// View mode: 2d | 3d (manifest default when unset)
        #[arg(long)]
        mode: Option<ViewMode>,

        /// Slot selection, e.g. secondary=Si (repeatable)
        #[arg(long = "select")]
        selections: Vec<OverlaySelection>,

        /// Visibility flag, e.g. aluminum=on (repeatable)
        #[arg(long = "flag", value_parser = parse_flag)]
        flags: Vec<(String, bool)>,
    },

    /// Pick the sphere under a pointer position
    Pick {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        /// Camera position x,y,z (manifest camera when unset)
        #[arg(long, value_parser = parse_vec3)]
        eye: Option<Vec3>,
    },

    /// Pick the flat map under a pixel
    FlatPick {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        /// Map zoom (manifest zoom when unset)
        #[arg(long)]
        zoom: Option<f64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let package = match &args.manifest {
        Some(dir) => OverlayPackage::load(dir)
            .map_err(|e| format!("failed to load {}: {e}", dir.display()))?,
        None => OverlayPackage::builtin().map_err(|e| format!("built-in manifest: {e}"))?,
    };

    match args.command {
        Command::Check => cmd_check(&package),
        Command::Resolve {
            mode,
            selections,
            flags,
        } => cmd_resolve(&package, mode, selections, flags),
        Command::Pick {
            x,
            y,
            width,
            height,
            eye,
        } => cmd_pick(&package, x, y, width, height, eye),
        Command::FlatPick {
            x,
            y,
            width,
            height,
            zoom,
        } => cmd_flat_pick(&package, x, y, width, height, zoom),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| format!("encode output: {e}"))?;
    println!("{out}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckReport {
    name: Option<String>,
    hash: String,
    elements: usize,
    layers: Vec<String>,
    gaps: Vec<String>,
}

fn cmd_check(package: &OverlayPackage) -> Result<(), String> {
    let catalog = package.catalog();
    let report = CheckReport {
        name: package.manifest().name.clone(),
        hash: package.hash().to_string(),
        elements: catalog.elements().len(),
        layers: catalog.layers().iter().map(|l| l.name.clone()).collect(),
        gaps: catalog
            .coverage_gaps()
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    print_json(&report)
}

#[derive(Debug, Serialize, PartialEq)]
struct ResourceRow {
    layer: String,
    key: String,
    url: String,
    /// `[min_lon, min_lat, max_lon, max_lat]` for flat overlays.
    #[serde(skip_serializing_if = "Option::is_none")]
    extent: Option<[f64; 4]>,
    /// Shell scale relative to the base sphere for sphere overlays.
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yaw_deg: Option<f64>,
    opacity: f32,
    blend: &'static str,
    wrap_index: i32,
}

impl ResourceRow {
    fn new(resource: &OverlayResource, locator: &ResourceLocator) -> Self {
        let (extent, scale, yaw_deg) = match resource.placement {
            Placement::Extent(extent) => (Some(extent.as_array()), None, None),
            Placement::Sphere(wrap) => (None, Some(wrap.scale), Some(wrap.yaw_deg)),
        };
        Self {
            layer: resource.layer_name.clone(),
            key: resource.resource_key.clone(),
            url: locator.url(&resource.resource_key),
            extent,
            scale,
            yaw_deg,
            opacity: resource.opacity,
            blend: resource.blend_mode.label(),
            wrap_index: resource.wrap_index,
        }
    }
}

fn cmd_resolve(
    package: &OverlayPackage,
    mode: Option<ViewMode>,
    selections: Vec<OverlaySelection>,
    flags: Vec<(String, bool)>,
) -> Result<(), String> {
    let catalog = package.catalog();
    let mut state: ViewerState = package.manifest().viewer_state();
    if let Some(mode) = mode {
        state.view_mode = mode;
    }
    for selection in selections {
        if !catalog.is_slot(&selection.slot) {
            return Err(format!("unknown slot: {}", selection.slot));
        }
        state.selections.set(selection);
    }
    for (flag, on) in flags {
        state.visibility.set(flag, on);
    }

    let resources = state.resources(catalog);
    info!(mode = %state.view_mode, count = resources.len(), "resolved overlays");
    let locator = package.manifest().locator();
    let rows: Vec<ResourceRow> = resources
        .iter()
        .map(|r| ResourceRow::new(r, &locator))
        .collect();
    print_json(&rows)
}

#[derive(Debug, Serialize, PartialEq)]
struct HitRow {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct PickReport {
    hit: Option<HitRow>,
    readout: [String; 2],
}

fn report(hit: Option<GeoCoordinate>) -> PickReport {
    let mut readout = CoordinateReadout::default();
    readout.update(hit);
    PickReport {
        hit: hit.map(|g| HitRow {
            latitude: g.latitude,
            longitude: g.longitude,
        }),
        readout: readout.lines(),
    }
}

fn cmd_pick(
    package: &OverlayPackage,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    eye: Option<Vec3>,
) -> Result<(), String> {
    let manifest = package.manifest();
    let viewport = Viewport::new(0.0, 0.0, width, height);
    let mut camera = manifest.camera();
    if let Some(eye) = eye {
        let orbit = &manifest.base.sphere.orbit;
        camera.eye = eye;
        camera = camera.with_orbit_limits(orbit.min_distance, orbit.max_distance);
    }
    let camera = camera.with_aspect(viewport.aspect());

    let ndc = pointer_to_ndc(x, y, viewport).ok_or("viewport must have a positive size")?;
    let hit = pick(&manifest.scene(), &camera, ndc, PickOptions::for_camera(&camera));
    print_json(&report(hit))
}

fn cmd_flat_pick(
    package: &OverlayPackage,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    zoom: Option<f64>,
) -> Result<(), String> {
    let mut view = package.manifest().flat_view(width, height);
    if let Some(zoom) = zoom {
        view.zoom = zoom;
    }
    print_json(&report(pick_flat(&view, x, y)))
}

fn parse_flag(raw: &str) -> Result<(String, bool), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected flag=on|off, got {raw:?}"))?;
    let on = match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        other => return Err(format!("invalid flag value {other:?}")),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing flag name in {raw:?}"));
    }
    Ok((name.to_string(), on))
}

fn parse_vec3(raw: &str) -> Result<Vec3, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid coordinate in {raw:?}: {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {raw:?}")),
    }
}
