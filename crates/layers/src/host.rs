//! Registration of overlay resources with the host rendering surface.

use std::collections::BTreeMap;

use tracing::debug;

use crate::layer::LayerHandle;
use crate::raster::OverlayResource;

/// The host engine's layer registration API.
///
/// `swap_layers` must retire `retire` and register `register` as one step,
/// so a frame never shows both sets or neither. Handles come back in the
/// order of `register`.
pub trait HostSurface {
    fn swap_layers(
        &mut self,
        retire: &[LayerHandle],
        register: &[OverlayResource],
    ) -> Vec<LayerHandle>;
}

/// What the core last told the host to show.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OverlayStack {
    handles: Vec<LayerHandle>,
    shown: Vec<OverlayResource>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown set with `next`.
    ///
    /// Returns `false` (and leaves the host alone) when `next` is already
    /// what is shown.
    pub fn apply<H>(&mut self, host: &mut H, next: Vec<OverlayResource>) -> bool
    where
        H: HostSurface + ?Sized,
    {
        if next == self.shown {
            return false;
        }
        let handles = host.swap_layers(&self.handles, &next);
        debug!(
            retired = self.handles.len(),
            registered = handles.len(),
            "swapped overlay layers"
        );
        self.handles = handles;
        self.shown = next;
        true
    }

    /// Retire everything.
    pub fn clear<H>(&mut self, host: &mut H) -> bool
    where
        H: HostSurface + ?Sized,
    {
        self.apply(host, Vec::new())
    }

    pub fn shown(&self) -> &[OverlayResource] {
        &self.shown
    }

    pub fn handles(&self) -> &[LayerHandle] {
        &self.handles
    }
}

/// Host surface that just keeps registrations in memory.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    next_handle: u64,
    layers: BTreeMap<LayerHandle, OverlayResource>,
    swaps: usize,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered resources in registration order.
    pub fn layers(&self) -> Vec<&OverlayResource> {
        self.layers.values().collect()
    }

    pub fn contains(&self, handle: LayerHandle) -> bool {
        self.layers.contains_key(&handle)
    }

    pub fn swap_count(&self) -> usize {
        self.swaps
    }
}

impl HostSurface for InMemoryHost {
    fn swap_layers(
        &mut self,
        retire: &[LayerHandle],
        register: &[OverlayResource],
    ) -> Vec<LayerHandle> {
        for handle in retire {
            self.layers.remove(handle);
        }
        let mut handles = Vec::with_capacity(register.len());
        for resource in register {
            let handle = LayerHandle(self.next_handle);
            self.next_handle += 1;
            self.layers.insert(handle, resource.clone());
            handles.push(handle);
        }
        self.swaps += 1;
        handles
    }
}
