/// Position of an overlay layer in its catalog's declaration order, which is
/// also its stacking order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Handle the host surface hands back for a registered overlay.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub u64);
