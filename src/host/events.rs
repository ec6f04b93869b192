use super::LayerId;

/// Notifications a viewer emits. They are queued and delivered one at a time, in
/// the order the underlying changes happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// A layer was inserted, removed, moved or renamed. `revision` is the layer-list
    /// revision right after the change.
    LayersChanged { revision: u64 },
    /// The geometry of a shapes layer changed.
    ShapesData { layer: LayerId },
    /// The cursor moved along `axis`.
    DimsPoint { axis: usize },
}
