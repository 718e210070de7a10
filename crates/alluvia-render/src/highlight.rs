//! Hover highlighting: restyles opacity over the induced one-hop subgraph
//! of the hovered node. Reads the finished layout only; never moves
//! geometry.

use crate::layout::SankeyLayout;
use serde::Serialize;

pub const FULL_OPACITY: f64 = 1.0;
pub const DIMMED_OPACITY: f64 = 0.2;

/// Per-shape opacity overlay, indexed like the layout's node/link vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverStyles {
    pub node_opacity: Vec<f64>,
    pub link_opacity: Vec<f64>,
}

impl HoverStyles {
    /// Everything fully opaque, the pointer-leave state.
    pub fn reset(layout: &SankeyLayout) -> Self {
        Self {
            node_opacity: vec![FULL_OPACITY; layout.nodes.len()],
            link_opacity: vec![FULL_OPACITY; layout.links.len()],
        }
    }
}

/// Styles for a pointer-enter on `hovered`: the node itself, every node one
/// link away in either direction, and every link touching it stay opaque;
/// the rest dims. With highlighting disabled this is a no-op reset.
pub fn hover_node(layout: &SankeyLayout, hovered: usize, enabled: bool) -> HoverStyles {
    if !enabled || hovered >= layout.nodes.len() {
        return HoverStyles::reset(layout);
    }

    let mut styles = HoverStyles {
        node_opacity: vec![DIMMED_OPACITY; layout.nodes.len()],
        link_opacity: vec![DIMMED_OPACITY; layout.links.len()],
    };
    styles.node_opacity[hovered] = FULL_OPACITY;
    for link in &layout.links {
        if link.source == hovered || link.target == hovered {
            styles.link_opacity[link.index] = FULL_OPACITY;
            styles.node_opacity[link.source] = FULL_OPACITY;
            styles.node_opacity[link.target] = FULL_OPACITY;
        }
    }
    styles
}
