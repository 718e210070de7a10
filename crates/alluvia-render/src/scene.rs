//! The drawable scene: primitive rectangles, curved bands and text spans in
//! bounded (margin-less) coordinates, ready for any surface that can draw
//! shapes. The SVG writer in [`crate::svg`] is the reference surface.

use crate::highlight::HoverStyles;
use crate::label;
use crate::layout::SankeyLayout;
use crate::palette::{ColorResolver, darker};
use alluvia_core::{EdgeColorMode, Margins, PanelOptions, Viewport};
use serde::Serialize;

pub const PANEL_BACKGROUND: &str = "#f8f8fa";
pub const NEUTRAL_LINK_COLOR: &str = "#aaa";
pub const NO_DATA_NOTICE: &str = "No data supplied";

const NODE_STROKE_DARKEN: f64 = 0.5;
const LABEL_OFFSET: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeShape {
    pub index: usize,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub opacity: f64,
    /// Hover tooltip: name plus formatted aggregate value.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LinkStroke {
    Solid(String),
    /// Source-to-target gradient; `id` is the per-link identity token the
    /// drawing surface namespaces and uses to bind the definition to the
    /// path.
    Gradient {
        id: String,
        start: String,
        end: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkShape {
    pub index: usize,
    pub source: usize,
    pub target: usize,
    /// Endpoints of the horizontal cubic: source attachment center to
    /// target attachment center.
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stroke: LinkStroke,
    pub stroke_width: f64,
    pub opacity: f64,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShape {
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub margins: Margins,
    pub background: String,
    pub nodes: Vec<NodeShape>,
    pub links: Vec<LinkShape>,
    pub labels: Vec<LabelShape>,
    /// Set instead of shapes when there is nothing to draw.
    pub notice: Option<String>,
}

impl Scene {
    /// The placeholder shown for an empty graph.
    pub fn no_data(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: Margins::panel(),
            background: PANEL_BACKGROUND.to_string(),
            nodes: Vec::new(),
            links: Vec::new(),
            labels: Vec::new(),
            notice: Some(NO_DATA_NOTICE.to_string()),
        }
    }

    /// Copies hover opacities onto the shapes. Geometry is untouched; this
    /// is the only part of the scene that changes between pointer events.
    pub fn apply(&mut self, styles: &HoverStyles) {
        for shape in &mut self.nodes {
            if let Some(&opacity) = styles.node_opacity.get(shape.index) {
                shape.opacity = opacity;
            }
        }
        for shape in &mut self.links {
            if let Some(&opacity) = styles.link_opacity.get(shape.index) {
                shape.opacity = opacity;
            }
        }
    }
}

pub fn build_scene(
    layout: &SankeyLayout,
    options: &PanelOptions,
    viewport: Viewport,
    margins: Margins,
) -> Scene {
    let mut resolver = ColorResolver::new(options.color_scheme);

    let nodes: Vec<NodeShape> = layout
        .nodes
        .iter()
        .map(|n| {
            let fill = resolver.color_for(&n.name).to_string();
            let stroke = darker(&fill, NODE_STROKE_DARKEN);
            NodeShape {
                index: n.index,
                name: n.name.clone(),
                x: n.x0,
                y: n.y0,
                width: n.x1 - n.x0,
                height: n.y1 - n.y0,
                fill,
                stroke,
                opacity: 1.0,
                title: format!("{}\n{}", n.name, label::format_value(n.value)),
            }
        })
        .collect();

    let links: Vec<LinkShape> = layout
        .links
        .iter()
        .map(|l| {
            let source = &layout.nodes[l.source];
            let target = &layout.nodes[l.target];
            let stroke = match options.edge_color {
                EdgeColorMode::None => LinkStroke::Solid(NEUTRAL_LINK_COLOR.to_string()),
                EdgeColorMode::Input => {
                    LinkStroke::Solid(resolver.color_for(&source.name).to_string())
                }
                EdgeColorMode::Output => {
                    LinkStroke::Solid(resolver.color_for(&target.name).to_string())
                }
                EdgeColorMode::Path => LinkStroke::Gradient {
                    id: format!("link-{}", l.index),
                    start: resolver.color_for(&source.name).to_string(),
                    end: resolver.color_for(&target.name).to_string(),
                },
            };
            LinkShape {
                index: l.index,
                source: l.source,
                target: l.target,
                x0: source.x1,
                y0: l.y0,
                x1: target.x0,
                y1: l.y1,
                stroke,
                stroke_width: l.width.max(1.0),
                opacity: 1.0,
                title: format!(
                    "{} → {}\n{}",
                    source.name,
                    target.name,
                    label::format_value(l.value)
                ),
            }
        })
        .collect();

    let labels: Vec<LabelShape> = layout
        .nodes
        .iter()
        .map(|n| {
            let (x, anchor) = if n.x0 < viewport.width / 2.0 {
                (n.x1 + LABEL_OFFSET, TextAnchor::Start)
            } else {
                (n.x0 - LABEL_OFFSET, TextAnchor::End)
            };
            LabelShape {
                x,
                y: (n.y0 + n.y1) / 2.0,
                anchor,
                text: label::node_label(&layout.nodes, n, options.display_values),
            }
        })
        .collect();

    Scene {
        viewport,
        margins,
        background: PANEL_BACKGROUND.to_string(),
        nodes,
        links,
        labels,
        notice: None,
    }
}
