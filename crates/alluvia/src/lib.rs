#![forbid(unsafe_code)]

//! `alluvia` renders Sankey flow diagrams for dashboard panels, headlessly:
//! a tabular frame of `source`/`target`/`value` columns goes in, a layouted
//! scene plus its SVG document come out. The pipeline is synchronous and
//! rebuilds everything per call; hover highlighting is a separate
//! presentation-only pass over the finished layout.
//!
//! ```
//! use alluvia::{Frame, PanelOptions, PanelOutput, Viewport, render_panel};
//!
//! let frame = Frame::from_rows([("A", "X", 10.0), ("B", "X", 5.0), ("X", "Y", 15.0)]);
//! let out = render_panel(&frame, &PanelOptions::default(), Viewport::new(640.0, 480.0)).unwrap();
//! assert!(matches!(out, PanelOutput::Chart { .. }));
//! ```

pub use alluvia_core::*;

pub mod render {
    pub use alluvia_render::highlight::{self, HoverStyles, hover_node};
    pub use alluvia_render::label;
    pub use alluvia_render::layout::{LinkLayout, NodeLayout, SankeyLayout, layout_graph};
    pub use alluvia_render::palette::{ColorResolver, darker, scheme_colors};
    pub use alluvia_render::scene::{Scene, build_scene};
    pub use alluvia_render::svg::{SvgRenderOptions, render_error_svg, render_scene_svg};
    pub use alluvia_render::{Error, Result};
}

use alluvia_render::layout::SankeyLayout;
use alluvia_render::scene::{Scene, build_scene};
use alluvia_render::svg::{SvgRenderOptions, render_scene_svg};

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error(transparent)]
    Data(#[from] alluvia_core::Error),
    #[error(transparent)]
    Render(#[from] alluvia_render::Error),
}

pub type PanelResult<T> = std::result::Result<T, PanelError>;

/// Human-readable failure surface for the host's error-display component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub message: String,
}

impl From<&PanelError> for ErrorPayload {
    fn from(err: &PanelError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// One render pass worth of output.
#[derive(Debug, Clone)]
pub enum PanelOutput {
    Chart {
        layout: SankeyLayout,
        scene: Scene,
        svg: String,
    },
    /// The recognized empty state: zero rows is a placeholder, not an error.
    NoData { svg: String },
}

/// The whole build → layout → draw pipeline for one data or size change.
pub fn render_panel(
    frame: &Frame,
    options: &PanelOptions,
    viewport: Viewport,
) -> PanelResult<PanelOutput> {
    let graph = build_graph(frame)?;
    if graph.is_empty() {
        tracing::debug!("empty graph, rendering placeholder");
        let svg = render_scene_svg(&Scene::no_data(viewport), &SvgRenderOptions::default());
        return Ok(PanelOutput::NoData { svg });
    }

    let margins = Margins::panel();
    let layout = alluvia_render::layout::layout_graph(&graph, options, margins.inner(viewport))?;
    let scene = build_scene(&layout, options, viewport, margins);
    let svg = render_scene_svg(&scene, &SvgRenderOptions::default());
    Ok(PanelOutput::Chart { layout, scene, svg })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_frame() -> Frame {
        Frame::from_rows([("A", "X", 10.0), ("B", "X", 5.0), ("X", "Y", 15.0)])
    }

    #[test]
    fn renders_a_chart_for_valid_input() {
        let out = render_panel(
            &scenario_frame(),
            &PanelOptions::default(),
            Viewport::new(640.0, 480.0),
        )
        .unwrap();
        let PanelOutput::Chart { layout, scene, svg } = out else {
            panic!("expected a chart");
        };
        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(scene.links.len(), 3);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("sankey-node"));
    }

    #[test]
    fn empty_frame_renders_the_placeholder() {
        let out = render_panel(
            &Frame::from_rows::<&str, &str, _>([]),
            &PanelOptions::default(),
            Viewport::new(640.0, 480.0),
        )
        .unwrap();
        let PanelOutput::NoData { svg } = out else {
            panic!("expected the no-data placeholder");
        };
        assert!(svg.contains("No data supplied"));
    }

    #[test]
    fn validation_failures_surface_as_error_payloads() {
        let frame = Frame {
            fields: vec![],
        };
        let err = render_panel(&frame, &PanelOptions::default(), Viewport::new(640.0, 480.0))
            .unwrap_err();
        let payload = ErrorPayload::from(&err);
        assert!(payload.message.contains("source"));
        assert!(payload.message.contains("value"));
    }

    #[test]
    fn cyclic_input_is_rejected() {
        let frame = Frame::from_rows([("a", "b", 1.0), ("b", "a", 1.0)]);
        let err = render_panel(&frame, &PanelOptions::default(), Viewport::new(640.0, 480.0))
            .unwrap_err();
        assert!(matches!(
            err,
            PanelError::Render(alluvia_render::Error::CircularFlow)
        ));
    }
}
