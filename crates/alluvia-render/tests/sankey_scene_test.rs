use alluvia_core::{
    EdgeColorMode, Frame, Margins, PanelOptions, ValueDisplay, Viewport, build_graph,
};
use alluvia_render::highlight::{DIMMED_OPACITY, FULL_OPACITY, HoverStyles, hover_node};
use alluvia_render::layout::{SankeyLayout, layout_graph};
use alluvia_render::scene::{LinkStroke, Scene, build_scene};
use alluvia_render::svg::{SvgRenderOptions, render_error_svg, render_scene_svg};

const VIEWPORT: Viewport = Viewport {
    width: 640.0,
    height: 480.0,
};

fn scenario_layout() -> SankeyLayout {
    let graph = build_graph(&Frame::from_rows([
        ("A", "X", 10.0),
        ("B", "X", 5.0),
        ("X", "Y", 15.0),
    ]))
    .unwrap();
    layout_graph(
        &graph,
        &PanelOptions::default(),
        Margins::panel().inner(VIEWPORT),
    )
    .unwrap()
}

fn scenario_scene(configure: impl FnOnce(&mut PanelOptions)) -> Scene {
    let mut options = PanelOptions::default();
    configure(&mut options);
    build_scene(&scenario_layout(), &options, VIEWPORT, Margins::panel())
}

#[test]
fn node_fills_follow_first_seen_palette_order() {
    let scene = scenario_scene(|_| {});
    let fills: Vec<&str> = scene.nodes.iter().map(|n| n.fill.as_str()).collect();
    // Node order is first appearance: A, B, X, Y over Tableau10.
    assert_eq!(fills, ["#4e79a7", "#f28e2c", "#e15759", "#76b7b2"]);
    // Strokes are the darkened fills.
    assert_eq!(scene.nodes[0].stroke, "#41658c");

    // Pure function of (name, palette): a rebuild yields the same colors.
    let again = scenario_scene(|_| {});
    assert_eq!(
        scene.nodes[2].fill, again.nodes[2].fill,
        "color assignment must be deterministic"
    );
}

#[test]
fn edge_color_modes_pick_the_expected_strokes() {
    let none = scenario_scene(|o| o.edge_color = EdgeColorMode::None);
    assert!(
        none.links
            .iter()
            .all(|l| l.stroke == LinkStroke::Solid("#aaa".to_string()))
    );

    let input = scenario_scene(|o| o.edge_color = EdgeColorMode::Input);
    assert_eq!(input.links[0].stroke, LinkStroke::Solid("#4e79a7".to_string()));

    let output = scenario_scene(|o| o.edge_color = EdgeColorMode::Output);
    assert_eq!(output.links[0].stroke, LinkStroke::Solid("#e15759".to_string()));

    let path = scenario_scene(|o| o.edge_color = EdgeColorMode::Path);
    let LinkStroke::Gradient { id, start, end } = &path.links[0].stroke else {
        panic!("path mode must emit gradients");
    };
    assert_eq!(id, "link-0");
    assert_eq!(start, "#4e79a7");
    assert_eq!(end, "#e15759");
}

#[test]
fn stroke_width_never_drops_below_one_pixel() {
    let graph = build_graph(&Frame::from_rows([("a", "b", 0.0), ("a", "c", 10.0)])).unwrap();
    let layout = layout_graph(
        &graph,
        &PanelOptions::default(),
        Margins::panel().inner(VIEWPORT),
    )
    .unwrap();
    let scene = build_scene(
        &layout,
        &PanelOptions::default(),
        VIEWPORT,
        Margins::panel(),
    );
    assert!(scene.links.iter().all(|l| l.stroke_width >= 1.0));
}

#[test]
fn labels_flip_sides_at_the_viewport_midline() {
    use alluvia_render::scene::TextAnchor;
    let scene = scenario_scene(|_| {});
    let layout = scenario_layout();
    for (shape, node) in scene.labels.iter().zip(&layout.nodes) {
        if node.x0 < VIEWPORT.width / 2.0 {
            assert_eq!(shape.anchor, TextAnchor::Start);
            assert!((shape.x - (node.x1 + 6.0)).abs() < 1e-9);
        } else {
            assert_eq!(shape.anchor, TextAnchor::End);
            assert!((shape.x - (node.x0 - 6.0)).abs() < 1e-9);
        }
    }
}

#[test]
fn labels_and_tooltips_carry_formatted_values() {
    let scene = scenario_scene(|o| o.display_values = ValueDisplay::Percentage);
    let a_label = &scene.labels[0];
    assert_eq!(a_label.text, "A: 66.67%");
    assert_eq!(scene.nodes[0].title, "A\n10");
    assert_eq!(scene.links[2].title, "X → Y\n15");
}

#[test]
fn svg_document_contains_the_scene() {
    let scene = scenario_scene(|_| {});
    let svg = render_scene_svg(&scene, &SvgRenderOptions::default());
    assert!(svg.starts_with(r#"<svg id="alluvia""#));
    assert!(svg.contains(r#"transform="translate(20, 20)""#));
    assert!(svg.contains(r##"<g class="nodes" stroke="#000">"##));
    assert_eq!(svg.matches("<rect class=\"sankey-node\"").count(), 4);
    assert_eq!(svg.matches("<path class=\"sankey-link\"").count(), 3);
    assert_eq!(svg.matches("<linearGradient").count(), 3);
    assert!(svg.contains(r#"<linearGradient id="alluvia-link-0""#));
    assert!(svg.contains("url(#alluvia-link-0)"));
    assert!(svg.contains("mix-blend-mode: multiply"));
    assert!(svg.contains(r#"rx="2""#));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn svg_diagram_id_namespaces_the_document_and_its_gradients() {
    let scene = scenario_scene(|_| {});
    let svg = render_scene_svg(
        &scene,
        &SvgRenderOptions {
            diagram_id: Some("panel-7".to_string()),
        },
    );
    assert!(svg.contains(r#"<svg id="panel-7""#));
    // Two panels in one tree must not share gradient definitions.
    assert!(svg.contains(r#"<linearGradient id="panel-7-link-0""#));
    assert!(svg.contains("url(#panel-7-link-0)"));
    assert!(!svg.contains("alluvia-link-0"));
}

#[test]
fn no_data_scene_renders_the_placeholder() {
    let svg = render_scene_svg(&Scene::no_data(VIEWPORT), &SvgRenderOptions::default());
    assert!(svg.contains("No data supplied"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(!svg.contains("sankey-node"));
}

#[test]
fn error_svg_escapes_the_message() {
    let svg = render_error_svg(VIEWPORT, "Required fields not present: <value>");
    assert!(svg.contains("&lt;value&gt;"));
    assert!(svg.contains(r##"fill="#e02f44""##));
}

#[test]
fn hover_dims_everything_outside_the_induced_subgraph() {
    let layout = scenario_layout();
    let a = layout.nodes.iter().position(|n| n.name == "A").unwrap();
    let styles = hover_node(&layout, a, true);

    let expect = |name: &str| layout.nodes.iter().position(|n| n.name == name).unwrap();
    assert_eq!(styles.node_opacity[a], FULL_OPACITY);
    assert_eq!(styles.node_opacity[expect("X")], FULL_OPACITY);
    assert_eq!(styles.node_opacity[expect("B")], DIMMED_OPACITY);
    assert_eq!(styles.node_opacity[expect("Y")], DIMMED_OPACITY);
    assert_eq!(styles.link_opacity, vec![1.0, 0.2, 0.2]);
}

#[test]
fn hover_highlight_is_symmetric() {
    let layout = scenario_layout();
    for i in 0..layout.nodes.len() {
        for j in 0..layout.nodes.len() {
            if i == j {
                continue;
            }
            let i_sees_j = hover_node(&layout, i, true).node_opacity[j] == FULL_OPACITY;
            let j_sees_i = hover_node(&layout, j, true).node_opacity[i] == FULL_OPACITY;
            assert_eq!(i_sees_j, j_sees_i, "asymmetric highlight between {i} and {j}");
            let linked = layout
                .links
                .iter()
                .any(|l| (l.source, l.target) == (i, j) || (l.source, l.target) == (j, i));
            assert_eq!(i_sees_j, linked);
        }
    }
}

#[test]
fn hover_with_highlight_disabled_changes_nothing() {
    let layout = scenario_layout();
    let styles = hover_node(&layout, 0, false);
    assert_eq!(styles, HoverStyles::reset(&layout));
    assert!(styles.node_opacity.iter().all(|&o| o == FULL_OPACITY));
}

#[test]
fn scene_serializes_for_host_embedding() {
    let scene = scenario_scene(|_| {});
    let value = serde_json::to_value(&scene).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(value["nodes"][0]["fill"], "#4e79a7");
    assert!(value["notice"].is_null());
}

#[test]
fn scene_apply_restyles_opacity_without_touching_geometry() {
    let layout = scenario_layout();
    let mut scene = scenario_scene(|o| o.highlight_on_hover = true);
    let before = scene.clone();

    scene.apply(&hover_node(&layout, 0, true));
    assert_eq!(scene.nodes[1].opacity, DIMMED_OPACITY);
    assert_eq!(scene.links[1].opacity, DIMMED_OPACITY);
    assert_eq!(scene.nodes[1].x, before.nodes[1].x);
    assert_eq!(scene.labels, before.labels);

    scene.apply(&HoverStyles::reset(&layout));
    assert_eq!(scene, before);
}
