//! Serializes a [`Scene`](crate::scene::Scene) into a standalone SVG
//! document. Every invocation emits the full document; the host swaps the
//! previous render out wholesale.

use crate::scene::{LinkStroke, Scene, TextAnchor};
use alluvia_core::Viewport;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root `id` attribute; lets a host embed several panels in one tree
    /// without gradient id collisions.
    pub diagram_id: Option<String>,
}

pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let width = scene.viewport.width;
    let height = scene.viewport.height;
    let diagram_id = options.diagram_id.as_deref().unwrap_or("alluvia");

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="background-color: {bg};" role="img">"#,
        id = escape_xml(diagram_id),
        w = fmt(width),
        h = fmt(height),
        bg = escape_xml(&scene.background),
    );

    if let Some(notice) = &scene.notice {
        let _ = write!(
            &mut out,
            r#"<text transform="translate({x}, {y})" text-anchor="middle">{text}</text>"#,
            x = fmt(width / 2.0),
            y = fmt(height / 2.0),
            text = escape_xml(notice),
        );
        out.push_str("</svg>");
        return out;
    }

    let _ = write!(
        &mut out,
        r#"<g transform="translate({x}, {y})">"#,
        x = fmt(scene.margins.left),
        y = fmt(scene.margins.top),
    );

    out.push_str(r##"<g class="nodes" stroke="#000">"##);
    for node in &scene.nodes {
        let _ = write!(
            &mut out,
            r#"<rect class="sankey-node" x="{x}" y="{y}" rx="2" ry="2" width="{w}" height="{h}" fill="{fill}" stroke="{stroke}""#,
            x = fmt(node.x),
            y = fmt(node.y),
            w = fmt(node.width),
            h = fmt(node.height),
            fill = escape_xml(&node.fill),
            stroke = escape_xml(&node.stroke),
        );
        write_opacity(&mut out, node.opacity);
        let _ = write!(&mut out, r#"><title>{}</title></rect>"#, escape_xml(&node.title));
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="links" fill="none" stroke-opacity="0.3">"#);
    for link in &scene.links {
        out.push_str(r#"<g class="link" style="mix-blend-mode: multiply;""#);
        write_opacity(&mut out, link.opacity);
        out.push('>');

        let stroke = match &link.stroke {
            LinkStroke::Solid(color) => escape_xml(color),
            LinkStroke::Gradient { id, start, end } => {
                // Gradient ids live in the shared DOM id namespace, so they
                // carry the document id to keep multiple panels apart.
                let id = format!("{}-{}", escape_xml(diagram_id), escape_xml(id));
                let _ = write!(
                    &mut out,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{x1}" x2="{x2}"><stop offset="0%" stop-color="{c0}"/><stop offset="100%" stop-color="{c1}"/></linearGradient>"#,
                    id = id,
                    x1 = fmt(link.x0),
                    x2 = fmt(link.x1),
                    c0 = escape_xml(start),
                    c1 = escape_xml(end),
                );
                format!("url(#{id})")
            }
        };

        let mx = (link.x0 + link.x1) / 2.0;
        let _ = write!(
            &mut out,
            r#"<path class="sankey-link" d="M{x0},{y0}C{mx},{y0},{mx},{y1},{x1},{y1}" stroke="{stroke}" stroke-width="{sw}"/>"#,
            x0 = fmt(link.x0),
            y0 = fmt(link.y0),
            mx = fmt(mx),
            y1 = fmt(link.y1),
            x1 = fmt(link.x1),
            stroke = stroke,
            sw = fmt(link.stroke_width),
        );
        let _ = write!(&mut out, "<title>{}</title></g>", escape_xml(&link.title));
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="labels" font-family="sans-serif" font-size="12">"#);
    for label in &scene.labels {
        let anchor = match label.anchor {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        };
        let _ = write!(
            &mut out,
            r#"<text x="{x}" y="{y}" dy="0.35em" text-anchor="{anchor}">{text}</text>"#,
            x = fmt(label.x),
            y = fmt(label.y),
            anchor = anchor,
            text = escape_xml(&label.text),
        );
    }
    out.push_str("</g>");

    out.push_str("</g></svg>");
    out
}

/// A drawable stand-in for the chart when validation fails; hosts with
/// their own error component can show the message instead.
pub fn render_error_svg(viewport: Viewport, message: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = fmt(viewport.width),
        h = fmt(viewport.height),
    );
    let _ = write!(
        &mut out,
        r##"<text transform="translate({x}, {y})" text-anchor="middle" fill="#e02f44">{text}</text>"##,
        x = fmt(viewport.width / 2.0),
        y = fmt(viewport.height / 2.0),
        text = escape_xml(message),
    );
    out.push_str("</svg>");
    out
}

fn write_opacity(out: &mut String, opacity: f64) {
    if (opacity - 1.0).abs() > f64::EPSILON {
        let _ = write!(out, r#" opacity="{}""#, fmt(opacity));
    }
}

/// JS `Number#toString`-compatible attribute values, with `-0` and float
/// noise from our own arithmetic cleaned up.
fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format(v).to_string()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
