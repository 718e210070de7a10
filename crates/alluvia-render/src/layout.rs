//! Layered Sankey layout: depth assignment, column placement, vertical
//! relaxation and link attachment stacking. This is a port of d3-sankey's
//! algorithm driven by the panel's immutable options; the caller is expected
//! to hand in a non-empty, validated graph (see `alluvia-core`).

use crate::{Error, Result};
use alluvia_core::{Align, FlowGraph, PanelOptions, Viewport};
use serde::Serialize;
use std::cmp::Ordering;

/// A node after layout. `depth`/`height` are topological distances from the
/// sources and sinks respectively; `layer` is the column the alignment
/// policy actually placed the node in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub name: String,
    pub index: usize,
    pub depth: usize,
    pub height: usize,
    pub layer: usize,
    /// Aggregate flow: max of incoming and outgoing link sums.
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    /// Outgoing link indices, ordered by the breadth of their far end.
    pub source_links: Vec<usize>,
    /// Incoming link indices, same ordering.
    pub target_links: Vec<usize>,
}

/// A link after layout. `y0`/`y1` are the vertical centers of the
/// attachment points on the source and target node edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLayout {
    pub index: usize,
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub width: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLayout {
    /// Bounded (margin-less) extent the layout fills.
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    /// Effective vertical gap between nodes in a column, after clamping the
    /// configured padding to the available height.
    pub node_padding: f64,
    pub nodes: Vec<NodeLayout>,
    pub links: Vec<LinkLayout>,
}

pub fn layout_graph(
    graph: &FlowGraph,
    options: &PanelOptions,
    bounds: Viewport,
) -> Result<SankeyLayout> {
    let width = bounds.width;
    let height = bounds.height;
    let dx = options.node_width;

    let mut nodes: Vec<NodeLayout> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| NodeLayout {
            name: n.name.clone(),
            index: i,
            depth: 0,
            height: 0,
            layer: 0,
            value: 0.0,
            x0: 0.0,
            x1: 0.0,
            y0: 0.0,
            y1: 0.0,
            source_links: Vec::new(),
            target_links: Vec::new(),
        })
        .collect();

    let mut links: Vec<LinkLayout> = graph
        .links
        .iter()
        .enumerate()
        .map(|(i, l)| LinkLayout {
            index: i,
            source: l.source,
            target: l.target,
            value: l.value,
            width: 0.0,
            y0: 0.0,
            y1: 0.0,
        })
        .collect();
    for link in &links {
        nodes[link.source].source_links.push(link.index);
        nodes[link.target].target_links.push(link.index);
    }

    for node in &mut nodes {
        let out_sum: f64 = node.source_links.iter().map(|&li| links[li].value).sum();
        let in_sum: f64 = node.target_links.iter().map(|&li| links[li].value).sum();
        node.value = out_sum.max(in_sum);
    }

    compute_node_depths(&mut nodes, &links)?;
    compute_node_heights(&mut nodes, &links)?;

    let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    let column_count = (max_depth + 1).max(1);
    let kx = if column_count <= 1 {
        0.0
    } else {
        (width - dx) / (column_count as f64 - 1.0)
    };

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); column_count];
    for i in 0..nodes.len() {
        let layer = assign_layer(&nodes, &links, i, options.align, column_count);
        nodes[i].layer = layer;
        nodes[i].x0 = layer as f64 * kx;
        nodes[i].x1 = nodes[i].x0 + dx;
        columns[layer].push(i);
    }

    let max_len = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    let py = if max_len <= 1 {
        options.node_padding
    } else {
        options.node_padding.min(height / (max_len as f64 - 1.0))
    };

    // Vertical scale: the tightest column (least slack per unit of flow)
    // fits the bounded height exactly.
    let mut ky = f64::INFINITY;
    for col in &columns {
        let sum_values: f64 = col.iter().map(|&ni| nodes[ni].value).sum();
        if col.is_empty() || sum_values <= 0.0 {
            continue;
        }
        ky = ky.min((height - (col.len() as f64 - 1.0) * py) / sum_values);
    }
    if !ky.is_finite() {
        ky = 0.0;
    }

    initialize_breadths(&mut nodes, &mut links, &columns, height, py, ky);

    let mut relax_columns = columns.clone();
    for i in 0..options.iterations {
        let alpha = 0.99_f64.powi(i as i32);
        let beta = (1.0 - alpha).max((i as f64 + 1.0) / options.iterations as f64);
        relax_right_to_left(&mut nodes, &links, &mut relax_columns, py, alpha, beta, height);
        relax_left_to_right(&mut nodes, &links, &mut relax_columns, py, alpha, beta, height);
    }

    position_link_centers(&nodes, &mut links);

    tracing::debug!(
        columns = column_count,
        padding = py,
        scale = ky,
        "sankey layout complete"
    );

    Ok(SankeyLayout {
        width,
        height,
        node_width: dx,
        node_padding: py,
        nodes,
        links,
    })
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Breadth-first pass from the sources; bails out once a frontier survives
/// more generations than there are nodes, which only a cycle can cause.
fn compute_node_depths(nodes: &mut [NodeLayout], links: &[LinkLayout]) -> Result<()> {
    let n = nodes.len();
    let mut current: Vec<usize> = (0..n).collect();
    let mut next: Vec<usize> = Vec::new();
    let mut next_seen = vec![false; n];
    let mut x: usize = 0;
    while !current.is_empty() {
        for &ni in &current {
            nodes[ni].depth = x;
            for &li in &nodes[ni].source_links {
                let t = links[li].target;
                if !next_seen[t] {
                    next_seen[t] = true;
                    next.push(t);
                }
            }
        }
        x += 1;
        if x > n {
            return Err(Error::CircularFlow);
        }
        current = std::mem::take(&mut next);
        next_seen.fill(false);
    }
    Ok(())
}

/// Mirror of `compute_node_depths`, walking incoming links from the sinks.
fn compute_node_heights(nodes: &mut [NodeLayout], links: &[LinkLayout]) -> Result<()> {
    let n = nodes.len();
    let mut current: Vec<usize> = (0..n).collect();
    let mut next: Vec<usize> = Vec::new();
    let mut next_seen = vec![false; n];
    let mut x: usize = 0;
    while !current.is_empty() {
        for &ni in &current {
            nodes[ni].height = x;
            for &li in &nodes[ni].target_links {
                let s = links[li].source;
                if !next_seen[s] {
                    next_seen[s] = true;
                    next.push(s);
                }
            }
        }
        x += 1;
        if x > n {
            return Err(Error::CircularFlow);
        }
        current = std::mem::take(&mut next);
        next_seen.fill(false);
    }
    Ok(())
}

fn assign_layer(
    nodes: &[NodeLayout],
    links: &[LinkLayout],
    i: usize,
    align: Align,
    column_count: usize,
) -> usize {
    let last = column_count as i64 - 1;
    let raw = match align {
        Align::Left => nodes[i].depth as i64,
        Align::Right => last - nodes[i].height as i64,
        Align::Justify => {
            if nodes[i].source_links.is_empty() {
                last
            } else {
                nodes[i].depth as i64
            }
        }
        Align::Center => {
            if !nodes[i].target_links.is_empty() {
                nodes[i].depth as i64
            } else if !nodes[i].source_links.is_empty() {
                let min_target_depth = nodes[i]
                    .source_links
                    .iter()
                    .map(|&li| nodes[links[li].target].depth)
                    .min()
                    .unwrap_or(0);
                min_target_depth as i64 - 1
            } else {
                0
            }
        }
    };
    raw.clamp(0, last) as usize
}

/// Stacks each column top-down at the computed scale, then spreads the
/// column's slack evenly so it is centered in the bounded height.
fn initialize_breadths(
    nodes: &mut [NodeLayout],
    links: &mut [LinkLayout],
    columns: &[Vec<usize>],
    height: f64,
    py: f64,
    ky: f64,
) {
    for col in columns {
        let mut y = 0.0;
        for &ni in col {
            nodes[ni].y0 = y;
            nodes[ni].y1 = y + nodes[ni].value * ky;
            y = nodes[ni].y1 + py;
            for &li in &nodes[ni].source_links {
                links[li].width = links[li].value * ky;
            }
        }
        if !col.is_empty() {
            let offset = (height - y + py) / (col.len() as f64 + 1.0);
            for (i, &ni) in col.iter().enumerate() {
                let adj = offset * (i as f64 + 1.0);
                nodes[ni].y0 += adj;
                nodes[ni].y1 += adj;
            }
            reorder_links(nodes, links, col);
        }
    }
}

fn sort_source_links_by_target_y0(node_y0: &[f64], links: &[LinkLayout], order: &mut [usize]) {
    order.sort_by(|&a, &b| {
        f64_cmp(node_y0[links[a].target], node_y0[links[b].target])
            .then_with(|| links[a].index.cmp(&links[b].index))
    });
}

fn sort_target_links_by_source_y0(node_y0: &[f64], links: &[LinkLayout], order: &mut [usize]) {
    order.sort_by(|&a, &b| {
        f64_cmp(node_y0[links[a].source], node_y0[links[b].source])
            .then_with(|| links[a].index.cmp(&links[b].index))
    });
}

fn reorder_links(nodes: &mut [NodeLayout], links: &[LinkLayout], column: &[usize]) {
    let node_y0: Vec<f64> = nodes.iter().map(|n| n.y0).collect();
    for &ni in column {
        sort_source_links_by_target_y0(&node_y0, links, &mut nodes[ni].source_links);
        sort_target_links_by_source_y0(&node_y0, links, &mut nodes[ni].target_links);
    }
}

/// Re-sorts the incident link lists of every neighbor of `ni` after `ni`
/// moved vertically.
fn reorder_node_links(nodes: &mut [NodeLayout], links: &[LinkLayout], ni: usize) {
    let node_y0: Vec<f64> = nodes.iter().map(|n| n.y0).collect();

    let target_links = nodes[ni].target_links.clone();
    for li in target_links {
        let source = links[li].source;
        sort_source_links_by_target_y0(&node_y0, links, &mut nodes[source].source_links);
    }

    let source_links = nodes[ni].source_links.clone();
    for li in source_links {
        let target = links[li].target;
        sort_target_links_by_source_y0(&node_y0, links, &mut nodes[target].target_links);
    }
}

/// Ideal top of `target`'s attachment stack as seen from `source`.
fn target_top(nodes: &[NodeLayout], links: &[LinkLayout], py: f64, source: usize, target: usize) -> f64 {
    let out_count = nodes[source].source_links.len() as f64;
    let mut y = nodes[source].y0 - (out_count - 1.0) * py / 2.0;
    for &li in &nodes[source].source_links {
        if links[li].target == target {
            break;
        }
        y += links[li].width + py;
    }
    for &li in &nodes[target].target_links {
        if links[li].source == source {
            break;
        }
        y -= links[li].width;
    }
    y
}

/// Ideal top of `source`'s attachment stack as seen from `target`.
fn source_top(nodes: &[NodeLayout], links: &[LinkLayout], py: f64, source: usize, target: usize) -> f64 {
    let in_count = nodes[target].target_links.len() as f64;
    let mut y = nodes[target].y0 - (in_count - 1.0) * py / 2.0;
    for &li in &nodes[target].target_links {
        if links[li].source == source {
            break;
        }
        y += links[li].width + py;
    }
    for &li in &nodes[source].source_links {
        if links[li].target == target {
            break;
        }
        y -= links[li].width;
    }
    y
}

fn resolve_collisions_top_to_bottom(
    nodes: &mut [NodeLayout],
    column: &[usize],
    py: f64,
    mut y: f64,
    mut i: isize,
    alpha: f64,
) {
    while i < column.len() as isize {
        let ni = column[i as usize];
        let dy = (y - nodes[ni].y0) * alpha;
        if dy > 1e-6 {
            nodes[ni].y0 += dy;
            nodes[ni].y1 += dy;
        }
        y = nodes[ni].y1 + py;
        i += 1;
    }
}

fn resolve_collisions_bottom_to_top(
    nodes: &mut [NodeLayout],
    column: &[usize],
    py: f64,
    mut y: f64,
    mut i: isize,
    alpha: f64,
) {
    while i >= 0 {
        let ni = column[i as usize];
        let dy = (nodes[ni].y1 - y) * alpha;
        if dy > 1e-6 {
            nodes[ni].y0 -= dy;
            nodes[ni].y1 -= dy;
        }
        y = nodes[ni].y0 - py;
        i -= 1;
    }
}

/// Pushes overlapping nodes apart around the column midpoint, then clamps
/// the column back into [0, height].
fn resolve_collisions(
    nodes: &mut [NodeLayout],
    column: &[usize],
    py: f64,
    height: f64,
    alpha: f64,
) {
    if column.is_empty() {
        return;
    }
    let i = column.len() >> 1;
    let subject = column[i];
    resolve_collisions_bottom_to_top(nodes, column, py, nodes[subject].y0 - py, i as isize - 1, alpha);
    resolve_collisions_top_to_bottom(nodes, column, py, nodes[subject].y1 + py, i as isize + 1, alpha);
    resolve_collisions_bottom_to_top(nodes, column, py, height, column.len() as isize - 1, alpha);
    resolve_collisions_top_to_bottom(nodes, column, py, 0.0, 0, alpha);
}

fn relax_left_to_right(
    nodes: &mut [NodeLayout],
    links: &[LinkLayout],
    columns: &mut [Vec<usize>],
    py: f64,
    alpha: f64,
    beta: f64,
    height: f64,
) {
    for ci in 1..columns.len() {
        let column = &mut columns[ci];
        for &target in column.iter() {
            let mut y = 0.0;
            let mut w = 0.0;
            for &li in &nodes[target].target_links {
                let source = links[li].source;
                let v = links[li].value * (nodes[target].layer as f64 - nodes[source].layer as f64);
                y += target_top(nodes, links, py, source, target) * v;
                w += v;
            }
            if !(w > 0.0) {
                continue;
            }
            let dy = (y / w - nodes[target].y0) * alpha;
            nodes[target].y0 += dy;
            nodes[target].y1 += dy;
            reorder_node_links(nodes, links, target);
        }
        column.sort_by(|&a, &b| f64_cmp(nodes[a].y0, nodes[b].y0).then_with(|| a.cmp(&b)));
        resolve_collisions(nodes, column, py, height, beta);
    }
}

fn relax_right_to_left(
    nodes: &mut [NodeLayout],
    links: &[LinkLayout],
    columns: &mut [Vec<usize>],
    py: f64,
    alpha: f64,
    beta: f64,
    height: f64,
) {
    if columns.len() < 2 {
        return;
    }
    for ci in (0..=(columns.len() - 2)).rev() {
        let column = &mut columns[ci];
        for &source in column.iter() {
            let mut y = 0.0;
            let mut w = 0.0;
            for &li in &nodes[source].source_links {
                let target = links[li].target;
                let v = links[li].value * (nodes[target].layer as f64 - nodes[source].layer as f64);
                y += source_top(nodes, links, py, source, target) * v;
                w += v;
            }
            if !(w > 0.0) {
                continue;
            }
            let dy = (y / w - nodes[source].y0) * alpha;
            nodes[source].y0 += dy;
            nodes[source].y1 += dy;
            reorder_node_links(nodes, links, source);
        }
        column.sort_by(|&a, &b| f64_cmp(nodes[a].y0, nodes[b].y0).then_with(|| a.cmp(&b)));
        resolve_collisions(nodes, column, py, height, beta);
    }
}

/// Stacks each node's incident links along its edge and records the
/// per-link attachment centers.
fn position_link_centers(nodes: &[NodeLayout], links: &mut [LinkLayout]) {
    for node in nodes {
        let mut y0 = node.y0;
        let mut y1 = node.y0;
        for &li in &node.source_links {
            links[li].y0 = y0 + links[li].width / 2.0;
            y0 += links[li].width;
        }
        for &li in &node.target_links {
            links[li].y1 = y1 + links[li].width / 2.0;
            y1 += links[li].width;
        }
    }
}
