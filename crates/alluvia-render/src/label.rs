//! Node label and tooltip text. All formatting is locale-independent and
//! mirrors the d3 format strings the panel historically used: `.2~f` for
//! tooltip values, `.2~%` for shares, `.3~s` for the abbreviated magnitudes
//! shown next to node names.

use crate::layout::NodeLayout;
use alluvia_core::ValueDisplay;

/// Total flow of the column `node` sits in (same `depth`).
pub fn column_total(nodes: &[NodeLayout], node: &NodeLayout) -> f64 {
    nodes
        .iter()
        .filter(|n| n.depth == node.depth)
        .map(|n| n.value)
        .sum()
}

pub fn node_label(nodes: &[NodeLayout], node: &NodeLayout, mode: ValueDisplay) -> String {
    match mode {
        ValueDisplay::None => node.name.clone(),
        ValueDisplay::Total => format!("{}: {}", node.name, format_magnitude(node.value)),
        ValueDisplay::Percentage => format!(
            "{}: {}",
            node.name,
            format_percent(node.value / column_total(nodes, node))
        ),
        ValueDisplay::Both => format!(
            "{}: {} - {}",
            node.name,
            format_percent(node.value / column_total(nodes, node)),
            format_magnitude(node.value)
        ),
    }
}

/// Fixed-point with at most two decimals, trailing zeros trimmed (`.2~f`).
pub fn format_value(v: f64) -> String {
    trim_decimals(format!("{v:.2}"))
}

/// A [0,1] share as a percentage with at most two decimals (`.2~%`).
pub fn format_percent(share: f64) -> String {
    if !share.is_finite() {
        return "0%".to_string();
    }
    let mut s = trim_decimals(format!("{:.2}", share * 100.0));
    s.push('%');
    s
}

/// Three significant digits with an SI magnitude suffix (`.3~s`), so labels
/// stay short for large flows.
pub fn format_magnitude(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return "0".to_string();
    }
    let magnitude = v.abs();
    let (divisor, suffix) = if magnitude >= 1e12 {
        (1e12, "T")
    } else if magnitude >= 1e9 {
        (1e9, "G")
    } else if magnitude >= 1e6 {
        (1e6, "M")
    } else if magnitude >= 1e3 {
        (1e3, "k")
    } else {
        (1.0, "")
    };
    let scaled = v / divisor;
    // Three significant digits: the scaled value is in [1, 1000), so the
    // decimal count follows from the integer digit count.
    let int_digits: usize = if scaled.abs() >= 100.0 {
        3
    } else if scaled.abs() >= 10.0 {
        2
    } else {
        1
    };
    let precision = 3 - int_digits;
    let mut s = trim_decimals(format!("{scaled:.precision$}"));
    s.push_str(suffix);
    s
}

fn trim_decimals(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
