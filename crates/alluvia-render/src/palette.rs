//! Ordinal color resolution over the fixed set of categorical palettes.
//! The scale is first-seen-first-slot within a render, cycling once the
//! palette is exhausted; node strokes are the fill darkened by a fixed
//! factor for contrast.

use alluvia_core::ColorScheme;
use rustc_hash::FxHashMap;

const SCHEME_TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];
const SCHEME_CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
const SCHEME_ACCENT: [&str; 8] = [
    "#7fc97f", "#beaed4", "#fdc086", "#ffff99", "#386cb0", "#f0027f", "#bf5b17", "#666666",
];
const SCHEME_DARK2: [&str; 8] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];
const SCHEME_PAIRED: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];
const SCHEME_PASTEL1: [&str; 9] = [
    "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6", "#ffffcc", "#e5d8bd", "#fddaec",
    "#f2f2f2",
];
const SCHEME_PASTEL2: [&str; 8] = [
    "#b3e2cd", "#fdcdac", "#cbd5e8", "#f4cae4", "#e6f5c9", "#fff2ae", "#f1e2cc", "#cccccc",
];
const SCHEME_SET1: [&str; 9] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#999999",
];
const SCHEME_SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];
const SCHEME_SET3: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

pub fn scheme_colors(scheme: ColorScheme) -> &'static [&'static str] {
    match scheme {
        ColorScheme::Tableau10 => &SCHEME_TABLEAU10,
        ColorScheme::Category10 => &SCHEME_CATEGORY10,
        ColorScheme::Accent => &SCHEME_ACCENT,
        ColorScheme::Dark2 => &SCHEME_DARK2,
        ColorScheme::Paired => &SCHEME_PAIRED,
        ColorScheme::Pastel1 => &SCHEME_PASTEL1,
        ColorScheme::Pastel2 => &SCHEME_PASTEL2,
        ColorScheme::Set1 => &SCHEME_SET1,
        ColorScheme::Set2 => &SCHEME_SET2,
        ColorScheme::Set3 => &SCHEME_SET3,
    }
}

/// Per-render ordinal scale from node name to palette slot.
#[derive(Debug)]
pub struct ColorResolver {
    colors: &'static [&'static str],
    slots: FxHashMap<String, usize>,
}

impl ColorResolver {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            colors: scheme_colors(scheme),
            slots: FxHashMap::default(),
        }
    }

    pub fn color_for(&mut self, name: &str) -> &'static str {
        let slot = match self.slots.get(name) {
            Some(&slot) => slot,
            None => {
                let slot = self.slots.len();
                self.slots.insert(name.to_string(), slot);
                slot
            }
        };
        self.colors[slot % self.colors.len()]
    }
}

/// d3's `color.darker(k)`: RGB channels scaled by `0.7^k`.
pub fn darker(hex: &str, k: f64) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    let t = 0.7_f64.powf(k);
    let scale = |c: u8| -> u8 { ((c as f64 * t).round()).clamp(0.0, 255.0) as u8 };
    format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
