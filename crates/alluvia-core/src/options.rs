use serde::{Deserialize, Serialize};

/// Horizontal placement rule for nodes whose column is not fully determined
/// by topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    /// Sources at the first column, sinks at the last, interior spread out.
    #[default]
    Justify,
    /// Earliest column consistent with incoming links.
    Left,
    /// Latest column consistent with outgoing links.
    Right,
    /// Nodes without incoming links sit just before their first consumer.
    Center,
}

/// Categorical palette the ordinal color scale draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Tableau10,
    Category10,
    Accent,
    Dark2,
    Paired,
    Pastel1,
    Pastel2,
    Set1,
    Set2,
    Set3,
}

/// How a link's stroke is derived from its endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeColorMode {
    /// Source-to-target gradient, one definition per link.
    #[default]
    Path,
    /// Source node color.
    Input,
    /// Target node color.
    Output,
    /// Uniform neutral gray.
    None,
}

/// Which figures a node label carries next to the name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueDisplay {
    #[default]
    None,
    Total,
    Percentage,
    Both,
}

/// The panel configuration, validated once at deserialization and immutable
/// for the rest of the render. Field names mirror the host's option schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    pub align: Align,
    pub color_scheme: ColorScheme,
    pub edge_color: EdgeColorMode,
    pub display_values: ValueDisplay,
    pub highlight_on_hover: bool,
    pub node_width: f64,
    pub node_padding: f64,
    pub iterations: usize,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            align: Align::default(),
            color_scheme: ColorScheme::default(),
            edge_color: EdgeColorMode::default(),
            display_values: ValueDisplay::default(),
            highlight_on_hover: false,
            node_width: 15.0,
            node_padding: 20.0,
            iterations: 6,
        }
    }
}

/// Pixel size the host layout system hands the panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// The fixed 20px chart margins of the panel.
    pub fn panel() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 20.0,
        }
    }

    /// Viewport minus margins, the box the layout engine fills.
    pub fn inner(&self, viewport: Viewport) -> Viewport {
        Viewport {
            width: viewport.width - self.left - self.right,
            height: viewport.height - self.top - self.bottom,
        }
    }
}
