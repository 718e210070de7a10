#![forbid(unsafe_code)]

//! `alluvia-core` is the headless data half of the alluvia Sankey panel:
//! it turns a host-supplied tabular frame into a validated flow graph and
//! carries the immutable panel configuration. Layout and drawing live in
//! `alluvia-render`.

pub mod error;
pub mod frame;
pub mod graph;
pub mod options;

pub use error::{Error, Result};
pub use frame::{Field, Frame};
pub use graph::{FlowGraph, FlowLink, FlowNode, build_graph};
pub use options::{
    Align, ColorScheme, EdgeColorMode, Margins, PanelOptions, ValueDisplay, Viewport,
};
