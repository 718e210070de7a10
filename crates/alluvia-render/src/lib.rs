#![forbid(unsafe_code)]

//! Layout and drawing for the alluvia Sankey panel: the layered layout
//! engine, ordinal color resolution, label formatting, a drawable scene
//! model with its SVG writer, and the hover-highlight pass.

pub mod highlight;
pub mod label;
pub mod layout;
pub mod palette;
pub mod scene;
pub mod svg;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("circular flow: source/target links must form an acyclic graph")]
    CircularFlow,
}

pub type Result<T> = std::result::Result<T, Error>;
