// Artefact emission: DOT rendering, CSV exports, optional Graphviz shell-out

pub mod csv;
pub mod dot;
pub mod render;

pub use dot::{DotEmitter, DotOptions, DotOutput, output_filename};
