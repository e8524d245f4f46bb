//! Data model for LV2 plugin metadata: URIs, statements and the merged graph.

mod graph;
mod term;
mod turtle;
mod uri;

pub use graph::*;
pub use term::*;
pub use turtle::*;
pub use uri::*;
