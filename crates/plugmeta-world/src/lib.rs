//! Read-only index over LV2 plugin metadata discovered on a search path.

mod index;
mod load;
pub mod ns;
mod search;
mod world;

pub use index::*;
pub use load::{LoadReport, LoadWarning};
pub use search::*;
pub use world::*;

pub use plugmeta_graph::{Graph, InvalidUri, Literal, Statement, Term, Uri};
