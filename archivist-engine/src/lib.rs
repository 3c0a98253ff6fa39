//! Search engine adapters for the archivist-search aggregator.
//!
//! - Engine plugin contract (`engine`): request/response halves, skip signal,
//!   registry metadata
//! - Tube Archivist REST adapter (`tubearchivist`)
//! - Field helpers shared by adapters (`text`): HTML to text, number
//!   humanization, lenient date parsing

pub mod engine;
pub mod text;
pub mod tubearchivist;

pub use engine::{EngineError, NoRequest, SearchEngine, SearchRequest};
pub use tubearchivist::{TubeArchivist, TubeArchivistConfig};
