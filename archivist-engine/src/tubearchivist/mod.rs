//! Tube Archivist integration surface.
//!
//! `client` holds the engine adapter, `types` the response models of the
//! instance's search endpoint.
pub mod client;
pub mod types;

pub use client::{TubeArchivist, TubeArchivistConfig};
