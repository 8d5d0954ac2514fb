//! Vertex module
//!
//! Interleaved vertex records and the chained builder that uploads and draws
//! them.

mod vertex_builder;

pub use vertex_builder::{Vertex, VertexBuilder, VERTEX_ATTRIBUTES};
