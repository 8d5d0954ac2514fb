//! Texture module
//!
//! Owned GL texture objects with scoped binding.

mod texture;

pub use texture::{Texture, TextureBinding, TextureInfo};
