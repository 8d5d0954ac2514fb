/// Owned 2D texture object and its scoped binding guard

use std::rc::Rc;

use crate::device::{GlDevice, TextureId, TextureFormat, TextureParameter};
use crate::error::{log_error, Result};

/// Read-only properties of the storage currently allocated for a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Storage format
    pub format: TextureFormat,
}

/// 2D texture object
///
/// Owns one texture name; the name is deleted when the texture is dropped.
/// Storage is allocated through the guard returned by `bind`.
pub struct Texture {
    device: Rc<dyn GlDevice>,
    id: TextureId,
    info: Option<TextureInfo>,
}

impl Texture {
    /// Generate a texture name (no storage yet)
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot allocate another texture name.
    pub fn new(device: Rc<dyn GlDevice>) -> Result<Self> {
        let id = device
            .create_texture()
            .map_err(|e| log_error("glutil::Texture", e))?;
        Ok(Self { device, id, info: None })
    }

    /// GL texture name, for attaching or sampling elsewhere
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Current storage, `None` until the first `image_2d`
    pub fn info(&self) -> Option<TextureInfo> {
        self.info
    }

    /// Bind this texture until the returned guard is dropped
    pub fn bind(&mut self) -> TextureBinding<'_> {
        self.device.bind_texture(Some(self.id));
        TextureBinding { texture: self }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.device.delete_texture(self.id);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("info", &self.info)
            .finish()
    }
}

/// Scoped texture binding
///
/// The texture stays bound while the guard lives; dropping the guard binds
/// no texture.
pub struct TextureBinding<'a> {
    texture: &'a mut Texture,
}

impl TextureBinding<'_> {
    /// Allocate level-0 storage of the given size, discarding old contents
    pub fn image_2d(&mut self, format: TextureFormat, width: u32, height: u32) -> Result<()> {
        self.texture
            .device
            .tex_image_2d(format, width, height)
            .map_err(|e| log_error("glutil::Texture", e))?;
        self.texture.info = Some(TextureInfo { width, height, format });
        Ok(())
    }

    /// Set an integer parameter on the bound texture
    pub fn set_parameter(&mut self, parameter: TextureParameter, value: i32) {
        self.texture.device.tex_parameter(parameter, value);
    }

    pub fn id(&self) -> TextureId {
        self.texture.id
    }
}

impl Drop for TextureBinding<'_> {
    fn drop(&mut self) {
        self.texture.device.bind_texture(None);
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
