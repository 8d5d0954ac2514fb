/// Offscreen render target: a framebuffer object with owned color and depth
/// textures.
///
/// The textures are always sized to the target: `update` runs on creation
/// and on every `resize`.

use std::rc::Rc;

use crate::device::{
    GlDevice, FramebufferId, Attachment, TextureFormat, TextureParameter,
};
use crate::error::{log_error, Error, Result};
use crate::texture::Texture;
use crate::{glutil_debug, glutil_trace, glutil_warn};

const SOURCE: &str = "glutil::RenderTarget";

/// Color attachment storage
pub const COLOR_FORMAT: TextureFormat = TextureFormat::RgbaF32;

/// Depth attachment storage
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::DepthU32;

/// Framebuffer object with a color and a depth texture attached
///
/// Not `Clone`: the framebuffer name and both textures have a single owner.
/// Dropping the target deletes the framebuffer; the textures delete
/// themselves.
pub struct RenderTarget {
    device: Rc<dyn GlDevice>,
    width: u32,
    height: u32,
    framebuffer: FramebufferId,
    color: Texture,
    depth: Texture,
}

impl RenderTarget {
    /// Create a `width` x `height` render target
    ///
    /// Allocates both textures, attaches the color texture to color slot 0
    /// and the depth texture to the depth slot, then restores the default
    /// framebuffer.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if either dimension is zero or exceeds `i32::MAX`
    /// - `ResourceExhausted` if the device cannot allocate a name
    /// - `IncompleteFramebuffer` if the device rejects the attachments;
    ///   nothing is leaked in that case
    pub fn new(device: Rc<dyn GlDevice>, width: u32, height: u32) -> Result<Self> {
        validate_size(width, height)?;

        let color = Texture::new(device.clone())?;
        let depth = Texture::new(device.clone())?;
        let framebuffer = device
            .create_framebuffer()
            .map_err(|e| log_error(SOURCE, e))?;

        let mut target = Self {
            device,
            width,
            height,
            framebuffer,
            color,
            depth,
        };
        target.update()?;

        target.bind();
        target.device.attach_texture(Attachment::Color(0), target.color.id());
        target.device.attach_texture(Attachment::Depth, target.depth.id());
        let status = target.device.framebuffer_status();
        Self::unbind(&*target.device);

        if !status.is_complete() {
            return Err(log_error(SOURCE, Error::IncompleteFramebuffer(status)));
        }

        glutil_debug!(SOURCE, "Created {}x{} render target (framebuffer {})",
            width, height, framebuffer);
        Ok(target)
    }

    /// Color attachment, for sampling elsewhere in the pipeline
    pub fn texture(&self) -> &Texture {
        &self.color
    }

    /// Mutable color attachment (e.g. to bind it for sampling)
    pub fn texture_mut(&mut self) -> &mut Texture {
        &mut self.color
    }

    /// Depth attachment
    pub fn depth_texture(&self) -> &Texture {
        &self.depth
    }

    pub fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Make this target the active draw destination
    pub fn bind(&self) {
        self.device.bind_framebuffer(Some(self.framebuffer));
    }

    /// Restore the default framebuffer, whatever target is currently bound
    pub fn unbind(device: &dyn GlDevice) {
        device.bind_framebuffer(None);
    }

    /// Bind this target until the returned guard is dropped
    ///
    /// The guard always restores the default framebuffer; an outer binding
    /// is not restored.
    pub fn use_target(&self) -> RenderTargetBinding<'_> {
        self.bind();
        RenderTargetBinding { target: self }
    }

    /// Change the logical size; both attachments are reallocated and their
    /// contents discarded
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if either dimension is zero or exceeds `i32::MAX`
    /// - the device error if it rejects the new storage; both attachments
    ///   are then reallocated at the old size, which is kept
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        validate_size(width, height)?;
        glutil_trace!(SOURCE, "Resizing framebuffer {} from {}x{} to {}x{}",
            self.framebuffer, self.width, self.height, width, height);
        let (old_width, old_height) = (self.width, self.height);
        self.width = width;
        self.height = height;
        if let Err(err) = self.update() {
            self.width = old_width;
            self.height = old_height;
            if self.update().is_err() {
                glutil_warn!(SOURCE, "Framebuffer {} could not restore {}x{} storage",
                    self.framebuffer, old_width, old_height);
            }
            return Err(err);
        }
        Ok(())
    }

    /// (Re)allocate both attachments at the current size
    ///
    /// Only the base mip level is used.
    pub fn update(&mut self) -> Result<()> {
        {
            let mut color = self.color.bind();
            color.image_2d(COLOR_FORMAT, self.width, self.height)?;
            color.set_parameter(TextureParameter::MaxLevel, 0);
        }
        {
            let mut depth = self.depth.bind();
            depth.image_2d(DEPTH_FORMAT, self.width, self.height)?;
            depth.set_parameter(TextureParameter::MaxLevel, 0);
        }
        Ok(())
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        self.device.delete_framebuffer(self.framebuffer);
    }
}

impl std::fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("framebuffer", &self.framebuffer)
            .field("color", &self.color)
            .field("depth", &self.depth)
            .finish()
    }
}

/// Scoped render target binding (see `RenderTarget::use_target`)
pub struct RenderTargetBinding<'a> {
    target: &'a RenderTarget,
}

impl RenderTargetBinding<'_> {
    pub fn target(&self) -> &RenderTarget {
        self.target
    }
}

impl Drop for RenderTargetBinding<'_> {
    fn drop(&mut self) {
        RenderTarget::unbind(&*self.target.device);
    }
}

/// Both dimensions must be non-zero and fit a `GLsizei`
fn validate_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(log_error(SOURCE, Error::InvalidResource(
            format!("render target size {}x{} has a zero dimension", width, height),
        )));
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(log_error(SOURCE, Error::InvalidResource(
            format!("render target size {}x{} exceeds GLsizei", width, height),
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
