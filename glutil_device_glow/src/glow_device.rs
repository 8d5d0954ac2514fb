/// GlowDevice - `GlDevice` on top of a `glow::Context`

use glow::HasContext;

use glutil::glutil::{
    GlDevice, FramebufferId, TextureId, BufferId, VertexArrayId,
    Attachment, TextureFormat, TextureParameter, PrimitiveMode, BufferUsage,
    Capability, ClearMask, FramebufferStatus, VertexAttribute, Error, Result,
};
use glutil::error::log_error;
use glutil::{glutil_bail, glutil_info};

use crate::glow_format::*;

const SOURCE: &str = "glutil::glow";

/// OpenGL device backed by glow
///
/// The wrapped context must stay current on the thread that owns this
/// device for as long as the device (or any resource created from it) is
/// alive.
pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    /// Wrap a loaded context
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the context predates vertex array
    /// objects (OpenGL / OpenGL ES below 3.0).
    pub fn new(gl: glow::Context) -> Result<Self> {
        let version = gl.version();
        if version.major < 3 {
            return Err(log_error(SOURCE, Error::InitializationFailed(format!(
                "OpenGL{} {}.{} context, 3.0 or newer required",
                if version.is_embedded { " ES" } else { "" },
                version.major,
                version.minor,
            ))));
        }
        glutil_info!(SOURCE, "Using OpenGL{} {}.{} context",
            if version.is_embedded { " ES" } else { "" }, version.major, version.minor);
        Ok(Self { gl })
    }

    /// Underlying glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consume the device and return the glow context
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }
}

fn exhausted(kind: &str, reason: String) -> Error {
    log_error(SOURCE, Error::ResourceExhausted(format!("{}: {}", kind, reason)))
}

impl GlDevice for GlowDevice {
    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&self) -> Result<FramebufferId> {
        let framebuffer = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| exhausted("framebuffer", e))?;
        Ok(FramebufferId(framebuffer.0))
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferId) {
        unsafe { self.gl.delete_framebuffer(glow::NativeFramebuffer(framebuffer.0)) };
    }

    fn bind_framebuffer(&self, framebuffer: Option<FramebufferId>) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer.map(|f| glow::NativeFramebuffer(f.0)));
        }
    }

    fn attach_texture(&self, attachment: Attachment, texture: TextureId) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment_to_gl(attachment),
                glow::TEXTURE_2D,
                Some(glow::NativeTexture(texture.0)),
                0,
            );
        }
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        framebuffer_status_from_gl(unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) })
    }

    // ===== TEXTURES =====

    fn create_texture(&self) -> Result<TextureId> {
        let texture = unsafe { self.gl.create_texture() }
            .map_err(|e| exhausted("texture", e))?;
        Ok(TextureId(texture.0))
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.0)) };
    }

    fn bind_texture(&self, texture: Option<TextureId>) {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, texture.map(|t| glow::NativeTexture(t.0)));
        }
    }

    fn tex_image_2d(&self, format: TextureFormat, width: u32, height: u32) -> Result<()> {
        let (Ok(gl_width), Ok(gl_height)) = (i32::try_from(width), i32::try_from(height)) else {
            glutil_bail!(SOURCE, "Texture size {}x{} does not fit in GLsizei", width, height);
        };
        let (internal_format, pixel_format, pixel_type) = texture_format_to_gl(format);
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format,
                gl_width,
                gl_height,
                0,
                pixel_format,
                pixel_type,
                None,
            );
        }
        Ok(())
    }

    fn tex_parameter(&self, parameter: TextureParameter, value: i32) {
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, texture_parameter_to_gl(parameter), value);
        }
    }

    // ===== BUFFERS / VERTEX ARRAYS =====

    fn create_buffer(&self) -> Result<BufferId> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| exhausted("buffer", e))?;
        Ok(BufferId(buffer.0))
    }

    fn delete_buffer(&self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.0)) };
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer.map(|b| glow::NativeBuffer(b.0)));
        }
    }

    fn buffer_data(&self, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, buffer_usage_to_gl(usage));
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(|e| exhausted("vertex array", e))?;
        Ok(VertexArrayId(vertex_array.0))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vertex_array.0)) };
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array.map(|v| glow::NativeVertexArray(v.0)));
        }
    }

    fn enable_vertex_attribute(&self, attribute: VertexAttribute, stride: i32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(attribute.location);
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                stride,
                attribute.offset,
            );
        }
    }

    // ===== DRAWING / STATE =====

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive_mode_to_gl(mode), first, count) };
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_mask_to_gl(mask)) };
    }

    fn set_capability(&self, capability: Capability, enabled: bool) {
        let capability = capability_to_gl(capability);
        unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        }
    }

    // ===== ERRORS =====

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }
}
