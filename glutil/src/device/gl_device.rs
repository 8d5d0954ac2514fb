/// GlDevice trait - the graphics-driver seam every wrapper talks through
///
/// Backends (glow, the headless mock) implement this trait. All methods take
/// `&self`: GL calls mutate driver state, not the Rust value, and the
/// context is bound to a single thread.

use std::fmt;
use std::num::NonZeroU32;
use bitflags::bitflags;

use crate::error::Result;

// ============================================================================
// Object handles
// ============================================================================

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            /// Raw GL object name
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

gl_handle!(
    /// Framebuffer object name
    FramebufferId
);
gl_handle!(
    /// Texture object name
    TextureId
);
gl_handle!(
    /// Buffer object name
    BufferId
);
gl_handle!(
    /// Vertex array object name
    VertexArrayId
);

// ============================================================================
// Enumerations
// ============================================================================

/// Framebuffer attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// Color attachment slot `n`
    Color(u32),
    /// Depth attachment slot
    Depth,
}

/// Storage layout for texture image allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 4-channel color, float components
    RgbaF32,
    /// Single-channel depth, unsigned int components
    DepthU32,
}

/// Integer texture parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureParameter {
    BaseLevel,
    MaxLevel,
}

/// Primitive topology for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    #[default]
    TriangleStrip,
    TriangleFan,
}

/// Buffer data usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

/// Server-side capabilities toggled with enable/disable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    Blend,
}

bitflags! {
    /// Buffers cleared by `GlDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Completeness status of the bound framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    MissingAttachment,
    Unsupported,
    /// Any other status code reported by the driver
    Other(u32),
}

impl FramebufferStatus {
    pub fn is_complete(self) -> bool {
        self == FramebufferStatus::Complete
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferStatus::Complete => write!(f, "complete"),
            FramebufferStatus::IncompleteAttachment => write!(f, "incomplete attachment"),
            FramebufferStatus::MissingAttachment => write!(f, "missing attachment"),
            FramebufferStatus::Unsupported => write!(f, "unsupported format combination"),
            FramebufferStatus::Other(code) => write!(f, "status 0x{:04X}", code),
        }
    }
}

/// One float vertex attribute inside an interleaved vertex record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Human-readable attribute name (matches the shader input)
    pub name: &'static str,
    /// Attribute location
    pub location: u32,
    /// Number of f32 components (1..=4)
    pub components: i32,
    /// Byte offset inside the record
    pub offset: i32,
}

/// Raw error codes returned by `GlDevice::get_error`
pub mod gl_error {
    pub const NO_ERROR: u32 = 0;
    pub const INVALID_ENUM: u32 = 0x0500;
    pub const INVALID_VALUE: u32 = 0x0501;
    pub const INVALID_OPERATION: u32 = 0x0502;
    pub const STACK_OVERFLOW: u32 = 0x0503;
    pub const STACK_UNDERFLOW: u32 = 0x0504;
    pub const OUT_OF_MEMORY: u32 = 0x0505;
    pub const INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;
    pub const CONTEXT_LOST: u32 = 0x0507;
}

// ============================================================================
// GlDevice trait
// ============================================================================

/// Graphics driver binding
///
/// Mirrors the subset of OpenGL that the wrappers need. Framebuffer and
/// texture operations act on the `FRAMEBUFFER` / `TEXTURE_2D` targets;
/// `tex_image_2d` and `tex_parameter` act on the currently bound texture.
pub trait GlDevice {
    // ===== FRAMEBUFFERS =====

    /// Generate a framebuffer object name
    fn create_framebuffer(&self) -> Result<FramebufferId>;

    /// Delete a framebuffer object
    fn delete_framebuffer(&self, framebuffer: FramebufferId);

    /// Bind a framebuffer for drawing (`None` = default framebuffer)
    fn bind_framebuffer(&self, framebuffer: Option<FramebufferId>);

    /// Attach level 0 of a 2D texture to the bound framebuffer
    fn attach_texture(&self, attachment: Attachment, texture: TextureId);

    /// Completeness of the bound framebuffer
    fn framebuffer_status(&self) -> FramebufferStatus;

    // ===== TEXTURES =====

    /// Generate a texture object name
    fn create_texture(&self) -> Result<TextureId>;

    /// Delete a texture object
    fn delete_texture(&self, texture: TextureId);

    /// Bind a 2D texture (`None` = unbind)
    fn bind_texture(&self, texture: Option<TextureId>);

    /// Allocate level-0 storage for the bound texture without uploading pixels
    fn tex_image_2d(&self, format: TextureFormat, width: u32, height: u32) -> Result<()>;

    /// Set an integer parameter on the bound texture
    fn tex_parameter(&self, parameter: TextureParameter, value: i32);

    // ===== BUFFERS / VERTEX ARRAYS =====

    /// Generate a buffer object name
    fn create_buffer(&self) -> Result<BufferId>;

    /// Delete a buffer object
    fn delete_buffer(&self, buffer: BufferId);

    /// Bind a buffer to the array-buffer target
    fn bind_array_buffer(&self, buffer: Option<BufferId>);

    /// Replace the contents of the bound array buffer
    fn buffer_data(&self, data: &[u8], usage: BufferUsage);

    /// Generate a vertex array object name
    fn create_vertex_array(&self) -> Result<VertexArrayId>;

    /// Delete a vertex array object
    fn delete_vertex_array(&self, vertex_array: VertexArrayId);

    /// Bind a vertex array (`None` = unbind)
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>);

    /// Enable a float attribute sourced from the bound array buffer
    fn enable_vertex_attribute(&self, attribute: VertexAttribute, stride: i32);

    // ===== DRAWING / STATE =====

    /// Draw `count` vertices starting at `first`
    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);

    /// Clear buffers of the bound framebuffer
    fn clear(&self, mask: ClearMask);

    /// Enable or disable a capability
    fn set_capability(&self, capability: Capability, enabled: bool);

    // ===== ERRORS =====

    /// Pop one pending error code (`gl_error::NO_ERROR` when none)
    fn get_error(&self) -> u32;
}
