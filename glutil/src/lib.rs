/*!
# glutil

RAII wrappers over an OpenGL-style graphics API for a game's rendering
subsystem.

All GL calls go through the object-safe `GlDevice` trait, so the wrappers
can run on a real context (see the `glutil_device_glow` crate) or on the
headless `MockGlDevice`.

## Architecture

- **RenderTarget**: framebuffer object owning a color and a depth texture
- **VertexBuilder**: chained per-vertex attribute builder that uploads and draws itself
- **ScopedErrorCheck**: labeled GL error checkpoints with a thread-local context stack
- **DepthTestScope**: depth testing enabled for the lifetime of a guard
- **Texture**: owned 2D texture object with scoped binding

Resources share the device as `Rc<dyn GlDevice>`, which keeps them on the
thread that owns the GL context.
*/

pub mod device;
pub mod error;
pub mod error_check;
pub mod log;
pub mod render_target;
pub mod texture;
pub mod vertex;

// Main glutil namespace module
pub mod glutil {
    // Error types
    pub use crate::error::{Error, Result};

    // Device trait and value types
    pub use crate::device::{
        GlDevice, FramebufferId, TextureId, BufferId, VertexArrayId,
        Attachment, TextureFormat, TextureParameter, PrimitiveMode, BufferUsage,
        Capability, ClearMask, FramebufferStatus, VertexAttribute, gl_error,
    };

    // Wrappers
    pub use crate::depth_test::DepthTestScope;
    pub use crate::error_check::{ScopedErrorCheck, ErrorCheckConfig};
    pub use crate::render_target::{RenderTarget, RenderTargetBinding};
    pub use crate::texture::{Texture, TextureBinding, TextureInfo};
    pub use crate::vertex::{Vertex, VertexBuilder};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Headless device
    pub mod mock {
        pub use crate::device::mock_device::{MockGlDevice, GlCall, TextureStorage};
    }
}

// Re-export math library at crate root
pub use glam;
