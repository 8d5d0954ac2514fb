//! Render target module
//!
//! Offscreen framebuffers with owned color and depth attachments, plus the
//! scoped binder that restores the default framebuffer.

mod render_target;

pub use render_target::{RenderTarget, RenderTargetBinding, COLOR_FORMAT, DEPTH_FORMAT};
