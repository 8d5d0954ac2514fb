/// Conversions between glutil enums and raw GL constants

use glutil::glutil::{
    Attachment, TextureFormat, TextureParameter, PrimitiveMode, BufferUsage,
    Capability, ClearMask, FramebufferStatus,
};

pub(crate) fn attachment_to_gl(attachment: Attachment) -> u32 {
    match attachment {
        Attachment::Color(index) => glow::COLOR_ATTACHMENT0 + index,
        Attachment::Depth => glow::DEPTH_ATTACHMENT,
    }
}

/// `(internal_format, format, type)` for `glTexImage2D`
pub(crate) fn texture_format_to_gl(format: TextureFormat) -> (i32, u32, u32) {
    match format {
        TextureFormat::RgbaF32 => (glow::RGBA as i32, glow::RGBA, glow::FLOAT),
        TextureFormat::DepthU32 => (glow::DEPTH_COMPONENT as i32, glow::DEPTH_COMPONENT, glow::UNSIGNED_INT),
    }
}

pub(crate) fn texture_parameter_to_gl(parameter: TextureParameter) -> u32 {
    match parameter {
        TextureParameter::BaseLevel => glow::TEXTURE_BASE_LEVEL,
        TextureParameter::MaxLevel => glow::TEXTURE_MAX_LEVEL,
    }
}

pub(crate) fn primitive_mode_to_gl(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Points => glow::POINTS,
        PrimitiveMode::Lines => glow::LINES,
        PrimitiveMode::LineStrip => glow::LINE_STRIP,
        PrimitiveMode::LineLoop => glow::LINE_LOOP,
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

pub(crate) fn buffer_usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

pub(crate) fn capability_to_gl(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::Blend => glow::BLEND,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

pub(crate) fn framebuffer_status_from_gl(status: u32) -> FramebufferStatus {
    match status {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        other => FramebufferStatus::Other(other),
    }
}

#[cfg(test)]
#[path = "glow_format_tests.rs"]
mod tests;
