/// Mock GL device for tests and headless tools (no GPU required)
///
/// Records every call as a `GlCall` and simulates the driver state the
/// wrappers depend on: bindings, texture storage, buffer contents,
/// capabilities, live objects and the error queue.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::num::NonZeroU32;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::device::{
    GlDevice, FramebufferId, TextureId, BufferId, VertexArrayId,
    Attachment, TextureFormat, TextureParameter, PrimitiveMode, BufferUsage,
    Capability, ClearMask, FramebufferStatus, VertexAttribute, gl_error,
};
use crate::error::{Error, Result};

// ============================================================================
// Recorded calls
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateFramebuffer(FramebufferId),
    DeleteFramebuffer(FramebufferId),
    BindFramebuffer(Option<FramebufferId>),
    AttachTexture { framebuffer: Option<FramebufferId>, attachment: Attachment, texture: TextureId },
    FramebufferStatus(FramebufferStatus),
    CreateTexture(TextureId),
    DeleteTexture(TextureId),
    BindTexture(Option<TextureId>),
    TexImage2D { texture: Option<TextureId>, format: TextureFormat, width: u32, height: u32 },
    TexParameter { texture: Option<TextureId>, parameter: TextureParameter, value: i32 },
    CreateBuffer(BufferId),
    DeleteBuffer(BufferId),
    BindArrayBuffer(Option<BufferId>),
    BufferData { buffer: Option<BufferId>, len: usize, usage: BufferUsage },
    CreateVertexArray(VertexArrayId),
    DeleteVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    EnableVertexAttribute { attribute: VertexAttribute, stride: i32 },
    DrawArrays { mode: PrimitiveMode, first: i32, count: i32 },
    Clear(ClearMask),
    SetCapability { capability: Capability, enabled: bool },
    GetError(u32),
}

/// Storage allocated for a texture by `tex_image_2d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureStorage {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Mock device
// ============================================================================

/// Headless `GlDevice`
///
/// Object names are handed out from a single counter starting at 1, so
/// names are unique across object kinds. Stricter than a real driver:
/// deleting a name that is not live queues `INVALID_VALUE`, which makes
/// double deletes visible to tests.
#[derive(Debug)]
pub struct MockGlDevice {
    calls: RefCell<Vec<GlCall>>,
    next_name: Cell<u32>,

    bound_framebuffer: Cell<Option<FramebufferId>>,
    bound_texture: Cell<Option<TextureId>>,
    bound_array_buffer: Cell<Option<BufferId>>,
    bound_vertex_array: Cell<Option<VertexArrayId>>,

    live_framebuffers: RefCell<FxHashSet<FramebufferId>>,
    live_textures: RefCell<FxHashSet<TextureId>>,
    live_buffers: RefCell<FxHashSet<BufferId>>,
    live_vertex_arrays: RefCell<FxHashSet<VertexArrayId>>,

    texture_storage: RefCell<FxHashMap<TextureId, TextureStorage>>,
    texture_parameters: RefCell<FxHashMap<(TextureId, TextureParameter), i32>>,
    buffer_contents: RefCell<FxHashMap<BufferId, Vec<u8>>>,
    capabilities: RefCell<FxHashSet<Capability>>,

    pending_errors: RefCell<VecDeque<u32>>,
    fail_allocations: Cell<bool>,
    failing_storage: RefCell<Vec<TextureFormat>>,
    max_texture_size: Cell<u32>,
    framebuffer_status: Cell<FramebufferStatus>,
}

impl MockGlDevice {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_name: Cell::new(1),
            bound_framebuffer: Cell::new(None),
            bound_texture: Cell::new(None),
            bound_array_buffer: Cell::new(None),
            bound_vertex_array: Cell::new(None),
            live_framebuffers: RefCell::new(FxHashSet::default()),
            live_textures: RefCell::new(FxHashSet::default()),
            live_buffers: RefCell::new(FxHashSet::default()),
            live_vertex_arrays: RefCell::new(FxHashSet::default()),
            texture_storage: RefCell::new(FxHashMap::default()),
            texture_parameters: RefCell::new(FxHashMap::default()),
            buffer_contents: RefCell::new(FxHashMap::default()),
            capabilities: RefCell::new(FxHashSet::default()),
            pending_errors: RefCell::new(VecDeque::new()),
            fail_allocations: Cell::new(false),
            failing_storage: RefCell::new(Vec::new()),
            max_texture_size: Cell::new(i32::MAX as u32),
            framebuffer_status: Cell::new(FramebufferStatus::Complete),
        }
    }

    // ===== TEST CONTROLS =====

    /// Queue an error code to be returned by `get_error`
    pub fn push_error(&self, code: u32) {
        self.pending_errors.borrow_mut().push_back(code);
    }

    /// Make every subsequent `create_*` call fail
    pub fn fail_allocations(&self, fail: bool) {
        self.fail_allocations.set(fail);
    }

    /// Make `tex_image_2d` fail with `OutOfMemory` for the given formats
    /// (an empty slice lets every allocation through again)
    pub fn fail_storage(&self, formats: &[TextureFormat]) {
        *self.failing_storage.borrow_mut() = formats.to_vec();
    }

    /// Largest texture dimension `tex_image_2d` accepts (default `i32::MAX`);
    /// larger requests fail with a `BackendError`
    pub fn set_max_texture_size(&self, size: u32) {
        self.max_texture_size.set(size);
    }

    /// Status reported by `framebuffer_status` from now on
    pub fn set_framebuffer_status(&self, status: FramebufferStatus) {
        self.framebuffer_status.set(status);
    }

    /// Forget all recorded calls (state is kept)
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    // ===== INSPECTION =====

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Recorded calls matching a predicate
    pub fn calls_matching(&self, predicate: impl Fn(&GlCall) -> bool) -> Vec<GlCall> {
        self.calls.borrow().iter().filter(|call| predicate(call)).cloned().collect()
    }

    pub fn bound_framebuffer(&self) -> Option<FramebufferId> {
        self.bound_framebuffer.get()
    }

    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture.get()
    }

    pub fn bound_array_buffer(&self) -> Option<BufferId> {
        self.bound_array_buffer.get()
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayId> {
        self.bound_vertex_array.get()
    }

    pub fn texture_storage(&self, texture: TextureId) -> Option<TextureStorage> {
        self.texture_storage.borrow().get(&texture).copied()
    }

    pub fn texture_parameter(&self, texture: TextureId, parameter: TextureParameter) -> Option<i32> {
        self.texture_parameters.borrow().get(&(texture, parameter)).copied()
    }

    /// Bytes last uploaded into a buffer
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.buffer_contents.borrow().get(&buffer).cloned()
    }

    pub fn capability_enabled(&self, capability: Capability) -> bool {
        self.capabilities.borrow().contains(&capability)
    }

    pub fn is_framebuffer_live(&self, framebuffer: FramebufferId) -> bool {
        self.live_framebuffers.borrow().contains(&framebuffer)
    }

    pub fn is_texture_live(&self, texture: TextureId) -> bool {
        self.live_textures.borrow().contains(&texture)
    }

    /// Number of objects of any kind that have been created and not deleted
    pub fn live_object_count(&self) -> usize {
        self.live_framebuffers.borrow().len()
            + self.live_textures.borrow().len()
            + self.live_buffers.borrow().len()
            + self.live_vertex_arrays.borrow().len()
    }

    pub fn pending_error_count(&self) -> usize {
        self.pending_errors.borrow().len()
    }

    // ===== INTERNAL =====

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate_name(&self, kind: &str) -> Result<NonZeroU32> {
        if self.fail_allocations.get() {
            return Err(Error::ResourceExhausted(format!("mock {} allocation refused", kind)));
        }
        let raw = self.next_name.get();
        let name = NonZeroU32::new(raw)
            .ok_or_else(|| Error::ResourceExhausted(format!("mock {} names wrapped", kind)))?;
        self.next_name.set(raw.wrapping_add(1));
        Ok(name)
    }
}

impl Default for MockGlDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GlDevice for MockGlDevice {
    fn create_framebuffer(&self) -> Result<FramebufferId> {
        let id = FramebufferId(self.allocate_name("framebuffer")?);
        self.live_framebuffers.borrow_mut().insert(id);
        self.record(GlCall::CreateFramebuffer(id));
        Ok(id)
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferId) {
        if !self.live_framebuffers.borrow_mut().remove(&framebuffer) {
            self.push_error(gl_error::INVALID_VALUE);
        }
        if self.bound_framebuffer.get() == Some(framebuffer) {
            self.bound_framebuffer.set(None);
        }
        self.record(GlCall::DeleteFramebuffer(framebuffer));
    }

    fn bind_framebuffer(&self, framebuffer: Option<FramebufferId>) {
        self.bound_framebuffer.set(framebuffer);
        self.record(GlCall::BindFramebuffer(framebuffer));
    }

    fn attach_texture(&self, attachment: Attachment, texture: TextureId) {
        if self.bound_framebuffer.get().is_none() {
            self.push_error(gl_error::INVALID_OPERATION);
        }
        self.record(GlCall::AttachTexture {
            framebuffer: self.bound_framebuffer.get(),
            attachment,
            texture,
        });
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        let status = self.framebuffer_status.get();
        self.record(GlCall::FramebufferStatus(status));
        status
    }

    fn create_texture(&self) -> Result<TextureId> {
        let id = TextureId(self.allocate_name("texture")?);
        self.live_textures.borrow_mut().insert(id);
        self.record(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn delete_texture(&self, texture: TextureId) {
        if !self.live_textures.borrow_mut().remove(&texture) {
            self.push_error(gl_error::INVALID_VALUE);
        }
        self.texture_storage.borrow_mut().remove(&texture);
        if self.bound_texture.get() == Some(texture) {
            self.bound_texture.set(None);
        }
        self.record(GlCall::DeleteTexture(texture));
    }

    fn bind_texture(&self, texture: Option<TextureId>) {
        self.bound_texture.set(texture);
        self.record(GlCall::BindTexture(texture));
    }

    fn tex_image_2d(&self, format: TextureFormat, width: u32, height: u32) -> Result<()> {
        let texture = self.bound_texture.get();
        self.record(GlCall::TexImage2D { texture, format, width, height });
        let max = self.max_texture_size.get();
        if width > max || height > max {
            return Err(Error::BackendError(format!(
                "mock texture size {}x{} exceeds {}", width, height, max
            )));
        }
        if self.failing_storage.borrow().contains(&format) {
            return Err(Error::OutOfMemory);
        }
        match texture {
            Some(id) => {
                self.texture_storage
                    .borrow_mut()
                    .insert(id, TextureStorage { format, width, height });
            }
            None => self.push_error(gl_error::INVALID_OPERATION),
        }
        Ok(())
    }

    fn tex_parameter(&self, parameter: TextureParameter, value: i32) {
        let texture = self.bound_texture.get();
        match texture {
            Some(id) => {
                self.texture_parameters.borrow_mut().insert((id, parameter), value);
            }
            None => self.push_error(gl_error::INVALID_OPERATION),
        }
        self.record(GlCall::TexParameter { texture, parameter, value });
    }

    fn create_buffer(&self) -> Result<BufferId> {
        let id = BufferId(self.allocate_name("buffer")?);
        self.live_buffers.borrow_mut().insert(id);
        self.record(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn delete_buffer(&self, buffer: BufferId) {
        if !self.live_buffers.borrow_mut().remove(&buffer) {
            self.push_error(gl_error::INVALID_VALUE);
        }
        self.buffer_contents.borrow_mut().remove(&buffer);
        if self.bound_array_buffer.get() == Some(buffer) {
            self.bound_array_buffer.set(None);
        }
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        self.bound_array_buffer.set(buffer);
        self.record(GlCall::BindArrayBuffer(buffer));
    }

    fn buffer_data(&self, data: &[u8], usage: BufferUsage) {
        let buffer = self.bound_array_buffer.get();
        match buffer {
            Some(id) => {
                self.buffer_contents.borrow_mut().insert(id, data.to_vec());
            }
            None => self.push_error(gl_error::INVALID_OPERATION),
        }
        self.record(GlCall::BufferData { buffer, len: data.len(), usage });
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        let id = VertexArrayId(self.allocate_name("vertex array")?);
        self.live_vertex_arrays.borrow_mut().insert(id);
        self.record(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) {
        if !self.live_vertex_arrays.borrow_mut().remove(&vertex_array) {
            self.push_error(gl_error::INVALID_VALUE);
        }
        if self.bound_vertex_array.get() == Some(vertex_array) {
            self.bound_vertex_array.set(None);
        }
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        self.bound_vertex_array.set(vertex_array);
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn enable_vertex_attribute(&self, attribute: VertexAttribute, stride: i32) {
        if self.bound_vertex_array.get().is_none() || self.bound_array_buffer.get().is_none() {
            self.push_error(gl_error::INVALID_OPERATION);
        }
        self.record(GlCall::EnableVertexAttribute { attribute, stride });
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        if first < 0 || count < 0 {
            self.push_error(gl_error::INVALID_VALUE);
        }
        self.record(GlCall::DrawArrays { mode, first, count });
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GlCall::Clear(mask));
    }

    fn set_capability(&self, capability: Capability, enabled: bool) {
        if enabled {
            self.capabilities.borrow_mut().insert(capability);
        } else {
            self.capabilities.borrow_mut().remove(&capability);
        }
        self.record(GlCall::SetCapability { capability, enabled });
    }

    fn get_error(&self) -> u32 {
        let code = self.pending_errors.borrow_mut().pop_front().unwrap_or(gl_error::NO_ERROR);
        self.record(GlCall::GetError(code));
        code
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
