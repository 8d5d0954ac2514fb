/// Immediate-mode style vertex builder
///
/// Attributes are set on an accumulator; `vertex(..)` stamps the position,
/// appends the accumulated record and resets the accumulator. The whole
/// sequence is uploaded on every `draw`.

use std::mem::{offset_of, size_of};
use std::rc::Rc;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use crate::device::{
    GlDevice, BufferId, VertexArrayId, VertexAttribute, PrimitiveMode, BufferUsage,
};
use crate::error::{log_error, Error, Result};
use crate::glutil_trace;

const SOURCE: &str = "glutil::VertexBuilder";

/// One interleaved vertex record
///
/// Field order is the attribute order: position, tex_coord, normal, color.
/// `VERTEX_ATTRIBUTES` must be kept in sync with this layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
    pub normal: Vec3,
    pub color: Vec4,
}

impl Vertex {
    /// Size of one record in bytes
    pub const STRIDE: usize = size_of::<Vertex>();
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            tex_coord: Vec2::ZERO,
            normal: Vec3::ZERO,
            color: Vec4::ONE,
        }
    }
}

/// Attribute locations of the `Vertex` layout
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        name: "vertPos",
        location: 0,
        components: 3,
        offset: offset_of!(Vertex, position) as i32,
    },
    VertexAttribute {
        name: "vertTexCoord",
        location: 1,
        components: 2,
        offset: offset_of!(Vertex, tex_coord) as i32,
    },
    VertexAttribute {
        name: "vertNormal",
        location: 2,
        components: 3,
        offset: offset_of!(Vertex, normal) as i32,
    },
    VertexAttribute {
        name: "vertColor",
        location: 3,
        components: 4,
        offset: offset_of!(Vertex, color) as i32,
    },
];

/// Vertex sequence that can upload and draw itself
///
/// The vertex buffer and vertex array are created once in `new` and reused
/// for every draw. Not `Clone`.
pub struct VertexBuilder {
    device: Rc<dyn GlDevice>,
    vertices: Vec<Vertex>,
    current: Vertex,
    buffer: BufferId,
    vertex_array: VertexArrayId,
}

impl VertexBuilder {
    /// Create the GPU buffer and vertex array and record the attribute layout
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot allocate either object; nothing
    /// is leaked in that case.
    pub fn new(device: Rc<dyn GlDevice>) -> Result<Self> {
        let buffer = device.create_buffer().map_err(|e| log_error(SOURCE, e))?;
        let vertex_array = match device.create_vertex_array() {
            Ok(vertex_array) => vertex_array,
            Err(e) => {
                device.delete_buffer(buffer);
                return Err(log_error(SOURCE, e));
            }
        };

        device.bind_vertex_array(Some(vertex_array));
        device.bind_array_buffer(Some(buffer));
        for attribute in VERTEX_ATTRIBUTES {
            device.enable_vertex_attribute(attribute, Self::stride() as i32);
        }
        device.bind_vertex_array(None);
        device.bind_array_buffer(None);

        Ok(Self {
            device,
            vertices: Vec::new(),
            current: Vertex::default(),
            buffer,
            vertex_array,
        })
    }

    // ===== CHAINED SETTERS =====

    /// Finalize the accumulated vertex at `(x, y, z)`
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.vertex_vec(Vec3::new(x, y, z))
    }

    /// Finalize the accumulated vertex at `(x, y, 0)`
    pub fn vertex_2d(&mut self, x: f32, y: f32) -> &mut Self {
        self.vertex_vec(Vec3::new(x, y, 0.0))
    }

    /// Finalize the accumulated vertex at `position`
    pub fn vertex_vec(&mut self, position: Vec3) -> &mut Self {
        self.current.position = position;
        self.vertices.push(self.current);
        self.current = Vertex::default();
        self
    }

    pub fn normal(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.normal_vec(Vec3::new(x, y, z))
    }

    pub fn normal_vec(&mut self, normal: Vec3) -> &mut Self {
        self.current.normal = normal;
        self
    }

    pub fn tex_coord(&mut self, s: f32, t: f32) -> &mut Self {
        self.tex_coord_vec(Vec2::new(s, t))
    }

    pub fn tex_coord_vec(&mut self, tex_coord: Vec2) -> &mut Self {
        self.current.tex_coord = tex_coord;
        self
    }

    /// RGBA color of the next vertex
    pub fn color(&mut self, rgba: Vec4) -> &mut Self {
        self.current.color = rgba;
        self
    }

    // ===== DRAWING =====

    /// Upload the whole sequence and draw it with `mode`
    ///
    /// Does nothing when the sequence is empty. The caller binds the shader
    /// program and render target beforehand.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the vertex count does not fit a GL draw
    /// call.
    pub fn draw(&mut self, mode: PrimitiveMode) -> Result<()> {
        if self.vertices.is_empty() {
            return Ok(());
        }
        let count = i32::try_from(self.vertices.len()).map_err(|_| log_error(
            SOURCE,
            Error::InvalidResource(format!("{} vertices exceed a single draw call", self.vertices.len())),
        ))?;

        glutil_trace!(SOURCE, "Drawing {} vertices as {:?}", count, mode);

        self.device.bind_vertex_array(Some(self.vertex_array));
        self.device.bind_array_buffer(Some(self.buffer));
        self.device.buffer_data(bytemuck::cast_slice(&self.vertices), BufferUsage::StaticDraw);
        self.device.draw_arrays(mode, 0, count);
        self.device.bind_vertex_array(None);
        self.device.bind_array_buffer(None);
        Ok(())
    }

    /// `draw` as a triangle strip
    pub fn draw_default(&mut self) -> Result<()> {
        self.draw(PrimitiveMode::default())
    }

    // ===== INTROSPECTION =====

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of finalized vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Byte size of one vertex record
    pub fn stride() -> usize {
        Vertex::STRIDE
    }

    /// Finalized vertices, in insertion order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Drop all finalized vertices; GPU objects are kept for reuse
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    pub fn vertex_array(&self) -> VertexArrayId {
        self.vertex_array
    }
}

impl Drop for VertexBuilder {
    fn drop(&mut self) {
        self.device.delete_vertex_array(self.vertex_array);
        self.device.delete_buffer(self.buffer);
    }
}

impl std::fmt::Debug for VertexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuilder")
            .field("len", &self.vertices.len())
            .field("buffer", &self.buffer)
            .field("vertex_array", &self.vertex_array)
            .finish()
    }
}

#[cfg(test)]
#[path = "vertex_builder_tests.rs"]
mod tests;
