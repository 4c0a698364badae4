//! GUI mesh buffers
//!
//! Geometry is kept in two flavours: triangle lists for filled sprites and
//! text, and line lists for borders and outlines. A [`MeshSegment`] describes
//! a contiguous index range of one buffer drawn with a single material.

use super::material::{MaterialId, SpriteMaterialInfo};
use crate::foundation::math::Vec2;
use bytemuck::{Pod, Zeroable};

/// 2D GUI vertex in pixel space
///
/// `#[repr(C)]` so the buffer can be uploaded as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct GuiVertex {
    /// Position in pixels
    pub position: [f32; 2],
    /// Texture coordinates
    pub uv: [f32; 2],
}

impl GuiVertex {
    /// Create a vertex
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Primitive topology of a buffer or segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Indexed triangle list
    Triangles,
    /// Indexed line list
    Lines,
}

/// Indexed vertex buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    /// Vertex data
    pub vertices: Vec<GuiVertex>,
    /// Indices into `vertices`
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all geometry, keeping allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Whether the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of indices
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Append a quad covering `min`..`max` as two triangles
    pub fn push_quad(&mut self, min: Vec2, max: Vec2, uv_min: [f32; 2], uv_max: [f32; 2]) {
        let base = self.vertex_count();
        self.vertices.extend_from_slice(&[
            GuiVertex::new(min.x, min.y, uv_min[0], uv_min[1]),
            GuiVertex::new(max.x, min.y, uv_max[0], uv_min[1]),
            GuiVertex::new(max.x, max.y, uv_max[0], uv_max[1]),
            GuiVertex::new(min.x, max.y, uv_min[0], uv_max[1]),
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append the outline of `min`..`max` as four line segments
    pub fn push_outline(&mut self, min: Vec2, max: Vec2) {
        let base = self.vertex_count();
        self.vertices.extend_from_slice(&[
            GuiVertex::new(min.x, min.y, 0.0, 0.0),
            GuiVertex::new(max.x, min.y, 0.0, 0.0),
            GuiVertex::new(max.x, max.y, 0.0, 0.0),
            GuiVertex::new(min.x, max.y, 0.0, 0.0),
        ]);
        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 1,
            base + 2,
            base + 2,
            base + 3,
            base + 3,
            base,
        ]);
    }

    /// Append another buffer translated by `offset`
    ///
    /// Returns the index offset at which the appended indices start.
    pub fn append(&mut self, other: &MeshBuffer, offset: Vec2) -> u32 {
        let index_offset = self.index_count();
        let base = self.vertex_count();

        self.vertices.extend(other.vertices.iter().map(|v| GuiVertex {
            position: [v.position[0] + offset.x, v.position[1] + offset.y],
            uv: v.uv,
        }));
        self.indices.extend(other.indices.iter().map(|i| i + base));

        index_offset
    }

    /// Vertex data as raw bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// A contiguous index range drawn with one material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSegment {
    /// First index in the owning buffer
    pub index_offset: u32,
    /// Number of indices
    pub index_count: u32,
    /// Sprite material
    pub material: MaterialId,
    /// Per-draw material parameters
    pub info: SpriteMaterialInfo,
    /// Which buffer the range belongs to
    pub primitive: PrimitiveKind,
}

impl MeshSegment {
    /// One past the last index of the range
    pub fn index_end(&self) -> u32 {
        self.index_offset + self.index_count
    }

    /// Whether a range drawn with `material`/`info`/`primitive` starting at
    /// `index_offset` can be folded into this segment
    pub fn can_extend(
        &self,
        material: MaterialId,
        info: &SpriteMaterialInfo,
        primitive: PrimitiveKind,
        index_offset: u32,
    ) -> bool {
        self.material == material
            && self.info == *info
            && self.primitive == primitive
            && self.index_end() == index_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_quad_layout() {
        let mut mesh = MeshBuffer::new();
        mesh.push_quad(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0), [0.0, 0.0], [1.0, 1.0]);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[2].position, [4.0, 2.0]);
    }

    #[test]
    fn test_append_rebases_indices_and_translates() {
        let mut quad = MeshBuffer::new();
        quad.push_quad(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), [0.0, 0.0], [1.0, 1.0]);

        let mut target = MeshBuffer::new();
        assert_eq!(target.append(&quad, Vec2::zeros()), 0);
        assert_eq!(target.append(&quad, Vec2::new(10.0, 20.0)), 6);

        assert_eq!(target.indices[6..], [4, 5, 6, 4, 6, 7]);
        assert_eq!(target.vertices[4].position, [10.0, 20.0]);
    }

    #[test]
    fn test_outline_is_line_list() {
        let mut mesh = MeshBuffer::new();
        mesh.push_outline(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert_eq!(mesh.index_count() % 2, 0);
        assert_eq!(mesh.index_count(), 8);
    }

    #[test]
    fn test_vertex_bytes_size() {
        let mut mesh = MeshBuffer::new();
        mesh.push_quad(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), [0.0, 0.0], [1.0, 1.0]);
        assert_eq!(mesh.vertex_bytes().len(), 4 * std::mem::size_of::<GuiVertex>());
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }
}
