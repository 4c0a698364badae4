//! Backend abstraction for GUI rendering
//!
//! A renderer consumes GUI geometry through [`GuiRenderBackend`]. Per frame the
//! GUI manager opens a pass, lets each widget re-render any stale cache
//! textures, submits each widget's batched meshes back to front, then closes
//! the pass.

use super::mesh::{MeshBuffer, MeshSegment};
use super::texture::TextureHandle;
use super::RenderError;
use crate::foundation::math::Mat4;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Geometry to render into a draw group's cache texture
///
/// Vertex positions are in texture space: the group's bounds origin maps to
/// texel `(0, 0)`.
#[derive(Debug, Clone, Copy)]
pub struct CachePass<'a> {
    /// Draw group identifier, unique within the widget
    pub group_id: u32,
    /// Target texture
    pub texture: TextureHandle,
    /// Size of the target texture
    pub texture_size: (u32, u32),
    /// Triangle geometry
    pub triangles: &'a MeshBuffer,
    /// Line geometry
    pub lines: &'a MeshBuffer,
    /// Draw segments, back to front
    pub segments: &'a [MeshSegment],
}

/// Batched geometry of one widget
#[derive(Debug, Clone, Copy)]
pub struct WidgetDrawData<'a> {
    /// Widget depth (lower renders in front)
    pub depth: u8,
    /// Widget world transform
    pub transform: &'a Mat4,
    /// Triangle geometry in widget space
    pub triangles: &'a MeshBuffer,
    /// Line geometry in widget space
    pub lines: &'a MeshBuffer,
    /// Draw segments, back to front
    pub segments: &'a [MeshSegment],
}

/// Renderer-side consumer of GUI draw data
pub trait GuiRenderBackend {
    /// Begin the GUI pass for a frame
    fn begin_gui_pass(&mut self) -> BackendResult<()>;

    /// Render geometry into a cache texture
    fn render_cache_pass(&mut self, pass: &CachePass<'_>) -> BackendResult<()>;

    /// Draw a widget's batched meshes
    fn draw_widget(&mut self, draw: &WidgetDrawData<'_>) -> BackendResult<()>;

    /// End the GUI pass and submit
    fn end_gui_pass(&mut self) -> BackendResult<()>;
}
