//! Test fixtures: fixed-geometry content and a recording backend

use crate::foundation::math::{Mat4, Vec2};
use crate::foundation::rect::Rect2I;
use crate::gui::element::{ContentContext, ElementContent, GuiElement, RenderElement};
use crate::gui::layout::ElementLayout;
use crate::render::{
    BackendResult, CachePass, GuiRenderBackend, MaterialId, MeshSegment, RenderError, SpriteMaterialInfo,
    TextureHandle, WidgetDrawData,
};
use std::any::Any;

/// Content with a fixed number of 10x10 pieces, independent of element size
#[derive(Debug, Clone)]
pub struct QuadContent {
    pieces: Vec<RenderElement>,
    info: SpriteMaterialInfo,
    lines: bool,
    pending_count: Option<u32>,
    /// Times the content was asked to regenerate
    pub refreshes: usize,
}

impl QuadContent {
    pub fn new(count: u32) -> Self {
        let mut content = Self {
            pieces: Vec::new(),
            info: SpriteMaterialInfo::default(),
            lines: false,
            pending_count: None,
            refreshes: 0,
        };
        content.generate(count);
        content
    }

    pub fn with_info(mut self, info: SpriteMaterialInfo) -> Self {
        self.info = info;
        self.generate(self.pieces.len() as u32);
        self
    }

    pub fn with_lines(mut self) -> Self {
        self.lines = true;
        self.generate(self.pieces.len() as u32);
        self
    }

    /// Change the piece count on the next regeneration
    pub fn set_count(&mut self, count: u32) {
        self.pending_count = Some(count);
    }

    fn generate(&mut self, count: u32) {
        let size = Vec2::new(10.0, 10.0);
        self.pieces = (0..count)
            .map(|_| {
                if self.lines {
                    let mut piece = RenderElement::lines(MaterialId::LINE, self.info);
                    piece.mesh.push_outline(Vec2::zeros(), size);
                    piece
                } else {
                    let mut piece = RenderElement::triangles(MaterialId::IMAGE_OPAQUE, self.info);
                    piece.mesh.push_quad(Vec2::zeros(), size, [0.0, 0.0], [1.0, 1.0]);
                    piece
                }
            })
            .collect();
    }
}

impl ElementContent for QuadContent {
    fn update_render_elements(&mut self, _ctx: &ContentContext<'_>) {
        self.refreshes += 1;
        if let Some(count) = self.pending_count.take() {
            self.generate(count);
        }
    }

    fn render_elements(&self) -> &[RenderElement] {
        &self.pieces
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Element with one quad piece and bounds `(0, 0, 10, 10)`
pub fn element_at(depth: u32, cacheable: bool) -> GuiElement {
    GuiElement::new(QuadContent::new(1))
        .with_depth(depth)
        .cacheable(cacheable)
        .tap_bounds(Rect2I::new(0, 0, 10, 10))
}

/// Element with one quad piece laid out at the top-left 10x10 of a widget
pub fn quad_at(depth: u32, cacheable: bool) -> GuiElement {
    GuiElement::new(QuadContent::new(1))
        .with_layout(ElementLayout::new(0.0, 0.0, 10.0, 10.0))
        .with_depth(depth)
        .cacheable(cacheable)
}

/// Set resolved bounds directly, bypassing layout
pub trait WithBounds {
    fn tap_bounds(self, bounds: Rect2I) -> Self;
}

impl WithBounds for GuiElement {
    fn tap_bounds(mut self, bounds: Rect2I) -> Self {
        self.set_bounds(bounds);
        self
    }
}

/// One `draw_widget` call
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub depth: u8,
    pub transform: Mat4,
    pub segments: Vec<MeshSegment>,
    pub triangle_indices: u32,
    pub line_indices: u32,
}

/// Backend that records everything it is asked to do
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub passes_begun: usize,
    pub passes_ended: usize,
    pub cache_passes: Vec<(u32, TextureHandle)>,
    pub draws: Vec<RecordedDraw>,
    pub fail_cache_passes: bool,
}

impl GuiRenderBackend for RecordingBackend {
    fn begin_gui_pass(&mut self) -> BackendResult<()> {
        self.passes_begun += 1;
        Ok(())
    }

    fn render_cache_pass(&mut self, pass: &CachePass<'_>) -> BackendResult<()> {
        if self.fail_cache_passes {
            return Err(RenderError::RenderingFailed("cache pass rejected".to_string()));
        }
        self.cache_passes.push((pass.group_id, pass.texture));
        Ok(())
    }

    fn draw_widget(&mut self, draw: &WidgetDrawData<'_>) -> BackendResult<()> {
        self.draws.push(RecordedDraw {
            depth: draw.depth,
            transform: *draw.transform,
            segments: draw.segments.to_vec(),
            triangle_indices: draw.triangles.index_count(),
            line_indices: draw.lines.index_count(),
        });
        Ok(())
    }

    fn end_gui_pass(&mut self) -> BackendResult<()> {
        self.passes_ended += 1;
        Ok(())
    }
}
