//! Label content - text display

use super::text::{layout_lines, GlyphAtlas};
use crate::foundation::math::Vec4;
use crate::gui::element::{ContentContext, ElementContent, RenderElement};
use crate::gui::layout::{HorizontalAlign, VerticalAlign};
use crate::render::{MaterialId, SpriteMaterialInfo};
use std::any::Any;

/// Text label, one render element per line
#[derive(Debug, Clone)]
pub struct LabelContent {
    /// Text content to display
    pub text: String,
    /// Glyph atlas
    pub atlas: GlyphAtlas,
    /// Font size override in pixels
    pub font_size: Option<f32>,
    /// Text color override (RGBA)
    pub color: Option<Vec4>,
    /// Horizontal alignment within the element bounds
    pub h_align: HorizontalAlign,
    /// Vertical alignment within the element bounds
    pub v_align: VerticalAlign,
    render_elements: Vec<RenderElement>,
}

impl LabelContent {
    /// Create a top-left aligned label
    pub fn new(text: impl Into<String>, atlas: GlyphAtlas) -> Self {
        Self {
            text: text.into(),
            atlas,
            font_size: None,
            color: None,
            h_align: HorizontalAlign::Left,
            v_align: VerticalAlign::Top,
            render_elements: Vec::new(),
        }
    }

    /// Set alignment
    pub fn aligned(mut self, h_align: HorizontalAlign, v_align: VerticalAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    /// Replace the text; returns whether it changed
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        true
    }
}

impl ElementContent for LabelContent {
    fn update_render_elements(&mut self, ctx: &ContentContext<'_>) {
        let font_size = self.font_size.unwrap_or(ctx.style.font_size);
        let info = SpriteMaterialInfo::textured(self.atlas.texture, self.color.unwrap_or(ctx.style.text_color));

        self.render_elements = layout_lines(&self.atlas, &self.text, font_size, ctx.size, self.h_align, self.v_align)
            .into_iter()
            .map(|mesh| RenderElement {
                mesh,
                ..RenderElement::triangles(MaterialId::TEXT, info)
            })
            .collect();
    }

    fn render_elements(&self) -> &[RenderElement] {
        &self.render_elements
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
