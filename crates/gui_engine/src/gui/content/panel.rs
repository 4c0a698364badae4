//! Panel content - rectangular backgrounds with optional borders

use crate::foundation::math::{Vec2, Vec4};
use crate::gui::element::{ContentContext, ElementContent, RenderElement};
use crate::render::{MaterialId, SpriteMaterialInfo, TextureHandle};
use std::any::Any;

/// Filled background quad plus an optional line border
///
/// Colors left unset come from the element's style.
#[derive(Debug, Clone, Default)]
pub struct PanelContent {
    /// Background color override (RGBA)
    pub color: Option<Vec4>,
    /// Background texture override
    pub texture: Option<TextureHandle>,
    /// Border color override (RGBA)
    pub border_color: Option<Vec4>,
    render_elements: Vec<RenderElement>,
}

impl PanelContent {
    /// Panel styled entirely by the skin
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel with a fixed background color
    pub fn with_color(color: Vec4) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }
}

impl ElementContent for PanelContent {
    fn update_render_elements(&mut self, ctx: &ContentContext<'_>) {
        self.render_elements.clear();

        let color = self.color.unwrap_or(ctx.style.background);
        let texture = self.texture.or(ctx.style.background_texture);
        let (material, info) = match texture {
            Some(texture) => (MaterialId::IMAGE_TRANSPARENT, SpriteMaterialInfo::textured(texture, color)),
            None if color.w >= 1.0 => (MaterialId::IMAGE_OPAQUE, SpriteMaterialInfo::untextured(color)),
            None => (MaterialId::IMAGE_TRANSPARENT, SpriteMaterialInfo::untextured(color)),
        };

        let mut background = RenderElement::triangles(material, info);
        background.mesh.push_quad(Vec2::zeros(), ctx.size, [0.0, 0.0], [1.0, 1.0]);
        self.render_elements.push(background);

        if ctx.style.border_width > 0.0 {
            let border_color = self.border_color.unwrap_or(ctx.style.border_color);
            let mut border = RenderElement::lines(MaterialId::LINE, SpriteMaterialInfo::untextured(border_color));
            border.mesh.push_outline(Vec2::zeros(), ctx.size);
            self.render_elements.push(border);
        }
    }

    fn render_elements(&self) -> &[RenderElement] {
        &self.render_elements
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
