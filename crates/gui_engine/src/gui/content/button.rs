//! Button content - clickable buttons with a state-colored background

use super::text::{layout_lines, GlyphAtlas};
use crate::foundation::math::{Vec2, Vec4};
use crate::gui::element::{ContentContext, ElementContent, RenderElement};
use crate::gui::layout::{HorizontalAlign, VerticalAlign};
use crate::gui::skin::ElementStyle;
use crate::render::{MaterialId, SpriteMaterialInfo};
use std::any::Any;

/// Button state for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Normal resting state
    #[default]
    Normal,
    /// Pointer is hovering over the button
    Hovered,
    /// Button is being pressed
    Pressed,
}

/// Button: background, optional border and a centered label
#[derive(Debug, Clone)]
pub struct ButtonContent {
    /// Label text
    pub label: String,
    /// Glyph atlas for the label
    pub atlas: GlyphAtlas,
    state: ButtonState,
    enabled: bool,
    render_elements: Vec<RenderElement>,
}

impl ButtonContent {
    /// Create an enabled button
    pub fn new(label: impl Into<String>, atlas: GlyphAtlas) -> Self {
        Self {
            label: label.into(),
            atlas,
            state: ButtonState::Normal,
            enabled: true,
            render_elements: Vec::new(),
        }
    }

    /// Current interaction state
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Whether the button reacts to input
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Change interaction state; returns whether it changed
    pub fn set_state(&mut self, state: ButtonState) -> bool {
        let changed = self.state != state;
        self.state = state;
        changed
    }

    /// Enable or disable; returns whether it changed
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Background color for the current state
    pub fn current_color(&self, style: &ElementStyle) -> Vec4 {
        if !self.enabled {
            return style.disabled_background;
        }

        match self.state {
            ButtonState::Normal => style.background,
            ButtonState::Hovered => style.hover_background,
            ButtonState::Pressed => style.pressed_background,
        }
    }
}

impl ElementContent for ButtonContent {
    fn update_render_elements(&mut self, ctx: &ContentContext<'_>) {
        self.render_elements.clear();

        let mut background = RenderElement::triangles(
            MaterialId::IMAGE_TRANSPARENT,
            SpriteMaterialInfo::untextured(self.current_color(ctx.style)),
        );
        background.mesh.push_quad(Vec2::zeros(), ctx.size, [0.0, 0.0], [1.0, 1.0]);
        self.render_elements.push(background);

        if ctx.style.border_width > 0.0 {
            let mut border =
                RenderElement::lines(MaterialId::LINE, SpriteMaterialInfo::untextured(ctx.style.border_color));
            border.mesh.push_outline(Vec2::zeros(), ctx.size);
            self.render_elements.push(border);
        }

        let text_info = SpriteMaterialInfo::textured(self.atlas.texture, ctx.style.text_color);
        let lines = layout_lines(
            &self.atlas,
            &self.label,
            ctx.style.font_size,
            ctx.size,
            HorizontalAlign::Center,
            VerticalAlign::Middle,
        );
        self.render_elements.extend(lines.into_iter().map(|mesh| RenderElement {
            mesh,
            ..RenderElement::triangles(MaterialId::TEXT, text_info)
        }));
    }

    fn render_elements(&self) -> &[RenderElement] {
        &self.render_elements
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
