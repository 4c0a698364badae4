//! GUI elements
//!
//! An element is a rectangle of the widget with some content. The content
//! turns itself into one or more render elements: pieces of geometry that are
//! each drawn with a single material. Render elements are the unit the draw
//! group batcher works with.

use super::dirty::DirtyFlags;
use super::layout::ElementLayout;
use super::skin::{ElementStyle, GuiSkin};
use crate::foundation::collections::WidgetId;
use crate::foundation::math::Vec2;
use crate::foundation::rect::Rect2I;
use crate::render::{MaterialId, MeshBuffer, PrimitiveKind, SpriteMaterialInfo};
use std::any::Any;
use std::fmt::Debug;

/// One material-homogeneous piece of an element's geometry
///
/// Mesh positions are relative to the element's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderElement {
    /// Sprite material
    pub material: MaterialId,
    /// Per-draw material parameters
    pub info: SpriteMaterialInfo,
    /// Primitive topology of `mesh`
    pub primitive: PrimitiveKind,
    /// Geometry in element space
    pub mesh: MeshBuffer,
}

impl RenderElement {
    /// Create an empty triangle piece
    pub fn triangles(material: MaterialId, info: SpriteMaterialInfo) -> Self {
        Self {
            material,
            info,
            primitive: PrimitiveKind::Triangles,
            mesh: MeshBuffer::new(),
        }
    }

    /// Create an empty line piece
    pub fn lines(material: MaterialId, info: SpriteMaterialInfo) -> Self {
        Self {
            material,
            info,
            primitive: PrimitiveKind::Lines,
            mesh: MeshBuffer::new(),
        }
    }
}

/// Inputs available to content when regenerating geometry
#[derive(Debug, Clone, Copy)]
pub struct ContentContext<'a> {
    /// Element size in pixels
    pub size: Vec2,
    /// Resolved style
    pub style: &'a ElementStyle,
}

/// Producer of an element's render elements
pub trait ElementContent: Debug {
    /// Regenerate render elements for the given size and style
    fn update_render_elements(&mut self, ctx: &ContentContext<'_>);

    /// Current render elements
    fn render_elements(&self) -> &[RenderElement];

    /// Number of current render elements
    fn render_element_count(&self) -> u32 {
        self.render_elements().len() as u32
    }

    /// Downcast support for typed content updates
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// An element registered (or about to be registered) with a widget
#[derive(Debug)]
pub struct GuiElement {
    layout: ElementLayout,
    bounds: Rect2I,
    depth: u32,
    cacheable: bool,
    visible: bool,
    tab_index: Option<i32>,
    style: Option<String>,
    content: Box<dyn ElementContent>,
    owner: Option<WidgetId>,
    registration_seq: u64,
    dirty: DirtyFlags,
}

impl GuiElement {
    /// Create a visible, non-cacheable element at depth 0
    pub fn new(content: impl ElementContent + 'static) -> Self {
        Self {
            layout: ElementLayout::default(),
            bounds: Rect2I::EMPTY,
            depth: 0,
            cacheable: false,
            visible: true,
            tab_index: None,
            style: None,
            content: Box::new(content),
            owner: None,
            registration_seq: 0,
            dirty: DirtyFlags::empty(),
        }
    }

    /// Set the layout
    pub fn with_layout(mut self, layout: ElementLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the depth (lower renders in front)
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Allow the element to be baked into a cache texture
    pub fn cacheable(mut self, cacheable: bool) -> Self {
        self.cacheable = cacheable;
        self
    }

    /// Set initial visibility
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Use a named skin style
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Join the widget's default navigation group at `tab_index`
    pub fn focusable(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Layout inside the root panel
    pub fn layout(&self) -> &ElementLayout {
        &self.layout
    }

    /// Resolved bounds in widget pixels
    pub fn bounds(&self) -> Rect2I {
        self.bounds
    }

    /// Depth (lower renders in front)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether the element may be cached
    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Whether the element is drawn
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Navigation tab index, when focusable
    pub fn tab_index(&self) -> Option<i32> {
        self.tab_index
    }

    /// Style name
    pub fn style_name(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Owning widget, while registered
    pub fn owner(&self) -> Option<WidgetId> {
        self.owner
    }

    /// Order in which the element was registered with its widget
    pub fn registration_seq(&self) -> u64 {
        self.registration_seq
    }

    /// Pending dirty flags
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Content
    pub fn content(&self) -> &dyn ElementContent {
        self.content.as_ref()
    }

    /// Current render elements
    pub fn render_elements(&self) -> &[RenderElement] {
        self.content.render_elements()
    }

    /// Number of current render elements
    pub fn render_element_count(&self) -> u32 {
        self.content.render_element_count()
    }

    pub(crate) fn content_mut(&mut self) -> &mut dyn ElementContent {
        self.content.as_mut()
    }

    pub(crate) fn set_layout(&mut self, layout: ElementLayout) {
        self.layout = layout;
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect2I) {
        self.bounds = bounds;
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_owner(&mut self, owner: Option<WidgetId>) {
        self.owner = owner;
    }

    pub(crate) fn set_registration_seq(&mut self, seq: u64) {
        self.registration_seq = seq;
    }

    pub(crate) fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::empty();
    }

    /// Regenerate render elements from the current bounds and skin
    pub(crate) fn refresh_content(&mut self, skin: &GuiSkin) {
        let style = skin.style(self.style.as_deref());
        let ctx = ContentContext {
            size: Vec2::new(self.bounds.width as f32, self.bounds.height as f32),
            style,
        };
        self.content.update_render_elements(&ctx);
    }
}
