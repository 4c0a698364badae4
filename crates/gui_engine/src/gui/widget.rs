//! # GUI Widget
//!
//! A widget is a self-contained piece of UI placed in the world (or on a
//! camera) through a transform. It owns its elements and the draw groups
//! batching them, watches the camera it renders through, and rebuilds only
//! what changed since the last frame.
//!
//! ## Per-frame cycle
//!
//! ```text
//! update_rt()        viewport / render target changed? resize root panel
//! update_transform() world matrix, only when the source moved
//! update_layout()    element bounds against the root panel
//! is_dirty(true)     refresh dirty contents, rebuild dirty groups
//! render()           cache passes, then the shared buffers
//! ```
//!
//! ## Lifecycle
//!
//! `Active` ⇄ `Inactive` → `Destroyed`. An inactive widget keeps collecting
//! dirty state but does not rebuild or render. A destroyed widget ignores
//! every call.

use super::dirty::{DirtyContents, DirtyFlags};
use super::draw_groups::{DrawGroups, RebuildStats};
use super::element::{ElementContent, GuiElement};
use super::events::{WidgetEvent, WidgetEventSystem};
use super::layout::{ElementLayout, RootPanel};
use super::nav_group::NavGroup;
use super::registry::ElementRegistry;
use super::skin::GuiSkin;
use crate::config::GuiConfig;
use crate::foundation::collections::{Cached, ElementId, WidgetId};
use crate::foundation::math::{transform_point_2d, Mat4, Transform, Vec2, Vec2I};
use crate::foundation::rect::Rect2I;
use crate::render::{
    CameraSource, GuiRenderBackend, RenderError, SharedTextureAllocator, Viewport, WidgetDrawData,
};
use crate::scene::TransformSource;
use log::{debug, info, warn};
use std::rc::Rc;

/// Lifecycle state of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Updated and rendered every frame
    Active,
    /// Tracks changes but neither rebuilds nor renders
    Inactive,
    /// Terminal; every operation is ignored
    Destroyed,
}

/// A batch of GUI elements rendered through one camera
pub struct GuiWidget {
    id: WidgetId,
    state: WidgetState,
    camera: Option<Rc<dyn CameraSource>>,
    allocator: SharedTextureAllocator,
    config: GuiConfig,

    elements: ElementRegistry,
    draw_groups: DrawGroups,
    dirty_contents: DirtyContents,
    nav_group: NavGroup,
    skin: GuiSkin,
    events: WidgetEventSystem,

    panel: RootPanel,
    depth: u8,
    transform: Transform,
    world_matrix: Mat4,
    bounds: Cached<Rect2I>,

    viewport: Option<Viewport>,
    has_focus: bool,
    widget_dirty: bool,
    last_stats: RebuildStats,
}

impl std::fmt::Debug for GuiWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiWidget")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("depth", &self.depth)
            .field("viewport", &self.viewport)
            .field("elements", &self.elements.len())
            .field("draw_groups", &self.draw_groups.len())
            .finish_non_exhaustive()
    }
}

impl GuiWidget {
    /// Create an active widget rendering through `camera`
    ///
    /// The root panel starts out covering the camera's viewport.
    pub fn new(camera: Rc<dyn CameraSource>, allocator: SharedTextureAllocator, config: &GuiConfig) -> Self {
        let viewport = camera.viewport();
        let has_focus = camera.has_focus();
        let area = viewport.map(|viewport| viewport.area).unwrap_or_default();

        Self {
            id: WidgetId::default(),
            state: WidgetState::Active,
            camera: Some(camera),
            allocator,
            config: config.clone(),
            elements: ElementRegistry::new(),
            draw_groups: DrawGroups::new(config),
            dirty_contents: DirtyContents::new(),
            nav_group: NavGroup::new(),
            skin: GuiSkin::new(),
            events: WidgetEventSystem::new(),
            panel: RootPanel::new(area),
            depth: config.default_widget_depth,
            transform: Transform::identity(),
            world_matrix: Mat4::identity(),
            bounds: Cached::new(Rect2I::EMPTY),
            viewport,
            has_focus,
            widget_dirty: true,
            last_stats: RebuildStats::default(),
        }
    }

    /// Identifier assigned by the owning manager (null for standalone widgets)
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: WidgetId) {
        self.id = id;
        for element in self.elements.values_mut() {
            element.set_owner(Some(id));
        }
    }

    /// Lifecycle state
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Whether the widget is updated and rendered
    pub fn is_active(&self) -> bool {
        self.state == WidgetState::Active
    }

    /// Whether the widget was destroyed
    pub fn is_destroyed(&self) -> bool {
        self.state == WidgetState::Destroyed
    }

    /// Activate or deactivate; ignored once destroyed
    pub fn set_is_active(&mut self, active: bool) {
        match (self.state, active) {
            (WidgetState::Active, false) => {
                debug!("Widget {:?} deactivated", self.id);
                self.state = WidgetState::Inactive;
            }
            (WidgetState::Inactive, true) => {
                debug!("Widget {:?} activated", self.id);
                self.state = WidgetState::Active;
                self.widget_dirty = true;
            }
            _ => {}
        }
    }

    /// Drop every element, release cache textures and unbind the camera
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }

        match self.allocator.try_borrow_mut() {
            Ok(mut allocator) => self.draw_groups.clear(&mut *allocator),
            Err(_) => warn!(
                "Texture allocator busy while destroying widget {:?}; its cache textures are dropped",
                self.id
            ),
        }

        self.elements = ElementRegistry::new();
        self.dirty_contents.clear();
        self.nav_group = NavGroup::new();
        self.events.clear();
        self.camera = None;
        self.viewport = None;
        self.bounds.invalidate();
        self.state = WidgetState::Destroyed;

        info!("Widget {:?} destroyed", self.id);
    }

    // Elements

    /// Take ownership of an element and add it to the widget
    ///
    /// Returns `None` on a destroyed widget.
    pub fn register_element(&mut self, mut element: GuiElement) -> Option<ElementId> {
        if self.is_destroyed() {
            warn!("Ignoring element registration on destroyed widget {:?}", self.id);
            return None;
        }

        element.set_owner(Some(self.id));
        element.set_bounds(element.layout().resolve(self.panel.area()));
        element.refresh_content(&self.skin);
        element.clear_dirty();

        let id = self.elements.insert(element);
        let element = self.elements.get(id)?;
        if let Some(tab_index) = element.tab_index() {
            self.nav_group.add(id, tab_index, element.registration_seq());
        }
        self.draw_groups.add(id, element);
        self.bounds.invalidate();

        Some(id)
    }

    /// Remove an element and hand ownership back to the caller
    pub fn unregister_element(&mut self, id: ElementId) -> Option<GuiElement> {
        if self.is_destroyed() {
            return None;
        }

        let mut element = self.elements.remove(id)?;
        self.draw_groups.remove(id);
        self.nav_group.remove(id);
        self.dirty_contents.remove(id);
        self.bounds.invalidate();

        element.set_owner(None);
        element.clear_dirty();
        Some(element)
    }

    /// Registered element
    pub fn element(&self, id: ElementId) -> Option<&GuiElement> {
        self.elements.get(id)
    }

    /// All registered elements
    pub fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    /// Queue an element's content for regeneration; returns whether it is registered
    pub fn mark_content_dirty(&mut self, id: ElementId) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };

        element.mark_dirty(DirtyFlags::CONTENT);
        self.dirty_contents.mark(id);
        self.draw_groups.notify_content_dirty(id);
        true
    }

    /// Flag an element's placement or visibility as changed
    pub fn mark_mesh_dirty(&mut self, id: ElementId) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };

        element.mark_dirty(DirtyFlags::MESH);
        self.draw_groups.notify_mesh_dirty(id);
        self.bounds.invalidate();
        true
    }

    /// Edit an element's content in place and queue it for regeneration
    ///
    /// Returns false if the element is unknown or its content is not a `C`.
    pub fn update_content<C: ElementContent + 'static>(&mut self, id: ElementId, update: impl FnOnce(&mut C)) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        let Some(content) = element.content_mut().as_any_mut().downcast_mut::<C>() else {
            return false;
        };

        update(content);
        self.mark_content_dirty(id)
    }

    /// Move an element to another depth
    pub fn set_element_depth(&mut self, id: ElementId, depth: u32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if element.depth() == depth {
            return true;
        }

        element.set_depth(depth);
        self.draw_groups.add(id, element);
        true
    }

    /// Show or hide an element
    pub fn set_element_visible(&mut self, id: ElementId, visible: bool) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if element.is_visible() != visible {
            element.set_visible(visible);
            self.mark_mesh_dirty(id);
        }
        true
    }

    /// Replace an element's layout and resolve it against the root panel
    pub fn set_element_layout(&mut self, id: ElementId, layout: ElementLayout) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };

        element.set_layout(layout);
        self.update_element_layout(id);
        true
    }

    // Layout

    /// Area of the root panel
    pub fn root_area(&self) -> Rect2I {
        self.panel.area()
    }

    /// Re-resolve every element's bounds; returns how many changed
    pub fn update_layout(&mut self) -> usize {
        if !self.is_active() {
            return 0;
        }

        let ids = self.elements.ids().to_vec();
        ids.into_iter()
            .filter(|id| self.update_element_layout(*id))
            .count()
    }

    /// Re-resolve one element's bounds; returns whether they changed
    ///
    /// A moved element is mesh-dirty. A resized element is also
    /// content-dirty, since its geometry depends on its size.
    pub fn update_element_layout(&mut self, id: ElementId) -> bool {
        if !self.is_active() {
            return false;
        }

        let area = self.panel.area();
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };

        let old = element.bounds();
        let bounds = element.layout().resolve(area);
        if bounds == old {
            return false;
        }

        element.set_bounds(bounds);
        if bounds.size() != old.size() {
            self.mark_content_dirty(id);
        }
        self.mark_mesh_dirty(id);
        true
    }

    // Camera and render target

    /// Camera the widget renders through
    pub fn camera(&self) -> Option<&Rc<dyn CameraSource>> {
        self.camera.as_ref()
    }

    /// Rebind the widget to another camera (or none)
    pub fn set_camera(&mut self, camera: Option<Rc<dyn CameraSource>>) {
        if self.is_destroyed() {
            return;
        }
        self.camera = camera;
        self.update_rt();
    }

    /// Viewport observed on the last render-target check
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Poll the camera for render-target changes
    ///
    /// A changed viewport area or render target resizes the root panel and
    /// raises [`WidgetEvent::TargetResized`]; a focus change raises
    /// [`WidgetEvent::WindowFocusChanged`]. Returns whether the viewport
    /// changed.
    pub fn update_rt(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }

        let (viewport, focused) = match &self.camera {
            Some(camera) => (camera.viewport(), camera.has_focus()),
            None => (None, false),
        };

        let mut changed = false;
        if viewport != self.viewport {
            self.viewport = viewport;
            let area = viewport.map(|viewport| viewport.area).unwrap_or_default();
            self.panel.set_area(area);
            self.widget_dirty = true;
            self.bounds.invalidate();
            self.events.send(WidgetEvent::TargetResized { widget: self.id, area });

            debug!("Widget {:?} render target now {:?}", self.id, viewport);
            changed = true;
        }

        if focused != self.has_focus {
            self.has_focus = focused;
            self.events.send(WidgetEvent::WindowFocusChanged {
                widget: self.id,
                focused,
            });
        }

        changed
    }

    // Transform

    /// Cross-widget order (lower renders in front)
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Set the cross-widget order
    pub fn set_depth(&mut self, depth: u8) {
        self.depth = depth;
    }

    /// Last applied world transform
    pub fn world_transform(&self) -> &Transform {
        &self.transform
    }

    /// World matrix derived from the transform
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// Pick up the world transform of `source`; returns whether it changed
    ///
    /// The matrix is only recomputed when position, rotation or scale differ
    /// from the last applied transform.
    pub fn update_transform(&mut self, source: &dyn TransformSource) -> bool {
        if !self.is_active() {
            return false;
        }

        let transform = source.world_transform();
        if transform == self.transform {
            return false;
        }

        self.transform = transform;
        self.world_matrix = transform.to_matrix();
        self.bounds.invalidate();
        true
    }

    /// Screen-space bounds of the visible elements
    ///
    /// The union of element bounds mapped through the world matrix. Cached
    /// until an element, the layout or the transform changes.
    pub fn bounds(&mut self) -> Rect2I {
        let Self {
            bounds,
            elements,
            world_matrix,
            ..
        } = self;

        *bounds.get_or_update(|| {
            let local = elements
                .iter()
                .map(|(_, element)| element)
                .filter(|element| element.is_visible())
                .fold(Rect2I::EMPTY, |acc, element| acc.union(&element.bounds()));
            if local.is_empty() {
                return Rect2I::EMPTY;
            }

            let corners = local.corners().map(|corner| transform_point_2d(world_matrix, corner));
            let min = corners.iter().fold(corners[0], |acc, c| acc.inf(c));
            let max = corners.iter().fold(corners[0], |acc, c| acc.sup(c));
            Rect2I::from_corners(min, max)
        })
    }

    /// Whether a screen point lies inside [`GuiWidget::bounds`]
    pub fn in_bounds(&mut self, point: Vec2I) -> bool {
        self.bounds().contains(point)
    }

    /// Whether a float screen point lies inside [`GuiWidget::bounds`]
    pub fn in_bounds_f(&mut self, point: Vec2) -> bool {
        self.in_bounds(Vec2I::new(point.x.floor() as i32, point.y.floor() as i32))
    }

    // Skin, navigation, events

    /// Current skin
    pub fn skin(&self) -> &GuiSkin {
        &self.skin
    }

    /// Replace the skin; every element regenerates its content
    pub fn set_skin(&mut self, skin: GuiSkin) {
        if self.is_destroyed() {
            return;
        }
        self.skin = skin;

        let ids = self.elements.ids().to_vec();
        for id in ids {
            self.mark_content_dirty(id);
        }
        self.widget_dirty = true;
    }

    /// Navigation group holding every focusable element
    pub fn default_nav_group(&self) -> &NavGroup {
        &self.nav_group
    }

    /// Navigation group, mutably
    pub fn default_nav_group_mut(&mut self) -> &mut NavGroup {
        &mut self.nav_group
    }

    /// Event system of this widget
    pub fn events(&self) -> &WidgetEventSystem {
        &self.events
    }

    /// Event system, mutably (to register handlers)
    pub fn events_mut(&mut self) -> &mut WidgetEventSystem {
        &mut self.events
    }

    /// Deliver queued events to their handlers
    pub fn dispatch_events(&mut self) -> usize {
        self.events.dispatch()
    }

    // Batching

    /// Draw groups of this widget
    pub fn draw_groups(&self) -> &DrawGroups {
        &self.draw_groups
    }

    /// Statistics of the last rebuild
    pub fn last_rebuild_stats(&self) -> RebuildStats {
        self.last_stats
    }

    /// Switch group caching on or off
    pub fn set_caching_enabled(&mut self, enabled: bool) {
        if self.is_destroyed() {
            return;
        }
        self.config.enable_caching = enabled;
        self.draw_groups.set_caching_enabled(enabled, &self.elements);
    }

    /// Whether anything needs rebuilding; with `clean_if_dirty`, rebuild it
    ///
    /// Returns the state before cleaning. `is_dirty(false)` never mutates.
    /// Inactive widgets report their state but postpone the rebuild.
    pub fn is_dirty(&mut self, clean_if_dirty: bool) -> bool {
        let dirty = self.widget_dirty || !self.dirty_contents.is_empty() || self.draw_groups.is_dirty();
        if dirty && clean_if_dirty && self.is_active() {
            self.rebuild();
        }
        dirty
    }

    fn rebuild(&mut self) {
        let Ok(mut allocator) = self.allocator.try_borrow_mut() else {
            warn!("Texture allocator busy, postponing rebuild of widget {:?}", self.id);
            return;
        };

        let Self {
            elements,
            draw_groups,
            dirty_contents,
            skin,
            ..
        } = self;

        let mut regrouped = Vec::new();
        let refreshed = dirty_contents.flush(|id, _| {
            let Some(element) = elements.get_mut(id) else {
                return;
            };
            let before = element.render_element_count();
            element.refresh_content(skin);
            if element.render_element_count() == before {
                draw_groups.notify_content_dirty(id);
            } else {
                regrouped.push(id);
            }
        });

        // Pieces are indexed by render element, so a changed count re-inserts
        for id in regrouped {
            if let Some(element) = elements.get(id) {
                draw_groups.add(id, element);
            }
        }

        let stats = draw_groups.rebuild_dirty(elements, &mut *allocator);
        for element in elements.values_mut() {
            element.clear_dirty();
        }
        drop(allocator);

        if self.config.log_rebuild_stats {
            debug!(
                "Widget {:?}: {} contents refreshed, {:?}",
                self.id, refreshed, stats
            );
        }
        self.last_stats = stats;
        self.widget_dirty = false;
    }

    /// Submit stale cache passes and the widget's geometry to `backend`
    pub fn render(&mut self, backend: &mut dyn GuiRenderBackend) -> Result<(), RenderError> {
        if !self.is_active() {
            return Ok(());
        }

        self.draw_groups.submit_cache_passes(backend)?;
        if self.draw_groups.segments().is_empty() {
            return Ok(());
        }

        backend.draw_widget(&WidgetDrawData {
            depth: self.depth,
            transform: &self.world_matrix,
            triangles: self.draw_groups.triangle_mesh(),
            lines: self.draw_groups.line_mesh(),
            segments: self.draw_groups.segments(),
        })
    }
}

impl Drop for GuiWidget {
    fn drop(&mut self) {
        self.destroy();
    }
}
