//! GUI Manager
//!
//! Owns every widget, binds widgets to the scene objects hosting them and
//! drives the per-frame update and render of all of them.

use super::widget::GuiWidget;
use crate::config::GuiConfig;
use crate::foundation::collections::{SlotMap, WidgetId};
use crate::render::{BudgetTextureAllocator, CameraSource, GuiRenderBackend, RenderError, SharedTextureAllocator};
use crate::scene::{SceneObject, SceneObjectHandle, TransformSource};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Widget storage
#[derive(Debug)]
struct ManagedWidget {
    widget: GuiWidget,
    owner: Option<Weak<RefCell<SceneObject>>>,
    creation_seq: u64,
}

/// What one call to [`GuiManager::update`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuiFrameStats {
    /// Widgets that went through the update cycle
    pub widgets_updated: usize,
    /// Widgets that had something to rebuild
    pub widgets_rebuilt: usize,
    /// Widgets destroyed because their scene object went away
    pub widgets_destroyed: usize,
    /// Widget events delivered
    pub events_dispatched: usize,
}

/// Central GUI system
#[derive(Debug)]
pub struct GuiManager {
    /// Widgets by ID
    widgets: SlotMap<WidgetId, ManagedWidget>,

    /// Cache texture allocator shared by all widgets
    allocator: SharedTextureAllocator,

    /// Settings handed to new widgets
    config: GuiConfig,

    /// Creation counter, breaks ties between widgets at equal depth
    next_creation_seq: u64,
}

impl GuiManager {
    /// Create a manager whose widgets share `allocator`
    pub fn new(config: GuiConfig, allocator: SharedTextureAllocator) -> Self {
        Self {
            widgets: SlotMap::with_key(),
            allocator,
            config,
            next_creation_seq: 0,
        }
    }

    /// Create a manager backed by a [`BudgetTextureAllocator`] sized from the config
    pub fn with_budget_allocator(config: GuiConfig) -> Self {
        let allocator = BudgetTextureAllocator::new(config.cache_texture_budget).into_shared();
        Self::new(config, allocator)
    }

    /// Settings handed to new widgets
    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Shared cache texture allocator
    pub fn allocator(&self) -> &SharedTextureAllocator {
        &self.allocator
    }

    /// Create a free-standing widget rendering through `camera`
    pub fn create_widget(&mut self, camera: Rc<dyn CameraSource>) -> WidgetId {
        let mut widget = GuiWidget::new(camera, self.allocator.clone(), &self.config);
        let creation_seq = self.next_creation_seq;
        self.next_creation_seq += 1;

        let id = self.widgets.insert_with_key(|id| {
            widget.set_id(id);
            ManagedWidget {
                widget,
                owner: None,
                creation_seq,
            }
        });

        info!("Created widget {:?}", id);
        id
    }

    /// Create a widget hosted on a scene object
    ///
    /// The widget follows the object's transform and activation state and is
    /// destroyed together with it.
    pub fn create_scene_widget(&mut self, object: &SceneObjectHandle, camera: Rc<dyn CameraSource>) -> WidgetId {
        let id = self.create_widget(camera);
        self.attach_to_scene_object(id, object);
        id
    }

    /// Bind an existing widget to a scene object; returns false for unknown widgets
    pub fn attach_to_scene_object(&mut self, id: WidgetId, object: &SceneObjectHandle) -> bool {
        match self.widgets.get_mut(id) {
            Some(managed) => {
                managed.owner = Some(Rc::downgrade(object));
                debug!("Widget {:?} attached to scene object '{}'", id, object.borrow().name());
                true
            }
            None => false,
        }
    }

    /// Destroy a widget, releasing its cache textures
    pub fn destroy_widget(&mut self, id: WidgetId) -> bool {
        match self.widgets.remove(id) {
            Some(mut managed) => {
                managed.widget.destroy();
                true
            }
            None => false,
        }
    }

    /// Get widget reference
    pub fn widget(&self, id: WidgetId) -> Option<&GuiWidget> {
        self.widgets.get(id).map(|managed| &managed.widget)
    }

    /// Get widget mutable reference
    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut GuiWidget> {
        self.widgets.get_mut(id).map(|managed| &mut managed.widget)
    }

    /// Number of live widgets
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Identifiers of all live widgets
    pub fn widget_ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.widgets.keys()
    }

    /// Update GUI state (call once per frame before rendering)
    ///
    /// Follows scene owners, polls render targets, resolves layout, rebuilds
    /// dirty widgets and delivers their events. Widgets whose scene object
    /// was dropped or destroyed are destroyed.
    pub fn update(&mut self) -> GuiFrameStats {
        let mut stats = GuiFrameStats::default();
        let mut orphaned = Vec::new();

        for (id, managed) in &mut self.widgets {
            if let Some(owner) = &managed.owner {
                let Some(handle) = owner.upgrade() else {
                    orphaned.push(id);
                    continue;
                };
                let object = handle.borrow();
                if object.is_destroyed() {
                    orphaned.push(id);
                    continue;
                }
                managed.widget.set_is_active(TransformSource::is_active(&*object));
                managed.widget.update_transform(&*object);
            }

            let widget = &mut managed.widget;
            if widget.is_destroyed() {
                orphaned.push(id);
                continue;
            }

            widget.update_rt();
            widget.update_layout();
            if widget.is_active() && widget.is_dirty(true) {
                stats.widgets_rebuilt += 1;
            }
            stats.events_dispatched += widget.dispatch_events();
            stats.widgets_updated += 1;
        }

        for id in orphaned {
            if self.destroy_widget(id) {
                stats.widgets_destroyed += 1;
            }
        }

        stats
    }

    /// Render every active widget, back to front
    ///
    /// Widgets are ordered by depth (higher first), equal depths in creation
    /// order. Returns how many widgets were submitted.
    pub fn render(&mut self, backend: &mut dyn GuiRenderBackend) -> Result<usize, RenderError> {
        let mut order: Vec<&mut ManagedWidget> = self
            .widgets
            .values_mut()
            .filter(|managed| managed.widget.is_active())
            .collect();
        order.sort_by(|a, b| {
            b.widget
                .depth()
                .cmp(&a.widget.depth())
                .then(a.creation_seq.cmp(&b.creation_seq))
        });

        backend.begin_gui_pass()?;
        let count = order.len();
        let result = order
            .into_iter()
            .try_for_each(|managed| managed.widget.render(backend));
        let end = backend.end_gui_pass();

        result.and(end).map(|()| count)
    }
}
