//! # GUI Engine
//!
//! The UI batching layer of a game engine: decides what UI to draw together
//! and when to rebuild it.
//!
//! ## Features
//!
//! - **Draw groups**: elements are partitioned into depth-contiguous batches
//! - **Render caching**: rarely changing elements are baked into textures
//! - **Dirty tracking**: per element, per group and per widget, so a frame
//!   only rebuilds what changed
//! - **Backend agnostic**: geometry reaches the GPU through a small trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gui_engine::prelude::*;
//!
//! struct NullBackend;
//!
//! impl GuiRenderBackend for NullBackend {
//!     fn begin_gui_pass(&mut self) -> BackendResult<()> { Ok(()) }
//!     fn render_cache_pass(&mut self, _pass: &CachePass<'_>) -> BackendResult<()> { Ok(()) }
//!     fn draw_widget(&mut self, _draw: &WidgetDrawData<'_>) -> BackendResult<()> { Ok(()) }
//!     fn end_gui_pass(&mut self) -> BackendResult<()> { Ok(()) }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     gui_engine::foundation::logging::init();
//!
//!     let mut gui = GuiManager::with_budget_allocator(GuiConfig::default());
//!     let camera = Camera::new(Rect2I::new(0, 0, 1280, 720), 0).into_shared();
//!     let hud = gui.create_widget(camera);
//!
//!     if let Some(widget) = gui.widget_mut(hud) {
//!         widget.register_element(
//!             GuiElement::new(PanelContent::new())
//!                 .with_layout(ElementLayout::new(16.0, 16.0, 200.0, 48.0))
//!                 .cacheable(true),
//!         );
//!     }
//!
//!     let mut backend = NullBackend;
//!     gui.update();
//!     gui.render(&mut backend)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod gui;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, GuiConfig},
        foundation::{
            collections::{ElementId, WidgetId},
            math::{Mat4, Transform, Vec2, Vec2I, Vec3, Vec4},
            rect::Rect2I,
        },
        gui::{
            Anchor, ButtonContent, ElementContent, ElementLayout, GlyphAtlas, GuiElement, GuiManager, GuiSkin,
            GuiWidget, LabelContent, PanelContent, WidgetEvent, WidgetEventType,
        },
        render::{
            BackendResult, BudgetTextureAllocator, CachePass, Camera, CameraSource, GuiRenderBackend, MaterialId,
            RenderError, TextureAllocator, WidgetDrawData,
        },
        scene::{SceneCamera, SceneObject, TransformSource},
    };
}
