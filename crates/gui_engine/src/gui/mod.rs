//! GUI system
//!
//! Widgets own elements; elements produce render elements; draw groups batch
//! render elements into as few draws as possible and cache what rarely
//! changes in off-screen textures.
//!
//! ```text
//! GuiManager
//!   └─ GuiWidget (camera, transform, root panel)
//!        ├─ ElementRegistry ─ GuiElement ─ ElementContent ─ RenderElement*
//!        └─ DrawGroups ─ DrawGroup* ─ shared triangle / line meshes
//! ```

pub mod bounds;
pub mod content;
pub mod dirty;
pub mod draw_groups;
pub mod element;
pub mod events;
pub mod layout;
pub mod manager;
pub mod mesh_builder;
pub mod nav_group;
pub mod registry;
pub mod skin;
pub mod widget;

#[cfg(test)]
pub(crate) mod tests;

pub use content::{ButtonContent, ButtonState, GlyphAtlas, LabelContent, PanelContent};
pub use dirty::{DirtyContents, DirtyFlags};
pub use draw_groups::{DrawGroup, DrawGroups, GroupElement, RebuildStats};
pub use element::{ContentContext, ElementContent, GuiElement, RenderElement};
pub use events::{WidgetEvent, WidgetEventHandler, WidgetEventSystem, WidgetEventType};
pub use layout::{Anchor, ElementLayout, HorizontalAlign, RootPanel, VerticalAlign};
pub use manager::{GuiFrameStats, GuiManager};
pub use nav_group::NavGroup;
pub use registry::ElementRegistry;
pub use skin::{ElementStyle, GuiSkin};
pub use widget::{GuiWidget, WidgetState};
