//! Scene hosting for GUI widgets
//!
//! Widgets can live on scene objects. The object supplies the widget's world
//! transform and activation state, and may carry the camera the widget
//! renders through.
//!
//! ```text
//! SceneObject (transform, active, camera)
//!      ↓ weak
//! GuiManager ── per frame ──> GuiWidget
//! ```

mod scene_object;

pub use scene_object::{SceneCamera, SceneObject, SceneObjectHandle};

use crate::foundation::math::Transform;

/// Source of a widget's world transform
pub trait TransformSource {
    /// Current world transform
    fn world_transform(&self) -> Transform;

    /// Whether the source is active in the scene
    fn is_active(&self) -> bool {
        true
    }
}

impl TransformSource for Transform {
    fn world_transform(&self) -> Transform {
        *self
    }
}
