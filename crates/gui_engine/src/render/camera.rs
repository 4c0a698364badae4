//! # GUI Camera
//!
//! Widgets render into the viewport of a camera. The camera is a collaborator:
//! widgets only ever ask it for the current viewport rectangle, the identity
//! of the render target behind it, and whether its window has focus.

use crate::foundation::math::Mat4;
use crate::foundation::rect::Rect2I;
use std::cell::RefCell;
use std::rc::Rc;

/// Viewport of a camera on a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Area of the target covered by the viewport, in pixels
    pub area: Rect2I,
    /// Identity of the render target (window or texture)
    pub target_id: u64,
}

impl Viewport {
    /// Create a viewport
    pub fn new(area: Rect2I, target_id: u64) -> Self {
        Self { area, target_id }
    }

    /// Orthographic projection mapping viewport pixels to clip space
    ///
    /// Pixel `(x, y)` with y pointing down maps to NDC with y pointing up.
    pub fn projection(&self) -> Mat4 {
        let left = self.area.x as f32;
        let top = self.area.y as f32;
        let right = self.area.right() as f32;
        let bottom = self.area.bottom() as f32;
        Mat4::new_orthographic(left, right, bottom, top, -1.0, 1.0)
    }
}

/// Source of viewport information for a widget
pub trait CameraSource {
    /// Current viewport, or `None` when the camera no longer exists
    fn viewport(&self) -> Option<Viewport>;

    /// Whether the window behind the render target has input focus
    fn has_focus(&self) -> bool {
        true
    }
}

/// Plain camera with a mutable viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    viewport: Viewport,
    focused: bool,
}

/// Camera shared between its owner and the widgets observing it
pub type SharedCamera = Rc<RefCell<Camera>>;

impl Camera {
    /// Create a camera covering `area` of render target `target_id`
    pub fn new(area: Rect2I, target_id: u64) -> Self {
        Self {
            viewport: Viewport::new(area, target_id),
            focused: true,
        }
    }

    /// Wrap the camera for sharing
    pub fn into_shared(self) -> SharedCamera {
        Rc::new(RefCell::new(self))
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize or move the viewport on its target
    pub fn set_area(&mut self, area: Rect2I) {
        self.viewport.area = area;
    }

    /// Point the camera at a different render target
    pub fn set_target(&mut self, target_id: u64, area: Rect2I) {
        self.viewport = Viewport::new(area, target_id);
    }

    /// Whether the target window has focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Set window focus state
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl CameraSource for Camera {
    fn viewport(&self) -> Option<Viewport> {
        Some(self.viewport)
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

impl CameraSource for RefCell<Camera> {
    fn viewport(&self) -> Option<Viewport> {
        Some(self.borrow().viewport)
    }

    fn has_focus(&self) -> bool {
        self.borrow().focused
    }
}
