//! Scene objects

use super::TransformSource;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::render::{Camera, CameraSource, Viewport};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Shared handle to a scene object
pub type SceneObjectHandle = Rc<RefCell<SceneObject>>;

/// A node in the scene that can host widgets
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    transform: Transform,
    active: bool,
    destroyed: bool,
    camera: Option<Camera>,
}

impl SceneObject {
    /// Create an active object at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            active: true,
            destroyed: false,
            camera: None,
        }
    }

    /// Wrap the object in a shared handle
    pub fn into_handle(self) -> SceneObjectHandle {
        Rc::new(RefCell::new(self))
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Move the object
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Rotate the object
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    /// Scale the object
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
    }

    /// Activate or deactivate
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Mark the object destroyed; widgets hosted on it are destroyed next update
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.active = false;
        self.camera = None;
    }

    /// Whether the object was destroyed
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Attach a camera component
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    /// Camera component
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Camera component, mutably
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }
}

impl TransformSource for SceneObject {
    fn world_transform(&self) -> Transform {
        self.transform
    }

    fn is_active(&self) -> bool {
        self.active && !self.destroyed
    }
}

/// Camera source backed by the camera component of a scene object
///
/// Holds the object weakly; once the object is dropped or destroyed the
/// source reports no viewport.
#[derive(Debug, Clone)]
pub struct SceneCamera {
    object: Weak<RefCell<SceneObject>>,
}

impl SceneCamera {
    /// Observe the camera of `object`
    pub fn new(object: &SceneObjectHandle) -> Self {
        Self {
            object: Rc::downgrade(object),
        }
    }

    /// Wrap as a widget camera source
    pub fn into_source(self) -> Rc<dyn CameraSource> {
        Rc::new(self)
    }
}

impl CameraSource for SceneCamera {
    fn viewport(&self) -> Option<Viewport> {
        let object = self.object.upgrade()?;
        let object = object.borrow();
        if object.is_destroyed() {
            return None;
        }
        object.camera().map(Camera::viewport)
    }

    fn has_focus(&self) -> bool {
        self.object
            .upgrade()
            .and_then(|object| object.borrow().camera().map(Camera::is_focused))
            .unwrap_or(false)
    }
}
