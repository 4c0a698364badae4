//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the widget transform type.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Integer 2D vector (pixel coordinates)
pub type Vec2I = Vector2<i32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type, used for RGBA colors
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Position, rotation and scale of a widget or scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from all three components
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Convert to a transformation matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Transform a 2D point (z = 0) by a matrix and drop the z component
pub fn transform_point_2d(matrix: &Mat4, point: Vec2) -> Vec2 {
    let p = matrix.transform_point(&Point3::new(point.x, point.y, 0.0));
    Vec2::new(p.x, p.y)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_translation_then_scale() {
        let transform = Transform::new(
            Vec3::new(10.0, 20.0, 0.0),
            Quat::identity(),
            Vec3::new(2.0, 2.0, 1.0),
        );
        let p = transform_point_2d(&transform.to_matrix(), Vec2::new(1.0, 1.0));
        assert_relative_eq!(p, Vec2::new(12.0, 22.0));
    }

    #[test]
    fn test_rotation_about_z() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), constants::HALF_PI);
        let transform = Transform::new(Vec3::zeros(), rotation, Vec3::new(1.0, 1.0, 1.0));
        let p = transform_point_2d(&transform.to_matrix(), Vec2::new(1.0, 0.0));
        assert_relative_eq!(p, Vec2::new(0.0, 1.0), epsilon = 1e-6);
    }
}
