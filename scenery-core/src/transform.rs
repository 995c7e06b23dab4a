/// Object transforms: position, Euler rotation and scale
use nalgebra::{Matrix4, Point3, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotation matrix applying X, then Y, then Z
    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.z));

        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Placement of an object in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3<f32>,
    pub rotation: RotationState,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = RotationState::new(x, y, z);
        self
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position.coords)
            * self.rotation.matrix()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        assert!((rotation.matrix() - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation_applies_after_rotation() {
        let transform = Transform::at(0.0, -2.0, 0.0).with_rotation(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        // A +Y point on a plane rotated flat ends up on -Z, then moved down.
        let moved = transform.matrix().transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert!((moved - Point3::new(0.0, -2.0, -1.0)).norm() < 1e-5);
    }
}
