/// Perspective camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::error::{Error, Result};

/// A point after projection: pixel coordinates plus view depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Normalized depth in `[-1, 1]`, smaller is closer.
    pub depth: f32,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Recompute the aspect ratio for a new viewport
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        self.aspect = width as f32 / height as f32;
        Ok(())
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov.to_radians(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space through a precomputed
    /// view-projection matrix. Points behind the near plane yield `None`;
    /// points outside the viewport are still returned so triangles can be
    /// clipped by the rasterizer's bounding box.
    pub fn project(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let clip: Vector4<f32> = view_projection * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;
        if depth < -1.0 || depth > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc_y) * 0.5 * height as f32,
            depth,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(75.0, 800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(75.0, 800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn resize_sets_exact_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(1920, 1080).unwrap();
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
        assert!(camera.set_viewport(0, 10).is_err());
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::default().at(0.0, 3.0, 6.0);
        let point = Camera::project(&camera.view_projection(), &Point3::origin(), 80, 40).unwrap();
        assert!((point.x - 40.0).abs() < 1e-3);
        assert!((point.y - 20.0).abs() < 1e-3);
    }

    #[test]
    fn points_behind_camera_are_rejected() {
        let camera = Camera::default();
        assert!(Camera::project(&camera.view_projection(), &Point3::new(0.0, 0.0, 10.0), 80, 40).is_none());
    }
}
