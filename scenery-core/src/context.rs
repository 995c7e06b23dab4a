/// Mutable state of one running scene
use log::debug;

use crate::error::Result;
use crate::orbit::OrbitControls;
use crate::pointer::PointerFollow;
use crate::projection::Camera;
use crate::scene::Scene;

/// Size of the render surface in pixels (or terminal cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Everything the update loop and the control bindings mutate
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub scene: Scene,
    pub camera: Camera,
    pub orbit: Option<OrbitControls>,
    pub pointer: Option<PointerFollow>,
    pub viewport: Viewport,
}

impl SceneContext {
    pub fn new(scene: Scene, mut camera: Camera, width: u32, height: u32) -> Self {
        let viewport = Viewport {
            width: width.max(1),
            height: height.max(1),
        };
        camera.aspect = viewport.width as f32 / viewport.height as f32;
        Self {
            scene,
            camera,
            orbit: None,
            pointer: None,
            viewport,
        }
    }

    pub fn with_orbit(mut self, orbit: OrbitControls) -> Self {
        self.orbit = Some(orbit);
        self
    }

    /// Resize the viewport and keep the camera aspect in step.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.camera.set_viewport(width, height)?;
        self.viewport = Viewport { width, height };
        debug!("viewport resized to {width}x{height}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_viewport_and_aspect_together() {
        let mut ctx = SceneContext::new(Scene::new(0), Camera::default(), 80, 24);
        ctx.resize(120, 40).unwrap();
        assert_eq!(ctx.viewport, Viewport { width: 120, height: 40 });
        assert_eq!(ctx.camera.aspect, 3.0);
        assert!(ctx.resize(0, 40).is_err());
        assert_eq!(ctx.viewport.width, 120);
    }
}
