/// Camera drift toward the pointer
///
/// The camera eases toward a goal derived from the latest pointer position.
/// The eased position depends only on the pointer event and the time since
/// it arrived, so re-evaluating a frame gives the same camera.
use nalgebra::{Point3, Vector2};

use crate::animation::REFERENCE_HZ;
use crate::projection::Camera;

#[derive(Debug, Clone, PartialEq)]
pub struct PointerFollow {
    /// Pointer-to-world scale on both axes.
    pub reach: f32,
    /// Height added to the goal.
    pub lift: f32,
    /// Exponential approach rate per second.
    pub rate: f32,
    pub look_at: Point3<f32>,
    start: Vector2<f32>,
    goal: Vector2<f32>,
    since: f64,
}

impl PointerFollow {
    /// `per_frame_gain` is the fraction of the gap closed each frame at the
    /// reference display rate.
    pub fn new(camera: &Camera, reach: f32, lift: f32, per_frame_gain: f32) -> Self {
        let start = Vector2::new(camera.position.x, camera.position.y);
        Self {
            reach,
            lift,
            rate: -(1.0 - per_frame_gain).ln() * REFERENCE_HZ,
            look_at: Point3::origin(),
            start,
            goal: Vector2::new(0.0, lift),
            since: 0.0,
        }
    }

    /// Record a pointer move at `elapsed`, easing from where the camera is.
    pub fn pointer_moved(&mut self, camera: &Camera, x: f32, y: f32, elapsed: f64) {
        self.start = Vector2::new(camera.position.x, camera.position.y);
        self.goal = Vector2::new(x * self.reach, y * self.reach + self.lift);
        self.since = elapsed;
    }

    pub fn apply(&self, camera: &mut Camera, elapsed: f64) {
        let age = (elapsed - self.since).max(0.0) as f32;
        let remaining = (-self.rate * age).exp();
        let xy = self.goal + (self.start - self.goal) * remaining;
        camera.position.x = xy.x;
        camera.position.y = xy.y;
        camera.look_at(self.look_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_converges_on_pointer_goal() {
        let mut camera = Camera::default().at(0.0, 5.0, 8.0);
        let mut follow = PointerFollow::new(&camera, 2.0, 1.0, 0.05);
        follow.pointer_moved(&camera, 0.5, -0.5, 1.0);

        follow.apply(&mut camera, 1.0);
        assert!((camera.position.y - 5.0).abs() < 1e-5);

        follow.apply(&mut camera, 30.0);
        assert!((camera.position.x - 1.0).abs() < 1e-3);
        assert!((camera.position.y - 0.0).abs() < 1e-3);
        assert_eq!(camera.position.z, 8.0);
    }

    #[test]
    fn one_reference_frame_closes_the_gain() {
        let mut camera = Camera::default().at(0.0, 0.0, 8.0);
        let mut follow = PointerFollow::new(&camera, 2.0, 0.0, 0.05);
        follow.pointer_moved(&camera, 1.0, 0.0, 0.0);
        follow.apply(&mut camera, 1.0 / 60.0);
        assert!((camera.position.x - 0.1).abs() < 1e-4);
    }
}
