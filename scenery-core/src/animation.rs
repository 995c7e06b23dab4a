/// Time-driven animation tracks
///
/// Every track is a pure function of elapsed seconds: applying the same
/// reading twice leaves the scene unchanged, and frames can be sampled in
/// any order.
use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::scene::{LightId, ObjectId, Scene};

/// Reference display rate the per-frame increments of the scenes were tuned for
pub const REFERENCE_HZ: f32 = 60.0;

/// Convert a per-frame increment at [`REFERENCE_HZ`] into radians per second.
pub fn per_frame(increment: f32) -> f32 {
    increment * REFERENCE_HZ
}

/// Rotation angle after `elapsed` seconds at `rate` radians per second.
pub fn spin_angle(elapsed: f64, rate: f32) -> f32 {
    (elapsed * f64::from(rate)) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Circular or elliptical path around the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub radius_x: f32,
    pub radius_z: f32,
    /// Angular speed in radians per second.
    pub speed: f32,
    pub phase: f32,
    /// Vertical oscillation amplitude; zero leaves height untouched.
    pub tilt: f32,
    /// Height the tilt oscillates around.
    pub base_y: f32,
    /// Use cosine for X and sine for Z instead of the default.
    pub cosine_x: bool,
}

impl Orbit {
    pub fn circle(radius: f32) -> Self {
        Self::ellipse(radius, radius)
    }

    pub fn ellipse(radius_x: f32, radius_z: f32) -> Self {
        Self {
            radius_x,
            radius_z,
            speed: 1.0,
            phase: 0.0,
            tilt: 0.0,
            base_y: 0.0,
            cosine_x: false,
        }
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn tilt(mut self, base_y: f32, tilt: f32) -> Self {
        self.base_y = base_y;
        self.tilt = tilt;
        self
    }

    pub fn cosine_x(mut self) -> Self {
        self.cosine_x = true;
        self
    }

    /// Position at `elapsed`; `current_y` is kept when there is no tilt.
    pub fn position_at(&self, elapsed: f64, current_y: f32) -> Point3<f32> {
        let angle = (elapsed * f64::from(self.speed) + f64::from(self.phase)) as f32;
        let (sin, cos) = angle.sin_cos();
        let (x, z) = if self.cosine_x {
            (cos * self.radius_x, sin * self.radius_z)
        } else {
            (sin * self.radius_x, cos * self.radius_z)
        };
        let y = if self.tilt != 0.0 {
            self.base_y + sin * self.tilt
        } else {
            current_y
        };
        Point3::new(x, y, z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Track {
    /// `rotation[axis] = elapsed * rate`
    Spin { axis: Axis, rate: f32 },
    /// `rotation[axis] = sin(elapsed * frequency) * amplitude`
    Wobble { axis: Axis, amplitude: f32, frequency: f32 },
    /// `position = orbit(elapsed)`
    Orbit(Orbit),
    /// `position.y = base_y + sin(elapsed + phase) * amplitude`
    Bob { base_y: f32, amplitude: f32, phase: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Object(ObjectId),
    Light(LightId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub target: Target,
    pub track: Track,
}

/// Ordered set of tracks evaluated each frame
#[derive(Debug, Clone, Default)]
pub struct Animator {
    animations: Vec<Animation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: Target, track: Track) {
        self.animations.push(Animation { target, track });
    }

    /// Spin an object around several axes at once; zero rates are skipped.
    pub fn spin(&mut self, object: ObjectId, rates: [f32; 3]) {
        for (axis, rate) in [Axis::X, Axis::Y, Axis::Z].into_iter().zip(rates) {
            if rate != 0.0 {
                self.add(Target::Object(object), Track::Spin { axis, rate });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.iter()
    }

    /// Write every animated field for the given clock reading.
    pub fn apply(&self, scene: &mut Scene, elapsed: f64) -> Result<()> {
        for animation in &self.animations {
            match animation.target {
                Target::Object(id) => {
                    let transform = &mut scene.object_mut(id)?.transform;
                    match animation.track {
                        Track::Spin { axis, rate } => {
                            *rotation_component(&mut transform.rotation, axis) = spin_angle(elapsed, rate);
                        }
                        Track::Wobble { axis, amplitude, frequency } => {
                            *rotation_component(&mut transform.rotation, axis) =
                                spin_angle(elapsed, frequency).sin() * amplitude;
                        }
                        Track::Orbit(orbit) => {
                            transform.position = orbit.position_at(elapsed, transform.position.y);
                        }
                        Track::Bob { base_y, amplitude, phase } => {
                            transform.position.y = base_y + ((elapsed + f64::from(phase)).sin() as f32) * amplitude;
                        }
                    }
                }
                Target::Light(id) => {
                    let light = scene.light_mut(id)?;
                    match animation.track {
                        Track::Orbit(orbit) => {
                            light.position = orbit.position_at(elapsed, light.position.y);
                        }
                        Track::Bob { base_y, amplitude, phase } => {
                            light.position.y = base_y + ((elapsed + f64::from(phase)).sin() as f32) * amplitude;
                        }
                        Track::Spin { .. } | Track::Wobble { .. } => {
                            return Err(Error::UnsupportedParameter {
                                model: light.kind.name(),
                                parameter: "rotation",
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn rotation_component(rotation: &mut crate::transform::RotationState, axis: Axis) -> &mut f32 {
    match axis {
        Axis::X => &mut rotation.x,
        Axis::Y => &mut rotation.y,
        Axis::Z => &mut rotation.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;
    use crate::light::Light;
    use crate::material::Material;
    use crate::scene::Object;
    use crate::transform::Transform;
    use std::f64::consts::TAU;

    fn scene_with_ball() -> (Scene, ObjectId) {
        let mut scene = Scene::new(0x050505);
        let ball = scene.add_object(Object::new(
            "ball",
            Shape::Sphere { radius: 0.8, width_segments: 8, height_segments: 8 },
            Material::standard(0xff8844, 0.0, 1.0),
        ));
        (scene, ball)
    }

    #[test]
    fn half_rate_over_full_turn_is_pi() {
        let angle = spin_angle(TAU, 0.5);
        assert!((angle - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn orbit_starts_on_positive_z() {
        let position = Orbit::circle(5.0).position_at(0.0, 1.25);
        assert_eq!(position, Point3::new(0.0, 1.25, 5.0));
    }

    #[test]
    fn tilted_orbit_oscillates_around_base() {
        let orbit = Orbit::ellipse(20.0, 13.0).tilt(0.0, 1.5);
        let quarter = orbit.position_at(std::f64::consts::FRAC_PI_2, 9.0);
        assert!((quarter.x - 20.0).abs() < 1e-5);
        assert!((quarter.y - 1.5).abs() < 1e-5);
        assert!(quarter.z.abs() < 1e-5);
    }

    #[test]
    fn applying_same_reading_twice_is_idempotent() {
        let (mut scene, ball) = scene_with_ball();
        let mut animator = Animator::new();
        animator.spin(ball, [0.5, 0.7, 0.0]);
        animator.add(Target::Object(ball), Track::Orbit(Orbit::circle(5.0)));

        animator.apply(&mut scene, 3.2).unwrap();
        let first = scene.object(ball).unwrap().transform;
        animator.apply(&mut scene, 3.2).unwrap();
        assert_eq!(scene.object(ball).unwrap().transform, first);
    }

    #[test]
    fn small_time_steps_give_small_changes() {
        let (mut scene, ball) = scene_with_ball();
        let mut animator = Animator::new();
        animator.add(Target::Object(ball), Track::Orbit(Orbit::ellipse(11.0, 8.0)));
        animator.add(Target::Object(ball), Track::Wobble { axis: Axis::X, amplitude: 0.2, frequency: 0.3 });

        let mut previous: Option<Transform> = None;
        for step in 0..600 {
            let t = f64::from(step) * 0.001 + 10.0;
            animator.apply(&mut scene, t).unwrap();
            let transform = scene.object(ball).unwrap().transform;
            if let Some(prev) = previous {
                assert!((transform.position - prev.position).norm() < 0.02);
                assert!((transform.rotation.x - prev.rotation.x).abs() < 0.001);
            }
            previous = Some(transform);
        }
    }

    #[test]
    fn rotating_a_light_is_rejected() {
        let mut scene = Scene::new(0);
        let light = scene.add_light("bulb", Light::point(0xffffff, 1.0, 0.0, 2.0));
        let mut animator = Animator::new();
        animator.add(Target::Light(light), Track::Spin { axis: Axis::Y, rate: 1.0 });
        assert!(animator.apply(&mut scene, 1.0).is_err());
    }
}
