use std::f32::consts::FRAC_PI_2;

use crate::animation::{Animator, Orbit, Target, Track};
use crate::context::SceneContext;
use crate::control::ControlPanel;
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::Material;
use crate::orbit::OrbitControls;
use crate::projection::Camera;
use crate::scene::{Helper, Object, Scene};

use super::Demo;

const RADIUS: f32 = 5.0;
const TILT: f32 = 1.5;

fn ball(name: &str, radius: f32, segments: u32, color: u32) -> Object {
    Object::new(
        name,
        Shape::Sphere { radius, width_segments: segments, height_segments: segments },
        Material::standard(color, 0.0, 1.0),
    )
}

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x050505);
    scene.add_helper(Helper::grid(100.0, 30, 0xffffff, 0x888888));

    scene.add_light("ambient", Light::ambient(0xffffff, 0.5));
    scene.add_light("main", Light::point(0xffffff, 1.5, 50.0, 2.0).at(0.0, 8.0, 0.0));
    scene.add_light("directional", Light::directional(0xffffff, 2.0).at(15.0, 10.0, 10.0));

    scene.add_object(ball("center", 2.5, 10, 0xffffff));
    let circle = scene.add_object(ball("orbit", 0.8, 32, 0xff8844));
    let ellipse = scene.add_object(ball("ellipse", 1.0, 32, 0x44aaff));
    let tilted = scene.add_object(ball("tilt", 1.0, 32, 0x44aa77));

    let mut animator = Animator::new();
    animator.add(Target::Object(circle), Track::Orbit(Orbit::circle(RADIUS)));
    animator.add(Target::Object(ellipse), Track::Orbit(Orbit::ellipse(RADIUS + 6.0, RADIUS + 3.0)));
    animator.add(
        Target::Object(tilted),
        Track::Orbit(Orbit::ellipse(RADIUS + 15.0, RADIUS + 8.0).tilt(0.0, TILT)),
    );

    let mut camera = Camera::new(60.0, width, height).at(0.0, 3.0, 50.0);
    camera.look_at(nalgebra::Point3::origin());

    let mut orbit = OrbitControls::new();
    orbit.enable_damping = true;
    orbit.damping_factor = 0.08;
    orbit.enable_pan = true;
    orbit.min_distance = 3.0;
    orbit.max_distance = 100.0;
    orbit.max_polar_angle = FRAC_PI_2;

    Ok(Demo {
        name: "orbiting",
        ctx: SceneContext::new(scene, camera, width, height).with_orbit(orbit),
        panel: ControlPanel::new(),
        animator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_orbit_starts_on_the_z_axis() {
        let mut demo = build(80, 24).unwrap();
        demo.animator.apply(&mut demo.ctx.scene, 0.0).unwrap();
        let orbit = demo.ctx.scene.objects().find(|o| o.name == "orbit").unwrap();
        assert_eq!(orbit.transform.position, nalgebra::Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn tilted_orbit_rises_and_falls() {
        let mut demo = build(80, 24).unwrap();
        demo.animator.apply(&mut demo.ctx.scene, std::f64::consts::FRAC_PI_2).unwrap();
        let tilted = demo.ctx.scene.objects().find(|o| o.name == "tilt").unwrap();
        assert!((tilted.transform.position.y - TILT).abs() < 1e-5);
        assert!((tilted.transform.position.x - 20.0).abs() < 1e-4);
    }
}
