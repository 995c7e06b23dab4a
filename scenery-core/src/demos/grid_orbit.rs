use std::f32::consts::FRAC_PI_2;

use crate::animation::{per_frame, Animator};
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

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x222222);
    scene.add_helper(Helper::grid(10.0, 20, 0x444444, 0x888888));

    let icosahedron = scene.add_object(
        Object::new(
            "icosahedron",
            Shape::Icosahedron { radius: 1.0, detail: 1 },
            Material::standard(0x00ff00, 0.0, 1.0).with_emissive(0x00aa00)?,
        )
        .at(0.0, 1.2, 0.0),
    );
    let slab = scene.add_object(Object::new(
        "box",
        Shape::Box { width: 2.5, height: 0.1, depth: 2.5 },
        Material::standard(0xff0000, 0.0, 1.0).with_emissive(0xaa0000)?,
    ));

    scene.add_light("ambient", Light::ambient(0xffffff, 0.3));
    scene.add_light("directional", Light::directional(0xffff00, 100.0).at(15.0, 15.0, 10.0));

    let mut animator = Animator::new();
    animator.spin(icosahedron, [per_frame(0.01), per_frame(0.01), 0.0]);
    animator.spin(slab, [0.0, per_frame(0.005), 0.0]);

    let mut orbit = OrbitControls::new();
    orbit.enable_damping = true;
    orbit.damping_factor = 0.08;
    orbit.enable_pan = true;
    orbit.min_distance = 3.0;
    orbit.max_distance = 20.0;
    orbit.max_polar_angle = FRAC_PI_2;

    Ok(Demo {
        name: "grid-orbit",
        ctx: SceneContext::new(scene, Camera::new(75.0, width, height).at(0.0, 3.0, 6.0), width, height)
            .with_orbit(orbit),
        panel: ControlPanel::new(),
        animator,
    })
}
