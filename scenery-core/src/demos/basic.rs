use std::f32::consts::PI;

use crate::animation::{per_frame, Animator};
use crate::context::SceneContext;
use crate::control::ControlPanel;
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::Material;
use crate::projection::Camera;
use crate::scene::{Object, Scene};

use super::Demo;

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x222222);

    let icosahedron = scene.add_object(Object::new(
        "icosahedron",
        Shape::Icosahedron { radius: 1.0, detail: 0 },
        Material::lambert(0x00ff00).with_emissive(0x00aa00)?,
    ));
    let slab = scene.add_object(
        Object::new(
            "box",
            Shape::Box { width: 2.0, height: 0.1, depth: 2.0 },
            Material::standard(0xff0000, 0.0, 1.0).with_emissive(0xaa0000)?,
        )
        .at(0.0, -1.5, 0.0),
    );

    scene.add_light("spot", Light::spot(0xffffff, 100.0, 0.0, PI / 3.0, 0.0, 2.0).at(10.0, 10.0, 10.0));

    let mut animator = Animator::new();
    animator.spin(icosahedron, [per_frame(0.01), per_frame(0.01), 0.0]);
    animator.spin(slab, [0.0, per_frame(0.005), 0.0]);

    Ok(Demo {
        name: "basic",
        ctx: SceneContext::new(scene, Camera::new(75.0, width, height).at(0.0, 0.0, 5.0), width, height),
        panel: ControlPanel::new(),
        animator,
    })
}
