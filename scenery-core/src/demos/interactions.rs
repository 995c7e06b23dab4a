use crate::animation::{per_frame, Animator, Orbit, Target, Track};
use crate::context::SceneContext;
use crate::control::ControlPanel;
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::Material;
use crate::pointer::PointerFollow;
use crate::projection::Camera;
use crate::scene::{Object, Scene};

use super::Demo;

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x1a1a2e);

    let icosahedron = scene.add_object(
        Object::new(
            "icosahedron",
            Shape::Icosahedron { radius: 1.0, detail: 1 },
            Material::standard(0x00ffff, 0.3, 0.4).with_emissive(0x004444)?,
        )
        .at(0.0, 1.0, 0.0),
    );
    let slab = scene.add_object(
        Object::new(
            "box",
            Shape::Box { width: 3.0, height: 0.15, depth: 3.0 },
            Material::standard(0xff3366, 0.2, 0.8).with_emissive(0x220011)?,
        )
        .at(0.0, -0.8, 0.0),
    );
    let ring = scene.add_object(Object::new(
        "torus",
        Shape::Torus { radius: 3.0, tube: 0.1, radial_segments: 16, tubular_segments: 100 },
        Material::standard(0xffaa00, 0.5, 0.3).with_emissive(0x442200)?,
    ));

    scene.add_light("ambient", Light::ambient(0xffffff, 0.3));
    scene.add_light("spot", Light::spot(0xffffff, 50.0, 0.0, std::f32::consts::PI / 3.0, 0.0, 2.0).at(10.0, 10.0, 10.0));
    let point = scene.add_light("point", Light::point(0xff00ff, 30.0, 0.0, 2.0).at(-5.0, 5.0, 5.0));

    let mut animator = Animator::new();
    animator.spin(icosahedron, [per_frame(0.01), per_frame(0.01), 0.0]);
    animator.spin(slab, [0.0, per_frame(0.005), 0.0]);
    animator.spin(ring, [per_frame(0.005), per_frame(0.01), per_frame(0.005)]);
    animator.add(Target::Light(point), Track::Orbit(Orbit::circle(5.0)));

    let mut camera = Camera::new(75.0, width, height).at(0.0, 5.0, 8.0);
    camera.look_at(nalgebra::Point3::origin());

    let mut ctx = SceneContext::new(scene, camera, width, height);
    ctx.pointer = Some(PointerFollow::new(&ctx.camera, 2.0, 1.0, 0.05));

    Ok(Demo {
        name: "user-interactions",
        ctx,
        panel: ControlPanel::new(),
        animator,
    })
}
