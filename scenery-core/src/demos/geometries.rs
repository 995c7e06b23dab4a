use crate::animation::Animator;
use crate::context::SceneContext;
use crate::control::ControlPanel;
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::Material;
use crate::projection::Camera;
use crate::scene::{Helper, Object, Scene};

use super::Demo;

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x1a1a1a);

    scene.add_light("ambient", Light::ambient(0xffffff, 0.4));
    scene.add_light("directional", Light::directional(0xffffff, 0.8).at(5.0, 10.0, 5.0));
    scene.add_light("point", Light::point(0x00ffff, 0.5, 0.0, 2.0).at(-5.0, 5.0, 5.0));

    // (shape, color, metalness, roughness, x, spin rates)
    let lineup = [
        (
            Shape::Sphere { radius: 1.0, width_segments: 32, height_segments: 32 },
            0xff6b6b,
            0.3,
            0.4,
            -4.5,
            [0.5, 0.7],
        ),
        (
            Shape::Cylinder { radius_top: 1.0, radius_bottom: 1.0, height: 2.0, radial_segments: 32 },
            0x4ecdc4,
            0.5,
            0.3,
            -1.5,
            [0.3, 0.5],
        ),
        (
            Shape::Cone { radius: 1.0, height: 2.0, radial_segments: 32 },
            0xffe66d,
            0.2,
            0.6,
            1.5,
            [0.4, 0.6],
        ),
        (
            Shape::Torus { radius: 1.0, tube: 0.4, radial_segments: 16, tubular_segments: 100 },
            0xa8e6cf,
            0.6,
            0.2,
            4.5,
            [0.6, 0.4],
        ),
    ];

    let mut animator = Animator::new();
    for (shape, color, metalness, roughness, x, [rx, ry]) in lineup {
        let id = scene.add_object(Object::new(shape.name(), shape, Material::standard(color, metalness, roughness)).at(x, 0.0, 0.0));
        animator.spin(id, [rx, ry, 0.0]);
    }

    scene.add_helper(Helper::grid(20.0, 20, 0x444444, 0x222222).at(0.0, -3.0, 0.0));

    Ok(Demo {
        name: "geometries",
        ctx: SceneContext::new(scene, Camera::new(75.0, width, height).at(0.0, 3.0, 12.0), width, height),
        panel: ControlPanel::new(),
        animator,
    })
}
