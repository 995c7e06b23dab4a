use std::f32::consts::PI;

use crate::animation::{Animator, Axis, Orbit, Target, Track};
use crate::color::Color;
use crate::context::SceneContext;
use crate::control::{Action, ControlPanel, ControlSpec};
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::{Material, ShadingModel};
use crate::projection::Camera;
use crate::scene::{Helper, Object, Scene};

use super::Demo;

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x1a1a2e);

    scene.add_light("ambient", Light::ambient(0xffffff, 0.3));
    scene.add_light("directional", Light::directional(0xffffff, 1.0).at(5.0, 5.0, 5.0));
    let magenta = scene.add_light("point", Light::point(0xff00ff, 1.0, 0.0, 2.0).at(-5.0, 3.0, 5.0));
    let cyan = scene.add_light("point2", Light::point(0x00ffff, 0.8, 0.0, 2.0).at(5.0, -3.0, 5.0));

    let sphere = Shape::Sphere { radius: 1.5, width_segments: 64, height_segments: 64 };
    let lineup = [
        ("basic", "Basic", Material::basic(0xff6b6b)),
        ("lambert", "Lambert", Material::lambert(0x4ecdc4)),
        (
            "phong",
            "Phong",
            Material::new(
                0xffe66d,
                ShadingModel::Phong {
                    shininess: 100.0,
                    specular: Color::WHITE,
                },
            ),
        ),
        ("standard", "Standard", Material::standard(0xa8e6cf, 0.5, 0.5)),
        (
            "physical",
            "Physical",
            Material::new(
                0xffa8e8,
                ShadingModel::Physical {
                    metalness: 0.8,
                    roughness: 0.2,
                    clearcoat: 1.0,
                    clearcoat_roughness: 0.1,
                    reflectivity: 1.0,
                },
            ),
        ),
    ];

    let mut animator = Animator::new();
    let mut spheres = Vec::with_capacity(lineup.len());
    for (i, (name, label, material)) in lineup.into_iter().enumerate() {
        let x = -8.0 + 4.0 * i as f32;
        let id = scene.add_object(Object::new(name, sphere, material).at(x, 2.0, 0.0));
        scene.add_helper(Helper::label(label, 4.0, 1.0).at(x, 0.0, 0.0));
        animator.add(Target::Object(id), Track::Spin { axis: Axis::Y, rate: 0.5 });
        animator.add(
            Target::Object(id),
            Track::Wobble {
                axis: Axis::X,
                amplitude: 0.2,
                frequency: 0.3,
            },
        );
        spheres.push(id);
    }
    animator.add(Target::Light(magenta), Track::Orbit(Orbit::circle(8.0)));
    animator.add(Target::Light(cyan), Track::Orbit(Orbit::circle(8.0).phase(PI)));

    let (lambert, phong, standard, physical) = (spheres[1], spheres[2], spheres[3], spheres[4]);
    let mut panel = ControlPanel::new();
    panel.bind(
        ControlSpec::slider("metalness", "Metalness", 0.0, 1.0, 0.1, 0.5),
        Action::Metalness(vec![standard, physical]),
    );
    panel.bind(
        ControlSpec::slider("roughness", "Roughness", 0.0, 1.0, 0.1, 0.5),
        Action::Roughness(vec![standard, physical]),
    );
    panel.bind(
        ControlSpec::slider("opacity", "Opacity", 0.0, 1.0, 0.1, 1.0),
        Action::Opacity(spheres.clone()),
    );
    panel.bind(
        ControlSpec::button("toggleWireframe", "Toggle wireframe"),
        Action::ToggleWireframe(spheres),
    );
    panel.bind(
        ControlSpec::button("toggleEmissive", "Toggle emissive"),
        Action::ToggleEmissive(vec![
            (lambert, Color::from_hex(0x002222)),
            (phong, Color::from_hex(0x222200)),
            (standard, Color::from_hex(0x002200)),
            (physical, Color::from_hex(0x220022)),
        ]),
    );

    Ok(Demo {
        name: "materials",
        ctx: SceneContext::new(scene, Camera::new(75.0, width, height).at(0.0, 0.0, 15.0), width, height),
        panel,
        animator,
    })
}
