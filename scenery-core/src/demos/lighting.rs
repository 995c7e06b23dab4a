use std::f32::consts::{FRAC_PI_2, PI};

use crate::animation::{Animator, Axis, Orbit, Target, Track};
use crate::context::SceneContext;
use crate::control::{Action, ControlPanel, ControlSpec};
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::Material;
use crate::projection::Camera;
use crate::scene::{Helper, LightId, Object, Scene};
use crate::transform::Transform;

use super::Demo;

/// Intensity slider and visibility toggle for one light.
fn bind_light(panel: &mut ControlPanel, prefix: &str, label: &str, light: LightId, intensity: f32, visible: bool) {
    panel.bind(
        ControlSpec::checkbox(&format!("{prefix}Toggle"), label, visible),
        Action::LightVisible(light),
    );
    panel.bind(
        ControlSpec::slider(&format!("{prefix}Slider"), &format!("{label} intensity"), 0.0, 2.0, 0.1, intensity)
            .display_as(&format!("{prefix}Intensity")),
        Action::LightIntensity(light),
    );
}

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x0a0a0a);
    let mut animator = Animator::new();

    scene.add_object(
        Object::new("ground", Shape::Plane { width: 50.0, height: 50.0 }, Material::standard(0x333333, 0.2, 0.8))
            .with_transform(Transform::at(0.0, -2.0, 0.0).with_rotation(-FRAC_PI_2, 0.0, 0.0)),
    );
    let sphere = scene.add_object(Object::new(
        "sphere",
        Shape::Sphere { radius: 2.0, width_segments: 64, height_segments: 64 },
        Material::standard(0xffffff, 0.7, 0.3),
    ));
    animator.add(Target::Object(sphere), Track::Spin { axis: Axis::Y, rate: 0.3 });

    let cube = Shape::Box { width: 1.5, height: 1.5, depth: 1.5 };
    for (index, (x, z)) in [(-6.0, 0.0), (6.0, 0.0), (0.0, 6.0)].into_iter().enumerate() {
        let id = scene.add_object(
            Object::new(format!("cube{index}"), cube, Material::standard(0x4ecdc4, 0.3, 0.5)).at(x, -0.5, z),
        );
        animator.add(
            Target::Object(id),
            Track::Bob {
                base_y: -0.5,
                amplitude: 0.3,
                phase: index as f32,
            },
        );
        animator.add(Target::Object(id), Track::Spin { axis: Axis::Y, rate: 0.5 });
    }

    let torus = scene.add_object(
        Object::new(
            "torus",
            Shape::Torus { radius: 1.5, tube: 0.5, radial_segments: 16, tubular_segments: 100 },
            Material::standard(0xff6b6b, 0.6, 0.4),
        )
        .at(0.0, 5.0, 0.0),
    );
    animator.spin(torus, [0.5, 0.05, 0.0]);

    let ambient = scene.add_light("ambient", Light::ambient(0xffffff, 0.3));
    let directional = scene.add_light("directional", Light::directional(0xffffff, 1.0).at(5.0, 10.0, 5.0));
    let point = scene.add_light("point", Light::point(0xff00ff, 1.0, 50.0, 2.0).at(-8.0, 3.0, 0.0));
    let spot = scene.add_light(
        "spot",
        Light::spot(0x00ffff, 1.0, 30.0, PI / 10.0, 0.5, 2.0).at(-6.0, 10.0, 0.0),
    );
    let hemisphere = scene.add_light("hemisphere", Light::hemisphere(0x0066ff, 0xff6600, 0.5).at(0.0, 10.0, 0.0));
    animator.add(Target::Light(point), Track::Orbit(Orbit::circle(8.0).speed(0.5).cosine_x()));

    scene.add_helper(Helper::light(directional, 2.0));
    scene.add_helper(Helper::light(point, 0.5));
    scene.add_helper(Helper::light(spot, 1.0));
    let hemisphere_helper = scene.add_helper(Helper::light(hemisphere, 2.0));

    // Hemisphere starts switched off.
    scene.light_mut(hemisphere)?.visible = false;
    scene.helper_mut(hemisphere_helper)?.visible = false;

    let mut panel = ControlPanel::new();
    bind_light(&mut panel, "ambient", "Ambient", ambient, 0.3, true);
    bind_light(&mut panel, "directional", "Directional", directional, 1.0, true);
    bind_light(&mut panel, "point", "Point", point, 1.0, true);
    bind_light(&mut panel, "spot", "Spot", spot, 1.0, true);
    panel.bind(
        ControlSpec::slider("spotAngleSlider", "Spot angle", 0.1, 1.0, 0.01, PI / 10.0)
            .decimals(2)
            .display_as("spotAngle"),
        Action::SpotAngle(spot),
    );
    bind_light(&mut panel, "hemisphere", "Hemisphere", hemisphere, 0.5, false);
    panel.bind(
        ControlSpec::checkbox("helpersToggle", "Light helpers", true),
        Action::LightHelpersVisible,
    );

    let mut camera = Camera::new(75.0, width, height).at(0.0, 8.0, 20.0);
    camera.look_at(nalgebra::Point3::origin());

    Ok(Demo {
        name: "lighting",
        ctx: SceneContext::new(scene, camera, width, height),
        panel,
        animator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ControlEvent, ControlValue};

    fn light<'a>(demo: &'a Demo, name: &str) -> &'a Light {
        demo.ctx.scene.lights().find(|(n, _)| *n == name).unwrap().1
    }

    #[test]
    fn spot_angle_display_uses_two_decimals() {
        let mut demo = build(80, 24).unwrap();
        assert_eq!(demo.panel.get("spotAngleSlider").unwrap().display(), Some("0.31"));
        demo.panel
            .handle(&ControlEvent::new("spotAngleSlider", ControlValue::Number(0.5)), &mut demo.ctx)
            .unwrap();
        assert_eq!(light(&demo, "spot").spot_angle(), Some(0.5));
        assert_eq!(demo.panel.get("spotAngleSlider").unwrap().display(), Some("0.50"));
    }

    #[test]
    fn readouts_go_to_the_page_display_elements() {
        let demo = build(80, 24).unwrap();
        let displays: Vec<String> = demo
            .panel
            .controls()
            .iter()
            .filter(|c| c.display().is_some())
            .map(|c| c.spec.display_element())
            .collect();
        assert_eq!(
            displays,
            [
                "ambientIntensity",
                "directionalIntensity",
                "pointIntensity",
                "spotIntensity",
                "spotAngle",
                "hemisphereIntensity"
            ]
        );
    }

    #[test]
    fn helpers_toggle_keeps_hidden_lights_helpers_hidden() {
        let mut demo = build(80, 24).unwrap();
        demo.panel
            .handle(&ControlEvent::new("helpersToggle", ControlValue::Checked(false)), &mut demo.ctx)
            .unwrap();
        assert!(demo.ctx.scene.helpers().all(|h| !h.visible));

        demo.panel
            .handle(&ControlEvent::new("helpersToggle", ControlValue::Checked(true)), &mut demo.ctx)
            .unwrap();
        assert_eq!(demo.ctx.scene.helpers().filter(|h| h.visible).count(), 3);
    }

    #[test]
    fn slider_changes_only_its_light() {
        let mut demo = build(80, 24).unwrap();
        let before: Vec<f32> = demo.ctx.scene.lights().map(|(_, l)| l.intensity).collect();
        demo.panel
            .handle(&ControlEvent::new("pointSlider", ControlValue::Number(1.7)), &mut demo.ctx)
            .unwrap();
        let after: Vec<f32> = demo.ctx.scene.lights().map(|(_, l)| l.intensity).collect();

        assert_eq!(after[2], 1.7);
        for (i, (a, b)) in before.iter().zip(&after).enumerate() {
            if i != 2 {
                assert_eq!(a, b);
            }
        }
        assert_eq!(demo.panel.get("pointSlider").unwrap().display(), Some("1.7"));
    }

    #[test]
    fn cubes_bob_with_staggered_phase() {
        let mut demo = build(80, 24).unwrap();
        demo.animator.apply(&mut demo.ctx.scene, 0.0).unwrap();
        let heights: Vec<f32> = demo
            .ctx
            .scene
            .objects()
            .filter(|o| o.name.starts_with("cube"))
            .map(|o| o.transform.position.y)
            .collect();
        assert!((heights[0] + 0.5).abs() < 1e-6);
        assert!((heights[1] - (-0.5 + 1f32.sin() * 0.3)).abs() < 1e-5);
    }
}
