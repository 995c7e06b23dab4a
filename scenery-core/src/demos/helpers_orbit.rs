use nalgebra::Point3;
use std::f32::consts::FRAC_PI_2;

use crate::animation::{per_frame, Animator};
use crate::context::SceneContext;
use crate::control::{Action, ControlPanel, ControlSpec};
use crate::error::Result;
use crate::geometry::Shape;
use crate::light::Light;
use crate::material::Material;
use crate::orbit::{OrbitControls, OrbitFlag};
use crate::projection::Camera;
use crate::scene::{Helper, Object, Scene};

use super::Demo;

pub(super) fn build(width: u32, height: u32) -> Result<Demo> {
    let mut scene = Scene::new(0x222222);
    let grid = scene.add_helper(Helper::grid(20.0, 20, 0x444444, 0x888888));
    let axes = scene.add_helper(Helper::axes(5.0));

    let icosahedron = scene.add_object(
        Object::new(
            "icosahedron",
            Shape::Icosahedron { radius: 1.0, detail: 1 },
            Material::standard(0x00ff00, 0.5, 0.3).with_emissive(0x00aa00)?,
        )
        .at(0.0, 1.2, 0.0),
    );
    let slab = scene.add_object(Object::new(
        "box",
        Shape::Box { width: 2.5, height: 0.1, depth: 2.5 },
        Material::standard(0xff0000, 0.3, 0.7).with_emissive(0xaa0000)?,
    ));
    scene.add_object(
        Object::new(
            "sphere",
            Shape::Sphere { radius: 0.5, width_segments: 32, height_segments: 32 },
            Material::standard(0x4ecdc4, 0.6, 0.2),
        )
        .at(3.0, 0.5, 0.0),
    );
    let torus = scene.add_object(
        Object::new(
            "torus",
            Shape::Torus { radius: 0.6, tube: 0.2, radial_segments: 16, tubular_segments: 100 },
            Material::standard(0xffe66d, 0.4, 0.4),
        )
        .at(-3.0, 1.0, 0.0),
    );

    scene.add_light("ambient", Light::ambient(0xffffff, 0.3));
    scene.add_light("directional", Light::directional(0xffffff, 1.0).at(5.0, 10.0, 5.0));

    let mut animator = Animator::new();
    animator.spin(icosahedron, [per_frame(0.01), per_frame(0.01), 0.0]);
    animator.spin(slab, [0.0, per_frame(0.005), 0.0]);
    animator.spin(torus, [per_frame(0.01), per_frame(0.005), 0.0]);

    let home = Point3::new(0.0, 1.0, 0.0);
    let mut orbit = OrbitControls::new();
    orbit.target = home;
    orbit.enable_damping = true;
    orbit.damping_factor = 0.08;
    orbit.auto_rotate_speed = 2.0;
    orbit.screen_space_panning = false;
    orbit.min_distance = 3.0;
    orbit.max_distance = 20.0;
    orbit.min_polar_angle = 0.0;
    orbit.max_polar_angle = FRAC_PI_2;

    let mut panel = ControlPanel::new();
    for (id, label, flag, checked) in [
        ("dampingToggle", "Damping", OrbitFlag::Damping, true),
        ("autoRotateToggle", "Auto rotate", OrbitFlag::AutoRotate, false),
        ("panToggle", "Pan", OrbitFlag::Pan, true),
        ("zoomToggle", "Zoom", OrbitFlag::Zoom, true),
        ("rotateToggle", "Rotate", OrbitFlag::Rotate, true),
    ] {
        panel.bind(ControlSpec::checkbox(id, label, checked), Action::Orbit(flag));
    }
    for (id, label, position, target) in [
        ("resetCamera", "Reset camera", Point3::new(0.0, 3.0, 6.0), home),
        ("topView", "Top view", Point3::new(0.0, 10.0, 0.1), Point3::origin()),
        ("sideView", "Side view", Point3::new(10.0, 3.0, 0.0), home),
    ] {
        panel.bind(ControlSpec::button(id, label), Action::CameraPreset { position, target });
    }
    panel.bind(ControlSpec::checkbox("gridToggle", "Grid", true), Action::HelperVisible(grid));
    panel.bind(ControlSpec::checkbox("axesToggle", "Axes", true), Action::HelperVisible(axes));

    let mut camera = Camera::new(75.0, width, height).at(0.0, 3.0, 6.0);
    camera.look_at(home);

    Ok(Demo {
        name: "helpers-orbit",
        ctx: SceneContext::new(scene, camera, width, height).with_orbit(orbit),
        panel,
        animator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ControlEvent, ControlValue};

    #[test]
    fn top_view_snaps_camera_and_target() {
        let mut demo = build(80, 24).unwrap();
        demo.panel
            .handle(&ControlEvent::new("topView", ControlValue::Click), &mut demo.ctx)
            .unwrap();
        assert_eq!(demo.ctx.camera.position, Point3::new(0.0, 10.0, 0.1));
        assert_eq!(demo.ctx.camera.target, Point3::origin());
        assert_eq!(demo.ctx.orbit.as_ref().unwrap().target, Point3::origin());
    }

    #[test]
    fn toggles_reach_orbit_flags() {
        let mut demo = build(80, 24).unwrap();
        demo.panel
            .handle(&ControlEvent::new("autoRotateToggle", ControlValue::Checked(true)), &mut demo.ctx)
            .unwrap();
        demo.panel
            .handle(&ControlEvent::new("zoomToggle", ControlValue::Checked(false)), &mut demo.ctx)
            .unwrap();
        let orbit = demo.ctx.orbit.as_ref().unwrap();
        assert!(orbit.auto_rotate);
        assert!(!orbit.enable_zoom);
        assert!(orbit.enable_pan);
    }

    #[test]
    fn grid_toggle_hides_only_the_grid() {
        let mut demo = build(80, 24).unwrap();
        demo.panel
            .handle(&ControlEvent::new("gridToggle", ControlValue::Checked(false)), &mut demo.ctx)
            .unwrap();
        let visible: Vec<bool> = demo.ctx.scene.helpers().map(|h| h.visible).collect();
        assert_eq!(visible, vec![false, true]);
    }
}
