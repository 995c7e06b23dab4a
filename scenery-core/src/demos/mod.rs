/// The tutorial scenes
///
/// Each scene assembles a scene graph, declares its controls with their
/// bindings and lists its animation tracks. Per-frame increments are
/// expressed as rates at [`REFERENCE_HZ`](crate::animation::REFERENCE_HZ).
use log::info;

use crate::animation::Animator;
use crate::context::SceneContext;
use crate::control::ControlPanel;
use crate::error::{Error, Result};

mod basic;
mod geometries;
mod grid_orbit;
mod helpers_orbit;
mod interactions;
mod lighting;
mod materials;
mod orbiting;

/// A runnable scene: state, controls and tracks
#[derive(Debug, Clone)]
pub struct Demo {
    pub name: &'static str,
    pub ctx: SceneContext,
    pub panel: ControlPanel,
    pub animator: Animator,
}

type Builder = fn(u32, u32) -> Result<Demo>;

const CATALOG: &[(&str, &str, Builder)] = &[
    ("basic", "Spinning icosahedron over a slab", basic::build),
    ("geometries", "Sphere, cylinder, cone and torus", geometries::build),
    ("materials", "Five shading models side by side", materials::build),
    ("lighting", "Ambient, directional, point, spot and hemisphere lights", lighting::build),
    ("orbiting", "Circular, elliptical and tilted orbits", orbiting::build),
    ("grid-orbit", "Grid helper with orbit controls", grid_orbit::build),
    ("helpers-orbit", "Orbit control toggles and camera presets", helpers_orbit::build),
    ("user-interactions", "Camera follows the pointer", interactions::build),
];

/// Names of every scene, in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _, _)| *name)
}

/// `(name, title)` pairs for listings.
pub fn catalog() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|(name, title, _)| (*name, *title))
}

/// Build the scene called `name` for a `width` x `height` viewport.
pub fn build(name: &str, width: u32, height: u32) -> Result<Demo> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidViewport { width, height });
    }
    let (_, _, builder) = CATALOG
        .iter()
        .find(|(candidate, _, _)| *candidate == name)
        .ok_or_else(|| Error::UnknownScene(name.to_string()))?;

    let demo = builder(width, height)?;
    info!(
        "assembled `{}`: {} objects, {} lights, {} controls, {} tracks",
        demo.name,
        demo.ctx.scene.objects().count(),
        demo.ctx.scene.lights().count(),
        demo.panel.controls().len(),
        demo.animator.len()
    );
    Ok(demo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ControlEvent, ControlValue};
    use crate::control::ControlKind;

    #[test]
    fn every_scene_builds_and_animates() {
        for name in names() {
            let mut demo = build(name, 80, 24).unwrap();
            assert_eq!(demo.name, name);
            assert_eq!(demo.ctx.camera.aspect, 80.0 / 24.0);
            demo.animator.apply(&mut demo.ctx.scene, 1.5).unwrap();
        }
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert_eq!(build("teapot", 80, 24).unwrap_err(), Error::UnknownScene("teapot".into()));
        assert!(matches!(build("basic", 0, 24), Err(Error::InvalidViewport { .. })));
    }

    #[test]
    fn every_control_accepts_its_initial_value() {
        for name in names() {
            let mut demo = build(name, 80, 24).unwrap();
            let events: Vec<ControlEvent> = demo
                .panel
                .controls()
                .iter()
                .filter(|c| !matches!(c.spec.kind, ControlKind::Button))
                .map(|c| ControlEvent::new(c.spec.id.clone(), c.value()))
                .collect();
            for event in &events {
                demo.panel.handle(event, &mut demo.ctx).unwrap();
            }
        }
    }

    #[test]
    fn control_ids_are_unique_per_scene() {
        for name in names() {
            let demo = build(name, 80, 24).unwrap();
            let mut ids: Vec<&str> = demo.panel.ids().collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "duplicate control in `{name}`");
        }
    }

    #[test]
    fn buttons_click_without_error() {
        for name in ["materials", "helpers-orbit"] {
            let mut demo = build(name, 80, 24).unwrap();
            let buttons: Vec<String> = demo
                .panel
                .controls()
                .iter()
                .filter(|c| matches!(c.spec.kind, ControlKind::Button))
                .map(|c| c.spec.id.clone())
                .collect();
            assert!(!buttons.is_empty());
            for id in buttons {
                demo.panel
                    .handle(&ControlEvent::new(id, ControlValue::Click), &mut demo.ctx)
                    .unwrap();
            }
        }
    }
}
