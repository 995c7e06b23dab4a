/// Named UI controls and the entity fields they drive
///
/// Each control owns exactly one binding: a mapping from its change-event
/// value to field assignments on the scene, camera or orbit controls,
/// optionally mirrored into a display text.
use log::debug;
use nalgebra::Point3;

use crate::color::Color;
use crate::command::{ControlEvent, ControlValue};
use crate::context::SceneContext;
use crate::error::{Error, Result};
use crate::material::Material;
use crate::orbit::OrbitFlag;
use crate::scene::{HelperId, LightId, ObjectId, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Checkbox { checked: bool },
    Slider { min: f32, max: f32, step: f32, value: f32 },
    Button,
}

impl ControlKind {
    fn initial_value(&self) -> ControlValue {
        match *self {
            ControlKind::Checkbox { checked } => ControlValue::Checked(checked),
            ControlKind::Slider { value, .. } => ControlValue::Number(value),
            ControlKind::Button => ControlValue::Click,
        }
    }

    fn accepts(&self, value: &ControlValue) -> bool {
        matches!(
            (self, value),
            (ControlKind::Checkbox { .. }, ControlValue::Checked(_))
                | (ControlKind::Slider { .. }, ControlValue::Number(_))
                | (ControlKind::Button, ControlValue::Click)
        )
    }

    fn expected(&self) -> &'static str {
        match self {
            ControlKind::Checkbox { .. } => "checkbox",
            ControlKind::Slider { .. } => "slider",
            ControlKind::Button => "button",
        }
    }
}

/// Field assignment performed when a control changes
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LightIntensity(LightId),
    /// Shows or hides a light together with its helpers.
    LightVisible(LightId),
    SpotAngle(LightId),
    Metalness(Vec<ObjectId>),
    Roughness(Vec<ObjectId>),
    /// Opacity below one also marks the materials transparent.
    Opacity(Vec<ObjectId>),
    ToggleWireframe(Vec<ObjectId>),
    /// Switches between the given glow colors and black.
    ToggleEmissive(Vec<(ObjectId, Color)>),
    HelperVisible(HelperId),
    /// Light helpers follow the checkbox only while their light is visible.
    LightHelpersVisible,
    Orbit(OrbitFlag),
    CameraPreset {
        position: Point3<f32>,
        target: Point3<f32>,
    },
}

/// Run `change` on copies of every target material and write them back
/// only when all of them accepted it.
fn update_materials<F>(scene: &mut Scene, objects: &[ObjectId], mut change: F) -> Result<()>
where
    F: FnMut(&mut Material) -> Result<()>,
{
    let mut staged = Vec::with_capacity(objects.len());
    for id in objects {
        let mut material = scene.object(*id)?.material.clone();
        change(&mut material)?;
        staged.push((*id, material));
    }
    for (id, material) in staged {
        scene.object_mut(id)?.material = material;
    }
    Ok(())
}

/// Fixed-point text with exact ties rounded away from zero, as browsers
/// format slider readouts.
fn fixed(value: f32, decimals: usize) -> String {
    const EXACT_DIGITS: usize = 160;

    let value = f64::from(value);
    if !value.is_finite() {
        return format!("{value:.decimals$}");
    }
    let exact = format!("{:.*}", decimals + EXACT_DIGITS, value.abs());
    let tail = &exact[exact.len() - EXACT_DIGITS..];
    let tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if tie {
        let away = value + value.signum() * 0.5 * 10f64.powi(-(decimals as i32));
        format!("{away:.decimals$}")
    } else {
        format!("{value:.decimals$}")
    }
}

impl Action {
    /// Control kind whose values this action takes.
    pub fn expected_kind(&self) -> &'static str {
        match self {
            Action::LightIntensity(_)
            | Action::SpotAngle(_)
            | Action::Metalness(_)
            | Action::Roughness(_)
            | Action::Opacity(_) => "slider",
            Action::LightVisible(_) | Action::HelperVisible(_) | Action::LightHelpersVisible | Action::Orbit(_) => {
                "checkbox"
            }
            Action::ToggleWireframe(_) | Action::ToggleEmissive(_) | Action::CameraPreset { .. } => "button",
        }
    }

    fn apply(&self, control: &str, value: ControlValue, ctx: &mut SceneContext) -> Result<()> {
        let scene = &mut ctx.scene;
        match (self, value) {
            (Action::LightIntensity(id), ControlValue::Number(v)) => {
                scene.light_mut(*id)?.intensity = v;
            }
            (Action::SpotAngle(id), ControlValue::Number(v)) => {
                scene.light_mut(*id)?.set_spot_angle(v)?;
            }
            (Action::Metalness(objects), ControlValue::Number(v)) => {
                update_materials(scene, objects, |material| material.set_metalness(v))?;
            }
            (Action::Roughness(objects), ControlValue::Number(v)) => {
                update_materials(scene, objects, |material| material.set_roughness(v))?;
            }
            (Action::Opacity(objects), ControlValue::Number(v)) => {
                update_materials(scene, objects, |material| {
                    material.set_opacity(v);
                    Ok(())
                })?;
            }
            (Action::LightVisible(id), ControlValue::Checked(on)) => {
                scene.light_mut(*id)?.visible = on;
                for helper in scene.helpers_of(*id) {
                    scene.helper_mut(helper)?.visible = on;
                }
            }
            (Action::HelperVisible(id), ControlValue::Checked(on)) => {
                scene.helper_mut(*id)?.visible = on;
            }
            (Action::LightHelpersVisible, ControlValue::Checked(on)) => {
                for (helper, light) in scene.light_helpers() {
                    let light_visible = scene.light(light)?.visible;
                    scene.helper_mut(helper)?.visible = on && light_visible;
                }
            }
            (Action::Orbit(flag), ControlValue::Checked(on)) => {
                if let Some(orbit) = ctx.orbit.as_mut() {
                    orbit.set_flag(*flag, on);
                }
            }
            (Action::ToggleWireframe(objects), ControlValue::Click) => {
                let enable = match objects.first() {
                    Some(first) => !scene.object(*first)?.material.wireframe,
                    None => return Ok(()),
                };
                update_materials(scene, objects, |material| {
                    material.wireframe = enable;
                    Ok(())
                })?;
            }
            (Action::ToggleEmissive(glows), ControlValue::Click) => {
                let enable = match glows.first() {
                    Some((first, _)) => scene.object(*first)?.material.emissive.is_black(),
                    None => return Ok(()),
                };
                let mut staged = Vec::with_capacity(glows.len());
                for (id, glow) in glows {
                    let mut material = scene.object(*id)?.material.clone();
                    material.set_emissive(if enable { *glow } else { Color::BLACK })?;
                    staged.push((*id, material));
                }
                for (id, material) in staged {
                    scene.object_mut(id)?.material = material;
                }
            }
            (Action::CameraPreset { position, target }, ControlValue::Click) => {
                match ctx.orbit.as_mut() {
                    Some(orbit) => orbit.set_view(&mut ctx.camera, *position, *target),
                    None => {
                        ctx.camera.position = *position;
                        ctx.camera.look_at(*target);
                    }
                }
            }
            (action, _) => {
                return Err(Error::ControlValueMismatch {
                    control: control.to_string(),
                    expected: action.expected_kind(),
                });
            }
        }
        Ok(())
    }
}

/// Declaration of a named control exposed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpec {
    pub id: String,
    pub label: String,
    pub kind: ControlKind,
    /// Decimals of the paired display text, if the control has one.
    pub display_decimals: Option<usize>,
    /// Host element showing the display text when it is not `<id>Value`.
    pub display_id: Option<String>,
}

impl ControlSpec {
    pub fn checkbox(id: &str, label: &str, checked: bool) -> Self {
        Self::new(id, label, ControlKind::Checkbox { checked })
    }

    pub fn slider(id: &str, label: &str, min: f32, max: f32, step: f32, value: f32) -> Self {
        Self {
            display_decimals: Some(1),
            ..Self::new(id, label, ControlKind::Slider { min, max, step, value })
        }
    }

    pub fn button(id: &str, label: &str) -> Self {
        Self::new(id, label, ControlKind::Button)
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.display_decimals = Some(decimals);
        self
    }

    pub fn display_as(mut self, id: &str) -> Self {
        self.display_id = Some(id.to_string());
        self
    }

    /// Id of the host element that shows the display text.
    pub fn display_element(&self) -> String {
        match &self.display_id {
            Some(id) => id.clone(),
            None => format!("{}Value", self.id),
        }
    }

    fn new(id: &str, label: &str, kind: ControlKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            display_decimals: None,
            display_id: None,
        }
    }
}

/// A declared control, its binding and its last observed value
#[derive(Debug, Clone)]
pub struct Control {
    pub spec: ControlSpec,
    pub action: Action,
    value: ControlValue,
    display: Option<String>,
}

impl Control {
    pub fn value(&self) -> ControlValue {
        self.value
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    controls: Vec<Control>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, spec: ControlSpec, action: Action) {
        let value = spec.kind.initial_value();
        let display = match (spec.display_decimals, value) {
            (Some(decimals), ControlValue::Number(v)) => Some(fixed(v, decimals)),
            _ => None,
        };
        self.controls.push(Control {
            spec,
            action,
            value,
            display,
        });
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn get(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.spec.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|c| c.spec.id.as_str())
    }

    /// Reject the panel if the host lacks any declared control or a
    /// binding cannot take the values of its control.
    pub fn validate<F>(&self, mut available: F) -> Result<()>
    where
        F: FnMut(&str) -> bool,
    {
        for control in &self.controls {
            let expected = control.action.expected_kind();
            if control.spec.kind.expected() != expected {
                return Err(Error::ControlValueMismatch {
                    control: control.spec.id.clone(),
                    expected,
                });
            }
        }
        match self.ids().find(|id| !available(id)) {
            Some(missing) => Err(Error::MissingControl(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Apply a change event to its bound fields and refresh the display.
    pub fn handle(&mut self, event: &ControlEvent, ctx: &mut SceneContext) -> Result<()> {
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.spec.id == event.control)
            .ok_or_else(|| Error::UnknownControl(event.control.clone()))?;

        if !control.spec.kind.accepts(&event.value) {
            return Err(Error::ControlValueMismatch {
                control: event.control.clone(),
                expected: control.spec.kind.expected(),
            });
        }

        control.action.apply(&event.control, event.value, ctx)?;
        control.value = event.value;
        if let (Some(decimals), ControlValue::Number(v)) = (control.spec.display_decimals, event.value) {
            control.display = Some(fixed(v, decimals));
        }
        debug!("control `{}` <- {:?}", event.control, event.value);
        Ok(())
    }
}
