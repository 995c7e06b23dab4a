/// Light sources and their contribution at a surface point
use nalgebra::{Point3, Vector3};

use crate::color::Color;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform base illumination with no direction.
    Ambient,
    /// Parallel rays travelling from `position` toward `target`.
    Directional { target: Point3<f32> },
    /// Omni light; `distance` of zero means no cutoff.
    Point { distance: f32, decay: f32 },
    /// Cone of half-angle `angle` (radians) aimed at `target`.
    Spot {
        target: Point3<f32>,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
    /// Sky color from above fading to `ground_color` from below.
    Hemisphere { ground_color: Color },
}

impl LightKind {
    pub fn name(&self) -> &'static str {
        match self {
            LightKind::Ambient => "ambient",
            LightKind::Directional { .. } => "directional",
            LightKind::Point { .. } => "point",
            LightKind::Spot { .. } => "spot",
            LightKind::Hemisphere { .. } => "hemisphere",
        }
    }
}

/// Incoming light at a surface point
#[derive(Debug, Clone, Copy)]
pub enum Incidence {
    /// Direction-less contribution (ambient, hemisphere).
    Ambient(Color),
    /// Radiance arriving from `direction` (unit vector toward the light).
    Directed { radiance: Color, direction: Vector3<f32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub position: Point3<f32>,
    pub visible: bool,
    pub kind: LightKind,
}

impl Light {
    fn new(color: u32, intensity: f32, kind: LightKind) -> Self {
        Self {
            color: Color::from_hex(color),
            intensity,
            position: Point3::new(0.0, 1.0, 0.0),
            visible: true,
            kind,
        }
    }

    pub fn ambient(color: u32, intensity: f32) -> Self {
        Self::new(color, intensity, LightKind::Ambient)
    }

    pub fn directional(color: u32, intensity: f32) -> Self {
        Self::new(color, intensity, LightKind::Directional { target: Point3::origin() })
    }

    pub fn point(color: u32, intensity: f32, distance: f32, decay: f32) -> Self {
        Self::new(color, intensity, LightKind::Point { distance, decay })
    }

    pub fn spot(color: u32, intensity: f32, distance: f32, angle: f32, penumbra: f32, decay: f32) -> Self {
        Self::new(
            color,
            intensity,
            LightKind::Spot {
                target: Point3::origin(),
                distance,
                angle,
                penumbra,
                decay,
            },
        )
    }

    pub fn hemisphere(sky: u32, ground: u32, intensity: f32) -> Self {
        Self::new(
            sky,
            intensity,
            LightKind::Hemisphere {
                ground_color: Color::from_hex(ground),
            },
        )
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    pub fn spot_angle(&self) -> Option<f32> {
        match self.kind {
            LightKind::Spot { angle, .. } => Some(angle),
            _ => None,
        }
    }

    pub fn set_spot_angle(&mut self, value: f32) -> Result<()> {
        let model = self.kind.name();
        match &mut self.kind {
            LightKind::Spot { angle, .. } => {
                *angle = value;
                Ok(())
            }
            _ => Err(Error::UnsupportedParameter {
                model,
                parameter: "angle",
            }),
        }
    }

    /// Light arriving at `point` with surface `normal`, or `None` when the
    /// light is hidden or out of range.
    pub fn incidence(&self, point: &Point3<f32>, normal: &Vector3<f32>) -> Option<Incidence> {
        if !self.visible || self.intensity <= 0.0 {
            return None;
        }
        let radiance = self.color * self.intensity;

        match self.kind {
            LightKind::Ambient => Some(Incidence::Ambient(radiance)),
            LightKind::Hemisphere { ground_color } => {
                let weight = normal.y * 0.5 + 0.5;
                let ground = ground_color * self.intensity;
                Some(Incidence::Ambient(ground.lerp(radiance, weight)))
            }
            LightKind::Directional { target } => {
                let direction = (self.position - target).try_normalize(1e-9)?;
                Some(Incidence::Directed { radiance, direction })
            }
            LightKind::Point { distance, decay } => {
                let to_light = self.position - point;
                let falloff = distance_attenuation(to_light.norm(), distance, decay);
                Some(Incidence::Directed {
                    radiance: radiance * falloff,
                    direction: to_light.try_normalize(1e-9)?,
                })
            }
            LightKind::Spot {
                target,
                distance,
                angle,
                penumbra,
                decay,
            } => {
                let to_light = self.position - point;
                let direction = to_light.try_normalize(1e-9)?;
                let axis = (target - self.position).try_normalize(1e-9)?;
                let cone = cone_attenuation((-direction).dot(&axis), angle, penumbra);
                if cone <= 0.0 {
                    return None;
                }
                let falloff = distance_attenuation(to_light.norm(), distance, decay);
                Some(Incidence::Directed {
                    radiance: radiance * (falloff * cone),
                    direction,
                })
            }
        }
    }
}

/// Inverse-power falloff, smoothly windowed to zero at `cutoff`.
fn distance_attenuation(distance: f32, cutoff: f32, decay: f32) -> f32 {
    let mut falloff = 1.0 / distance.powf(decay).max(0.01);
    if cutoff > 0.0 {
        let ratio = (distance / cutoff).powi(4);
        falloff *= (1.0 - ratio).clamp(0.0, 1.0).powi(2);
    }
    falloff
}

/// Smoothstep from the outer cone edge to the inner (penumbra-free) cone.
fn cone_attenuation(cos_to_axis: f32, angle: f32, penumbra: f32) -> f32 {
    let outer = angle.cos();
    let inner = (angle * (1.0 - penumbra)).cos();
    if inner - outer <= f32::EPSILON {
        return if cos_to_axis >= outer { 1.0 } else { 0.0 };
    }
    let t = ((cos_to_axis - outer) / (inner - outer)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_light_contributes_nothing() {
        let mut light = Light::ambient(0xffffff, 0.3);
        light.visible = false;
        assert!(light.incidence(&Point3::origin(), &Vector3::y()).is_none());
    }

    #[test]
    fn point_light_fades_to_zero_at_cutoff() {
        let light = Light::point(0xff00ff, 1.0, 50.0, 2.0).at(-8.0, 3.0, 0.0);
        assert!(light.incidence(&Point3::new(-8.0, 3.0, 60.0), &Vector3::z()).map_or(true, |i| {
            matches!(i, Incidence::Directed { radiance, .. } if radiance.is_black())
        }));
        assert!(matches!(
            light.incidence(&Point3::new(-8.0, 3.0, 1.0), &Vector3::z()),
            Some(Incidence::Directed { .. })
        ));
    }

    #[test]
    fn spot_light_only_lights_inside_its_cone() {
        let light = Light::spot(0x00ffff, 1.0, 30.0, std::f32::consts::PI / 10.0, 0.5, 2.0).at(-6.0, 10.0, 0.0);
        assert!(light.incidence(&Point3::origin(), &Vector3::y()).is_some());
        assert!(light.incidence(&Point3::new(20.0, 0.0, 0.0), &Vector3::y()).is_none());
    }

    #[test]
    fn hemisphere_blends_sky_and_ground() {
        let light = Light::hemisphere(0x0066ff, 0xff6600, 1.0);
        let up = light.incidence(&Point3::origin(), &Vector3::y());
        match up {
            Some(Incidence::Ambient(color)) => assert_eq!(color, Color::from_hex(0x0066ff)),
            other => panic!("unexpected incidence {other:?}"),
        }
    }

    #[test]
    fn spot_angle_is_rejected_on_other_kinds() {
        let mut light = Light::directional(0xffffff, 1.0);
        assert!(light.set_spot_angle(0.5).is_err());
    }
}
