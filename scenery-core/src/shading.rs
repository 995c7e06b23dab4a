/// Per-face lighting for each shading model
use nalgebra::{Point3, Vector3};

use crate::color::Color;
use crate::light::{Incidence, Light};
use crate::material::{Material, ShadingModel};

/// Base reflectance of non-metals.
const DIELECTRIC_F0: f32 = 0.04;

/// Map perceptual roughness onto a Blinn-Phong exponent.
fn roughness_to_exponent(roughness: f32) -> f32 {
    let alpha = roughness.clamp(0.04, 1.0).powi(2);
    (2.0 / (alpha * alpha) - 2.0).clamp(1.0, 2048.0)
}

/// Specular lobe split off the diffuse response
struct Lobe {
    reflectance: Color,
    exponent: f32,
}

/// Lit color of a surface point. `normal` and `view` are unit vectors, the
/// latter pointing from the surface toward the camera.
pub fn shade<'a, I>(material: &Material, lights: I, point: &Point3<f32>, normal: &Vector3<f32>, view: &Vector3<f32>) -> Color
where
    I: IntoIterator<Item = &'a Light>,
{
    let (albedo, lobes) = match material.model {
        ShadingModel::Basic => return material.color,
        ShadingModel::Lambert => (material.color, Vec::new()),
        ShadingModel::Phong { shininess, specular } => (
            material.color,
            vec![Lobe {
                reflectance: specular,
                exponent: shininess.max(1.0),
            }],
        ),
        ShadingModel::Standard { metalness, roughness } => (
            material.color * (1.0 - metalness),
            vec![Lobe {
                reflectance: Color::WHITE.lerp(material.color, metalness) * DIELECTRIC_F0.max(metalness),
                exponent: roughness_to_exponent(roughness),
            }],
        ),
        ShadingModel::Physical {
            metalness,
            roughness,
            clearcoat,
            clearcoat_roughness,
            reflectivity,
        } => {
            let f0 = 0.16 * reflectivity * reflectivity;
            (
                material.color * (1.0 - metalness),
                vec![
                    Lobe {
                        reflectance: Color::WHITE.lerp(material.color, metalness) * f0.max(metalness),
                        exponent: roughness_to_exponent(roughness),
                    },
                    Lobe {
                        reflectance: Color::WHITE * (DIELECTRIC_F0 * clearcoat),
                        exponent: roughness_to_exponent(clearcoat_roughness),
                    },
                ],
            )
        }
    };

    let mut diffuse = Color::BLACK;
    let mut specular = Color::BLACK;
    for light in lights {
        match light.incidence(point, normal) {
            Some(Incidence::Ambient(radiance)) => diffuse = diffuse + radiance,
            Some(Incidence::Directed { radiance, direction }) => {
                let n_dot_l = normal.dot(&direction).max(0.0);
                if n_dot_l <= 0.0 {
                    continue;
                }
                diffuse = diffuse + radiance * n_dot_l;
                let Some(half) = (direction + view).try_normalize(1e-9) else {
                    continue;
                };
                let n_dot_h = normal.dot(&half).max(0.0);
                for lobe in &lobes {
                    let normalization = (lobe.exponent + 2.0) / 8.0;
                    let highlight = n_dot_h.powf(lobe.exponent) * normalization * n_dot_l;
                    specular = specular + radiance.modulate(lobe.reflectance) * highlight;
                }
            }
            None => {}
        }
    }

    (albedo.modulate(diffuse) + specular + material.emissive).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(material: &Material, lights: &[Light]) -> Color {
        shade(material, lights, &Point3::origin(), &Vector3::z(), &Vector3::z())
    }

    #[test]
    fn basic_ignores_lights() {
        let material = Material::basic(0xff6b6b);
        assert_eq!(lit(&material, &[]), Color::from_hex(0xff6b6b));
    }

    #[test]
    fn lambert_without_lights_is_black_plus_emissive() {
        let material = Material::lambert(0x4ecdc4).with_emissive(0x002222).unwrap();
        assert_eq!(lit(&material, &[]), Color::from_hex(0x002222));
    }

    #[test]
    fn facing_light_is_brighter_than_grazing_light() {
        let material = Material::lambert(0xffffff);
        let facing = Light::directional(0xffffff, 1.0).at(0.0, 0.0, 5.0);
        let grazing = Light::directional(0xffffff, 1.0).at(5.0, 0.0, 1.0);
        assert!(lit(&material, &[facing]).luminance() > lit(&material, &[grazing]).luminance());
    }

    #[test]
    fn phong_adds_a_highlight_over_lambert() {
        let light = Light::directional(0xffffff, 0.5).at(0.0, 0.0, 5.0);
        let matte = Material::lambert(0x808080);
        let glossy = Material::new(
            0x808080,
            ShadingModel::Phong {
                shininess: 100.0,
                specular: Color::WHITE,
            },
        );
        assert!(lit(&glossy, &[light.clone()]).luminance() > lit(&matte, &[light]).luminance());
    }
}
