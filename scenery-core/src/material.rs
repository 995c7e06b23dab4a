/// Appearance descriptors and their shading models
use crate::color::Color;
use crate::error::{Error, Result};

/// Lighting-response function applied to a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadingModel {
    /// Unlit: the color is drawn as-is.
    Basic,
    /// Matte diffuse.
    Lambert,
    /// Diffuse plus specular highlight.
    Phong { shininess: f32, specular: Color },
    /// Metalness/roughness workflow.
    Standard { metalness: f32, roughness: f32 },
    /// Standard plus a clear coat layer.
    Physical {
        metalness: f32,
        roughness: f32,
        clearcoat: f32,
        clearcoat_roughness: f32,
        reflectivity: f32,
    },
}

impl ShadingModel {
    pub fn name(&self) -> &'static str {
        match self {
            ShadingModel::Basic => "basic",
            ShadingModel::Lambert => "lambert",
            ShadingModel::Phong { .. } => "phong",
            ShadingModel::Standard { .. } => "standard",
            ShadingModel::Physical { .. } => "physical",
        }
    }

    pub fn standard(metalness: f32, roughness: f32) -> Self {
        ShadingModel::Standard { metalness, roughness }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub model: ShadingModel,
}

impl Material {
    pub fn new(color: u32, model: ShadingModel) -> Self {
        Self {
            color: Color::from_hex(color),
            emissive: Color::BLACK,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            model,
        }
    }

    pub fn basic(color: u32) -> Self {
        Self::new(color, ShadingModel::Basic)
    }

    pub fn lambert(color: u32) -> Self {
        Self::new(color, ShadingModel::Lambert)
    }

    pub fn standard(color: u32, metalness: f32, roughness: f32) -> Self {
        Self::new(color, ShadingModel::standard(metalness, roughness))
    }

    /// Builder-style [`Material::set_emissive`].
    pub fn with_emissive(mut self, emissive: u32) -> Result<Self> {
        self.set_emissive(Color::from_hex(emissive))?;
        Ok(self)
    }

    pub fn set_emissive(&mut self, emissive: Color) -> Result<()> {
        if self.model == ShadingModel::Basic {
            return Err(self.unsupported("emissive"));
        }
        self.emissive = emissive;
        Ok(())
    }

    pub fn metalness(&self) -> Option<f32> {
        match self.model {
            ShadingModel::Standard { metalness, .. } | ShadingModel::Physical { metalness, .. } => {
                Some(metalness)
            }
            _ => None,
        }
    }

    pub fn roughness(&self) -> Option<f32> {
        match self.model {
            ShadingModel::Standard { roughness, .. } | ShadingModel::Physical { roughness, .. } => {
                Some(roughness)
            }
            _ => None,
        }
    }

    pub fn set_metalness(&mut self, value: f32) -> Result<()> {
        let error = self.unsupported("metalness");
        match &mut self.model {
            ShadingModel::Standard { metalness, .. } | ShadingModel::Physical { metalness, .. } => {
                *metalness = value;
                Ok(())
            }
            _ => Err(error),
        }
    }

    pub fn set_roughness(&mut self, value: f32) -> Result<()> {
        let error = self.unsupported("roughness");
        match &mut self.model {
            ShadingModel::Standard { roughness, .. } | ShadingModel::Physical { roughness, .. } => {
                *roughness = value;
                Ok(())
            }
            _ => Err(error),
        }
    }

    /// Opacity below one switches blending on.
    pub fn set_opacity(&mut self, value: f32) {
        self.opacity = value;
        self.transparent = value < 1.0;
    }

    fn unsupported(&self, parameter: &'static str) -> Error {
        Error::UnsupportedParameter {
            model: self.model.name(),
            parameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metalness_only_exists_on_pbr_models() {
        let mut standard = Material::standard(0xa8e6cf, 0.5, 0.5);
        standard.set_metalness(0.9).unwrap();
        assert_eq!(standard.metalness(), Some(0.9));

        let mut lambert = Material::lambert(0x4ecdc4);
        assert_eq!(
            lambert.set_metalness(0.9),
            Err(Error::UnsupportedParameter {
                model: "lambert",
                parameter: "metalness"
            })
        );
    }

    #[test]
    fn basic_material_rejects_emissive() {
        assert_eq!(
            Material::basic(0xff6b6b).with_emissive(0x222222),
            Err(Error::UnsupportedParameter {
                model: "basic",
                parameter: "emissive"
            })
        );
        let mut basic = Material::basic(0xff6b6b);
        assert!(basic.set_emissive(Color::WHITE).is_err());
        assert_eq!(basic.emissive, Color::BLACK);

        let glowing = Material::lambert(0x4ecdc4).with_emissive(0x002222).unwrap();
        assert_eq!(glowing.emissive, Color::from_hex(0x002222));
    }

    #[test]
    fn opacity_toggles_transparency() {
        let mut material = Material::lambert(0xffffff);
        material.set_opacity(0.4);
        assert!(material.transparent);
        material.set_opacity(1.0);
        assert!(!material.transparent);
    }
}
