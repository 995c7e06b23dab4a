/// Scene graph root owning objects, lights and helpers
use log::debug;
use nalgebra::Point3;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Mesh, Shape};
use crate::light::Light;
use crate::material::Material;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HelperId(usize);

/// A shape paired with its appearance
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub shape: Shape,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
}

impl Object {
    pub fn new(name: impl Into<String>, shape: Shape, material: Material) -> Self {
        Self {
            name: name.into(),
            shape,
            mesh: shape.tessellate(),
            material,
            transform: Transform::default(),
            visible: true,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Point3::new(x, y, z);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Unlit overlays: debug lines and text labels
#[derive(Debug, Clone, PartialEq)]
pub enum HelperKind {
    Grid {
        size: f32,
        divisions: u32,
        center_color: Color,
        line_color: Color,
    },
    /// Red X, green Y, blue Z.
    Axes { size: f32 },
    /// Marker at a light's position, with a ray toward its target if any.
    Light { light: LightId, size: f32 },
    /// Camera-facing plate of `width` x `height` world units carrying text.
    Label { text: String, width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Helper {
    pub kind: HelperKind,
    pub position: Point3<f32>,
    pub visible: bool,
}

impl Helper {
    pub fn grid(size: f32, divisions: u32, center_color: u32, line_color: u32) -> Self {
        Self::new(HelperKind::Grid {
            size,
            divisions,
            center_color: Color::from_hex(center_color),
            line_color: Color::from_hex(line_color),
        })
    }

    pub fn axes(size: f32) -> Self {
        Self::new(HelperKind::Axes { size })
    }

    pub fn light(light: LightId, size: f32) -> Self {
        Self::new(HelperKind::Light { light, size })
    }

    pub fn label(text: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(HelperKind::Label {
            text: text.into(),
            width,
            height,
        })
    }

    fn new(kind: HelperKind) -> Self {
        Self {
            kind,
            position: Point3::origin(),
            visible: true,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Point3::new(x, y, z);
        self
    }

    /// The light this helper visualizes, if any.
    pub fn light_id(&self) -> Option<LightId> {
        match self.kind {
            HelperKind::Light { light, .. } => Some(light),
            _ => None,
        }
    }
}

/// Owns every entity for the lifetime of a demo
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    objects: Vec<Object>,
    lights: Vec<(String, Light)>,
    helpers: Vec<Helper>,
}

impl Scene {
    pub fn new(background: u32) -> Self {
        Self {
            background: Color::from_hex(background),
            objects: Vec::new(),
            lights: Vec::new(),
            helpers: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        debug!(
            "adding {} `{}` ({} triangles)",
            object.shape.name(),
            object.name,
            object.mesh.triangles.len()
        );
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn add_light(&mut self, name: impl Into<String>, light: Light) -> LightId {
        self.lights.push((name.into(), light));
        LightId(self.lights.len() - 1)
    }

    pub fn add_helper(&mut self, helper: Helper) -> HelperId {
        self.helpers.push(helper);
        HelperId(self.helpers.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Result<&Object> {
        self.objects.get(id.0).ok_or(Error::UnknownEntity {
            kind: "object",
            index: id.0,
        })
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects.get_mut(id.0).ok_or(Error::UnknownEntity {
            kind: "object",
            index: id.0,
        })
    }

    pub fn light(&self, id: LightId) -> Result<&Light> {
        self.lights.get(id.0).map(|(_, light)| light).ok_or(Error::UnknownEntity {
            kind: "light",
            index: id.0,
        })
    }

    pub fn light_mut(&mut self, id: LightId) -> Result<&mut Light> {
        self.lights
            .get_mut(id.0)
            .map(|(_, light)| light)
            .ok_or(Error::UnknownEntity {
                kind: "light",
                index: id.0,
            })
    }

    pub fn helper_mut(&mut self, id: HelperId) -> Result<&mut Helper> {
        self.helpers.get_mut(id.0).ok_or(Error::UnknownEntity {
            kind: "helper",
            index: id.0,
        })
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    pub fn lights(&self) -> impl Iterator<Item = (&str, &Light)> {
        self.lights.iter().map(|(name, light)| (name.as_str(), light))
    }

    pub fn helpers(&self) -> impl Iterator<Item = &Helper> {
        self.helpers.iter()
    }

    /// Helpers attached to a given light.
    pub fn helpers_of(&self, light: LightId) -> Vec<HelperId> {
        self.helpers
            .iter()
            .enumerate()
            .filter(|(_, helper)| helper.light_id() == Some(light))
            .map(|(index, _)| HelperId(index))
            .collect()
    }

    /// Every helper that visualizes a light, with that light.
    pub fn light_helpers(&self) -> Vec<(HelperId, LightId)> {
        self.helpers
            .iter()
            .enumerate()
            .filter_map(|(index, helper)| helper.light_id().map(|light| (HelperId(index), light)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_address_what_was_added() {
        let mut scene = Scene::new(0x222222);
        let cube = scene.add_object(Object::new(
            "cube",
            Shape::Box { width: 1.0, height: 1.0, depth: 1.0 },
            Material::basic(0xff0000),
        ));
        let light = scene.add_light("sun", Light::directional(0xffffff, 1.0));
        let helper = scene.add_helper(Helper::light(light, 2.0));

        assert_eq!(scene.object(cube).unwrap().name, "cube");
        assert_eq!(scene.light(light).unwrap().intensity, 1.0);
        assert_eq!(scene.helpers_of(light), vec![helper]);
        assert!(scene.object(ObjectId(7)).is_err());
    }
}
