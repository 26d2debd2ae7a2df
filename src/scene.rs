//! The scene graph: homogeneous arenas for textures, materials, and
//! objects, cross-referenced by index rather than pointer. `Scene` is the
//! sole owner of everything rendered, built once by [`crate::scene_loader`]
//! and treated as immutable for the rest of the run.

use crate::hittable::{HitInfo, Quad, Sphere};
use crate::interval::Interval;
use crate::material::Material;
use crate::math::{Color, Point3, Ray, Vec3};
use crate::texture::Texture;

pub type TextureId = usize;
pub type MaterialId = usize;

#[derive(Debug, Clone, Copy)]
pub enum Object {
    Sphere(Sphere),
    Quad(Quad),
}

impl Object {
    fn hit(&self, ray: &Ray, t_span: Interval) -> Option<HitInfo> {
        match self {
            Object::Sphere(s) => s.hit(ray, t_span),
            Object::Quad(q) => q.hit(ray, t_span),
        }
    }
}

/// What a ray returns when it escapes every object in the scene.
#[derive(Debug, Clone)]
pub enum Skybox {
    Color(Color),
    Texture(TextureId),
}

impl Default for Skybox {
    fn default() -> Self {
        Skybox::Color(Color::zero())
    }
}

/// Owns every texture, material, and object in the scene. Cross-references
/// between them are plain `usize` indices into these arenas, not pointers —
/// nothing outside `Scene` owns a rendered-time reference.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    textures: Vec<Texture>,
    materials: Vec<Material>,
    objects: Vec<Object>,
    skybox: Skybox,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Last call wins; an unset skybox defaults to black.
    pub fn set_skybox(&mut self, skybox: Skybox) {
        self.skybox = skybox;
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id]
    }

    /// Linear scan over every object, shrinking the search interval to the
    /// closest hit found so far. Returns the nearest intersection, if any.
    pub fn hit(&self, ray: &Ray, t_span: Interval) -> Option<HitInfo> {
        let mut search = t_span;
        let mut best: Option<HitInfo> = None;

        for object in &self.objects {
            if let Some(hit) = object.hit(ray, search) {
                search = search.with_max(hit.t);
                best = Some(hit);
            }
        }

        best
    }

    pub fn sample_texture(&self, id: TextureId, u: f64, v: f64, p: Point3, dir: Vec3) -> Color {
        self.textures[id].sample(u, v, p, dir, self)
    }

    /// Queried only when a ray misses every object.
    pub fn sample_skybox(&self, dir: Vec3) -> Color {
        match &self.skybox {
            Skybox::Color(c) => *c,
            Skybox::Texture(id) => self.sample_texture(*id, 0.0, 0.0, Point3::zero(), dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Albedo, Lambertian};
    use approx::assert_abs_diff_eq;

    fn lambertian_material() -> Material {
        Material::Lambertian(Lambertian {
            albedo: Albedo::Color(Color::ones()),
            smoothness: 0.0,
            specular_probability: 0.0,
            normal_map: None,
            normal_strength: 1.0,
        })
    }

    #[test]
    fn closest_hit_equals_per_object_minimum_t() {
        let mut scene = Scene::new();
        let mat = scene.add_material(lambertian_material());
        scene.add_object(Object::Sphere(Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0, mat)));
        scene.add_object(Object::Sphere(Sphere::new(Point3::new(0.0, 0.0, -2.0), 1.0, mat)));

        let ray = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        // nearer sphere's surface sits at distance 1 from the origin.
        assert_abs_diff_eq!(hit.t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn skybox_defaults_to_black() {
        let scene = Scene::new();
        assert_eq!(scene.sample_skybox(Vec3::new(0.0, 1.0, 0.0)), Color::zero());
    }

    #[test]
    fn empty_scene_never_hits() {
        let scene = Scene::new();
        let ray = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }
}
