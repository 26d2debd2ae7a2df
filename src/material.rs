//! Material scattering and emission. Every variant answers `scatter` (an
//! optional outgoing ray + attenuation) and `emission` (radiance emitted
//! independent of incoming light, zero by default).

use crate::hittable::HitInfo;
use crate::math::{Color, Point3, Ray, Vec3};
use crate::rng::{schlick_reflectance, Rng};
use crate::scene::{Scene, TextureId};

/// Either a constant color or a texture reference, sampled the same way
/// wherever albedo/emission can be either.
#[derive(Debug, Clone, Copy)]
pub enum Albedo {
    Color(Color),
    Texture(TextureId),
}

impl Albedo {
    pub fn at(&self, u: f64, v: f64, p: Point3, dir: Vec3, scene: &Scene) -> Color {
        match self {
            Albedo::Color(c) => *c,
            Albedo::Texture(id) => scene.sample_texture(*id, u, v, p, dir),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    pub albedo: Albedo,
    pub smoothness: f64,
    pub specular_probability: f64,
    pub normal_map: Option<TextureId>,
    pub normal_strength: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Metal {
    pub albedo: Albedo,
    pub smoothness: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    pub ior: f64,
    pub tint: Color,
    pub smoothness: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct DiffuseLight {
    pub emission: Albedo,
}

#[derive(Debug, Clone, Copy)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
}

/// The result of a successful scatter: the attenuation to apply along the
/// outgoing ray, and the ray itself.
pub struct Scatter {
    pub attenuation: Color,
    pub ray_out: Ray,
}

impl Material {
    pub fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitInfo,
        scene: &Scene,
        rng: &mut Rng,
    ) -> Option<Scatter> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, hit, scene, rng),
            Material::Metal(m) => m.scatter(ray_in, hit, scene, rng),
            Material::Dielectric(m) => m.scatter(ray_in, hit, rng),
            Material::DiffuseLight(_) => None,
        }
    }

    pub fn emission(&self, u: f64, v: f64, p: Point3, scene: &Scene) -> Color {
        match self {
            Material::DiffuseLight(m) => m.emission.at(u, v, p, Vec3::zero(), scene),
            _ => Color::zero(),
        }
    }
}

impl Lambertian {
    fn shading_normal(&self, hit: &HitInfo, scene: &Scene) -> Vec3 {
        let Some(map) = self.normal_map else {
            return hit.normal;
        };
        if hit.tangent.near_zero() || hit.bitangent.near_zero() {
            return hit.normal;
        }
        let sample = scene.sample_texture(map, hit.u, hit.v, hit.p, Vec3::zero());
        let tx = (2.0 * sample.x - 1.0) * self.normal_strength;
        let ty = (2.0 * sample.y - 1.0) * self.normal_strength;
        let tz = 2.0 * sample.z - 1.0;
        let tangent_space = Vec3::new(tx, ty, tz);
        let world = hit.tangent * tangent_space.x
            + hit.bitangent * tangent_space.y
            + hit.normal * tangent_space.z;
        world.normalized()
    }

    fn scatter(&self, ray_in: &Ray, hit: &HitInfo, scene: &Scene, rng: &mut Rng) -> Option<Scatter> {
        let normal = self.shading_normal(hit, scene);

        let mut diffuse_dir = normal + rng.random_unit_vec();
        if diffuse_dir.near_zero() {
            diffuse_dir = normal;
        }
        let reflect_dir = ray_in.direction.reflect(normal);

        let xi = rng.random();
        let is_specular = if self.specular_probability >= xi { 1.0 } else { 0.0 };

        let direction = diffuse_dir.lerp(reflect_dir, self.smoothness * is_specular);
        let albedo = self.albedo.at(hit.u, hit.v, hit.p, ray_in.direction, scene);
        let attenuation = albedo.lerp(Color::ones(), is_specular);

        Some(Scatter {
            attenuation,
            ray_out: Ray::new(hit.p, direction),
        })
    }
}

impl Metal {
    fn scatter(&self, ray_in: &Ray, hit: &HitInfo, scene: &Scene, rng: &mut Rng) -> Option<Scatter> {
        let reflected = ray_in.direction.reflect(hit.normal).normalized()
            + rng.random_unit_vec() * (1.0 - self.smoothness);
        let direction = reflected.normalized();
        if direction.dot(hit.normal) <= 0.0 {
            return None;
        }
        let attenuation = self.albedo.at(hit.u, hit.v, hit.p, ray_in.direction, scene);
        Some(Scatter {
            attenuation,
            ray_out: Ray::new(hit.p, direction),
        })
    }
}

impl Dielectric {
    fn scatter(&self, ray_in: &Ray, hit: &HitInfo, rng: &mut Rng) -> Option<Scatter> {
        let eta = if hit.front_face { 1.0 / self.ior } else { self.ior };

        let unit_dir = ray_in.direction.normalized();
        let cos_theta = (-unit_dir).dot(hit.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = eta * sin_theta > 1.0;
        let reflects = cannot_refract || schlick_reflectance(cos_theta, eta) > rng.random();
        let direction = if reflects {
            unit_dir.reflect(hit.normal)
        } else {
            unit_dir.refract(hit.normal, eta)
        };

        let perturbed = direction + rng.random_unit_vec() * (1.0 - self.smoothness);
        if perturbed.near_zero() {
            return None;
        }

        let attenuation = if reflects { Color::ones() } else { self.tint };

        Some(Scatter {
            attenuation,
            ray_out: Ray::new(hit.p, perturbed),
        })
    }
}
