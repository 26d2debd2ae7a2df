//! Intersectable primitives: `Sphere` and `Quad`. Both fill a [`HitInfo`]
//! and are scanned linearly by [`crate::scene::Scene::hit`] — there is no
//! acceleration structure here, by design.

use crate::interval::Interval;
use crate::math::{Point3, Ray, Vec3};
use crate::scene::MaterialId;
use std::f64::consts::PI;

// ─── Hit Info ───────────────────────────────────────────────────────────────

/// The record filled by an intersection test: hit point, shading frame, UV,
/// parametric `t`, and the material struck.
#[derive(Debug, Clone, Copy)]
pub struct HitInfo {
    pub p: Point3,
    /// Unit shading normal, already flipped to face the incoming ray.
    pub normal: Vec3,
    /// Unit tangent, for normal mapping. Zero if the primitive doesn't supply one.
    pub tangent: Vec3,
    /// Unit bitangent, for normal mapping. Zero if the primitive doesn't supply one.
    pub bitangent: Vec3,
    pub t: f64,
    pub u: f64,
    pub v: f64,
    pub front_face: bool,
    pub material: MaterialId,
}

impl HitInfo {
    /// Sets `normal` and `front_face` from the outward geometric normal,
    /// flipping the normal to always oppose the incoming ray.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

// ─── Sphere ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f64,
    pub material: MaterialId,
}

impl Sphere {
    pub const fn new(center: Point3, radius: f64, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn hit(&self, ray: &Ray, t_span: Interval) -> Option<HitInfo> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let mut root = (h - sqrtd) / a;
        if !t_span.surrounds(root) {
            root = (h + sqrtd) / a;
            if !t_span.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = sphere_uv(outward_normal);

        let mut hit = HitInfo {
            p,
            normal: outward_normal,
            tangent: Vec3::zero(),
            bitangent: Vec3::zero(),
            t: root,
            u,
            v,
            front_face: true,
            material: self.material,
        };
        hit.set_face_normal(ray, outward_normal);
        Some(hit)
    }
}

/// Spherical UV from a unit outward normal.
fn sphere_uv(outward_normal: Vec3) -> (f64, f64) {
    let theta = (-outward_normal.y).acos();
    let phi = (-outward_normal.z).atan2(outward_normal.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

// ─── Quad ───────────────────────────────────────────────────────────────────

/// A planar parallelogram spanned by `u` and `v` from corner `q`. The
/// plane-equation fields (`normal`, `d`, `w`) are derived once at
/// construction and reused on every `hit`.
#[derive(Debug, Clone, Copy)]
pub struct Quad {
    pub q: Point3,
    pub u: Vec3,
    pub v: Vec3,
    pub material: MaterialId,
    pub one_sided: bool,
    normal: Vec3,
    d: f64,
    w: Vec3,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: MaterialId, one_sided: bool) -> Self {
        let n = u.cross(v);
        let normal = n.normalized();
        let d = normal.dot(q);
        let w = n / n.dot(n);
        Self {
            q,
            u,
            v,
            material,
            one_sided,
            normal,
            d,
            w,
        }
    }

    pub fn hit(&self, ray: &Ray, t_span: Interval) -> Option<HitInfo> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !t_span.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let hp = p - self.q;
        let alpha = self.w.dot(hp.cross(self.v));
        let beta = self.w.dot(self.u.cross(hp));

        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        if self.one_sided && denom > 0.0 {
            return None;
        }

        let mut hit = HitInfo {
            p,
            normal: self.normal,
            tangent: self.u.normalized(),
            bitangent: self.v.normalized(),
            t,
            u: alpha,
            v: beta,
            front_face: true,
            material: self.material,
        };
        hit.set_face_normal(ray, self.normal);
        Some(hit)
    }
}
