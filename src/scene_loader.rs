//! Parses a declarative YAML scene document and populates a [`Scene`] by
//! calling its `add_*` methods.

use crate::camera::CameraConfig;
use crate::codec;
use crate::error::EngineError;
use crate::material::{Albedo, Dielectric, DiffuseLight, Lambertian, Material, Metal};
use crate::math::Color;
use crate::scene::{Object, Scene, Skybox, TextureId};
use crate::texture::{ImageSource, Texture};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

type ColorDoc = [f64; 3];

fn color_of(c: ColorDoc) -> Color {
    Color::new(c[0], c[1], c[2])
}

#[derive(Debug, Deserialize)]
struct SceneDocument {
    camera: CameraDoc,
    output: OutputDoc,
    #[serde(default)]
    textures: HashMap<String, TextureDoc>,
    materials: HashMap<String, MaterialDoc>,
    objects: Vec<ObjectDoc>,
    #[serde(default)]
    skybox: Option<SkyboxDoc>,
}

#[derive(Debug, Deserialize)]
struct CameraDoc {
    samples: u32,
    bounces: u32,
    position: ColorDoc,
    look_at: ColorDoc,
    #[serde(default = "default_fov")]
    fov: f64,
    #[serde(default)]
    defocus_angle: f64,
    #[serde(default = "default_focus_dist")]
    focus_dist: f64,
}

fn default_fov() -> f64 {
    40.0
}

fn default_focus_dist() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
struct OutputDoc {
    width: u32,
    height: u32,
    file_name: String,
}

/// The populated camera configuration and output parameters a loaded
/// scene document carries, alongside the `Scene` arena itself.
pub struct LoadedScene {
    pub scene: Scene,
    pub camera: CameraConfig,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TextureDoc {
    Solid {
        color: ColorDoc,
    },
    Checker3d {
        scale: f64,
        even: String,
        odd: String,
    },
    CheckerUv {
        scale: f64,
        even: String,
        odd: String,
    },
    Image {
        path: String,
        #[serde(default)]
        is_hdr: bool,
        #[serde(default = "default_hdr_range")]
        hdr_range: f64,
    },
    Cubemap {
        /// Paths in +X, -X, +Y, -Y, +Z, -Z order.
        faces: [String; 6],
    },
}

fn default_hdr_range() -> f64 {
    f64::INFINITY
}

// `AlbedoDoc`'s fields are duplicated into each variant below, rather than
// `#[serde(flatten)]`-ed in, since serde's internally tagged enums
// (`tag = "type"`) don't reliably support flattened fields in a variant.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MaterialDoc {
    Plastic {
        #[serde(default)]
        albedo: Option<ColorDoc>,
        #[serde(default)]
        texture: Option<String>,
        #[serde(default)]
        smoothness: f64,
        #[serde(default)]
        specular_probability: f64,
        #[serde(default)]
        normal_map: Option<String>,
        #[serde(default = "default_normal_strength")]
        normal_strength: f64,
    },
    Metal {
        #[serde(default)]
        albedo: Option<ColorDoc>,
        #[serde(default)]
        texture: Option<String>,
        #[serde(default)]
        smoothness: f64,
    },
    Glass {
        ior: f64,
        #[serde(default = "default_white")]
        tint: ColorDoc,
        #[serde(default)]
        smoothness: f64,
    },
    Light {
        #[serde(default)]
        albedo: Option<ColorDoc>,
        #[serde(default)]
        texture: Option<String>,
    },
}

fn default_normal_strength() -> f64 {
    1.0
}

fn default_white() -> ColorDoc {
    [1.0, 1.0, 1.0]
}

fn resolve_albedo(
    albedo: Option<ColorDoc>,
    texture: &Option<String>,
    textures: &HashMap<String, TextureId>,
) -> Result<Albedo, EngineError> {
    if let Some(name) = texture {
        let id = *textures
            .get(name)
            .ok_or_else(|| EngineError::Configuration(format!("unknown texture reference: {name}")))?;
        Ok(Albedo::Texture(id))
    } else if let Some(c) = albedo {
        Ok(Albedo::Color(color_of(c)))
    } else {
        Err(EngineError::Configuration(
            "material references neither `albedo` nor `texture`".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ObjectDoc {
    Sphere {
        center: ColorDoc,
        radius: f64,
        material: String,
    },
    Quad {
        q: ColorDoc,
        u: ColorDoc,
        v: ColorDoc,
        material: String,
        #[serde(default)]
        one_sided: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SkyboxDoc {
    Color(ColorDoc),
    Texture { texture: String },
}

/// Parses `path` and builds a [`Scene`] plus the derived camera/output
/// configuration. Resolves texture/material name references eagerly — an
/// unknown reference is a configuration error, not a deferred panic.
pub fn load_scene(path: &Path) -> Result<LoadedScene, EngineError> {
    let contents = std::fs::read_to_string(path)?;
    let doc: SceneDocument = serde_yaml::from_str(&contents)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut scene = Scene::new();
    let mut texture_ids: HashMap<String, TextureId> = HashMap::new();
    let mut in_progress: HashSet<String> = HashSet::new();

    // Textures may reference each other by name in either declaration order
    // (checkers reference child textures, which may appear earlier or later
    // in the document); resolve recursively with memoization rather than
    // assuming a single top-to-bottom pass happens to match `HashMap`'s
    // unspecified iteration order.
    for name in doc.textures.keys() {
        resolve_texture(name, &doc.textures, base_dir, &mut scene, &mut texture_ids, &mut in_progress)?;
    }

    let mut material_ids = HashMap::new();
    for (name, doc) in &doc.materials {
        let material = build_material(doc, &texture_ids)?;
        let id = scene.add_material(material);
        material_ids.insert(name.clone(), id);
    }

    for object in &doc.objects {
        scene.add_object(build_object(object, &material_ids)?);
    }

    if let Some(skybox) = &doc.skybox {
        scene.set_skybox(build_skybox(skybox, &texture_ids)?);
    }

    let camera = CameraConfig {
        samples: doc.camera.samples,
        max_depth: doc.camera.bounces,
        look_from: color_of(doc.camera.position),
        look_at: color_of(doc.camera.look_at),
        vfov_degrees: doc.camera.fov,
        defocus_angle_degrees: doc.camera.defocus_angle,
        focus_dist: doc.camera.focus_dist,
    };

    Ok(LoadedScene {
        scene,
        camera,
        width: doc.output.width,
        height: doc.output.height,
        file_name: doc.output.file_name,
    })
}

/// Resolves texture `name` to its arena id, building it (and recursively any
/// textures it references) on first use. Already-built textures are served
/// from `texture_ids`; `in_progress` detects reference cycles.
fn resolve_texture(
    name: &str,
    docs: &HashMap<String, TextureDoc>,
    base_dir: &Path,
    scene: &mut Scene,
    texture_ids: &mut HashMap<String, TextureId>,
    in_progress: &mut HashSet<String>,
) -> Result<TextureId, EngineError> {
    if let Some(id) = texture_ids.get(name) {
        return Ok(*id);
    }
    if !in_progress.insert(name.to_string()) {
        return Err(EngineError::Configuration(format!(
            "cyclic texture reference involving `{name}`"
        )));
    }

    let doc = docs
        .get(name)
        .ok_or_else(|| EngineError::Configuration(format!("unknown texture reference: {name}")))?;
    let texture = build_texture(doc, base_dir, docs, scene, texture_ids, in_progress)?;

    in_progress.remove(name);
    let id = scene.add_texture(texture);
    texture_ids.insert(name.to_string(), id);
    Ok(id)
}

fn build_texture(
    doc: &TextureDoc,
    base_dir: &Path,
    docs: &HashMap<String, TextureDoc>,
    scene: &mut Scene,
    texture_ids: &mut HashMap<String, TextureId>,
    in_progress: &mut HashSet<String>,
) -> Result<Texture, EngineError> {
    Ok(match doc {
        TextureDoc::Solid { color } => Texture::Solid(color_of(*color)),
        TextureDoc::Checker3d { scale, even, odd } => Texture::Checker3D {
            scale: *scale,
            even: resolve_texture(even, docs, base_dir, scene, texture_ids, in_progress)?,
            odd: resolve_texture(odd, docs, base_dir, scene, texture_ids, in_progress)?,
        },
        TextureDoc::CheckerUv { scale, even, odd } => Texture::CheckerUv {
            scale: *scale,
            even: resolve_texture(even, docs, base_dir, scene, texture_ids, in_progress)?,
            odd: resolve_texture(odd, docs, base_dir, scene, texture_ids, in_progress)?,
        },
        TextureDoc::Image {
            path,
            is_hdr,
            hdr_range,
        } => {
            let full_path = resolve_asset_path(base_dir, path);
            let source = if *is_hdr {
                ImageSource::Hdr {
                    image: codec::load_hdr(&full_path)?,
                    hdr_range: *hdr_range,
                }
            } else {
                ImageSource::Ldr(codec::load_image(&full_path)?)
            };
            Texture::ImageTex(source)
        }
        TextureDoc::Cubemap { faces } => {
            let mut loaded: Vec<ImageSource> = Vec::with_capacity(6);
            for face_path in faces {
                let full_path = resolve_asset_path(base_dir, face_path);
                loaded.push(ImageSource::Ldr(codec::load_image(&full_path)?));
            }
            let faces: [ImageSource; 6] = loaded
                .try_into()
                .unwrap_or_else(|_| unreachable!("exactly six face paths were parsed"));
            Texture::Cubemap { faces }
        }
    })
}

fn resolve_asset_path(base_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}

fn build_material(doc: &MaterialDoc, textures: &HashMap<String, TextureId>) -> Result<Material, EngineError> {
    Ok(match doc {
        MaterialDoc::Plastic {
            albedo,
            texture,
            smoothness,
            specular_probability,
            normal_map,
            normal_strength,
        } => {
            let normal_map = normal_map
                .as_ref()
                .map(|name| {
                    textures.get(name).copied().ok_or_else(|| {
                        EngineError::Configuration(format!("unknown texture reference: {name}"))
                    })
                })
                .transpose()?;
            Material::Lambertian(Lambertian {
                albedo: resolve_albedo(*albedo, texture, textures)?,
                smoothness: *smoothness,
                specular_probability: *specular_probability,
                normal_map,
                normal_strength: *normal_strength,
            })
        }
        MaterialDoc::Metal {
            albedo,
            texture,
            smoothness,
        } => Material::Metal(Metal {
            albedo: resolve_albedo(*albedo, texture, textures)?,
            smoothness: *smoothness,
        }),
        MaterialDoc::Glass {
            ior,
            tint,
            smoothness,
        } => Material::Dielectric(Dielectric {
            ior: *ior,
            tint: color_of(*tint),
            smoothness: *smoothness,
        }),
        MaterialDoc::Light { albedo, texture } => Material::DiffuseLight(DiffuseLight {
            emission: resolve_albedo(*albedo, texture, textures)?,
        }),
    })
}

fn build_object(doc: &ObjectDoc, materials: &HashMap<String, usize>) -> Result<Object, EngineError> {
    let resolve = |name: &str| -> Result<usize, EngineError> {
        materials
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::Configuration(format!("unknown material reference: {name}")))
    };

    Ok(match doc {
        ObjectDoc::Sphere {
            center,
            radius,
            material,
        } => Object::Sphere(crate::hittable::Sphere::new(
            color_of(*center),
            *radius,
            resolve(material)?,
        )),
        ObjectDoc::Quad {
            q,
            u,
            v,
            material,
            one_sided,
        } => Object::Quad(crate::hittable::Quad::new(
            color_of(*q),
            color_of(*u),
            color_of(*v),
            resolve(material)?,
            *one_sided,
        )),
    })
}

fn build_skybox(doc: &SkyboxDoc, textures: &HashMap<String, TextureId>) -> Result<Skybox, EngineError> {
    Ok(match doc {
        SkyboxDoc::Color(c) => Skybox::Color(color_of(*c)),
        SkyboxDoc::Texture { texture } => {
            let id = textures.get(texture).copied().ok_or_else(|| {
                EngineError::Configuration(format!("unknown texture reference: {texture}"))
            })?;
            Skybox::Texture(id)
        }
    })
}
