//! Models that can be bound to joints, loaded from glTF files.

use std::path::Path;

use glam::Vec3;

use crate::environment::error::ModelError;
use crate::utils::FileUtils;

/// Triangle geometry of a model together with its bounds.
#[derive(Debug, Default, Clone)]
pub struct Model {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub aabb_min: Vec3,
    pub aabb_max: Vec3,
}

impl Model {
    pub fn from_geometry<S: Into<String>>(
        name: S, positions: Vec<Vec3>, indices: Vec<u32>,
    ) -> Result<Self, ModelError> {
        let name = name.into();

        if positions.is_empty() || indices.len() < 3 {
            return Err(ModelError::NoGeometry(name));
        }

        let (aabb_min, aabb_max) = positions
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(min, max), p| {
                (min.min(*p), max.max(*p))
            });

        Ok(Model { name, positions, indices, aabb_min, aabb_max })
    }

    /// Scales the geometry in place, bounds included.
    pub fn scaled(mut self, factor: f32) -> Self {
        for p in self.positions.iter_mut() {
            *p *= factor;
        }
        self.aabb_min *= factor;
        self.aabb_max *= factor;
        self
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.positions.get(tri[0] as usize)?,
                *self.positions.get(tri[1] as usize)?,
                *self.positions.get(tri[2] as usize)?,
            ])
        })
    }
}

pub trait MeshLoader {
    fn load_model(&self, path: &Path) -> Result<Model, ModelError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GltfLoader;

impl MeshLoader for GltfLoader {
    fn load_model(&self, path: &Path) -> Result<Model, ModelError> {
        let (document, buffers, _images) = gltf::import(path)?;

        let mut positions: Vec<Vec3> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

                let primitive_positions: Vec<Vec3> = reader
                    .read_positions()
                    .map(|iter| iter.map(Vec3::from_array).collect())
                    .unwrap_or_default();

                if primitive_positions.is_empty() {
                    continue;
                }

                let base = positions.len() as u32;
                let count = primitive_positions.len() as u32;

                match reader.read_indices() {
                    Some(read) => indices.extend(read.into_u32().map(|i| i + base)),
                    None => indices.extend(base..base + count),
                }

                positions.extend(primitive_positions);
            }
        }

        log::debug!(
            "Imported {} with {} vertices and {} triangles",
            FileUtils::pts(path),
            positions.len(),
            indices.len() / 3
        );

        Model::from_geometry(FileUtils::file_name(path), positions, indices)
    }
}
