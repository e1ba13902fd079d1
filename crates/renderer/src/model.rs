//! glTF model import into CPU-side geometry.

use crate::vertex::Vertex;
use engine_core::bounds::BoundingBox;
use glam::{Mat3, Mat4, Vec3};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to import {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("primitive {primitive} of mesh `{mesh}` has no positions")]
    MissingPositions { mesh: String, primitive: usize },
    #[error("primitive {primitive} of mesh `{mesh}` has no normals")]
    MissingNormals { mesh: String, primitive: usize },
    #[error("model contains no geometry")]
    Empty,
}

/// One drawable piece of a model with its material's base colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrimitive {
    pub vertices: Vec<Vertex>,
    /// `None` for non-indexed primitives.
    pub indices: Option<Vec<u32>>,
    pub color: Vec3,
}

/// Imported model, flattened to model space.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub primitives: Vec<ModelPrimitive>,
    pub bounds: BoundingBox,
}

impl ModelData {
    /// Import a `.gltf`/`.glb` file. Node transforms of the default scene are
    /// baked into the vertices.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let (document, buffers, _images) = gltf::import(path).map_err(|source| AssetError::Import {
            path: path.to_path_buf(),
            source,
        })?;

        let mut primitives = Vec::new();
        let scene = document.default_scene().or_else(|| document.scenes().next());
        if let Some(scene) = scene {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &buffers, &mut primitives)?;
            }
        }

        let model = Self::from_primitives(primitives)?;
        log::info!(
            "Loaded {} ({} primitives, bounds {:?}..{:?})",
            path.display(),
            model.primitives.len(),
            model.bounds.min,
            model.bounds.max
        );
        Ok(model)
    }

    /// Wrap already-built primitives, computing the bounding box.
    pub fn from_primitives(primitives: Vec<ModelPrimitive>) -> Result<Self, AssetError> {
        let points = primitives
            .iter()
            .flat_map(|p| p.vertices.iter())
            .map(|v| Vec3::from(v.position));
        let bounds = BoundingBox::from_points(points).ok_or(AssetError::Empty)?;
        Ok(Self { primitives, bounds })
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices.len()).sum()
    }
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<ModelPrimitive>,
) -> Result<(), AssetError> {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for (index, primitive) in mesh.primitives().enumerate() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

            let positions = reader.read_positions().ok_or_else(|| AssetError::MissingPositions {
                mesh: mesh_name.clone(),
                primitive: index,
            })?;
            let normals = reader.read_normals().ok_or_else(|| AssetError::MissingNormals {
                mesh: mesh_name.clone(),
                primitive: index,
            })?;

            let vertices = positions
                .zip(normals)
                .map(|(p, n)| {
                    let position = transform.transform_point3(Vec3::from(p));
                    let normal = (normal_matrix * Vec3::from(n)).normalize_or_zero();
                    Vertex::new(position.to_array(), normal.to_array())
                })
                .collect();

            let indices = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect());

            let [r, g, b, _] = primitive.material().pbr_metallic_roughness().base_color_factor();

            out.push(ModelPrimitive {
                vertices,
                indices,
                color: Vec3::new(r, g, b),
            });
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(offset: f32) -> ModelPrimitive {
        let n = [0.0, 0.0, 1.0];
        ModelPrimitive {
            vertices: vec![
                Vertex::new([offset, 0.0, 0.0], n),
                Vertex::new([offset + 1.0, 0.0, 0.0], n),
                Vertex::new([offset + 1.0, 2.0, 0.5], n),
                Vertex::new([offset, 2.0, 0.5], n),
            ],
            indices: Some(vec![0, 1, 2, 0, 2, 3]),
            color: Vec3::ONE,
        }
    }

    #[test]
    fn bounds_span_all_primitives() {
        let model = ModelData::from_primitives(vec![quad(0.0), quad(-3.0)]).unwrap();
        assert_eq!(model.bounds.min, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(model.bounds.max, Vec3::new(1.0, 2.0, 0.5));
        assert_eq!(model.vertex_count(), 8);
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(matches!(ModelData::from_primitives(Vec::new()), Err(AssetError::Empty)));
    }

    #[test]
    fn loads_bundled_rocket() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/rocket/rocket.gltf");
        let model = ModelData::load(path).unwrap();
        assert_eq!(model.primitives.len(), 2);
        assert_eq!(model.bounds.min, Vec3::new(-40.0, -40.0, 0.0));
        assert_eq!(model.bounds.max, Vec3::new(40.0, 40.0, 420.0));
        assert_eq!(model.primitives[1].color, Vec3::new(0.8, 0.15, 0.1));
        for v in model.primitives.iter().flat_map(|p| &p.vertices) {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let err = ModelData::load("does/not/exist.gltf").unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }));
        assert!(err.to_string().contains("exist.gltf"));
    }
}
