// use tobj to load the obj file without triangulating, so quads reach the extractor intact
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use crate::core::mesh::builder::MeshBuilder;
use crate::core::mesh::Mesh;
use crate::core::shared::VertexIdx;

#[remain::sorted]
#[derive(Debug, thiserror::Error, Clone)]
pub enum Err {
    #[error("Object '{object}' refers to {kind} {index}, but only {len} are defined")]
    IndexOutOfRange { object: String, kind: &'static str, index: u32, len: usize },
    #[error("OBJ loading error: {0}")]
    LoadError(#[from] tobj::LoadError),
    #[error("Mesh Builder Error: {0}")]
    MeshBuilderError(#[from] crate::core::mesh::builder::Err),
}

/// Loads every object of the OBJ file as one mesh, in file order.
/// Points and lines are dropped.
pub fn load_obj<P: AsRef<Path> + Debug>(path: P) -> Result<Vec<Mesh>, Err> {
    let op = tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path.as_ref(), &op)?;
    log::debug!("Loaded {} objects from {:?}", models.len(), path);
    models.iter().map(load_model).collect()
}

fn load_model(model: &tobj::Model) -> Result<Mesh, Err> {
    let mesh = &model.mesh;
    let object = model.name.as_str();

    // tobj leaves `face_arities` empty when every face is a triangle
    let arities = if mesh.face_arities.is_empty() {
        vec![3; mesh.indices.len() / 3]
    } else {
        mesh.face_arities.iter().map(|&a| a as usize).collect()
    };
    let has_normals = mesh.normal_indices.len() == mesh.indices.len();
    let has_tex_coords = mesh.texcoord_indices.len() == mesh.indices.len();
    let has_colors = !mesh.vertex_color.is_empty();
    if !has_normals {
        log::info!("Object '{}' has no normals, zero normals are exported", object);
    }

    let mut builder = MeshBuilder::new();
    builder.set_name(object);
    let mut vertex_ids = HashMap::<(u32, Option<u32>), VertexIdx>::new();
    let mut tex_coords = Vec::new();
    let mut colors = Vec::new();

    let mut start = 0;
    for arity in arities {
        let mut face = Vec::with_capacity(arity);
        for corner in start..start + arity {
            let position_idx = mesh.indices[corner];
            let normal_idx = has_normals.then(|| mesh.normal_indices[corner]);

            let vertex = match vertex_ids.get(&(position_idx, normal_idx)) {
                Some(&vertex) => vertex,
                None => {
                    let position = vec3(&mesh.positions, position_idx, object, "position")?;
                    let normal = match normal_idx {
                        Some(idx) => vec3(&mesh.normals, idx, object, "normal")?,
                        None => [0.0; 3],
                    };
                    let vertex = builder.add_vertex(position, normal);
                    vertex_ids.insert((position_idx, normal_idx), vertex);
                    vertex
                }
            };
            face.push(vertex);

            if has_tex_coords {
                tex_coords.push(vec2(&mesh.texcoords, mesh.texcoord_indices[corner], object)?);
            }
            if has_colors {
                colors.push(vec3(&mesh.vertex_color, position_idx, object, "vertex colour")?);
            }
        }
        builder.add_face(&face);
        start += arity;
    }

    if has_colors {
        builder.add_color_layer("Col", colors);
    }
    if has_tex_coords {
        builder.add_tex_coord_layer("UVMap", tex_coords);
    }
    Ok(builder.build()?)
}

fn vec3(data: &[f32], index: u32, object: &str, kind: &'static str) -> Result<[f32; 3], Err> {
    let i = 3 * index as usize;
    match data.get(i..i + 3) {
        Some(x) => Ok([x[0], x[1], x[2]]),
        None => Err(Err::IndexOutOfRange { object: object.to_owned(), kind, index, len: data.len() / 3 }),
    }
}

fn vec2(data: &[f32], index: u32, object: &str) -> Result<[f32; 2], Err> {
    let i = 2 * index as usize;
    match data.get(i..i + 2) {
        Some(x) => Ok([x[0], x[1]]),
        None => Err(Err::IndexOutOfRange {
            object: object.to_owned(),
            kind: "texture coordinate",
            index,
            len: data.len() / 2,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_keeps_quads() {
        let meshes = load_obj("tests/data/cube.obj").unwrap();
        assert_eq!(meshes.len(), 1);
        let cube = &meshes[0];
        assert_eq!(cube.get_name(), "Cube");
        assert_eq!(cube.num_faces(), 6);
        assert!((0..6).all(|f| cube.get_face(f).len() == 4));
        // every position is shared by three faces with different normals
        assert_eq!(cube.get_vertices().len(), 24);
        assert!(cube.get_tex_coord_layers().is_empty());
        assert!(cube.get_color_layers().is_empty());
    }

    #[test]
    fn tex_coords_are_per_corner() {
        let meshes = load_obj("tests/data/uv_triangle.obj").unwrap();
        let mesh = &meshes[0];
        assert_eq!(mesh.get_vertices().len(), 3);
        let layers = mesh.get_tex_coord_layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].len(), 3);
        assert_eq!(layers[0].get(1), [1.0, 0.0]);
        assert_eq!(mesh.get_vertices()[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn objects_are_loaded_in_order() {
        let meshes = load_obj("tests/data/mixed.obj").unwrap();
        let names = meshes.iter().map(|m| m.get_name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Pentagon", "Triangle"]);
        assert_eq!(meshes[0].get_face(0).len(), 5);
        // the line element is ignored
        assert_eq!(meshes[1].num_faces(), 1);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(load_obj("tests/data/does_not_exist.obj"), Err(Err::LoadError(_))));
    }
}
