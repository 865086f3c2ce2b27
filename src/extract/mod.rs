//! Attribute extraction: turns the faces of a [`Mesh`] into a stream of
//! face-corners carrying their full attribute tuple, plus triangles over that stream.

use crate::core::mesh::Mesh;
use crate::core::shared::{CornerIdx, FaceIdx};
use crate::core::unit::{VertexAttributes, VertexShape};

/// Triangles of a triangle, by corner position within the face.
const TRIANGLE_FAN: [[usize; 3]; 1] = [[0, 1, 2]];

/// Triangles of a quad, always split from the first corner.
const QUAD_FAN: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// Fan triangulation of a face with `arity` corners, as corner positions.
/// Only triangles and quads are supported.
pub fn fan_triangulation(arity: usize) -> Option<&'static [[usize; 3]]> {
    match arity {
        3 => Some(&TRIANGLE_FAN),
        4 => Some(&QUAD_FAN),
        _ => None,
    }
}

/// One vertex reference of one face with everything gathered for it.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceCorner {
    pub face: FaceIdx,
    /// Position of the corner within its face.
    pub corner: usize,
    pub attributes: VertexAttributes,
}

/// A face left out of the export because it is neither a triangle nor a quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedFace {
    pub face: FaceIdx,
    pub arity: usize,
}

#[derive(Clone, Debug)]
pub struct Extraction {
    pub shape: VertexShape,
    /// Corners of the exported faces, in face order then corner order.
    pub corners: Vec<FaceCorner>,
    /// Triangles as indices into `corners`.
    pub triangles: Vec<[usize; 3]>,
    pub skipped_faces: Vec<SkippedFace>,
}

/// Walks the faces of `mesh` and gathers the attributes of every face-corner.
/// The shape is fixed by the number of layers of the mesh; faces that are not
/// triangles or quads are skipped and reported.
pub fn extract(mesh: &Mesh) -> Extraction {
    let shape = VertexShape::new(
        mesh.get_color_layers().len(),
        mesh.get_tex_coord_layers().len(),
    );

    let mut corners = Vec::with_capacity(mesh.num_corners());
    let mut triangles = Vec::with_capacity(mesh.num_faces() * 2);
    let mut skipped_faces = Vec::new();

    for face in 0..mesh.num_faces() {
        let face_corners = mesh.face_corners(face);
        let Some(fan) = fan_triangulation(face_corners.len()) else {
            log::warn!(
                "Mesh '{}': skipping face {} with {} corners; only triangles and quads are exported",
                mesh.get_name(), face, face_corners.len()
            );
            skipped_faces.push(SkippedFace { face, arity: face_corners.len() });
            continue;
        };

        let base = corners.len();
        for (corner, corner_idx) in face_corners.enumerate() {
            corners.push(FaceCorner {
                face,
                corner,
                attributes: gather(mesh, corner_idx),
            });
        }
        triangles.extend(fan.iter().map(|t| [base + t[0], base + t[1], base + t[2]]));
    }

    log::debug!(
        "Mesh '{}': extracted {} corners, {} triangles, {} faces skipped, shape {}",
        mesh.get_name(), corners.len(), triangles.len(), skipped_faces.len(), shape
    );

    Extraction { shape, corners, triangles, skipped_faces }
}

fn gather(mesh: &Mesh, corner: CornerIdx) -> VertexAttributes {
    let vertex = mesh.get_vertices()[mesh.corner_vertex(corner)];
    let colors = mesh.get_color_layers().iter()
        .map(|layer| layer.get(corner))
        .collect::<Vec<_>>();
    let tex_coords = mesh.get_tex_coord_layers().iter()
        .map(|layer| layer.get(corner))
        .collect::<Vec<_>>();
    VertexAttributes::new(vertex.position, vertex.normal, &colors, &tex_coords)
}
