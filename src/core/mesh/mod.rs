pub mod builder;

use std::ops::Range;

use super::shared::{CornerIdx, FaceIdx, VertexIdx};

/// A mesh vertex as the host application stores it: colours and texture
/// coordinates are not vertex data, they live on face-corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// One value per face-corner, in face order then corner order.
#[derive(Clone, Debug, PartialEq)]
pub struct CornerLayer<const N: usize> {
    name: String,
    values: Vec<[f32; N]>,
}

impl<const N: usize> CornerLayer<N> {
    pub fn new(name: &str, values: Vec<[f32; N]>) -> Self {
        Self { name: name.to_owned(), values }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, corner: CornerIdx) -> [f32; N] {
        self.values[corner]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub type ColorLayer = CornerLayer<3>;
pub type TexCoordLayer = CornerLayer<2>;

/// Plain, immutable description of a polygonal mesh.
/// Construct it with [`builder::MeshBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<MeshVertex>,
    /// Vertex reference of every face-corner.
    corners: Vec<VertexIdx>,
    /// `face_starts[f]..face_starts[f+1]` are the corners of face `f`.
    face_starts: Vec<CornerIdx>,
    color_layers: Vec<ColorLayer>,
    tex_coord_layers: Vec<TexCoordLayer>,
}

impl Mesh {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn get_vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn num_faces(&self) -> usize {
        self.face_starts.len() - 1
    }

    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    /// Corner indices of the face, usable with the layers of this mesh.
    pub fn face_corners(&self, face: FaceIdx) -> Range<CornerIdx> {
        self.face_starts[face]..self.face_starts[face + 1]
    }

    /// Vertex references of the face, in winding order.
    pub fn get_face(&self, face: FaceIdx) -> &[VertexIdx] {
        &self.corners[self.face_corners(face)]
    }

    pub fn corner_vertex(&self, corner: CornerIdx) -> VertexIdx {
        self.corners[corner]
    }

    pub fn get_color_layers(&self) -> &[ColorLayer] {
        &self.color_layers
    }

    pub fn get_tex_coord_layers(&self) -> &[TexCoordLayer] {
        &self.tex_coord_layers
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.num_faces() == 0
    }
}
