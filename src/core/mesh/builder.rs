use thiserror::Error;

use super::{ColorLayer, CornerLayer, Mesh, MeshVertex, TexCoordLayer};
use crate::core::shared::{FaceIdx, VertexIdx};

pub struct MeshBuilder {
    name: String,
    vertices: Vec<MeshVertex>,
    corners: Vec<VertexIdx>,
    face_starts: Vec<usize>,
    color_layers: Vec<ColorLayer>,
    tex_coord_layers: Vec<TexCoordLayer>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            vertices: Vec::new(),
            corners: Vec::new(),
            face_starts: vec![0],
            color_layers: Vec::new(),
            tex_coord_layers: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn add_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> VertexIdx {
        self.vertices.push(MeshVertex { position, normal });
        self.vertices.len() - 1
    }

    /// Adds a face referencing previously added vertices, in winding order.
    /// Faces of any arity are accepted here; the extractor decides what to do with them.
    pub fn add_face(&mut self, vertices: &[VertexIdx]) -> FaceIdx {
        self.corners.extend_from_slice(vertices);
        self.face_starts.push(self.corners.len());
        self.face_starts.len() - 2
    }

    /// Adds a colour layer holding one RGB value per face-corner.
    pub fn add_color_layer(&mut self, name: &str, values: Vec<[f32; 3]>) {
        self.color_layers.push(CornerLayer::new(name, values));
    }

    /// Adds a texture-coordinate layer holding one UV pair per face-corner.
    pub fn add_tex_coord_layer(&mut self, name: &str, values: Vec<[f32; 2]>) {
        self.tex_coord_layers.push(CornerLayer::new(name, values));
    }

    pub fn build(self) -> Result<Mesh, Err> {
        self.check_face_references()?;
        self.check_layer_sizes()?;

        let Self { name, vertices, corners, face_starts, color_layers, tex_coord_layers } = self;
        Ok(
            Mesh {
                name,
                vertices,
                corners,
                face_starts,
                color_layers,
                tex_coord_layers,
            }
        )
    }

    fn check_face_references(&self) -> Result<(), Err> {
        for face in 0..self.face_starts.len() - 1 {
            let range = self.face_starts[face]..self.face_starts[face + 1];
            for (corner, &vertex) in self.corners[range].iter().enumerate() {
                if vertex >= self.vertices.len() {
                    return Err(Err::FaceVertexOutOfRange {
                        face,
                        corner,
                        vertex,
                        num_vertices: self.vertices.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every layer must cover every face-corner, which keeps the vertex shape
    /// uniform across the whole mesh.
    fn check_layer_sizes(&self) -> Result<(), Err> {
        let expected = self.corners.len();
        let layers = self.color_layers.iter()
            .map(|l| (l.get_name(), l.len()))
            .chain(self.tex_coord_layers.iter().map(|l| (l.get_name(), l.len())));
        for (layer, found) in layers {
            if found != expected {
                return Err(Err::LayerSizeMismatch { layer: layer.to_owned(), expected, found });
            }
        }
        Ok(())
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Corner {corner} of face {face} refers to vertex {vertex}, but the mesh has {num_vertices} vertices")]
    FaceVertexOutOfRange { face: usize, corner: usize, vertex: usize, num_vertices: usize },
    #[error("Layer '{layer}' has {found} values, but the mesh has {expected} face-corners")]
    LayerSizeMismatch { layer: String, expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_and_corners() {
        let mut builder = MeshBuilder::new();
        builder.set_name("quad_and_tri");
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            builder.add_vertex(p, [0.0, 0.0, 1.0]);
        }
        assert_eq!(builder.add_face(&[0, 1, 2, 3]), 0);
        assert_eq!(builder.add_face(&[0, 2, 3]), 1);
        let mesh = builder.build().unwrap();

        assert_eq!(mesh.get_name(), "quad_and_tri");
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_corners(), 7);
        assert_eq!(mesh.get_face(0), &[0, 1, 2, 3]);
        assert_eq!(mesh.face_corners(1), 4..7);
        assert_eq!(mesh.corner_vertex(5), 2);
    }

    #[test]
    fn rejects_dangling_vertex_reference() {
        let mut builder = MeshBuilder::new();
        builder.add_vertex([0.0; 3], [0.0; 3]);
        builder.add_face(&[0, 0, 3]);
        assert_eq!(
            builder.build().unwrap_err(),
            Err::FaceVertexOutOfRange { face: 0, corner: 2, vertex: 3, num_vertices: 1 }
        );
    }

    #[test]
    fn rejects_short_layer() {
        let mut builder = MeshBuilder::new();
        for _ in 0..3 {
            builder.add_vertex([0.0; 3], [0.0; 3]);
        }
        builder.add_face(&[0, 1, 2]);
        builder.add_tex_coord_layer("UVMap", vec![[0.0, 0.0]; 2]);
        assert_eq!(
            builder.build().unwrap_err(),
            Err::LayerSizeMismatch { layer: "UVMap".to_owned(), expected: 3, found: 2 }
        );
    }

    #[test]
    fn empty_mesh_builds() {
        let mesh = MeshBuilder::new().build().unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_faces(), 0);
    }
}
