use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Number of position plus normal components carried by every vertex.
pub const BASE_COMPONENTS: usize = 6;

/// Per-export count of colour channels and texture-coordinate pairs per vertex.
/// It fixes the byte width of every vertex in an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexShape {
    pub color_channels: usize,
    pub tex_coord_pairs: usize,
}

impl VertexShape {
    /// Position and normal only.
    pub const BARE: Self = Self { color_channels: 0, tex_coord_pairs: 0 };

    pub fn new(color_channels: usize, tex_coord_pairs: usize) -> Self {
        Self { color_channels, tex_coord_pairs }
    }

    /// Number of `f32` components of one vertex.
    pub fn num_components(&self) -> usize {
        BASE_COMPONENTS + 3 * self.color_channels + 2 * self.tex_coord_pairs
    }

    /// Size in bytes of one packed vertex.
    pub fn vertex_size_bytes(&self) -> usize {
        4 * self.num_components()
    }
}

impl fmt::Display for VertexShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{colors: {}, tex_coords: {}}}", self.color_channels, self.tex_coord_pairs)
    }
}

/// Canonical identity of a vertex: the raw bits of every component.
/// Two vertices are the same vertex iff their keys are equal, so `0.0` and
/// `-0.0` stay distinct and identical NaN payloads collapse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexKey(Box<[u32]>);

/// The fixed-length component tuple of one vertex:
/// `[px,py,pz, nx,ny,nz, (r,g,b)*colors, (u,v)*tex_coords]`.
#[derive(Clone, Debug)]
pub struct VertexAttributes {
    shape: VertexShape,
    components: Box<[f32]>,
}

impl VertexAttributes {
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        colors: &[[f32; 3]],
        tex_coords: &[[f32; 2]],
    ) -> Self {
        let shape = VertexShape::new(colors.len(), tex_coords.len());
        let mut components = Vec::with_capacity(shape.num_components());
        components.extend_from_slice(&position);
        components.extend_from_slice(&normal);
        colors.iter().for_each(|c| components.extend_from_slice(c));
        tex_coords.iter().for_each(|t| components.extend_from_slice(t));
        Self { shape, components: components.into_boxed_slice() }
    }

    /// Rebuilds a vertex from its flattened components.
    pub fn from_components(shape: VertexShape, components: Vec<f32>) -> Result<Self, Err> {
        if components.len() != shape.num_components() {
            return Err(Err::ComponentCount {
                shape,
                expected: shape.num_components(),
                found: components.len(),
            });
        }
        Ok(Self { shape, components: components.into_boxed_slice() })
    }

    /// `components` must hold exactly `shape.num_components()` values.
    pub(crate) fn from_components_unchecked(shape: VertexShape, components: Vec<f32>) -> Self {
        debug_assert_eq!(components.len(), shape.num_components());
        Self { shape, components: components.into_boxed_slice() }
    }

    pub fn shape(&self) -> VertexShape {
        self.shape
    }

    pub fn components(&self) -> &[f32] {
        &self.components
    }

    pub fn position(&self) -> [f32; 3] {
        [self.components[0], self.components[1], self.components[2]]
    }

    pub fn normal(&self) -> [f32; 3] {
        [self.components[3], self.components[4], self.components[5]]
    }

    pub fn color(&self, channel: usize) -> Option<[f32; 3]> {
        if channel >= self.shape.color_channels {
            return None;
        }
        let i = BASE_COMPONENTS + 3 * channel;
        Some([self.components[i], self.components[i + 1], self.components[i + 2]])
    }

    pub fn tex_coord(&self, pair: usize) -> Option<[f32; 2]> {
        if pair >= self.shape.tex_coord_pairs {
            return None;
        }
        let i = BASE_COMPONENTS + 3 * self.shape.color_channels + 2 * pair;
        Some([self.components[i], self.components[i + 1]])
    }

    pub fn key(&self) -> VertexKey {
        VertexKey(self.components.iter().map(|c| c.to_bits()).collect())
    }
}

impl PartialEq for VertexAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.components.len() == other.components.len()
            && self.components.iter()
                .zip(other.components.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for VertexAttributes {}

impl Hash for VertexAttributes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Three indices into the vertex list of a [`MeshExportUnit`], in source winding order.
pub type Triangle = [usize; 3];

/// Deduplicated, indexed, shape-tagged mesh. This is what the encoders consume.
///
/// Every index of every triangle is less than the number of vertices, and every
/// vertex has the unit's shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshExportUnit {
    shape: VertexShape,
    vertices: Vec<VertexAttributes>,
    triangles: Vec<Triangle>,
}

impl MeshExportUnit {
    pub fn empty() -> Self {
        Self {
            shape: VertexShape::BARE,
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Creates a unit after checking the shape of every vertex and the range of every index.
    pub fn new(shape: VertexShape, vertices: Vec<VertexAttributes>, triangles: Vec<Triangle>) -> Result<Self, Err> {
        if let Some((vertex, v)) = vertices.iter().enumerate().find(|(_, v)| v.shape() != shape) {
            return Err(Err::VertexShapeMismatch { vertex, expected: shape, found: v.shape() });
        }
        for (triangle, t) in triangles.iter().enumerate() {
            if let Some(&index) = t.iter().find(|&&i| i >= vertices.len()) {
                return Err(Err::IndexOutOfRange { triangle, index, num_vertices: vertices.len() });
            }
        }
        Ok(Self { shape, vertices, triangles })
    }

    /// Callers uphold the invariants checked by [`MeshExportUnit::new`].
    pub(crate) fn new_unchecked(shape: VertexShape, vertices: Vec<VertexAttributes>, triangles: Vec<Triangle>) -> Self {
        debug_assert!(vertices.iter().all(|v| v.shape() == shape));
        debug_assert!(triangles.iter().flatten().all(|&i| i < vertices.len()));
        Self { shape, vertices, triangles }
    }

    pub fn shape(&self) -> VertexShape {
        self.shape
    }

    pub fn vertices(&self) -> &[VertexAttributes] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn num_indices(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    /// Every vertex component, vertex after vertex.
    pub fn flattened_components(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().flat_map(|v| v.components().iter().copied())
    }

    /// Every triangle index, triangle after triangle.
    pub fn flattened_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.triangles.iter().flat_map(|t| t.iter().copied())
    }

    pub(crate) fn into_parts(self) -> (VertexShape, Vec<VertexAttributes>, Vec<Triangle>) {
        (self.shape, self.vertices, self.triangles)
    }
}

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("A vertex of shape {shape} needs {expected} components, but {found} were given")]
    ComponentCount { shape: VertexShape, expected: usize, found: usize },
    #[error("Triangle {triangle} refers to vertex {index}, but there are only {num_vertices} vertices")]
    IndexOutOfRange { triangle: usize, index: usize, num_vertices: usize },
    #[error("Vertex {vertex} has shape {found}, expected {expected}")]
    VertexShapeMismatch { vertex: usize, expected: VertexShape, found: VertexShape },
}
