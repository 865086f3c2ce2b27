//! Vertex deduplication and index building.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::core::unit::{MeshExportUnit, Triangle, VertexAttributes, VertexKey, VertexShape};
use crate::extract::Extraction;

/// Assigns sequential indices to distinct attribute tuples in first-seen order.
/// The identity map lives only as long as one unit is being built.
pub struct VertexDeduplicator {
    shape: VertexShape,
    map: IndexMap<VertexKey, VertexAttributes>,
}

impl VertexDeduplicator {
    pub fn new(shape: VertexShape) -> Self {
        Self { shape, map: IndexMap::new() }
    }

    /// Returns the index of `attributes`, inserting it if it has not been seen yet.
    pub fn index_of(&mut self, attributes: VertexAttributes) -> usize {
        debug_assert_eq!(attributes.shape(), self.shape);
        match self.map.entry(attributes.key()) {
            Entry::Occupied(e) => e.index(),
            Entry::Vacant(e) => {
                let idx = e.index();
                e.insert(attributes);
                idx
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Finishes the vertex list. The identity map is dropped here.
    pub fn finish(self, triangles: Vec<Triangle>) -> MeshExportUnit {
        let vertices = self.map.into_values().collect::<Vec<_>>();
        if vertices.is_empty() {
            return MeshExportUnit::empty();
        }
        MeshExportUnit::new_unchecked(self.shape, vertices, triangles)
    }
}

/// Builds the export unit of one object from its extraction.
pub fn build_unit(extraction: Extraction) -> MeshExportUnit {
    let Extraction { shape, corners, triangles, .. } = extraction;
    let num_corners = corners.len();

    let mut dedup = VertexDeduplicator::new(shape);
    let remap = corners.into_iter()
        .map(|c| dedup.index_of(c.attributes))
        .collect::<Vec<_>>();
    let triangles = triangles.into_iter()
        .map(|[a, b, c]| [remap[a], remap[b], remap[c]])
        .collect::<Vec<_>>();

    log::debug!(
        "Deduplicated {} corners into {} vertices",
        num_corners, dedup.len()
    );
    dedup.finish(triangles)
}

/// Concatenates independently built units. Vertices are appended in input
/// order and the triangle indices of each unit are offset by the number of
/// vertices appended before it. Vertices are never shared between units.
///
/// Units without vertices do not constrain the shape.
pub fn merge<I>(units: I) -> Result<MeshExportUnit, Err>
    where I: IntoIterator<Item = MeshExportUnit>
{
    let mut shape: Option<VertexShape> = None;
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for (object, unit) in units.into_iter().enumerate() {
        if unit.vertices().is_empty() {
            continue;
        }
        let expected = *shape.get_or_insert(unit.shape());
        if unit.shape() != expected {
            return Err(Err::ShapeMismatch { object, expected, found: unit.shape() });
        }

        let offset = vertices.len();
        let (_, unit_vertices, unit_triangles) = unit.into_parts();
        vertices.extend(unit_vertices);
        triangles.extend(
            unit_triangles.into_iter().map(|[a, b, c]| [a + offset, b + offset, c + offset])
        );
    }

    Ok(match shape {
        Some(shape) => MeshExportUnit::new_unchecked(shape, vertices, triangles),
        None => MeshExportUnit::empty(),
    })
}

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Object {object} has vertex shape {found}, but the objects before it have {expected}")]
    ShapeMismatch { object: usize, expected: VertexShape, found: VertexShape },
}
