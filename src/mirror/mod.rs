//! Textual mirrors of an export: Base64 of the exact binary buffer, and a
//! JSON array `[[colors, tex_coords], components, indices]`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::unit::{MeshExportUnit, VertexAttributes, VertexShape};

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Base64 decoding error: {0}")]
    Base64Error(#[from] base64::DecodeError),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Malformed JSON mirror: {0}")]
    Malformed(String),
    #[error("Component {component} of vertex {vertex} is not finite and cannot be written as JSON")]
    NonFiniteComponent { vertex: usize, component: usize },
}

/// Base64 text of the binary buffer.
pub fn to_base64(buffer: &[u8]) -> String {
    STANDARD.encode(buffer)
}

/// Inverse of [`to_base64`]. Line breaks are ignored, so wrapped text decodes too.
pub fn from_base64(text: &str) -> Result<Vec<u8>, Err> {
    let joined = text.chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .collect::<String>();
    Ok(STANDARD.decode(joined)?)
}

/// Serialized as `[[colors, tex_coords], [components...], [indices...]]`.
#[derive(Serialize, Deserialize)]
struct JsonMirror([usize; 2], Vec<f32>, Vec<usize>);

/// JSON mirror of the unit.
pub fn to_json(unit: &MeshExportUnit) -> Result<String, Err> {
    for (vertex, v) in unit.vertices().iter().enumerate() {
        if let Some(component) = v.components().iter().position(|c| !c.is_finite()) {
            return Err(Err::NonFiniteComponent { vertex, component });
        }
    }

    let shape = unit.shape();
    let mirror = JsonMirror(
        [shape.color_channels, shape.tex_coord_pairs],
        unit.flattened_components().collect(),
        unit.flattened_indices().collect(),
    );
    Ok(serde_json::to_string(&mirror)?)
}

/// Reshapes a JSON mirror back into a unit.
pub fn from_json(text: &str) -> Result<MeshExportUnit, Err> {
    let JsonMirror([color_channels, tex_coord_pairs], components, indices) = serde_json::from_str(text)?;
    // same bound as the 16-bit header fields of the binary
    if color_channels > u16::MAX as usize || tex_coord_pairs > u16::MAX as usize {
        return Err(Err::Malformed(format!(
            "shape [{}, {}] does not fit 16-bit counts",
            color_channels, tex_coord_pairs
        )));
    }
    let shape = VertexShape::new(color_channels, tex_coord_pairs);

    let width = shape.num_components();
    if components.len() % width != 0 {
        return Err(Err::Malformed(format!(
            "{} components do not split into vertices of {} components",
            components.len(), width
        )));
    }
    if indices.len() % 3 != 0 {
        return Err(Err::Malformed(format!("{} indices do not split into triangles", indices.len())));
    }

    let vertices = components.chunks_exact(width)
        .map(|c| VertexAttributes::from_components_unchecked(shape, c.to_vec()))
        .collect::<Vec<_>>();
    let triangles = indices.chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect::<Vec<_>>();

    if vertices.is_empty() && triangles.is_empty() {
        return Ok(MeshExportUnit::empty());
    }
    MeshExportUnit::new(shape, vertices, triangles)
        .map_err(|e| Err::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> MeshExportUnit {
        let vertices = vec![
            VertexAttributes::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], &[[1.0, 0.5, 0.25]], &[]),
            VertexAttributes::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], &[[0.0, 1.0, 0.0]], &[]),
            VertexAttributes::new([0.0, -1.5, 0.0], [0.0, 0.0, 1.0], &[[0.0, 0.0, 1.0]], &[]),
        ];
        MeshExportUnit::new(VertexShape::new(1, 0), vertices, vec![[0, 1, 2], [2, 1, 0]]).unwrap()
    }

    #[test]
    fn json_layout() {
        let json = to_json(&unit()).unwrap();
        assert_eq!(
            json,
            "[[1,0],\
            [0.0,0.0,0.0,0.0,0.0,1.0,1.0,0.5,0.25,\
            1.0,0.0,0.0,0.0,0.0,1.0,0.0,1.0,0.0,\
            0.0,-1.5,0.0,0.0,0.0,1.0,0.0,0.0,1.0],\
            [0,1,2,2,1,0]]"
        );
        assert_eq!(from_json(&json).unwrap(), unit());
    }

    #[test]
    fn json_rejects_nan() {
        let vertices = vec![VertexAttributes::new([0.0, f32::NAN, 0.0], [0.0; 3], &[], &[])];
        let unit = MeshExportUnit::new(VertexShape::BARE, vertices, Vec::new()).unwrap();
        assert!(matches!(to_json(&unit), Err(Err::NonFiniteComponent { vertex: 0, component: 1 })));
    }

    #[test]
    fn json_rejects_ragged_arrays() {
        assert!(matches!(from_json("[[0,0],[1,2,3],[]]"), Err(Err::Malformed(_))));
        assert!(matches!(from_json("[[0,0],[0,0,0,0,0,0],[0,0]]"), Err(Err::Malformed(_))));
        assert!(matches!(from_json("[[0,0],[0,0,0,0,0,0],[0,0,1]]"), Err(Err::Malformed(_))));
        assert!(matches!(from_json("{}"), Err(Err::JsonError(_))));
    }

    #[test]
    fn json_rejects_oversized_shape() {
        assert!(matches!(from_json("[[6148914691236517205,0],[],[]]"), Err(Err::Malformed(_))));
        assert!(matches!(from_json("[[0,65536],[],[]]"), Err(Err::Malformed(_))));
        assert!(from_json("[[65535,65535],[],[]]").unwrap().is_empty());
    }

    #[test]
    fn empty_unit_json() {
        let json = to_json(&MeshExportUnit::empty()).unwrap();
        assert_eq!(json, "[[0,0],[],[]]");
        assert!(from_json(&json).unwrap().is_empty());
    }

    #[test]
    fn base64_tolerates_line_breaks() {
        let bytes = (0..=255).collect::<Vec<u8>>();
        let text = to_base64(&bytes);
        assert!(!text.contains('\n'));
        let wrapped = text.as_bytes()
            .chunks(76)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(from_base64(&wrapped).unwrap(), bytes);
        assert!(matches!(from_base64("not base64!"), Err(Err::Base64Error(_))));
    }
}
