use crate::core::bit_coder::ByteWriter;
use crate::core::unit::{MeshExportUnit, VertexShape};
use crate::shared::header::{FormatVersion, MAGIC};

/// Header values of a unit, range-checked against their on-disk widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeaderFields {
    pub color_channels: u16,
    pub tex_coord_pairs: u16,
    pub vertex_size: u16,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl HeaderFields {
    /// Checks every value that ends up in the header and every index of the
    /// unit. Runs before anything is written.
    pub(crate) fn of(unit: &MeshExportUnit) -> Result<Self, Err> {
        let shape = unit.shape();
        let too_large = || Err::ShapeTooLarge(shape);
        let color_channels = u16::try_from(shape.color_channels).map_err(|_| too_large())?;
        let tex_coord_pairs = u16::try_from(shape.tex_coord_pairs).map_err(|_| too_large())?;
        let vertex_size = u16::try_from(shape.vertex_size_bytes()).map_err(|_| too_large())?;

        let vertex_count = u32::try_from(unit.vertices().len())
            .map_err(|_| Err::VertexCountOverflow(unit.vertices().len()))?;
        let index_count = u32::try_from(unit.num_indices())
            .map_err(|_| Err::IndexCountOverflow(unit.num_indices()))?;

        for (triangle, t) in unit.triangles().iter().enumerate() {
            if let Some(&index) = t.iter().find(|&&i| i > u16::MAX as usize) {
                return Err(Err::IndexOverflow { triangle, index });
            }
        }

        Ok(Self { color_channels, tex_coord_pairs, vertex_size, vertex_count, index_count })
    }
}

/// Writes the magic bytes and the version tag.
pub(crate) fn encode_preamble<W>(writer: &mut W, version: FormatVersion)
    where W: ByteWriter
{
    writer.write_bytes(&MAGIC);
    version.write_to(writer);
}

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("{0} indices do not fit the 32-bit index count")]
    IndexCountOverflow(usize),
    #[error("Triangle {triangle} uses index {index}, which does not fit in 16 bits")]
    IndexOverflow { triangle: usize, index: usize },
    #[error("Vertex shape {0} does not fit the header")]
    ShapeTooLarge(VertexShape),
    #[error("{0} vertices do not fit the 32-bit vertex count")]
    VertexCountOverflow(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::VertexAttributes;

    fn points(n: usize) -> Vec<VertexAttributes> {
        (0..n).map(|i| VertexAttributes::new([i as f32, 0.0, 0.0], [0.0; 3], &[], &[])).collect()
    }

    #[test]
    fn largest_short_index_is_accepted() {
        let unit = MeshExportUnit::new(VertexShape::BARE, points(65537), vec![[0, 65535, 1]]).unwrap();
        let fields = HeaderFields::of(&unit).unwrap();
        assert_eq!(fields.vertex_count, 65537);
        assert_eq!(fields.index_count, 3);
        assert_eq!(fields.vertex_size, 24);
    }

    #[test]
    fn index_past_u16_is_rejected() {
        let unit = MeshExportUnit::new(VertexShape::BARE, points(65537), vec![[0, 1, 2], [0, 65536, 1]]).unwrap();
        assert_eq!(
            HeaderFields::of(&unit).unwrap_err(),
            Err::IndexOverflow { triangle: 1, index: 65536 }
        );
    }

    #[test]
    fn oversized_shape_is_rejected() {
        let shape = VertexShape::new(70_000, 0);
        let unit = MeshExportUnit::new(shape, Vec::new(), Vec::new()).unwrap();
        assert_eq!(HeaderFields::of(&unit).unwrap_err(), Err::ShapeTooLarge(shape));
    }

    #[test]
    fn preamble_bytes() {
        let mut out = Vec::new();
        encode_preamble(&mut out, FormatVersion::V2_0);
        assert_eq!(out, b"C2G\00200".to_vec());
    }
}
