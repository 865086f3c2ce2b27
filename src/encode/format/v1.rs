use crate::core::bit_coder::ByteWriter;
use crate::core::unit::{MeshExportUnit, VertexShape};
use crate::encode::header::{encode_preamble, HeaderFields};
use crate::encode::Err;
use crate::shared::header::{FormatVersion, INDEX_SIZE_BYTES};

use super::FormatEncoderImpl;

/// The first layout: 24-byte vertices holding position and normal only.
///
/// | offset | size | field |
/// |---|---|---|
/// | 0 | 4 | magic |
/// | 4 | 4 | version tag `0100` |
/// | 8 | 2 | vertex size (24) |
/// | 10 | 4 | vertex count |
/// | 14 | 2 | index size (2) |
/// | 16 | 4 | index count |
pub(crate) struct LegacyEncoder;

impl FormatEncoderImpl for LegacyEncoder {
    fn version(&self) -> FormatVersion {
        FormatVersion::V1_0
    }

    fn check(&self, unit: &MeshExportUnit) -> Result<(), Err> {
        if unit.shape() != VertexShape::BARE {
            return Err(Err::UnsupportedShape { version: self.version(), shape: unit.shape() });
        }
        Ok(())
    }

    fn encode_header<W>(&self, fields: &HeaderFields, writer: &mut W)
        where W: ByteWriter
    {
        encode_preamble(writer, self.version());
        writer.write_u16(fields.vertex_size);
        writer.write_u32(fields.vertex_count);
        writer.write_u16(INDEX_SIZE_BYTES);
        writer.write_u32(fields.index_count);
    }
}
