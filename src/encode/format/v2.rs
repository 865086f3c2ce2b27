use crate::core::bit_coder::ByteWriter;
use crate::core::unit::MeshExportUnit;
use crate::encode::header::{encode_preamble, HeaderFields};
use crate::encode::Err;
use crate::shared::header::{FormatVersion, INDEX_SIZE_BYTES};

use super::FormatEncoderImpl;

/// The current layout. Vertices carry any number of colour channels and
/// texture-coordinate pairs, announced in the header.
///
/// | offset | size | field |
/// |---|---|---|
/// | 0 | 4 | magic |
/// | 4 | 4 | version tag `0200` |
/// | 8 | 2 | colour channels per vertex |
/// | 10 | 2 | texture-coordinate pairs per vertex |
/// | 12 | 2 | vertex size |
/// | 14 | 2 | index size (2) |
/// | 16 | 4 | vertex count |
/// | 20 | 4 | index count |
pub(crate) struct ShapedEncoder;

impl FormatEncoderImpl for ShapedEncoder {
    fn version(&self) -> FormatVersion {
        FormatVersion::V2_0
    }

    fn check(&self, _unit: &MeshExportUnit) -> Result<(), Err> {
        Ok(())
    }

    fn encode_header<W>(&self, fields: &HeaderFields, writer: &mut W)
        where W: ByteWriter
    {
        encode_preamble(writer, self.version());
        writer.write_u16(fields.color_channels);
        writer.write_u16(fields.tex_coord_pairs);
        writer.write_u16(fields.vertex_size);
        writer.write_u16(INDEX_SIZE_BYTES);
        writer.write_u32(fields.vertex_count);
        writer.write_u32(fields.index_count);
    }
}
