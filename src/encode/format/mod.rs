pub(crate) mod v1;
pub(crate) mod v2;

use crate::core::bit_coder::ByteWriter;
use crate::core::unit::MeshExportUnit;
use crate::shared::header::FormatVersion;

use super::header::HeaderFields;

/// One encoder per binary layout. A new layout is a new variant.
#[enum_dispatch::enum_dispatch(FormatEncoderImpl)]
pub(crate) enum FormatEncoder {
    V1_0(v1::LegacyEncoder),
    V2_0(v2::ShapedEncoder),
}

impl FormatEncoder {
    pub(crate) fn new(version: FormatVersion) -> Self {
        match version {
            FormatVersion::V1_0 => FormatEncoder::V1_0(v1::LegacyEncoder),
            FormatVersion::V2_0 => FormatEncoder::V2_0(v2::ShapedEncoder),
        }
    }
}

#[enum_dispatch::enum_dispatch]
pub(crate) trait FormatEncoderImpl {
    fn version(&self) -> FormatVersion;

    /// Rejects units the layout cannot represent. Called before any byte is written.
    fn check(&self, unit: &MeshExportUnit) -> Result<(), super::Err>;

    /// Writes the header, from the magic bytes up to the index count.
    fn encode_header<W>(&self, fields: &HeaderFields, writer: &mut W)
        where W: ByteWriter;
}

/// Vertex components as 4-byte floats, then indices as 2-byte unsigned shorts.
/// Both layouts share this body.
pub(crate) fn encode_body<W>(unit: &MeshExportUnit, writer: &mut W)
    where W: ByteWriter
{
    for c in unit.flattened_components() {
        writer.write_f32(c);
    }
    // indices were range-checked by `HeaderFields::of`
    for i in unit.flattened_indices() {
        writer.write_u16(i as u16);
    }
}
