pub(crate) mod format;
pub(crate) mod header;

use thiserror::Error;

use crate::core::bit_coder::ByteWriter;
use crate::core::shared::ConfigType;
use crate::core::unit::{MeshExportUnit, VertexShape};
use crate::shared::header::FormatVersion;
use format::{FormatEncoder, FormatEncoderImpl};
use header::HeaderFields;

#[derive(Debug, Clone)]
pub struct Config {
    pub format_version: FormatVersion,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            format_version: FormatVersion::default(),
        }
    }
}

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Header encoding error: {0}")]
    HeaderError(#[from] header::Err),
    #[error("Format {version} cannot carry vertices of shape {shape}")]
    UnsupportedShape { version: FormatVersion, shape: VertexShape },
}

/// Number of bytes `encode` writes for `unit` in the given layout.
pub fn encoded_len(unit: &MeshExportUnit, version: FormatVersion) -> usize {
    version.header_size()
        + unit.vertices().len() * unit.shape().vertex_size_bytes()
        + unit.num_indices() * 2
}

/// Encodes the unit into the provided byte stream using the provided configuration.
/// The unit is fully validated before the first byte is written.
pub fn encode<W>(unit: &MeshExportUnit, writer: &mut W, cfg: &Config) -> Result<(), Err>
    where W: ByteWriter
{
    let encoder = FormatEncoder::new(cfg.format_version);

    let fields = HeaderFields::of(unit)?;
    encoder.check(unit)?;

    encoder.encode_header(&fields, writer);
    format::encode_body(unit, writer);
    Ok(())
}

/// Encodes the unit into a freshly allocated buffer.
pub fn encode_to_vec(unit: &MeshExportUnit, cfg: &Config) -> Result<Vec<u8>, Err> {
    let mut buffer = Vec::with_capacity(encoded_len(unit, cfg.format_version));
    encode(unit, &mut buffer, cfg)?;
    debug_assert_eq!(buffer.len(), encoded_len(unit, cfg.format_version));
    log::debug!(
        "Encoded {} vertices and {} indices into {} bytes (format {})",
        unit.vertices().len(), unit.num_indices(), buffer.len(), cfg.format_version
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::VertexAttributes;

    fn single_triangle() -> MeshExportUnit {
        let vertices = vec![
            VertexAttributes::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], &[], &[]),
            VertexAttributes::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], &[], &[]),
            VertexAttributes::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], &[], &[]),
        ];
        MeshExportUnit::new(VertexShape::BARE, vertices, vec![[0, 1, 2]]).unwrap()
    }

    #[test]
    fn current_layout_bytes() {
        let buffer = encode_to_vec(&single_triangle(), &Config::default()).unwrap();
        assert_eq!(buffer.len(), 24 + 3 * 24 + 3 * 2);
        assert_eq!(&buffer[0..8], b"C2G\00200");
        assert_eq!(&buffer[8..16], &[0, 0, 0, 0, 24, 0, 2, 0]);
        assert_eq!(&buffer[16..24], &[3, 0, 0, 0, 3, 0, 0, 0]);
        // second vertex, x = 1.0
        assert_eq!(&buffer[48..52], &1.0_f32.to_le_bytes());
        assert_eq!(&buffer[96..102], &[0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn legacy_layout_bytes() {
        let cfg = Config { format_version: FormatVersion::V1_0 };
        let buffer = encode_to_vec(&single_triangle(), &cfg).unwrap();
        assert_eq!(buffer.len(), 20 + 3 * 24 + 3 * 2);
        assert_eq!(&buffer[0..8], b"C2G\00100");
        assert_eq!(&buffer[8..20], &[24, 0, 3, 0, 0, 0, 2, 0, 3, 0, 0, 0]);
        // legacy readers take the vertex count from offset 10
        assert_eq!(u32::from_le_bytes(buffer[10..14].try_into().unwrap()), 3);
        assert_eq!(u32::from_le_bytes(buffer[16..20].try_into().unwrap()), 3);
        assert_eq!(&buffer[20..24], &0.0_f32.to_le_bytes());
    }

    #[test]
    fn legacy_layout_rejects_colors() {
        let vertices = vec![VertexAttributes::new([0.0; 3], [0.0; 3], &[[1.0, 0.0, 0.0]], &[]); 3];
        let unit = MeshExportUnit::new(VertexShape::new(1, 0), vertices, vec![[0, 1, 2]]).unwrap();
        let cfg = Config { format_version: FormatVersion::V1_0 };
        let mut buffer = Vec::new();
        assert_eq!(
            encode(&unit, &mut buffer, &cfg).unwrap_err(),
            Err::UnsupportedShape { version: FormatVersion::V1_0, shape: VertexShape::new(1, 0) }
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn shaped_vertex_width() {
        let vertices = vec![VertexAttributes::new([0.0; 3], [0.0; 3], &[[1.0, 0.5, 0.25]], &[[0.5, 0.5]; 2]); 3];
        let unit = MeshExportUnit::new(VertexShape::new(1, 2), vertices, vec![[0, 1, 2]]).unwrap();
        let buffer = encode_to_vec(&unit, &Config::default()).unwrap();
        assert_eq!(&buffer[8..14], &[1, 0, 2, 0, 52, 0]);
        assert_eq!(buffer.len(), 24 + 3 * 52 + 6);
        assert_eq!(buffer.len(), encoded_len(&unit, FormatVersion::V2_0));
    }

    #[test]
    fn overflow_writes_nothing() {
        let vertices = (0..70_000)
            .map(|i| VertexAttributes::new([i as f32, 0.0, 0.0], [0.0; 3], &[], &[]))
            .collect();
        let unit = MeshExportUnit::new(VertexShape::BARE, vertices, vec![[0, 1, 69_999]]).unwrap();
        let mut buffer = Vec::new();
        let err = encode(&unit, &mut buffer, &Config::default()).unwrap_err();
        assert_eq!(err, Err::HeaderError(header::Err::IndexOverflow { triangle: 0, index: 69_999 }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_unit_is_header_only() {
        let buffer = encode_to_vec(&MeshExportUnit::empty(), &Config::default()).unwrap();
        assert_eq!(buffer.len(), 24);
        assert_eq!(&buffer[16..24], &[0; 8]);
    }
}
