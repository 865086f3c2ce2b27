//! Reads C2G buffers back into a [`MeshExportUnit`].

use thiserror::Error;

use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::core::unit::{MeshExportUnit, VertexAttributes, VertexShape};
use crate::shared::header::{FormatVersion, INDEX_SIZE_BYTES, MAGIC};

/// Header of a C2G buffer. Legacy buffers report a bare shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: FormatVersion,
    pub shape: VertexShape,
    pub vertex_size: u16,
    pub index_size: u16,
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub header: Header,
    pub unit: MeshExportUnit,
}

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Not a C2G buffer, magic bytes are {0:?}")]
    BadMagic([u8; 4]),
    #[error("Index {position} is {index}, but there are only {vertex_count} vertices")]
    IndexOutOfRange { position: usize, index: u16, vertex_count: u32 },
    #[error("Index size must be 2 bytes, found {0}")]
    IndexSizeMismatch(u16),
    #[error("Reader error: {0}")]
    ReaderError(#[from] ReaderErr),
    #[error("The buffer continues past the index data")]
    TrailingBytes,
    #[error("Index count {0} is not a multiple of 3")]
    TruncatedTriangle(u32),
    #[error("Unsupported format version tag {:?}", String::from_utf8_lossy(.0))]
    UnsupportedFormatVersion([u8; 4]),
    #[error("Vertex size {found} does not match the shape, expected {expected}")]
    VertexSizeMismatch { expected: usize, found: u16 },
}

/// Reads and validates the header.
pub fn decode_header<R>(reader: &mut R) -> Result<Header, Err>
    where R: ByteReader
{
    let magic = reader.read_array::<4>()?;
    if magic != MAGIC {
        return Err(Err::BadMagic(magic));
    }
    let version = FormatVersion::read_from(reader)?
        .map_err(Err::UnsupportedFormatVersion)?;

    // the legacy layout stores the vertex count between the two sizes
    let (shape, vertex_size, index_size, vertex_count) = match version {
        FormatVersion::V1_0 => {
            let vertex_size = reader.read_u16()?;
            let vertex_count = reader.read_u32()?;
            let index_size = reader.read_u16()?;
            (VertexShape::BARE, vertex_size, index_size, vertex_count)
        }
        FormatVersion::V2_0 => {
            let color_channels = reader.read_u16()? as usize;
            let tex_coord_pairs = reader.read_u16()? as usize;
            let vertex_size = reader.read_u16()?;
            let index_size = reader.read_u16()?;
            let vertex_count = reader.read_u32()?;
            (VertexShape::new(color_channels, tex_coord_pairs), vertex_size, index_size, vertex_count)
        }
    };
    let index_count = reader.read_u32()?;

    if vertex_size as usize != shape.vertex_size_bytes() {
        return Err(Err::VertexSizeMismatch { expected: shape.vertex_size_bytes(), found: vertex_size });
    }
    if index_size != INDEX_SIZE_BYTES {
        return Err(Err::IndexSizeMismatch(index_size));
    }
    if index_count % 3 != 0 {
        return Err(Err::TruncatedTriangle(index_count));
    }

    Ok(Header { version, shape, vertex_size, index_size, vertex_count, index_count })
}

/// Decodes a whole buffer from the reader. Bytes after the index data are not read.
pub fn decode<R>(reader: &mut R) -> Result<Decoded, Err>
    where R: ByteReader
{
    let header = decode_header(reader)?;
    let shape = header.shape;

    // counts come from untrusted input, so capacity is capped
    let mut vertices = Vec::with_capacity((header.vertex_count as usize).min(1 << 16));
    for _ in 0..header.vertex_count {
        let components = (0..shape.num_components())
            .map(|_| reader.read_f32())
            .collect::<Result<Vec<_>, _>>()?;
        vertices.push(VertexAttributes::from_components_unchecked(shape, components));
    }

    let mut triangles = Vec::with_capacity((header.index_count as usize / 3).min(1 << 16));
    for t in 0..header.index_count as usize / 3 {
        let mut triangle = [0; 3];
        for (k, slot) in triangle.iter_mut().enumerate() {
            let index = reader.read_u16()?;
            if index as u32 >= header.vertex_count {
                return Err(Err::IndexOutOfRange {
                    position: 3 * t + k,
                    index,
                    vertex_count: header.vertex_count,
                });
            }
            *slot = index as usize;
        }
        triangles.push(triangle);
    }

    let unit = if vertices.is_empty() && triangles.is_empty() {
        MeshExportUnit::empty()
    } else {
        MeshExportUnit::new_unchecked(shape, vertices, triangles)
    };
    Ok(Decoded { header, unit })
}

/// Decodes a complete buffer and rejects trailing bytes.
pub fn decode_slice(bytes: &[u8]) -> Result<Decoded, Err> {
    let mut reader = bytes.iter();
    let decoded = decode(&mut reader)?;
    if !reader.is_exhausted() {
        return Err(Err::TrailingBytes);
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::ConfigType;
    use crate::encode::{encode_to_vec, Config};

    fn colored_quad() -> MeshExportUnit {
        let vertices = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]].iter()
            .map(|&[x, y]| VertexAttributes::new([x, y, 0.0], [0.0, 0.0, 1.0], &[[x, y, 0.5]], &[[x, y]]))
            .collect();
        MeshExportUnit::new(VertexShape::new(1, 1), vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn reads_back_what_was_written() {
        let unit = colored_quad();
        let buffer = encode_to_vec(&unit, &Config { format_version: FormatVersion::V2_0 }).unwrap();
        let decoded = decode_slice(&buffer).unwrap();
        assert_eq!(decoded.header.vertex_count, 4);
        assert_eq!(decoded.header.index_count, 6);
        assert_eq!(decoded.header.vertex_size, 44);
        assert_eq!(decoded.unit, unit);
    }

    #[test]
    fn legacy_header() {
        let vertices = vec![VertexAttributes::new([0.0; 3], [0.0; 3], &[], &[]); 3];
        let unit = MeshExportUnit::new(VertexShape::BARE, vertices, vec![[0, 1, 2]]).unwrap();
        let buffer = encode_to_vec(&unit, &Config { format_version: FormatVersion::V1_0 }).unwrap();
        let decoded = decode_slice(&buffer).unwrap();
        assert_eq!(decoded.header.version, FormatVersion::V1_0);
        assert_eq!(decoded.header.shape, VertexShape::BARE);
        assert_eq!(decoded.header.vertex_count, 3);
        assert_eq!(decoded.header.index_size, 2);
        assert_eq!(decoded.unit, unit);
    }

    #[test]
    fn rejects_foreign_data() {
        assert_eq!(decode_slice(b"DRACO\x02\x02\x01").unwrap_err(), Err::BadMagic(*b"DRAC"));
        assert_eq!(
            decode_slice(b"C2G\x000300").unwrap_err(),
            Err::UnsupportedFormatVersion(*b"0300")
        );
        assert_eq!(decode_slice(b"C2G\x000200\x00").unwrap_err(), Err::ReaderError(ReaderErr::NotEnoughData));
    }

    #[test]
    fn rejects_bad_index_and_trailing_bytes() {
        let unit = colored_quad();
        let mut buffer = encode_to_vec(&unit, &Config::default()).unwrap();
        buffer.push(0);
        assert_eq!(decode_slice(&buffer).unwrap_err(), Err::TrailingBytes);

        buffer.pop();
        let last = buffer.len() - 2;
        buffer[last] = 9;
        assert_eq!(
            decode_slice(&buffer).unwrap_err(),
            Err::IndexOutOfRange { position: 5, index: 9, vertex_count: 4 }
        );
    }

    #[test]
    fn rejects_inconsistent_vertex_size() {
        let mut buffer = encode_to_vec(&colored_quad(), &Config::default()).unwrap();
        buffer[12] = 40;
        assert_eq!(
            decode_slice(&buffer).unwrap_err(),
            Err::VertexSizeMismatch { expected: 44, found: 40 }
        );
    }
}
