/// Definitions shared by the encoder and the decoder.
pub mod header {
    use std::fmt;
    use std::str::FromStr;

    use serde::{Deserialize, Serialize};

    use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};

    /// First four bytes of every C2G file.
    pub const MAGIC: [u8; 4] = *b"C2G\0";

    /// Size in bytes of one index in the index data.
    pub const INDEX_SIZE_BYTES: u16 = 2;

    /// Revision of the binary layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub enum FormatVersion {
        /// Position and normal only, 20-byte header.
        V1_0,
        /// Per-vertex colours and texture coordinates, 24-byte header.
        #[default]
        V2_0,
    }

    impl FormatVersion {
        pub const ALL: [FormatVersion; 2] = [FormatVersion::V1_0, FormatVersion::V2_0];

        /// ASCII tag stored at offset 4.
        pub fn tag(self) -> &'static [u8; 4] {
            match self {
                FormatVersion::V1_0 => b"0100",
                FormatVersion::V2_0 => b"0200",
            }
        }

        pub fn as_str(self) -> &'static str {
            match self {
                FormatVersion::V1_0 => "0100",
                FormatVersion::V2_0 => "0200",
            }
        }

        pub fn from_tag(tag: &[u8; 4]) -> Option<Self> {
            Self::ALL.into_iter().find(|v| v.tag() == tag)
        }

        /// Size in bytes of the header, which is also the offset of the vertex data.
        pub fn header_size(self) -> usize {
            match self {
                FormatVersion::V1_0 => 20,
                FormatVersion::V2_0 => 24,
            }
        }

        #[inline]
        pub fn write_to<W>(self, writer: &mut W)
            where W: ByteWriter
        {
            writer.write_bytes(self.tag());
        }

        /// Reads the tag. `Ok(Err(tag))` means the bytes were there but name no known version.
        #[inline]
        pub fn read_from<R>(reader: &mut R) -> Result<Result<Self, [u8; 4]>, ReaderErr>
            where R: ByteReader
        {
            let tag = reader.read_array::<4>()?;
            Ok(Self::from_tag(&tag).ok_or(tag))
        }
    }

    impl fmt::Display for FormatVersion {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for FormatVersion {
        type Err = UnsupportedFormatVersion;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::ALL.into_iter()
                .find(|v| v.as_str() == s)
                .ok_or_else(|| UnsupportedFormatVersion(s.to_owned()))
        }
    }

    impl TryFrom<String> for FormatVersion {
        type Error = UnsupportedFormatVersion;
        fn try_from(s: String) -> Result<Self, Self::Error> {
            s.parse()
        }
    }

    impl From<FormatVersion> for String {
        fn from(v: FormatVersion) -> Self {
            v.as_str().to_owned()
        }
    }

    #[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
    #[error("Unsupported format version '{0}'")]
    pub struct UnsupportedFormatVersion(pub String);

}
