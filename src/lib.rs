// lib.rs

/// Contains the interface between `Mesh` objects and files on disk.
pub mod io;

/// Contains the layout definitions shared by the encoder and the decoder.
pub(crate) mod shared;

/// Turns a mesh into a flat list of face-corner vertices and triangles.
pub mod extract;

/// Merges identical vertices and builds the index buffer.
pub mod dedup;

/// Defines the C2G binary encoder.
pub mod encode;

/// Defines the C2G binary decoder.
pub mod decode;

/// Base64 and JSON mirrors of an export.
pub mod mirror;

/// Runs the whole pipeline from meshes to encoded buffers.
pub mod export;

/// Contains the shared definitions and native objects.
pub mod core;

pub use shared::header::{FormatVersion, UnsupportedFormatVersion, MAGIC};

/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::mesh::{Mesh, builder::MeshBuilder};
    pub use crate::core::unit::{MeshExportUnit, VertexAttributes, VertexShape};
    pub use crate::core::shared::ConfigType;
    pub use crate::core::bit_coder::{ByteReader, ByteWriter};
    pub use crate::shared::header::FormatVersion;
    pub use crate::encode::{self, encode};
    pub use crate::decode::{self, decode};
    pub use crate::export::{self, export, Export};
}
