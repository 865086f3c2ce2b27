/// Loads Wavefront OBJ files into `Mesh` objects.
pub mod obj;

/// Writes an export and its mirrors to disk.
pub mod file;
