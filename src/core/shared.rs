/// Index of a vertex of an input [`Mesh`](crate::core::mesh::Mesh).
pub type VertexIdx = usize;
/// Index of a face of an input [`Mesh`](crate::core::mesh::Mesh).
pub type FaceIdx = usize;
/// Index of a face-corner, counted over all faces in face order.
pub type CornerIdx = usize;

pub trait ConfigType {
    fn default()-> Self;
}
