//! Fixed-layout geometry records stored in UTF leaf payloads.
//!
//! Every record is a packed run of little-endian fields with no delimiters.
//! The source data is Z-up; all vectors and matrices are converted to Y-up
//! on decode by swapping the Y and Z axes, and swapped back on encode.

mod cmp;
mod construct;
mod math;
mod vmesh;

pub use cmp::{CmpModel, CmpPart};
pub use construct::{
    parse_constructs, Construct, ConstructKind, FixConstruct, RevConstruct, SphereConstruct,
};
pub use math::{Matrix3, Vector3};
pub use vmesh::{MeshGroup, VMeshData, VMeshRef, Vertex, VertexFormat};
