//! Mesh references (`VMeshRef`) and mesh library payloads (`VMeshData`).

use lodestar_common::BinaryReader;

use super::Vector3;
use crate::{Error, Result};

/// A part's pointer into a shared mesh library.
///
/// Stored as a single 60-byte leaf named `VMeshRef` under each part's
/// `MultiLevel\Level*` node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VMeshRef {
    /// Hash of the mesh library node this reference points into.
    pub mesh_id: u32,
    pub start_vertex: u16,
    pub vertex_count: u16,
    pub start_index: u16,
    pub index_count: u16,
    pub start_mesh: u16,
    pub mesh_count: u16,
    /// Bounding box minimum, Y-up.
    pub bounds_min: Vector3,
    /// Bounding box maximum, Y-up.
    pub bounds_max: Vector3,
    pub center: Vector3,
    pub radius: f32,
}

impl VMeshRef {
    /// Payload size, also stored as the record's first field.
    pub const SIZE: usize = 60;

    /// Decode a `VMeshRef` leaf payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != Self::SIZE {
            return Err(Error::InvalidRecordSize {
                kind: "VMeshRef",
                size: data.len(),
                record: Self::SIZE,
            });
        }

        let mut reader = BinaryReader::new(data);
        let header_size = reader.read_u32()?;
        if header_size as usize != Self::SIZE {
            return Err(Error::Malformed(format!("VMeshRef header size {}", header_size)));
        }

        let mesh_id = reader.read_u32()?;
        let start_vertex = reader.read_u16()?;
        let vertex_count = reader.read_u16()?;
        let start_index = reader.read_u16()?;
        let index_count = reader.read_u16()?;
        let start_mesh = reader.read_u16()?;
        let mesh_count = reader.read_u16()?;

        // Bounds are stored as max/min pairs per source axis.
        let mut max = [0.0f32; 3];
        let mut min = [0.0f32; 3];
        for axis in 0..3 {
            max[axis] = reader.read_f32()?;
            min[axis] = reader.read_f32()?;
        }

        Ok(Self {
            mesh_id,
            start_vertex,
            vertex_count,
            start_index,
            index_count,
            start_mesh,
            mesh_count,
            bounds_min: Vector3::new(min[0], min[1], min[2]).swap_yz(),
            bounds_max: Vector3::new(max[0], max[1], max[2]).swap_yz(),
            center: Vector3::read(&mut reader)?,
            radius: reader.read_f32()?,
        })
    }
}

/// Direct3D flexible vertex format bits describing a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexFormat(pub u16);

impl VertexFormat {
    pub const POSITION: u16 = 0x002;
    pub const NORMAL: u16 = 0x010;
    pub const DIFFUSE: u16 = 0x040;
    pub const TEX_COUNT_MASK: u16 = 0xF00;

    pub fn has_normal(self) -> bool {
        self.0 & Self::NORMAL != 0
    }

    pub fn has_diffuse(self) -> bool {
        self.0 & Self::DIFFUSE != 0
    }

    /// Number of 2D texture coordinate sets.
    pub fn tex_sets(self) -> usize {
        ((self.0 & Self::TEX_COUNT_MASK) >> 8) as usize
    }

    /// Bytes per vertex.
    pub fn stride(self) -> usize {
        let mut stride = 12 + self.tex_sets() * 8;
        if self.has_normal() {
            stride += 12;
        }
        if self.has_diffuse() {
            stride += 4;
        }
        stride
    }

    fn validate(self) -> Result<()> {
        let known = Self::POSITION | Self::NORMAL | Self::DIFFUSE | Self::TEX_COUNT_MASK;
        if self.0 & Self::POSITION == 0 || self.0 & !known != 0 || self.tex_sets() > 8 {
            return Err(Error::UnsupportedVertexFormat(self.0));
        }
        Ok(())
    }
}

/// One decoded vertex.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Vector3,
    pub normal: Option<Vector3>,
    /// Packed ARGB colour.
    pub diffuse: Option<u32>,
    pub tex_coords: Vec<[f32; 2]>,
}

/// A range of triangles drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshGroup {
    pub material_id: u32,
    pub start_vertex: u16,
    pub end_vertex: u16,
    /// Number of triangle indices this group consumes.
    pub index_count: u16,
}

/// A decoded `VMeshData` leaf: a shared vertex and index pool.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VMeshData {
    pub mesh_type: u32,
    pub surface_type: u32,
    pub format: VertexFormat,
    pub meshes: Vec<MeshGroup>,
    /// Triangle list indices, three per triangle.
    pub indices: Vec<u16>,
    pub vertices: Vec<Vertex>,
}

impl VMeshData {
    /// Decode a `VMeshData` leaf payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let mesh_type = reader.read_u32()?;
        let surface_type = reader.read_u32()?;
        let mesh_count = reader.read_u16()?;
        let index_count = reader.read_u16()?;
        let format = VertexFormat(reader.read_u16()?);
        let vertex_count = reader.read_u16()?;
        format.validate()?;

        let mut meshes = Vec::with_capacity(mesh_count as usize);
        for _ in 0..mesh_count {
            let group = MeshGroup {
                material_id: reader.read_u32()?,
                start_vertex: reader.read_u16()?,
                end_vertex: reader.read_u16()?,
                index_count: reader.read_u16()?,
            };
            reader.skip(2)?;
            meshes.push(group);
        }

        let mut indices = Vec::with_capacity(index_count as usize);
        for _ in 0..index_count {
            indices.push(reader.read_u16()?);
        }

        let needed = vertex_count as usize * format.stride();
        if reader.remaining() < needed {
            return Err(Error::Malformed(format!(
                "{} vertices of {} bytes need {} bytes, {} left",
                vertex_count,
                format.stride(),
                needed,
                reader.remaining()
            )));
        }

        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for _ in 0..vertex_count {
            let position = Vector3::read(&mut reader)?;
            let normal = if format.has_normal() {
                Some(Vector3::read(&mut reader)?)
            } else {
                None
            };
            let diffuse = if format.has_diffuse() {
                Some(reader.read_u32()?)
            } else {
                None
            };
            let mut tex_coords = Vec::with_capacity(format.tex_sets());
            for _ in 0..format.tex_sets() {
                tex_coords.push([reader.read_f32()?, reader.read_f32()?]);
            }
            vertices.push(Vertex {
                position,
                normal,
                diffuse,
                tex_coords,
            });
        }

        tracing::trace!(
            meshes = meshes.len(),
            indices = indices.len(),
            vertices = vertices.len(),
            "decoded VMeshData"
        );

        Ok(Self {
            mesh_type,
            surface_type,
            format,
            meshes,
            indices,
            vertices,
        })
    }

    /// Vertices and indices referenced by a [`VMeshRef`].
    pub fn slice_for(&self, mesh_ref: &VMeshRef) -> Option<(&[Vertex], &[u16])> {
        let vertices = self
            .vertices
            .get(mesh_ref.start_vertex as usize..(mesh_ref.start_vertex as usize + mesh_ref.vertex_count as usize))?;
        let indices = self
            .indices
            .get(mesh_ref.start_index as usize..(mesh_ref.start_index as usize + mesh_ref.index_count as usize))?;
        Some((vertices, indices))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    pub(crate) fn vmesh_ref_bytes(mesh_id: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&60u32.to_le_bytes());
        data.extend_from_slice(&mesh_id.to_le_bytes());
        for value in [0u16, 3, 0, 3, 0, 1] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        // max x, min x, max y, min y, max z, min z
        data.extend(floats(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0]));
        data.extend(floats(&[0.5, 0.0, 0.25]));
        data.extend(floats(&[4.0]));
        data
    }

    fn vmesh_data_bytes(fvf: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes()); // meshes
        data.extend_from_slice(&3u16.to_le_bytes()); // indices
        data.extend_from_slice(&fvf.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes()); // vertices
        // mesh group
        data.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        for value in [0u16, 2, 3, 0xCCCC] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        for index in [0u16, 1, 2] {
            data.extend_from_slice(&index.to_le_bytes());
        }
        for i in 0..3 {
            let i = i as f32;
            data.extend(floats(&[i, 10.0 + i, 20.0 + i]));
            if fvf & VertexFormat::NORMAL != 0 {
                data.extend(floats(&[0.0, 0.0, 1.0]));
            }
            if fvf & VertexFormat::DIFFUSE != 0 {
                data.extend_from_slice(&0xFF00_FF00u32.to_le_bytes());
            }
            for _ in 0..((fvf & VertexFormat::TEX_COUNT_MASK) >> 8) {
                data.extend(floats(&[0.25, 0.75]));
            }
        }
        data
    }

    #[test]
    fn test_vmesh_ref() {
        let mesh_ref = VMeshRef::parse(&vmesh_ref_bytes(0x1234)).unwrap();
        assert_eq!(mesh_ref.mesh_id, 0x1234);
        assert_eq!(mesh_ref.vertex_count, 3);
        assert_eq!(mesh_ref.mesh_count, 1);
        assert_eq!(mesh_ref.bounds_min, Vector3::new(-1.0, -3.0, -2.0));
        assert_eq!(mesh_ref.bounds_max, Vector3::new(1.0, 3.0, 2.0));
        assert_eq!(mesh_ref.center, Vector3::new(0.5, 0.25, 0.0));
        assert_eq!(mesh_ref.radius, 4.0);
    }

    #[test]
    fn test_vmesh_ref_size_checked() {
        let data = vmesh_ref_bytes(1);
        assert!(matches!(VMeshRef::parse(&data[..56]), Err(Error::InvalidRecordSize { .. })));

        let mut bad_header = data.clone();
        bad_header[0] = 59;
        assert!(matches!(VMeshRef::parse(&bad_header), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_vmesh_data_full_format() {
        let fvf = VertexFormat::POSITION | VertexFormat::NORMAL | VertexFormat::DIFFUSE | 0x100;
        let mesh = VMeshData::parse(&vmesh_data_bytes(fvf)).unwrap();

        assert_eq!(mesh.format.stride(), 36);
        assert_eq!(mesh.meshes[0].material_id, 0xDEAD_BEEF);
        assert_eq!(mesh.meshes[0].index_count, 3);
        assert_eq!(mesh.indices, [0, 1, 2]);
        assert_eq!(mesh.vertices.len(), 3);

        let v = &mesh.vertices[1];
        assert_eq!(v.position, Vector3::new(1.0, 21.0, 11.0));
        assert_eq!(v.normal, Some(Vector3::new(0.0, 1.0, 0.0)));
        assert_eq!(v.diffuse, Some(0xFF00_FF00));
        assert_eq!(v.tex_coords, [[0.25, 0.75]]);
    }

    #[test]
    fn test_vmesh_data_position_only() {
        let mesh = VMeshData::parse(&vmesh_data_bytes(VertexFormat::POSITION)).unwrap();
        assert_eq!(mesh.format.stride(), 12);
        assert!(mesh.vertices.iter().all(|v| v.normal.is_none() && v.tex_coords.is_empty()));

        let mesh_ref = VMeshRef::parse(&vmesh_ref_bytes(0)).unwrap();
        let (vertices, indices) = mesh.slice_for(&mesh_ref).unwrap();
        assert_eq!((vertices.len(), indices.len()), (3, 3));
    }

    #[test]
    fn test_vmesh_data_rejects_bad_format() {
        assert!(matches!(
            VMeshData::parse(&vmesh_data_bytes(VertexFormat::NORMAL)),
            Err(Error::UnsupportedVertexFormat(0x010))
        ));
    }

    #[test]
    fn test_vmesh_data_truncated_vertices() {
        let mut data = vmesh_data_bytes(VertexFormat::POSITION);
        data.truncate(data.len() - 4);
        assert!(matches!(VMeshData::parse(&data), Err(Error::Malformed(_))));
    }
}
