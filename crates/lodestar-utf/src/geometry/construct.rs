//! Construct records: the joints that attach compound model parts.
//!
//! A construct leaf (`Cmpnd\Cons\Fix`, `Rev`, `Pris` or `Sphere`) holds a
//! packed array of fixed-size records. Every record starts with two 64-byte
//! NUL-padded names followed by an origin and, depending on the kind,
//! offsets, a rotation and motion limits.

use byteorder::{LittleEndian, WriteBytesExt};
use lodestar_common::BinaryReader;

use super::{Matrix3, Vector3};
use crate::{Error, Result};

/// Size of each of the two name fields.
const NAME_SIZE: usize = 64;

/// Joint type, named after its construct leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructKind {
    /// Rigid attachment.
    Fix,
    /// Revolute joint rotating about an axis.
    Rev,
    /// Prismatic joint sliding along an axis.
    Pris,
    /// Ball joint with per-axis limits.
    Sphere,
}

impl ConstructKind {
    /// All kinds, in the order they are listed under `Cons`.
    pub const ALL: [ConstructKind; 4] = [Self::Fix, Self::Rev, Self::Pris, Self::Sphere];

    /// Size of one record in bytes.
    pub const fn record_size(self) -> usize {
        match self {
            ConstructKind::Fix => 176,
            ConstructKind::Rev | ConstructKind::Pris => 208,
            ConstructKind::Sphere => 212,
        }
    }

    /// Leaf name under `Cons`.
    pub const fn node_name(self) -> &'static str {
        match self {
            ConstructKind::Fix => "Fix",
            ConstructKind::Rev => "Rev",
            ConstructKind::Pris => "Pris",
            ConstructKind::Sphere => "Sphere",
        }
    }

    /// Match a leaf name, ignoring ASCII case.
    pub fn from_node_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.node_name().eq_ignore_ascii_case(name))
    }
}

/// A rigid attachment of `child` to `parent`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixConstruct {
    pub parent: String,
    pub child: String,
    pub origin: Vector3,
    pub rotation: Matrix3,
}

/// A revolute or prismatic joint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevConstruct {
    pub parent: String,
    pub child: String,
    pub origin: Vector3,
    pub offset: Vector3,
    pub rotation: Matrix3,
    pub axis: Vector3,
    pub min: f32,
    pub max: f32,
}

/// A ball joint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereConstruct {
    pub parent: String,
    pub child: String,
    pub origin: Vector3,
    pub offset: Vector3,
    pub rotation: Matrix3,
    /// `(min, max)` limits for each of the three rotation axes, in source order.
    pub limits: [(f32, f32); 3],
}

/// Any decoded construct record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Construct {
    Fix(FixConstruct),
    Rev(RevConstruct),
    Pris(RevConstruct),
    Sphere(SphereConstruct),
}

impl Construct {
    /// The kind of joint.
    pub fn kind(&self) -> ConstructKind {
        match self {
            Construct::Fix(_) => ConstructKind::Fix,
            Construct::Rev(_) => ConstructKind::Rev,
            Construct::Pris(_) => ConstructKind::Pris,
            Construct::Sphere(_) => ConstructKind::Sphere,
        }
    }

    /// Name of the part this joint hangs from.
    pub fn parent(&self) -> &str {
        match self {
            Construct::Fix(c) => &c.parent,
            Construct::Rev(c) | Construct::Pris(c) => &c.parent,
            Construct::Sphere(c) => &c.parent,
        }
    }

    /// Name of the attached part.
    pub fn child(&self) -> &str {
        match self {
            Construct::Fix(c) => &c.child,
            Construct::Rev(c) | Construct::Pris(c) => &c.child,
            Construct::Sphere(c) => &c.child,
        }
    }

    /// Joint origin in the parent's space.
    pub fn origin(&self) -> Vector3 {
        match self {
            Construct::Fix(c) => c.origin,
            Construct::Rev(c) | Construct::Pris(c) => c.origin,
            Construct::Sphere(c) => c.origin,
        }
    }

    /// Joint rotation.
    pub fn rotation(&self) -> Matrix3 {
        match self {
            Construct::Fix(c) => c.rotation,
            Construct::Rev(c) | Construct::Pris(c) => c.rotation,
            Construct::Sphere(c) => c.rotation,
        }
    }
}

/// Decode every record of a construct leaf payload.
///
/// The payload must be a whole number of records; each record is decoded
/// independently.
pub fn parse_constructs(kind: ConstructKind, data: &[u8]) -> Result<Vec<Construct>> {
    let record = kind.record_size();
    if data.len() % record != 0 {
        return Err(Error::InvalidRecordSize {
            kind: kind.node_name(),
            size: data.len(),
            record,
        });
    }

    let mut reader = BinaryReader::new(data);
    let mut constructs = Vec::with_capacity(data.len() / record);
    while !reader.is_empty() {
        let parent = reader.read_string_in_buffer(NAME_SIZE)?;
        let child = reader.read_string_in_buffer(NAME_SIZE)?;
        let origin = Vector3::read(&mut reader)?;

        let construct = match kind {
            ConstructKind::Fix => Construct::Fix(FixConstruct {
                parent,
                child,
                origin,
                rotation: Matrix3::read(&mut reader)?,
            }),
            ConstructKind::Rev | ConstructKind::Pris => {
                let joint = RevConstruct {
                    parent,
                    child,
                    origin,
                    offset: Vector3::read(&mut reader)?,
                    rotation: Matrix3::read(&mut reader)?,
                    axis: Vector3::read(&mut reader)?,
                    min: reader.read_f32()?,
                    max: reader.read_f32()?,
                };
                if kind == ConstructKind::Rev {
                    Construct::Rev(joint)
                } else {
                    Construct::Pris(joint)
                }
            }
            ConstructKind::Sphere => {
                let offset = Vector3::read(&mut reader)?;
                let rotation = Matrix3::read(&mut reader)?;
                let mut limits = [(0.0, 0.0); 3];
                for limit in &mut limits {
                    *limit = (reader.read_f32()?, reader.read_f32()?);
                }
                Construct::Sphere(SphereConstruct {
                    parent,
                    child,
                    origin,
                    offset,
                    rotation,
                    limits,
                })
            }
        };
        constructs.push(construct);
    }

    tracing::trace!(kind = kind.node_name(), count = constructs.len(), "decoded constructs");
    Ok(constructs)
}

impl FixConstruct {
    /// Encode this record back to its 176-byte source layout.
    ///
    /// Names longer than 63 bytes do not fit their NUL-terminated field.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(ConstructKind::Fix.record_size());
        write_name(&mut out, &self.parent)?;
        write_name(&mut out, &self.child)?;
        for value in self.origin.to_source() {
            out.write_f32::<LittleEndian>(value)?;
        }
        for value in self.rotation.to_source() {
            out.write_f32::<LittleEndian>(value)?;
        }
        Ok(out)
    }
}

fn write_name(out: &mut Vec<u8>, name: &str) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() >= NAME_SIZE {
        return Err(Error::NameTooLong {
            name: name.to_owned(),
            max: NAME_SIZE - 1,
        });
    }
    out.extend_from_slice(bytes);
    out.resize(out.len() + NAME_SIZE - bytes.len(), 0);
    Ok(())
}
