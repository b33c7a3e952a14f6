//! Minimal vector and matrix types for decoded geometry.

use lodestar_common::BinaryReader;

use crate::Result;

/// A 3-component vector in Y-up space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Create a vector.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert between Z-up source space and Y-up space. The swap is its
    /// own inverse.
    pub const fn swap_yz(self) -> Self {
        Self::new(self.x, self.z, self.y)
    }

    /// Read three f32s in source order and convert to Y-up.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let x = reader.read_f32()?;
        let y = reader.read_f32()?;
        let z = reader.read_f32()?;
        Ok(Self::new(x, y, z).swap_yz())
    }

    /// Components in source (Z-up) order.
    pub fn to_source(self) -> [f32; 3] {
        let v = self.swap_yz();
        [v.x, v.y, v.z]
    }
}

/// A row-major 3x3 rotation matrix in Y-up space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix3 {
    pub rows: [[f32; 3]; 3],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Change basis between Z-up and Y-up: swap rows 1/2 and columns 1/2.
    pub fn swap_yz(self) -> Self {
        let mut rows = self.rows;
        rows.swap(1, 2);
        for row in &mut rows {
            row.swap(1, 2);
        }
        Self { rows }
    }

    /// Read nine row-major f32s in source order and convert to Y-up.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mut rows = [[0.0f32; 3]; 3];
        for row in &mut rows {
            for value in row.iter_mut() {
                *value = reader.read_f32()?;
            }
        }
        Ok(Self { rows }.swap_yz())
    }

    /// Row-major values in source (Z-up) order.
    pub fn to_source(self) -> [f32; 9] {
        let m = self.swap_yz().rows;
        [
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ]
    }
}
