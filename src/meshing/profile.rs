use bevy::prelude::Vec3;

use super::TerrainMeshData;
use crate::{
    error::{Result, TerrainError},
    resample::AxisLayout,
};

pub fn profile_mesh(values: &[i32]) -> Result<TerrainMeshData> {
    profile_mesh_at(values, &AxisLayout::unit(values.len()).positions())
}

/// Builds a ribbon under a 1-D profile.
///
/// Vertices are interleaved `[top_0, base_0, top_1, base_1, ...]` with the
/// base vertices at height 0 in the `z = 0` plane. Each pair of samples is
/// covered by `top_i, top_i+1, base_i+1` and `top_i, base_i+1, base_i`;
/// with counter-clockwise front faces the ribbon faces -Z.
///
/// `xs` holds the x coordinate of every sample.
pub fn profile_mesh_at(values: &[i32], xs: &[f32]) -> Result<TerrainMeshData> {
    if values.is_empty() {
        return Err(TerrainError::EmptyInput);
    }
    if xs.len() != values.len() {
        return Err(TerrainError::BufferMismatch {
            expected: values.len(),
            actual: xs.len(),
        });
    }

    let mut vertices = Vec::with_capacity(values.len() * 2);
    for (&value, &x) in values.iter().zip(xs) {
        vertices.push(Vec3::new(x, value as f32, 0.));
        vertices.push(Vec3::new(x, 0., 0.));
    }

    let top = |i: usize| (i * 2) as u32;
    let base = |i: usize| (i * 2 + 1) as u32;

    let mut triangles = Vec::with_capacity((values.len() - 1) * 6);
    for i in 0..values.len() - 1 {
        triangles.extend([top(i), top(i + 1), base(i + 1)]);
        triangles.extend([top(i), base(i + 1), base(i)]);
    }

    Ok(TerrainMeshData {
        vertices,
        triangles,
    })
}
