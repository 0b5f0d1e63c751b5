use bevy::prelude::Vec3;

use crate::{
    error::{Result, TerrainError},
    meshing::Tessellation,
};

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Pulls every surface vertex toward `baseline` by `factor`.
///
/// Heights are truncated toward zero so the result stays on the integer
/// height grid, which makes `factor = 1` idempotent.
pub fn blend(
    vertices: &[Vec3],
    tessellation: Tessellation,
    baseline: i32,
    factor: f32,
) -> Result<Vec<Vec3>> {
    let mut blended = vertices.to_vec();
    blend_in_place(&mut blended, tessellation, baseline, factor)?;
    Ok(blended)
}

pub fn blend_in_place(
    vertices: &mut [Vec3],
    tessellation: Tessellation,
    baseline: i32,
    factor: f32,
) -> Result<()> {
    if !(0.0..=1.0).contains(&factor) {
        return Err(TerrainError::InvalidBlendFactor(factor));
    }

    for (index, vertex) in vertices.iter_mut().enumerate() {
        if tessellation.is_surface_vertex(index) {
            vertex.y = lerp(baseline as f32, vertex.y, factor).trunc();
        }
    }

    Ok(())
}
