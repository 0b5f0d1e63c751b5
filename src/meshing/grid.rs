use bevy::prelude::Vec3;

use super::TerrainMeshData;
use crate::{
    error::{Result, TerrainError},
    grid::Grid,
    resample::GridLayout,
};

pub fn grid_mesh(grid: &Grid) -> Result<TerrainMeshData> {
    grid_mesh_with_layout(grid, &GridLayout::unit(grid.dim()))
}

/// One vertex per cell (`x` from the column, `y` the value, `z` from the
/// row) and two triangles per interior cell.
pub fn grid_mesh_with_layout(grid: &Grid, layout: &GridLayout) -> Result<TerrainMeshData> {
    if grid.is_empty() {
        return Err(TerrainError::EmptyInput);
    }

    let (rows, cols) = grid.dim();

    let mut vertices = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            vertices.push(Vec3 {
                x: layout.cols.position(j),
                y: grid.value_at(i, j) as f32,
                z: layout.rows.position(i),
            });
        }
    }

    let mut triangles = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    let idx = |i: usize, j: usize| -> u32 { (i * cols + j) as u32 };

    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            // Add quad to indices
            triangles.extend([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
            triangles.extend([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }

    Ok(TerrainMeshData {
        vertices,
        triangles,
    })
}
