use ndarray::{Array2, Axis};

use crate::{
    error::{Result, TerrainError},
    grid::Grid,
};

/// Which axes of a grid get decimated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axes {
    /// Profiles and frame-over-time grids: columns are samples or frames and
    /// must stay intact.
    Rows,
    /// Spatial terrain.
    Both,
}

/// Indices kept by boundary-anchored decimation of an axis of length `len`.
///
/// Always `2 + (len - 2) / stride` entries: every `stride`-th index followed
/// by the last one.
fn kept_indices(len: usize, stride: usize) -> Vec<usize> {
    let count = 2 + (len - 2) / stride;
    (0..count - 1)
        .map(|k| k * stride)
        .chain(std::iter::once(len - 1))
        .collect()
}

pub fn extract_detail(grid: &Grid, stride: usize, axes: Axes) -> Result<Grid> {
    if stride < 1 {
        return Err(TerrainError::InvalidDetail(format!(
            "stride must be at least 1, got {}",
            stride
        )));
    }

    let (rows, cols) = grid.dim();
    if rows < 2 {
        return Err(TerrainError::InvalidDetail(format!(
            "need at least 2 rows to decimate, got {}",
            rows
        )));
    }
    if axes == Axes::Both && cols < 2 {
        return Err(TerrainError::InvalidDetail(format!(
            "need at least 2 columns to decimate, got {}",
            cols
        )));
    }

    if stride == 1 {
        return Ok(grid.clone());
    }

    let row_indices = kept_indices(rows, stride);
    let decimated = grid.0.select(Axis(0), &row_indices);

    let decimated = match axes {
        Axes::Rows => decimated,
        Axes::Both => decimated.select(Axis(1), &kept_indices(cols, stride)),
    };

    Ok(Grid(decimated))
}

/// Placement of samples along one axis of the mesh.
///
/// Sample `i` sits at `i * step`, except the last which sits at `extent` so
/// a decimated axis still spans the source exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLayout {
    pub count: usize,
    pub step: f32,
    pub extent: f32,
}

impl AxisLayout {
    pub fn unit(count: usize) -> Self {
        Self::uniform(count, 1.)
    }

    pub fn uniform(count: usize, step: f32) -> Self {
        Self {
            count,
            step,
            extent: count.saturating_sub(1) as f32 * step,
        }
    }

    /// Layout of an axis of `source_len` samples after decimation by `stride`.
    pub fn decimated(source_len: usize, stride: usize) -> Self {
        let count = if stride <= 1 || source_len < 2 {
            source_len
        } else {
            2 + (source_len - 2) / stride
        };

        Self {
            count,
            step: stride.max(1) as f32,
            extent: source_len.saturating_sub(1) as f32,
        }
    }

    pub fn position(&self, i: usize) -> f32 {
        if i + 1 == self.count {
            self.extent
        } else {
            i as f32 * self.step
        }
    }

    pub fn positions(&self) -> Vec<f32> {
        (0..self.count).map(|i| self.position(i)).collect()
    }
}

/// Row (z) and column (x) placement for a grid mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub rows: AxisLayout,
    pub cols: AxisLayout,
}

impl GridLayout {
    pub fn unit((rows, cols): (usize, usize)) -> Self {
        Self {
            rows: AxisLayout::unit(rows),
            cols: AxisLayout::unit(cols),
        }
    }
}

fn check_detail_level(detail_level: usize) -> Result<()> {
    if detail_level < 1 {
        return Err(TerrainError::InvalidDetail(format!(
            "detail level must be at least 1, got {}",
            detail_level
        )));
    }
    Ok(())
}

/// Linear interpolation of `detail_level - 1` extra points between each
/// pair of neighbours.
fn interpolate(values: &[f32], detail_level: usize) -> Vec<f32> {
    if detail_level == 1 || values.len() < 2 {
        return values.to_vec();
    }

    let mut dense = Vec::with_capacity((values.len() - 1) * detail_level + 1);
    for pair in values.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for step in 0..detail_level {
            let t = step as f32 / detail_level as f32;
            dense.push(a + (b - a) * t);
        }
    }
    dense.extend(values.last());
    dense
}

/// Inserts `detail_level - 1` interpolated samples between each pair of
/// neighbours. Interpolated heights are truncated to integers.
pub fn densify_profile(values: &[i32], detail_level: usize) -> Result<Vec<i32>> {
    check_detail_level(detail_level)?;

    let heights: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    Ok(interpolate(&heights, detail_level)
        .into_iter()
        .map(|h| h as i32)
        .collect())
}

/// The x coordinates matching [`densify_profile`] applied to samples at
/// `xs`.
pub fn densify_positions(xs: &[f32], detail_level: usize) -> Result<Vec<f32>> {
    check_detail_level(detail_level)?;
    Ok(interpolate(xs, detail_level))
}
