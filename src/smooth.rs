use bevy::prelude::Vec3;

use crate::error::{Result, TerrainError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Smoothing {
    Linear,
    // 3x3 block around each cell
    Neighborhood2D,
}

fn iteration_count(iterations: i32) -> Result<usize> {
    usize::try_from(iterations).map_err(|_| TerrainError::InvalidIterationCount(iterations))
}

fn mean_height(heights: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = heights.fold((0i64, 0i64), |(sum, count), h| (sum + h as i64, count + 1));
    (sum / count.max(1)) as f32
}

/// Smooths the top vertices (even indices) of a profile ribbon.
pub fn smooth_profile(vertices: &[Vec3], iterations: i32) -> Result<Vec<Vec3>> {
    let iterations = iteration_count(iterations)?;
    let mut current = vertices.to_vec();
    if iterations == 0 {
        return Ok(current);
    }

    let tops = (vertices.len() + 1) / 2;

    for _ in 0..iterations {
        let previous = current.clone();

        for i in 0..tops {
            let first = i.saturating_sub(1);
            let last = (i + 1).min(tops - 1);
            current[i * 2].y = mean_height((first..=last).map(|n| previous[n * 2].y));
        }
    }

    Ok(current)
}

pub fn smooth_grid(
    vertices: &[Vec3],
    rows: usize,
    cols: usize,
    iterations: i32,
) -> Result<Vec<Vec3>> {
    let iterations = iteration_count(iterations)?;
    if vertices.len() != rows * cols {
        return Err(TerrainError::BufferMismatch {
            expected: rows * cols,
            actual: vertices.len(),
        });
    }

    let mut current = vertices.to_vec();

    for _ in 0..iterations {
        let previous = current.clone();

        for i in 0..rows {
            for j in 0..cols {
                let neighbours = (i.saturating_sub(1)..=(i + 1).min(rows - 1)).flat_map(|ni| {
                    (j.saturating_sub(1)..=(j + 1).min(cols - 1))
                        .map(move |nj| ni * cols + nj)
                });

                current[i * cols + j].y = mean_height(neighbours.map(|n| previous[n].y));
            }
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::Grid,
        meshing::{grid_mesh, profile_mesh},
    };
    use ndarray::array;

    fn tops(vertices: &[Vec3]) -> Vec<f32> {
        vertices.iter().step_by(2).map(|v| v.y).collect()
    }

    #[test]
    fn zero_iterations_is_noop() {
        let mesh = profile_mesh(&[1, 9, 4, 7]).unwrap();
        assert_eq!(smooth_profile(&mesh.vertices, 0).unwrap(), mesh.vertices);

        let grid = grid_mesh(&Grid(array![[1, 9], [4, 7]])).unwrap();
        assert_eq!(smooth_grid(&grid.vertices, 2, 2, 0).unwrap(), grid.vertices);
    }

    #[test]
    fn uniform_profile_is_a_fixed_point() {
        let mesh = profile_mesh(&[10, 10, 10, 10, 10]).unwrap();
        let smoothed = smooth_profile(&mesh.vertices, 1).unwrap();
        assert_eq!(tops(&smoothed), vec![10.; 5]);
    }

    #[test]
    fn profile_edges_average_over_fewer_neighbours() {
        let mesh = profile_mesh(&[0, 9, 0, 3]).unwrap();
        let smoothed = smooth_profile(&mesh.vertices, 1).unwrap();

        // [0,9] -> 4, [0,9,0] -> 3, [9,0,3] -> 4, [0,3] -> 1
        assert_eq!(tops(&smoothed), vec![4., 3., 4., 1.]);
        // base vertices stay on the ground
        assert!(smoothed.iter().skip(1).step_by(2).all(|v| v.y == 0.));
    }

    #[test]
    fn each_pass_reads_previous_pass_only() {
        let mesh = profile_mesh(&[0, 30, 0]).unwrap();
        let once = smooth_profile(&mesh.vertices, 1).unwrap();

        // An in-place sweep would see the new left value and give 15 in the middle
        assert_eq!(tops(&once), vec![15., 10., 15.]);

        let twice = smooth_profile(&mesh.vertices, 2).unwrap();
        assert_eq!(twice, smooth_profile(&once, 1).unwrap());
    }

    #[test]
    fn grid_smoothing_changes_height_only() {
        let grid = Grid(array![[0, 0, 0], [0, 90, 0], [0, 0, 0]]);
        let mesh = grid_mesh(&grid).unwrap();
        let smoothed = smooth_grid(&mesh.vertices, 3, 3, 1).unwrap();

        assert_eq!(smoothed[4].y, 10.);
        // Corner sees a 2x2 block
        assert_eq!(smoothed[0].y, 22.);
        // Edge sees a 2x3 block
        assert_eq!(smoothed[1].y, 15.);

        for (a, b) in smoothed.iter().zip(&mesh.vertices) {
            assert_eq!((a.x, a.z), (b.x, b.z));
        }
    }

    #[test]
    fn negative_iterations_are_rejected() {
        let mesh = profile_mesh(&[1, 2]).unwrap();
        assert!(matches!(
            smooth_profile(&mesh.vertices, -1),
            Err(TerrainError::InvalidIterationCount(-1))
        ));
        assert!(matches!(
            smooth_grid(&mesh.vertices, 1, 4, -3),
            Err(TerrainError::InvalidIterationCount(-3))
        ));
    }

    #[test]
    fn mismatched_grid_buffer_is_rejected() {
        let mesh = profile_mesh(&[1, 2, 3]).unwrap();
        assert!(matches!(
            smooth_grid(&mesh.vertices, 2, 2, 1),
            Err(TerrainError::BufferMismatch { expected: 4, actual: 6 })
        ));
    }
}
