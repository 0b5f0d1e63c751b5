use ndarray::{Array2, ArrayView1};

use crate::error::{Result, TerrainError};

/// Rectangular integer field, indexed `[[row, col]]`.
///
/// For a spectrogram the rows are frequency bins and the columns are time
/// steps. A waveform profile is a single column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid(pub Array2<i32>);

impl Grid {
    pub fn from_rows(rows: &[Vec<i32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != cols) {
            return Err(TerrainError::Parse {
                line: bad + 1,
                message: format!("expected {} values, found {}", cols, rows[bad].len()),
            });
        }

        let flat = rows.iter().flatten().copied().collect();
        Ok(Grid(Array2::from_shape_vec((rows.len(), cols), flat).map_err(
            |e| TerrainError::Parse {
                line: 0,
                message: e.to_string(),
            },
        )?))
    }

    /// A one-column grid holding `values` top to bottom.
    pub fn profile(values: &[i32]) -> Self {
        Grid(Array2::from_shape_fn((values.len(), 1), |(row, _)| values[row]))
    }

    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn value_at(&self, row: usize, col: usize) -> i32 {
        self.0[[row, col]]
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, i32> {
        self.0.column(col)
    }

    /// Column `col` as an owned sequence, the per-frame slice of a
    /// time-major grid.
    pub fn column_values(&self, col: usize) -> Result<Vec<i32>> {
        if col >= self.cols() {
            return Err(TerrainError::FrameOutOfRange {
                frame: col,
                frame_count: self.cols(),
            });
        }
        Ok(self.column(col).to_vec())
    }
}

/// Expands a profile into concentric square rings.
///
/// The result is `(2n - 1) x (2n - 1)`; the outermost ring holds `values[0]`
/// and the centre cell holds `values[n - 1]`.
pub fn ring_expand(values: &[i32]) -> Result<Grid> {
    if values.is_empty() {
        return Err(TerrainError::EmptyInput);
    }

    let size = values.len() * 2 - 1;
    let rings = Array2::from_shape_fn((size, size), |(i, j)| {
        let ring = i.min(j).min(size - 1 - i).min(size - 1 - j);
        values[ring]
    });

    Ok(Grid(rings))
}
