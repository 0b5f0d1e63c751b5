use bevy::{
    log::{debug, warn},
    prelude::Vec3,
};

use crate::{
    animation::{AnimationDriver, FrameTick},
    blend::blend_in_place,
    error::{Result, TerrainError},
    grid::{ring_expand, Grid},
    meshing::{grid_mesh_with_layout, profile_mesh_at, TerrainMeshData, Tessellation},
    params::{ParamsChange, TerrainParams},
    resample::{densify_positions, densify_profile, extract_detail, Axes, AxisLayout, GridLayout},
    smooth::{smooth_grid, smooth_profile, Smoothing},
};

/// How a loaded grid is read and displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceMode {
    /// Static waveform ribbon from the first column.
    Profile,
    /// Static 2-D terrain over the whole grid.
    Terrain,
    /// One profile ribbon per column, played back over time.
    ProfileOverTime,
    /// Each column expanded into concentric rings, played back over time.
    RingsOverTime,
}

impl SurfaceMode {
    pub fn tessellation(self) -> Tessellation {
        match self {
            SurfaceMode::Profile | SurfaceMode::ProfileOverTime => Tessellation::Profile,
            SurfaceMode::Terrain | SurfaceMode::RingsOverTime => Tessellation::Grid,
        }
    }

    pub fn smoothing(self) -> Smoothing {
        match self.tessellation() {
            Tessellation::Profile => Smoothing::Linear,
            Tessellation::Grid => Smoothing::Neighborhood2D,
        }
    }

    pub fn is_animated(self) -> bool {
        matches!(self, SurfaceMode::ProfileOverTime | SurfaceMode::RingsOverTime)
    }

    /// Columns are frames for animated modes; static modes have one frame.
    pub fn frame_count(self, grid: &Grid) -> usize {
        if self.is_animated() {
            grid.cols()
        } else {
            1
        }
    }
}

/// Unadjusted mesh for one frame plus the vertex grid shape smoothing needs.
struct FrameMesh {
    mesh: TerrainMeshData,
    shape: (usize, usize),
}

fn profile_frame(values: &[i32], params: &TerrainParams) -> Result<FrameMesh> {
    let decimated = extract_detail(&Grid::profile(values), params.stride, Axes::Rows)?;
    let xs = AxisLayout::decimated(values.len(), params.stride).positions();

    let heights = densify_profile(&decimated.column(0).to_vec(), params.detail_level)?;
    let xs = densify_positions(&xs, params.detail_level)?;

    Ok(FrameMesh {
        shape: (heights.len(), 1),
        mesh: profile_mesh_at(&heights, &xs)?,
    })
}

fn build_frame(
    grid: &Grid,
    mode: SurfaceMode,
    frame: usize,
    params: &TerrainParams,
) -> Result<FrameMesh> {
    if grid.is_empty() {
        return Err(TerrainError::EmptyInput);
    }

    match mode {
        SurfaceMode::Profile | SurfaceMode::ProfileOverTime => {
            profile_frame(&grid.column_values(frame)?, params)
        }
        SurfaceMode::Terrain => {
            let (rows, cols) = grid.dim();
            let decimated = extract_detail(grid, params.stride, Axes::Both)?;
            let layout = GridLayout {
                rows: AxisLayout::decimated(rows, params.stride),
                cols: AxisLayout::decimated(cols, params.stride),
            };

            Ok(FrameMesh {
                shape: decimated.dim(),
                mesh: grid_mesh_with_layout(&decimated, &layout)?,
            })
        }
        SurfaceMode::RingsOverTime => {
            let column = Grid::profile(&grid.column_values(frame)?);
            let decimated = extract_detail(&column, params.stride, Axes::Rows)?;
            let rings = ring_expand(&decimated.column(0).to_vec())?;
            let layout = GridLayout {
                rows: AxisLayout::uniform(rings.rows(), params.stride as f32),
                cols: AxisLayout::uniform(rings.cols(), params.stride as f32),
            };

            Ok(FrameMesh {
                shape: rings.dim(),
                mesh: grid_mesh_with_layout(&rings, &layout)?,
            })
        }
    }
}

/// Blends then smooths the heights of `raw`.
fn adjust_heights(
    raw: &[Vec3],
    mode: SurfaceMode,
    (rows, cols): (usize, usize),
    params: &TerrainParams,
) -> Result<Vec<Vec3>> {
    let mut vertices = raw.to_vec();
    blend_in_place(
        &mut vertices,
        mode.tessellation(),
        params.baseline,
        params.blend_factor,
    )?;

    match mode.smoothing() {
        Smoothing::Linear => smooth_profile(&vertices, params.smoothing_steps),
        Smoothing::Neighborhood2D => smooth_grid(&vertices, rows, cols, params.smoothing_steps),
    }
}

/// Owns a grid and the vertex/triangle buffers derived from it.
///
/// Every operation either fully succeeds or leaves the published buffers
/// exactly as they were.
pub struct TerrainSurface {
    grid: Grid,
    mode: SurfaceMode,
    params: TerrainParams,
    frame: usize,
    raw: FrameMesh,
    mesh: TerrainMeshData,
    revision: u64,
}

impl TerrainSurface {
    pub fn new(grid: Grid, mode: SurfaceMode, params: TerrainParams) -> Result<Self> {
        params.validate()?;

        let raw = build_frame(&grid, mode, 0, &params)?;
        let vertices = adjust_heights(&raw.mesh.vertices, mode, raw.shape, &params)?;
        let mesh = TerrainMeshData {
            vertices,
            triangles: raw.mesh.triangles.clone(),
        };

        debug!(
            "Built {:?} surface: {} vertices, {} triangles",
            mode,
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        Ok(Self {
            grid,
            mode,
            params,
            frame: 0,
            raw,
            mesh,
            revision: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.mode.frame_count(&self.grid)
    }

    pub fn mesh(&self) -> &TerrainMeshData {
        &self.mesh
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.mesh.vertices
    }

    pub fn triangles(&self) -> &[u32] {
        &self.mesh.triangles
    }

    /// Bumped every time the published buffers change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies new parameters, rebuilding or reshaping as the change
    /// requires. On error the previous buffers and parameters are kept.
    pub fn apply(&mut self, params: TerrainParams) -> Result<ParamsChange> {
        let change = params.diff(&self.params);

        let outcome = params.validate().and_then(|()| match change {
            ParamsChange::Unchanged => Ok(()),
            ParamsChange::Reshape => self.reshape(&params),
            ParamsChange::Rebuild => self.rebuild(self.frame, &params),
        });

        if let Err(e) = outcome {
            warn!("Rejected parameter change, keeping current mesh: {}", e);
            return Err(e);
        }

        debug!("Applied parameters ({:?})", change);
        self.params = params;
        Ok(change)
    }

    /// Regenerates the buffers for `frame` of an animated grid.
    pub fn show_frame(&mut self, frame: usize) -> Result<()> {
        let frame_count = self.frame_count();
        if frame >= frame_count {
            return Err(TerrainError::FrameOutOfRange { frame, frame_count });
        }

        let params = self.params.clone();
        self.rebuild(frame, &params).map_err(|e| {
            warn!("Could not build frame {}, keeping current mesh: {}", frame, e);
            e
        })
    }

    /// Starts playback of every frame over `total_seconds`.
    pub fn start_playback(&self, driver: &mut AnimationDriver, total_seconds: f32) -> bool {
        driver.start(total_seconds, self.frame_count())
    }

    /// Pulls the next frame from `driver` and regenerates for it. A frame
    /// that fails to build is skipped and the previous mesh stays up.
    pub fn step(&mut self, driver: &mut AnimationDriver) -> Option<FrameTick> {
        let tick = driver.next()?;
        // Failure is already logged and the last good mesh is kept
        let _ = self.show_frame(tick.frame);
        Some(tick)
    }

    fn rebuild(&mut self, frame: usize, params: &TerrainParams) -> Result<()> {
        let raw = build_frame(&self.grid, self.mode, frame, params)?;
        let vertices = adjust_heights(&raw.mesh.vertices, self.mode, raw.shape, params)?;

        self.mesh = TerrainMeshData {
            vertices,
            triangles: raw.mesh.triangles.clone(),
        };
        self.raw = raw;
        self.frame = frame;
        self.revision += 1;
        Ok(())
    }

    fn reshape(&mut self, params: &TerrainParams) -> Result<()> {
        let adjusted = adjust_heights(&self.raw.mesh.vertices, self.mode, self.raw.shape, params)?;

        for (vertex, target) in self.mesh.vertices.iter_mut().zip(adjusted) {
            vertex.y = target.y;
        }
        self.revision += 1;
        Ok(())
    }
}
