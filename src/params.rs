use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

pub const MAX_SMOOTHING_STEPS: i32 = 10;

/// Interactive parameters of a terrain surface.
///
/// Loaded from RON; the older names (`steepness`, `iterations`,
/// `skip_detail`) are accepted as aliases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// 0 flattens the surface onto `baseline`, 1 keeps sampled heights.
    #[serde(alias = "steepness")]
    pub blend_factor: f32,
    #[serde(alias = "iterations")]
    pub smoothing_steps: i32,
    /// Resampling stride, 1 keeps every sample.
    #[serde(alias = "skip_detail")]
    pub stride: usize,
    /// Interpolated samples per source sample for profiles.
    pub detail_level: usize,
    pub baseline: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            blend_factor: 1.,
            smoothing_steps: 0,
            stride: 1,
            detail_level: 1,
            baseline: 0,
        }
    }
}

/// What a parameter change requires of the current buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParamsChange {
    Unchanged,
    /// Only heights move; topology is kept.
    Reshape,
    /// Vertex and triangle buffers must be regenerated.
    Rebuild,
}

impl TerrainParams {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let params: Self = ron::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.blend_factor) {
            return Err(TerrainError::InvalidBlendFactor(self.blend_factor));
        }
        if !(0..=MAX_SMOOTHING_STEPS).contains(&self.smoothing_steps) {
            return Err(TerrainError::InvalidIterationCount(self.smoothing_steps));
        }
        if self.stride < 1 {
            return Err(TerrainError::InvalidDetail(format!(
                "stride must be at least 1, got {}",
                self.stride
            )));
        }
        if self.detail_level < 1 {
            return Err(TerrainError::InvalidDetail(format!(
                "detail level must be at least 1, got {}",
                self.detail_level
            )));
        }
        Ok(())
    }

    /// Compares `self` against the parameters that produced the current
    /// buffers.
    pub fn diff(&self, applied: &Self) -> ParamsChange {
        if self.stride != applied.stride || self.detail_level != applied.detail_level {
            ParamsChange::Rebuild
        } else if self != applied {
            ParamsChange::Reshape
        } else {
            ParamsChange::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_are_valid_and_neutral() {
        let params = TerrainParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.blend_factor, 1.);
        assert_eq!(params.stride, 1);
    }

    #[test]
    fn diff_classifies_changes() {
        let applied = TerrainParams::default();

        assert_eq!(applied.diff(&applied), ParamsChange::Unchanged);

        let smoother = TerrainParams {
            smoothing_steps: 3,
            ..applied.clone()
        };
        assert_eq!(smoother.diff(&applied), ParamsChange::Reshape);

        let flatter = TerrainParams {
            blend_factor: 0.5,
            ..applied.clone()
        };
        assert_eq!(flatter.diff(&applied), ParamsChange::Reshape);

        let coarser = TerrainParams {
            stride: 4,
            blend_factor: 0.5,
            ..applied.clone()
        };
        assert_eq!(coarser.diff(&applied), ParamsChange::Rebuild);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let bad_blend = TerrainParams {
            blend_factor: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            bad_blend.validate(),
            Err(TerrainError::InvalidBlendFactor(_))
        ));

        let bad_steps = TerrainParams {
            smoothing_steps: -1,
            ..Default::default()
        };
        assert!(matches!(
            bad_steps.validate(),
            Err(TerrainError::InvalidIterationCount(-1))
        ));

        let too_many_steps = TerrainParams {
            smoothing_steps: 11,
            ..Default::default()
        };
        assert!(too_many_steps.validate().is_err());

        let bad_stride = TerrainParams {
            stride: 0,
            ..Default::default()
        };
        assert!(matches!(
            bad_stride.validate(),
            Err(TerrainError::InvalidDetail(_))
        ));
    }

    #[test]
    fn loads_ron_with_legacy_names() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(steepness: 0.25, iterations: 2, skip_detail: 3)").unwrap();
        file.flush().unwrap();

        let params = TerrainParams::load(file.path()).unwrap();
        assert_eq!(params.blend_factor, 0.25);
        assert_eq!(params.smoothing_steps, 2);
        assert_eq!(params.stride, 3);
        assert_eq!(params.detail_level, 1);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(blend_factor: 2.0)").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            TerrainParams::load(file.path()),
            Err(TerrainError::InvalidBlendFactor(_))
        ));
    }

    #[test]
    fn load_reports_malformed_ron() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(stride: \"three\")").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            TerrainParams::load(file.path()),
            Err(TerrainError::Config(_))
        ));
    }
}
