use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to read grid artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid detail: {0}")]
    InvalidDetail(String),
    #[error("invalid smoothing iteration count {0}")]
    InvalidIterationCount(i32),
    #[error("blend factor {0} is outside [0, 1]")]
    InvalidBlendFactor(f32),
    #[error("source has no elements to mesh")]
    EmptyInput,
    #[error("vertex buffer has {actual} entries, layout expects {expected}")]
    BufferMismatch { expected: usize, actual: usize },
    #[error("frame {frame} is out of range for {frame_count} frames")]
    FrameOutOfRange { frame: usize, frame_count: usize },
    #[error("invalid parameters file: {0}")]
    Config(#[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
