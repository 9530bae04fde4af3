//! Crate-level error aggregation.

use thiserror::Error;

use crate::driver::DriverError;
use crate::midi::ParseError;
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl PipelineError {
    /// Process exit code for this error, per the documented CLI contract:
    /// 1 for parse errors, 2 for external tool failures, 3 for I/O errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Parse(_) => 1,
            PipelineError::Driver(_) => 2,
            PipelineError::Io(_) | PipelineError::Render(_) => 3,
        }
    }
}
