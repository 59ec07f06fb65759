//! Read/write pipeline artifact JSON files.
//!
//! The schema is defined by `models::PipelineArtifact`. Reading validates the
//! artifact; a file that parses but is inconsistent is as fatal as one that
//! does not parse.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::AppError;
use crate::models::{LogisticPipeline, PipelineArtifact};

/// Load and validate a pipeline artifact.
pub fn load_pipeline(path: &Path) -> Result<LogisticPipeline, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::startup(format!(
            "Failed to open model artifact '{}': {e}",
            path.display()
        ))
    })?;
    read_pipeline(BufReader::new(file)).map_err(|e| {
        AppError::startup(format!("Model artifact '{}': {}", path.display(), e.message()))
    })
}

/// Parse and validate a pipeline artifact from any reader.
pub fn read_pipeline<R: Read>(reader: R) -> Result<LogisticPipeline, AppError> {
    let artifact: PipelineArtifact = serde_json::from_reader(reader)
        .map_err(|e| AppError::startup(format!("Invalid artifact JSON: {e}")))?;
    LogisticPipeline::from_artifact(artifact)
        .map_err(|e| AppError::startup(format!("Invalid artifact: {e}")))
}

/// Write an artifact as pretty JSON.
pub fn write_artifact(path: &Path, artifact: &PipelineArtifact) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create artifact '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, artifact)
        .map_err(|e| AppError::io(format!("Failed to write artifact JSON: {e}")))?;
    Ok(())
}
