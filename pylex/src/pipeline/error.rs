use crate::config::runtime::ConfigError;
use crate::file_processor::FileProcessorError;

/// Pipeline processing errors. Lexical problems are diagnostics, not errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Configuration failed: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::FileProcessing(err) => err.error_code(),
            PipelineError::Configuration(err) => err.error_code(),
            PipelineError::Serialization(_) => {
                crate::logging::codes::system::INTERNAL_ERROR
            }
        }
    }
}
