//! File-level pipeline: load a source file, then scan it inside a logging file context

mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::{Scanner, ScanConfig};
use crate::logging;
use std::path::PathBuf;
use std::time::Instant;

/// Process a file with preferences taken from the environment
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

/// Process a file with explicit runtime preferences
pub fn process_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    config.validate()?;
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Starting file scan pipeline", "file" => file_path);

        let file_result =
            FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;

        let scan_config = ScanConfig::from(&config.lexical);
        let report = Scanner::new(&file_result.source, &scan_config).into_report();

        let result = PipelineResult::new(file_result.metadata, report, start_time.elapsed());
        result.log_success(file_path);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_process_file_collects_diagnostics() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.py");
        fs::write(&file_path, "total = \nprint(total)\n").unwrap();

        let result = process_file(file_path.to_str().unwrap()).unwrap();
        assert!(result.has_diagnostics());
        assert_eq!(result.file_metadata.line_count, 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert_matches!(
            process_file("no/such/file.py"),
            Err(PipelineError::FileProcessing(_))
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.lexical.tab_width = 0;
        assert_matches!(
            process_file_with_config("irrelevant.py", &config),
            Err(PipelineError::Configuration(_))
        );
    }
}
