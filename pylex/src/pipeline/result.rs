use crate::file_processor::FileMetadata;
use crate::lexical::ScanReport;
use std::time::Duration;

/// Output of one file run through loading and scanning
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    pub report: ScanReport,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(file_metadata: FileMetadata, report: ScanReport, processing_duration: Duration) -> Self {
        Self {
            file_metadata,
            report,
            processing_duration,
        }
    }

    pub fn token_count(&self) -> usize {
        self.report.tokens.len()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.report.diagnostics.is_empty()
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "File scan pipeline completed",
            "file" => file_path,
            "tokens" => self.token_count(),
            "diagnostics" => self.report.diagnostics.len(),
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_tokens_per_sec" => format!("{:.0}", self.token_count() as f64 / seconds.max(f64::EPSILON))
        );
    }
}
