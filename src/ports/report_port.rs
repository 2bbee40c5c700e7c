//! Report generation port trait.

use std::fs;
use std::path::Path;

use crate::domain::analysis::AnalysisConfig;
use crate::domain::error::TradelogError;
use crate::domain::metrics::MetricsReport;
use crate::domain::trade::TradeLog;

/// Port for presenting computed metrics.
pub trait ReportPort {
    fn render(
        &self,
        log: &TradeLog,
        report: &MetricsReport,
        config: &AnalysisConfig,
    ) -> Result<String, TradelogError>;

    /// Default implementation: renders, creates parent directories, writes.
    fn write(
        &self,
        log: &TradeLog,
        report: &MetricsReport,
        config: &AnalysisConfig,
        output_path: &Path,
    ) -> Result<(), TradelogError> {
        let content = self.render(log, report, config)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}
