use crate::models::{AnalysisReport, RoutineRecord};
use crate::traits::VectorResolver;

/// Renders analysis results for human readers
pub trait ReportFormatter {
    /// Lines describing a single routine
    fn format_routine(&self, routine: &RoutineRecord, resolver: &dyn VectorResolver) -> String;

    /// Aggregate section, `None` when there is nothing to summarize
    fn format_summary(&self, report: &AnalysisReport, resolver: &dyn VectorResolver) -> Option<String>;

    fn format_header(&self) -> Option<String> {
        None
    }

    /// Emitted after the last routine, before the summary
    fn format_footer(&self) -> Option<String> {
        None
    }

    /// Complete report. Routines keep the order of `report.routines`.
    fn format_report(&self, report: &AnalysisReport, resolver: &dyn VectorResolver) -> String {
        let mut parts = Vec::new();

        if let Some(header) = self.format_header() {
            parts.push(header);
        }
        for routine in &report.routines {
            parts.push(self.format_routine(routine, resolver));
        }
        if let Some(footer) = self.format_footer() {
            parts.push(footer);
        }
        if let Some(summary) = self.format_summary(report, resolver) {
            parts.push(summary);
        }

        parts.join("\n")
    }
}
