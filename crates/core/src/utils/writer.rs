use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IsrError;
use crate::models::AnalysisReport;

pub const REPORT_TEXT_FILE: &str = "isr_report.txt";
pub const REPORT_JSON_FILE: &str = "isr_report.json";

pub struct FileWriter;

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the rendered report and its JSON form under `base_path`,
    /// returning the paths written.
    pub fn write_results(
        &self,
        report: &AnalysisReport,
        rendered: &str,
        base_path: &Path,
    ) -> Result<Vec<PathBuf>, IsrError> {
        fs::create_dir_all(base_path)?;

        let text_path = base_path.join(REPORT_TEXT_FILE);
        fs::write(&text_path, rendered)?;

        let json_path = base_path.join(REPORT_JSON_FILE);
        let full_json = serde_json::to_string_pretty(report)?;
        fs::write(&json_path, full_json)?;

        Ok(vec![text_path, json_path])
    }
}

pub fn write_results(
    report: &AnalysisReport,
    rendered: &str,
    base_path: &Path,
) -> Result<Vec<PathBuf>, IsrError> {
    let writer = FileWriter::new();
    writer.write_results(report, rendered, base_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisStats;

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let report = AnalysisReport {
            routines: Vec::new(),
            stats: AnalysisStats {
                lines_scanned: 12,
                ..AnalysisStats::default()
            },
        };

        let written = write_results(&report, "=====\n=====", &out).unwrap();
        assert_eq!(written.len(), 2);

        let text = fs::read_to_string(out.join(REPORT_TEXT_FILE)).unwrap();
        assert_eq!(text, "=====\n=====");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(REPORT_JSON_FILE)).unwrap()).unwrap();
        assert_eq!(json["stats"]["lines_scanned"], 12);
        assert!(json["routines"].as_array().unwrap().is_empty());
    }
}
