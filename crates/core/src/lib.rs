use std::path::Path;

pub mod analyzers;
pub mod consts;
pub mod error;
pub mod models;
pub mod parsing;
pub mod resolvers;
pub mod traits;
pub mod utils;

pub use analyzers::{IsrAnalyzer, IsrSegmenter, MetricsAccumulator, MnemonicPatterns};
pub use error::IsrError;
pub use models::{
    AnalysisReport, AnalysisStats, AnalyzerConfig, BoundaryPolicy, EmptyRoutinePolicy,
    RegisterSet, RoutineRecord, SymbolEntry, SymbolKind, TimingConfig,
};
pub use parsing::{filter_kinds, format_symbols, DisassemblyLine, LineClassifier, NmParser};
pub use resolvers::VectorTable;
pub use traits::{ReportFormatter, VectorResolver};
pub use utils::{write_results, FileWriter, TextReport};

/// Analyzes disassembly text that has already been captured
pub fn analyze_text(text: &str, config: Option<AnalyzerConfig>) -> Result<AnalysisReport, IsrError> {
    let config = config.unwrap_or_default();
    IsrAnalyzer::new(config)?.analyze(text)
}

/// Reads an `avr-objdump -d` listing from disk and analyzes it. The file is
/// read in full before scanning starts.
pub fn analyze_file(file_path: &Path, config: Option<AnalyzerConfig>) -> Result<AnalysisReport, IsrError> {
    let text = std::fs::read_to_string(file_path)?;
    analyze_text(&text, config)
}

/// Renders `report` with the default text formatter and ATmega32U4 names
pub fn render_report(report: &AnalysisReport) -> String {
    TextReport::new().format_report(report, &VectorTable::new())
}

/// Reads `avr-nm -S` output from disk and formats the symbols whose type
/// letter appears in `filter`, largest first
pub fn symbol_report_from_file(file_path: &Path, filter: &str) -> Result<String, IsrError> {
    let text = std::fs::read_to_string(file_path)?;
    let symbols = NmParser::new()?.parse(&text)?;
    Ok(format_symbols(&symbols, &filter_kinds(filter)))
}
