use crate::consts::REPORT_SEPARATOR_WIDTH;
use crate::models::{AnalysisReport, RoutineRecord};
use crate::traits::{ReportFormatter, VectorResolver};

const TABLE_HEADERS: [&str; 6] = [
    "ISR Name",
    "Start Address",
    "End Address",
    "Size (Bytes)",
    "Cycles",
    "Execution Time (µs)",
];

/// Plain text report, one block per routine in program order
pub struct TextReport {
    separator_width: usize,
}

impl Default for TextReport {
    fn default() -> Self {
        Self::new()
    }
}

impl TextReport {
    pub fn new() -> Self {
        Self {
            separator_width: REPORT_SEPARATOR_WIDTH,
        }
    }

    fn separator(&self) -> String {
        "=".repeat(self.separator_width)
    }

    fn format_table(&self, report: &AnalysisReport, resolver: &dyn VectorResolver) -> String {
        let rows: Vec<[String; 6]> = report
            .routines
            .iter()
            .map(|r| {
                [
                    resolver.resolve(r.vector_index),
                    format!("0x{:04x}", r.start_address),
                    r.last_instruction_address
                        .map_or_else(|| "-".to_string(), |a| format!("0x{:04x}", a)),
                    r.size_bytes.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    r.cycle_estimate.map_or_else(|| "-".to_string(), |c| c.to_string()),
                    r.execution_time_us
                        .map_or_else(|| "-".to_string(), |t| format!("{:.4}", t)),
                ]
            })
            .collect();

        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let render_row = |cells: &[String]| {
            cells
                .iter()
                .zip(widths.iter())
                .enumerate()
                .map(|(i, (cell, width))| {
                    if i == 0 {
                        format!("{:<w$}", cell, w = *width)
                    } else {
                        format!("{:>w$}", cell, w = *width)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
        let mut lines = vec![render_row(&header[..])];
        lines.extend(rows.iter().map(|row| render_row(&row[..])));
        lines.join("\n")
    }
}

/// `r<N>` names joined in first-seen order
pub fn format_registers(routine: &RoutineRecord) -> String {
    routine.registers_used.names().join(", ")
}

impl ReportFormatter for TextReport {
    fn format_routine(&self, routine: &RoutineRecord, resolver: &dyn VectorResolver) -> String {
        let name = resolver.resolve(routine.vector_index);

        let Some(size) = routine.size_bytes else {
            return format!("ISR {} ({}): no instructions", name, routine.name);
        };

        let mut lines = vec![
            format!("ISR {} ({}): Size = {} bytes", name, routine.name, size),
            format!("  Registers used: {}", format_registers(routine)),
        ];
        if routine.balance_issue {
            lines.push(format!(
                "  Balance issue: {} pushes, {} pops",
                routine.push_count, routine.pop_count
            ));
        }

        lines.join("\n")
    }

    fn format_summary(&self, report: &AnalysisReport, resolver: &dyn VectorResolver) -> Option<String> {
        if !report.has_timing() {
            return None;
        }

        let total_cycles = report.total_cycles().unwrap_or(0);
        let total_time = report.total_execution_time_us().unwrap_or(0.0);

        Some(format!(
            "{}\n\nSummary Report:\nTotal ISR Execution Cycles: {}\nTotal Execution Time: {:.2} µs",
            self.format_table(report, resolver),
            total_cycles,
            total_time
        ))
    }

    fn format_header(&self) -> Option<String> {
        Some(self.separator())
    }

    fn format_footer(&self) -> Option<String> {
        Some(self.separator())
    }
}
