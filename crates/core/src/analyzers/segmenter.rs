//! Splits the classified line stream into interrupt routines.
//!
//! A routine opens on a vector label (`__vector_<n>`) and closes on the next
//! label of any kind, on end of input, and, under
//! [`BoundaryPolicy::LabelOrBlank`], on the first blank line. At most one
//! routine is open at a time. Labels that are not vectors close the open
//! routine and leave nothing open, so ordinary functions are never tracked.
use log::{debug, info, trace, warn};

use super::metrics::{MetricsAccumulator, MnemonicPatterns};
use crate::error::IsrError;
use crate::models::{
    AnalysisReport, AnalysisStats, AnalyzerConfig, BoundaryPolicy, EmptyRoutinePolicy,
    RoutineRecord, TimingConfig,
};
use crate::parsing::{DisassemblyLine, LineClassifier};

/// Index of a vector label, `None` for any other symbol
pub fn vector_index_of(prefix: &str, symbol: &str) -> Option<u32> {
    let suffix = symbol.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

#[derive(Debug)]
struct OpenRoutine {
    name: String,
    vector_index: u32,
    start_address: u64,
    last_instruction_address: Option<u64>,
    metrics: MetricsAccumulator,
}

impl OpenRoutine {
    fn new(name: &str, vector_index: u32, start_address: u64) -> Self {
        Self {
            name: name.to_string(),
            vector_index,
            start_address,
            last_instruction_address: None,
            metrics: MetricsAccumulator::new(),
        }
    }

    fn into_record(self, size_bytes: Option<u64>, timing: Option<&TimingConfig>) -> RoutineRecord {
        let instructions = self.metrics.instruction_count as u64;
        let cycle_estimate = timing.map(|t| instructions.saturating_mul(t.cycles_per_instruction));
        let execution_time_us = match (cycle_estimate, timing) {
            (Some(cycles), Some(t)) if t.clock_hz > 0 => {
                Some(cycles as f64 / t.clock_hz as f64 * 1e6)
            }
            _ => None,
        };

        RoutineRecord {
            balance_issue: !self.metrics.is_balanced(),
            name: self.name,
            vector_index: self.vector_index,
            start_address: self.start_address,
            last_instruction_address: self.last_instruction_address,
            instruction_count: self.metrics.instruction_count,
            size_bytes,
            push_count: self.metrics.push_count,
            pop_count: self.metrics.pop_count,
            registers_used: self.metrics.registers,
            cycle_estimate,
            execution_time_us,
        }
    }
}

pub struct IsrSegmenter<'a> {
    config: &'a AnalyzerConfig,
    patterns: &'a MnemonicPatterns,
    open: Option<OpenRoutine>,
    finished: Vec<RoutineRecord>,
    stats: AnalysisStats,
}

impl<'a> IsrSegmenter<'a> {
    pub fn new(config: &'a AnalyzerConfig, patterns: &'a MnemonicPatterns) -> Self {
        Self {
            config,
            patterns,
            open: None,
            finished: Vec::new(),
            stats: AnalysisStats::default(),
        }
    }

    pub fn has_open_routine(&self) -> bool {
        self.open.is_some()
    }

    pub fn feed(&mut self, line: &DisassemblyLine<'_>) {
        self.stats.lines_scanned += 1;

        match *line {
            DisassemblyLine::Label { address, symbol } => {
                self.stats.labels_seen += 1;
                self.finalize();

                if let Some(vector_index) = vector_index_of(&self.config.vector_prefix, symbol) {
                    trace!("Opening {} at 0x{:x}", symbol, address);
                    self.open = Some(OpenRoutine::new(symbol, vector_index, address));
                }
            }
            DisassemblyLine::Instruction { address, raw } => {
                self.stats.instruction_lines += 1;

                if let Some(open) = self.open.as_mut() {
                    open.metrics.observe(self.patterns, raw);
                    open.last_instruction_address = Some(address);
                }
            }
            DisassemblyLine::Blank => {
                if self.config.boundary == BoundaryPolicy::LabelOrBlank {
                    self.finalize();
                }
            }
            DisassemblyLine::Other => {}
        }
    }

    /// Closes any routine still open and returns everything collected
    pub fn finish(mut self) -> AnalysisReport {
        self.finalize();

        AnalysisReport {
            routines: self.finished,
            stats: self.stats,
        }
    }

    fn finalize(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let timing = self.config.timing.as_ref();

        let record = match open.last_instruction_address {
            Some(last) => {
                let size = last
                    .saturating_sub(open.start_address)
                    .saturating_add(self.config.instruction_width);
                open.into_record(Some(size), timing)
            }
            None => match self.config.empty_routines {
                EmptyRoutinePolicy::Drop => {
                    debug!("Dropping {}: no instructions", open.name);
                    self.stats.routines_dropped += 1;
                    return;
                }
                EmptyRoutinePolicy::Warn => {
                    warn!("{} at 0x{:x} has no instructions", open.name, open.start_address);
                    open.into_record(None, timing)
                }
            },
        };

        debug!(
            "Finalized {}: {:?} bytes, {} pushes, {} pops",
            record.name, record.size_bytes, record.push_count, record.pop_count
        );
        self.finished.push(record);
    }
}

/// Compiled patterns and configuration for repeated analysis runs
pub struct IsrAnalyzer {
    config: AnalyzerConfig,
    classifier: LineClassifier,
    patterns: MnemonicPatterns,
}

impl IsrAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, IsrError> {
        Ok(Self {
            config,
            classifier: LineClassifier::new()?,
            patterns: MnemonicPatterns::new()?,
        })
    }

    pub fn analyze(&self, text: &str) -> Result<AnalysisReport, IsrError> {
        self.analyze_lines(text.lines())
    }

    /// Scans `lines` in order. The first malformed line aborts the scan and
    /// nothing is reported.
    pub fn analyze_lines<'l, I>(&self, lines: I) -> Result<AnalysisReport, IsrError>
    where
        I: IntoIterator<Item = &'l str>,
    {
        info!("Analyzing disassembly ({} boundaries)", self.config.boundary);
        let mut segmenter = IsrSegmenter::new(&self.config, &self.patterns);

        for (idx, line) in lines.into_iter().enumerate() {
            let classified = self.classifier.classify(line, idx + 1)?;
            segmenter.feed(&classified);
        }

        let report = segmenter.finish();
        info!(
            "Found {} interrupt routines in {} lines",
            report.routines.len(),
            report.stats.lines_scanned
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMER_ISR: &str = "\
00000100 <__vector_17>:
 100: 9f b7         push r15
 102: 2f b7         push r2
 104: 9f bf         pop  r15

00000106 <main>:
 106: 0c 94         rjmp main
";

    fn analyze_with(text: &str, config: AnalyzerConfig) -> AnalysisReport {
        IsrAnalyzer::new(config).unwrap().analyze(text).unwrap()
    }

    fn analyze(text: &str) -> AnalysisReport {
        analyze_with(text, AnalyzerConfig::default())
    }

    #[test]
    fn test_vector_index_of() {
        assert_eq!(vector_index_of("__vector_", "__vector_17"), Some(17));
        assert_eq!(vector_index_of("__vector_", "__vector_0"), Some(0));
        assert_eq!(vector_index_of("__vector_", "__vectors"), None);
        assert_eq!(vector_index_of("__vector_", "__vector_"), None);
        assert_eq!(vector_index_of("__vector_", "__vector_default"), None);
        assert_eq!(vector_index_of("__vector_", "__vector_1x"), None);
        assert_eq!(vector_index_of("__vector_", "main"), None);
        assert_eq!(vector_index_of("__vector_", "__vector_99999999999"), None);
        assert_eq!(vector_index_of("isr_", "isr_3"), Some(3));
    }

    #[test]
    fn test_timer_isr_scenario() {
        let report = analyze(TIMER_ISR);
        assert_eq!(report.routines.len(), 1);

        let isr = &report.routines[0];
        assert_eq!(isr.name, "__vector_17");
        assert_eq!(isr.vector_index, 17);
        assert_eq!(isr.start_address, 0x100);
        assert_eq!(isr.last_instruction_address, Some(0x104));
        assert_eq!(isr.size_bytes, Some(6));
        assert_eq!(isr.registers_used.as_slice(), &[15, 2]);
        assert_eq!(isr.push_count, 2);
        assert_eq!(isr.pop_count, 1);
        assert!(isr.balance_issue);
        assert_eq!(isr.cycle_estimate, None);

        assert_eq!(report.stats.labels_seen, 2);
        assert_eq!(report.stats.instruction_lines, 4);
        assert_eq!(report.stats.lines_scanned, 7);
    }

    #[test]
    fn test_balanced_routine() {
        let report = analyze(
            "00000200 <__vector_20>:\n 200:\t1f 92 \tpush\tr1\n 202:\t1f 90 \tpop\tr1\n 204:\t18 95 \treti\n",
        );
        assert!(!report.routines[0].balance_issue);
        assert_eq!(report.routines[0].size_bytes, Some(6));
    }

    #[test]
    fn test_non_vector_labels_are_never_tracked() {
        let report = analyze(
            "00000080 <setup>:\n 80:\t1f 93 \tpush\tr17\n 82:\t08 95 \tret\n\n\
             000000a0 <__vectors>:\n a0:\t0c 94 \tjmp\t0x0\n",
        );
        assert!(report.routines.is_empty());
        assert_eq!(report.stats.instruction_lines, 3);
    }

    #[test]
    fn test_label_closes_routine_without_blank_line() {
        let report = analyze(
            "00000100 <__vector_1>:\n 100:\t1f 92 \tpush\tr1\n\
             00000102 <__vector_2>:\n 102:\t0f 92 \tpush\tr0\n 104:\t0f 90 \tpop\tr0\n",
        );
        assert_eq!(report.routines.len(), 2);
        assert_eq!(report.routines[0].name, "__vector_1");
        assert_eq!(report.routines[0].size_bytes, Some(2));
        assert_eq!(report.routines[1].name, "__vector_2");
        assert_eq!(report.routines[1].size_bytes, Some(4));
        assert_eq!(report.routines[1].registers_used.as_slice(), &[0]);
    }

    #[test]
    fn test_blank_line_boundary_policies() {
        // instructions after the blank line are outside the routine under the
        // default policy
        let text = "00000100 <__vector_3>:\n 100:\t1f 92 \tpush\tr1\n\n 102:\t1f 90 \tpop\tr1\n";

        let strict = analyze(text);
        assert_eq!(strict.routines[0].size_bytes, Some(2));
        assert!(strict.routines[0].balance_issue);

        let lenient = analyze_with(
            text,
            AnalyzerConfig {
                boundary: BoundaryPolicy::LabelOnly,
                ..AnalyzerConfig::default()
            },
        );
        assert_eq!(lenient.routines[0].size_bytes, Some(4));
        assert!(!lenient.routines[0].balance_issue);
    }

    #[test]
    fn test_blank_line_without_open_routine() {
        let report = analyze("\n\n   \n00000100 <main>:\n\n");
        assert!(report.routines.is_empty());
        assert_eq!(report.stats.routines_dropped, 0);
    }

    #[test]
    fn test_size_ignores_interleaved_source_lines() {
        let report = analyze(
            "00000100 <__vector_17>:\nISR(TIMER1_COMPA_vect)\n 100:\t1f 92 \tpush\tr1\n{\n\
             \tcount++;\n 102:\t80 91 00 01 \tlds\tr24, 0x0100\n 106:\t18 95 \treti\n",
        );
        let isr = &report.routines[0];
        assert_eq!(isr.size_bytes, Some(0x106 - 0x100 + 2));
        assert_eq!(isr.instruction_count, 3);
        assert_eq!(isr.registers_used.as_slice(), &[1, 24]);
    }

    #[test]
    fn test_start_address_comes_from_label() {
        // alignment padding between the label and the first instruction
        let report = analyze("00000100 <__vector_4>:\n 104:\t18 95 \treti\n");
        assert_eq!(report.routines[0].start_address, 0x100);
        assert_eq!(report.routines[0].size_bytes, Some(6));
    }

    #[test]
    fn test_consecutive_vector_labels_are_dropped() {
        let report = analyze(
            "00000100 <__vector_5>:\n00000100 <__vector_6>:\n 100:\t18 95 \treti\n",
        );
        assert_eq!(report.routines.len(), 1);
        assert_eq!(report.routines[0].name, "__vector_6");
        assert_eq!(report.stats.routines_dropped, 1);
    }

    #[test]
    fn test_empty_routine_warn_policy() {
        let report = analyze_with(
            "00000100 <__vector_5>:\n\n00000102 <__vector_6>:\n 102:\t18 95 \treti\n",
            AnalyzerConfig {
                empty_routines: EmptyRoutinePolicy::Warn,
                ..AnalyzerConfig::default()
            },
        );
        assert_eq!(report.routines.len(), 2);
        assert!(report.routines[0].is_empty());
        assert_eq!(report.routines[0].size_bytes, None);
        assert!(!report.routines[0].balance_issue);
        assert_eq!(report.routines[1].size_bytes, Some(2));
        assert_eq!(report.stats.routines_dropped, 0);
    }

    #[test]
    fn test_routine_open_at_end_of_input() {
        let report = analyze("00000100 <__vector_9>:\n 100:\t1f 92 \tpush\tr1");
        assert_eq!(report.routines.len(), 1);
        assert!(report.routines[0].balance_issue);
    }

    #[test]
    fn test_non_monotonic_addresses_do_not_panic() {
        let report = analyze("00000200 <__vector_9>:\n 1fe:\t18 95 \treti\n");
        assert_eq!(report.routines[0].size_bytes, Some(2));
    }

    #[test]
    fn test_timing_estimates() {
        let report = analyze_with(
            TIMER_ISR,
            AnalyzerConfig {
                timing: Some(TimingConfig::default()),
                ..AnalyzerConfig::default()
            },
        );
        let isr = &report.routines[0];
        assert_eq!(isr.cycle_estimate, Some(3));
        let time = isr.execution_time_us.unwrap();
        assert!((time - 0.1875).abs() < 1e-9);
        assert_eq!(report.total_cycles(), Some(3));
    }

    #[test]
    fn test_address_at_top_of_range_saturates() {
        let report = analyze("0000000000000000 <__vector_1>:\n ffffffffffffffff:\t18 95 \treti\n");
        assert_eq!(report.routines[0].size_bytes, Some(u64::MAX));
    }

    #[test]
    fn test_cycle_estimate_saturates() {
        let report = analyze_with(
            "00000100 <__vector_1>:\n 100:\t0f 92 \tpush\tr0\n 102:\t18 95 \treti\n",
            AnalyzerConfig {
                timing: Some(TimingConfig {
                    clock_hz: 1,
                    cycles_per_instruction: u64::MAX,
                }),
                ..AnalyzerConfig::default()
            },
        );
        assert_eq!(report.routines[0].cycle_estimate, Some(u64::MAX));
        assert_eq!(report.total_cycles(), Some(u64::MAX));
    }

    #[test]
    fn test_malformed_line_aborts_analysis() {
        let analyzer = IsrAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let err = analyzer
            .analyze("00000100 <__vector_1>:\n 100:\t18 95 \treti\n123456789abcdef0123 <x>:\n")
            .unwrap_err();
        assert!(matches!(err, IsrError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_segmenter_state() {
        let config = AnalyzerConfig::default();
        let patterns = MnemonicPatterns::new().unwrap();
        let mut segmenter = IsrSegmenter::new(&config, &patterns);

        segmenter.feed(&DisassemblyLine::Label { address: 0x100, symbol: "__vector_1" });
        assert!(segmenter.has_open_routine());
        segmenter.feed(&DisassemblyLine::Other);
        assert!(segmenter.has_open_routine());
        segmenter.feed(&DisassemblyLine::Label { address: 0x110, symbol: "loop" });
        assert!(!segmenter.has_open_routine());
        segmenter.feed(&DisassemblyLine::Instruction { address: 0x110, raw: " 110:\t1f 92 \tpush\tr1" });

        let report = segmenter.finish();
        assert!(report.routines.is_empty());
        assert_eq!(report.stats.routines_dropped, 1);
    }
}
