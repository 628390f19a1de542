use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RoutineRecord;
use crate::consts::{CYCLES_PER_INSTRUCTION, DEFAULT_CLOCK_HZ, INSTRUCTION_WIDTH, VECTOR_PREFIX};

/// When an open routine is considered finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Only the next label (or end of input) closes a routine
    LabelOnly,
    /// The next label or a blank separator line, whichever comes first
    #[default]
    LabelOrBlank,
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label-only" => Ok(Self::LabelOnly),
            "label-or-blank" => Ok(Self::LabelOrBlank),
            other => Err(format!(
                "unknown boundary policy '{}' (expected label-only or label-or-blank)",
                other
            )),
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelOnly => write!(f, "label-only"),
            Self::LabelOrBlank => write!(f, "label-or-blank"),
        }
    }
}

/// What to do with a vector label that never received an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmptyRoutinePolicy {
    #[default]
    Drop,
    /// Keep the routine as a size-less record and flag it in the report
    Warn,
}

impl FromStr for EmptyRoutinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "warn" => Ok(Self::Warn),
            other => Err(format!(
                "unknown empty routine policy '{}' (expected drop or warn)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// MCU clock frequency in Hz
    pub clock_hz: u64,
    /// Flat cost charged for every instruction
    pub cycles_per_instruction: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            cycles_per_instruction: CYCLES_PER_INSTRUCTION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Boundary rule used to close an open routine
    pub boundary: BoundaryPolicy,
    /// Handling of vector labels without instructions
    pub empty_routines: EmptyRoutinePolicy,
    /// Label prefix identifying interrupt vectors (followed by the index)
    pub vector_prefix: String,
    /// Width of one instruction in bytes, added to the last address when sizing
    pub instruction_width: u64,
    /// Cycle and execution time estimation, disabled when `None`
    pub timing: Option<TimingConfig>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::default(),
            empty_routines: EmptyRoutinePolicy::default(),
            vector_prefix: VECTOR_PREFIX.to_string(),
            instruction_width: INSTRUCTION_WIDTH,
            timing: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Total lines fed to the classifier
    pub lines_scanned: usize,
    /// Label lines of any kind
    pub labels_seen: usize,
    /// Instruction lines of any kind, tracked or not
    pub instruction_lines: usize,
    /// Vector routines closed without a single instruction
    pub routines_dropped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Finalized routines in the order they were closed
    pub routines: Vec<RoutineRecord>,
    /// Counters collected during the scan
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn total_cycles(&self) -> Option<u64> {
        self.routines
            .iter()
            .map(|r| r.cycle_estimate)
            .try_fold(0u64, |total, cycles| Some(total.saturating_add(cycles?)))
    }

    pub fn total_execution_time_us(&self) -> Option<f64> {
        self.routines
            .iter()
            .map(|r| r.execution_time_us)
            .sum::<Option<f64>>()
    }

    pub fn has_timing(&self) -> bool {
        self.routines.iter().any(|r| r.cycle_estimate.is_some())
    }

    pub fn balance_issues(&self) -> impl Iterator<Item = &RoutineRecord> {
        self.routines.iter().filter(|r| r.balance_issue)
    }
}
