use regex::Regex;

use crate::error::IsrError;
use crate::models::RegisterSet;

const PUSH_PATTERN: &str = r"\bpush\b";
const POP_PATTERN: &str = r"\bpop\b";
const REGISTER_PATTERN: &str = r"\br([0-9]|1[0-9]|2[0-9]|3[0-1])\b";

/// Lexical patterns run over the raw text of every tracked instruction line.
///
/// Matching is textual: a symbol name in a trailing `; <...>` comment that
/// happens to read like `r12` or `pop` is counted too.
pub struct MnemonicPatterns {
    push_re: Regex,
    pop_re: Regex,
    register_re: Regex,
}

impl MnemonicPatterns {
    pub fn new() -> Result<Self, IsrError> {
        Ok(Self {
            push_re: Regex::new(PUSH_PATTERN)?,
            pop_re: Regex::new(POP_PATTERN)?,
            register_re: Regex::new(REGISTER_PATTERN)?,
        })
    }
}

/// Per-routine tallies, reset whenever a new routine opens
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsAccumulator {
    pub instruction_count: usize,
    pub push_count: usize,
    pub pop_count: usize,
    pub registers: RegisterSet,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, patterns: &MnemonicPatterns, raw: &str) {
        self.instruction_count += 1;

        if patterns.push_re.is_match(raw) {
            self.push_count += 1;
        }
        if patterns.pop_re.is_match(raw) {
            self.pop_count += 1;
        }

        for cap in patterns.register_re.captures_iter(raw) {
            // the pattern only admits 0..=31
            if let Ok(reg) = cap[1].parse::<u8>() {
                self.registers.insert(reg);
            }
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.push_count == self.pop_count
    }
}
