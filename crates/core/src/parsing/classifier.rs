//! Line classification for `avr-objdump -d` (and `-d -S`) output.
//!
//! Three line shapes matter to the analyzer:
//!
//! ```text
//! 00000100 <__vector_17>:          label
//!  100:	9f b7       	push	r15       instruction
//!                                  blank
//! ```
//!
//! Everything else, including source lines interleaved by `-S`, is `Other`.
use regex::Regex;

use crate::error::IsrError;
use crate::utils::parse_hex_field;

const LABEL_PATTERN: &str = r"^([0-9a-fA-F]+) <(.+)>:";
const INSTRUCTION_PATTERN: &str = r"^\s*([0-9a-fA-F]+):\s+([0-9a-fA-F\s]+)\s+";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisassemblyLine<'a> {
    Label { address: u64, symbol: &'a str },
    /// `raw` is the whole line, mnemonics and operands included
    Instruction { address: u64, raw: &'a str },
    Blank,
    Other,
}

pub struct LineClassifier {
    label_re: Regex,
    instruction_re: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self, IsrError> {
        Ok(Self {
            label_re: Regex::new(LABEL_PATTERN)?,
            instruction_re: Regex::new(INSTRUCTION_PATTERN)?,
        })
    }

    /// Classifies a single line. `line_number` is 1-based and only used for
    /// error reporting.
    pub fn classify<'a>(
        &self,
        line: &'a str,
        line_number: usize,
    ) -> Result<DisassemblyLine<'a>, IsrError> {
        if let Some(cap) = self.label_re.captures(line) {
            let address = parse_hex_field(&cap[1], line_number, line)?;
            let symbol = cap.get(2).map_or("", |m| m.as_str());
            return Ok(DisassemblyLine::Label { address, symbol });
        }

        if let Some(cap) = self.instruction_re.captures(line) {
            let address = parse_hex_field(&cap[1], line_number, line)?;
            return Ok(DisassemblyLine::Instruction { address, raw: line });
        }

        if line.trim().is_empty() {
            return Ok(DisassemblyLine::Blank);
        }

        Ok(DisassemblyLine::Other)
    }
}
