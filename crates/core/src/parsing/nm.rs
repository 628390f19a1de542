//! Symbol table report built from `avr-nm -S` output.
//!
//! Each sized symbol line reads `<address> <size> <type> <name>`, with address
//! and size in hex. Symbols without a size column are not reported.
use std::collections::HashSet;

use log::debug;
use regex::Regex;

use crate::error::IsrError;
use crate::models::{SymbolEntry, SymbolKind};
use crate::utils::parse_hex_field;

const NM_LINE_PATTERN: &str = r"^([0-9a-fA-F]+)\s+([0-9a-fA-F]+)\s+([A-Za-z])\s+(.+)";

/// Compiled `avr-nm -S` line pattern
pub struct NmParser {
    line_re: Regex,
}

impl NmParser {
    pub fn new() -> Result<Self, IsrError> {
        Ok(Self {
            line_re: Regex::new(NM_LINE_PATTERN)?,
        })
    }

    pub fn parse(&self, nm_output: &str) -> Result<Vec<SymbolEntry>, IsrError> {
        let mut symbols = Vec::new();

        for (idx, line) in nm_output.lines().enumerate() {
            let Some(cap) = self.line_re.captures(line) else {
                continue;
            };

            let address = parse_hex_field(&cap[1], idx + 1, line)?;
            let size = parse_hex_field(&cap[2], idx + 1, line)?;
            let code = cap[3].chars().next().unwrap_or('?');

            symbols.push(SymbolEntry {
                address,
                size,
                kind: SymbolKind::from_code(code),
                name: cap[4].trim_end().to_string(),
            });
        }

        debug!("Parsed {} sized symbols", symbols.len());
        Ok(symbols)
    }
}

/// Maps filter letters (e.g. `"tTbBdD"`) to symbol kinds. Letters outside the
/// known set select `Unknown`.
pub fn filter_kinds(letters: &str) -> HashSet<SymbolKind> {
    letters.chars().map(SymbolKind::from_code).collect()
}

/// Keeps symbols whose kind is in `filter`, largest first
pub fn select_symbols<'a>(
    symbols: &'a [SymbolEntry],
    filter: &HashSet<SymbolKind>,
) -> Vec<&'a SymbolEntry> {
    let mut selected: Vec<&SymbolEntry> = symbols
        .iter()
        .filter(|s| filter.contains(&s.kind))
        .collect();
    selected.sort_by(|a, b| b.size.cmp(&a.size));
    selected
}

pub fn format_symbols(symbols: &[SymbolEntry], filter: &HashSet<SymbolKind>) -> String {
    select_symbols(symbols, filter)
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
