use crate::error::IsrError;

/// Parses a hexadecimal field captured from line `line`. Values that do not
/// fit in 64 bits are rejected instead of truncated.
pub fn parse_hex_field(field: &str, line: usize, text: &str) -> Result<u64, IsrError> {
    u64::from_str_radix(field, 16).map_err(|_| IsrError::MalformedLine {
        line,
        text: text.trim_end().to_string(),
    })
}
