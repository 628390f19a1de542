use thiserror::Error;

#[derive(Error, Debug)]
pub enum IsrError {
    #[error("Failed to read file")]
    FileReadError(#[from] std::io::Error),
    #[error("Malformed hex field on line {line}: {text}")]
    MalformedLine { line: usize, text: String },
    #[error("Invalid pattern")]
    PatternError(#[from] regex::Error),
    #[error("Failed to serialize to JSON")]
    SerializationError(#[from] serde_json::Error),
}
