pub mod metrics;
pub mod segmenter;

pub use metrics::{MetricsAccumulator, MnemonicPatterns};
pub use segmenter::{vector_index_of, IsrAnalyzer, IsrSegmenter};
