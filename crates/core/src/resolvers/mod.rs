pub mod vectors;

pub use vectors::VectorTable;
