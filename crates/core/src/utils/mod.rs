pub mod format;
pub mod parsing;
pub mod writer;

pub use format::*;
pub use parsing::*;
pub use writer::*;
