pub mod formatter;
pub mod resolver;

pub use formatter::*;
pub use resolver::*;
