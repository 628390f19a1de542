pub mod base;
pub mod routine;
pub mod symbol;

pub use base::*;
pub use routine::*;
pub use symbol::*;
