pub mod classifier;
pub mod nm;

pub use classifier::*;
pub use nm::*;
