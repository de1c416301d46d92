//! CLI commands implementation

pub mod load;
pub mod lookup;
pub mod serve;

pub use load::*;
pub use lookup::*;
pub use serve::*;
