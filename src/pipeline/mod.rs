pub mod enrich;
pub mod merge;

pub use enrich::*;
pub use merge::*;
