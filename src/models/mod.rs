pub mod record;
pub mod reformat;
pub mod transcript;

pub use record::*;
pub use reformat::*;
pub use transcript::*;
