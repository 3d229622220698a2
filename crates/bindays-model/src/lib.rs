pub mod address;
pub mod preferences;
pub mod schedule;

pub use address::*;
pub use preferences::*;
pub use schedule::*;
