pub mod evolution;
pub mod record;

pub use evolution::*;
pub use record::*;
