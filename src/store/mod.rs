pub mod lookup;
pub mod normalize;
pub mod schema_gen;
pub mod sqlite;

pub use lookup::*;
pub use normalize::*;
pub use sqlite::*;
