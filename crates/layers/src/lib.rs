pub mod markers;
pub mod query;
pub mod search;
pub mod surface;

pub use markers::*;
pub use query::*;
pub use search::*;
pub use surface::*;
