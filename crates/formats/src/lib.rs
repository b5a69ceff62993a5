pub mod cities;
pub mod countries;
pub mod error;

pub use cities::*;
pub use countries::*;
pub use error::*;
