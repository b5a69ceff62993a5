pub mod config;
pub mod controller;
pub mod datasets;
pub mod info;
pub mod selection;

pub use config::*;
pub use controller::*;
pub use datasets::*;
pub use info::*;
pub use selection::*;
