//! Safe SQL builder: identifiers from constants only, values as parameters.

mod builder;
pub mod exec;
pub mod params;
pub use builder::*;
pub use exec::*;
pub use params::*;
