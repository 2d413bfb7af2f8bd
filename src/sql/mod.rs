//! Safe SQL builder: identifiers from table specs only, values as parameters.

mod builder;
mod params;
pub use builder::*;
pub use params::*;
